//! Integration tests for error handling and edge cases.

use pdfcombine::config::Preferences;
use pdfcombine::error::PdfCombineError;
use pdfcombine::merge::MergeOutcome;
use pdfcombine::session::Session;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

use crate::common::{ScriptedPrompter, create_pdf, page_labels};

#[tokio::test]
async fn test_error_empty_list() {
    let prompter = Arc::new(ScriptedPrompter::new(true, "out.pdf"));
    let mut session = Session::new(Preferences::default(), prompter);

    let err = session.merge().await.unwrap_err();
    assert!(matches!(err, PdfCombineError::NoFilesToMerge));
    assert_eq!(err.exit_code(), PdfCombineError::NoFilesToMerge.exit_code());
}

#[tokio::test]
async fn test_error_corrupt_pdf() {
    let dir = TempDir::new().unwrap();
    let fake = dir.path().join("fake.pdf");
    fs::write(&fake, b"not a pdf at all").unwrap();

    let prompter = Arc::new(ScriptedPrompter::new(true, dir.path().join("out.pdf")));
    let mut session = Session::new(Preferences::default(), prompter);
    session.add_paths(vec![fake]);

    let err = session.merge().await.unwrap_err();
    assert!(matches!(err, PdfCombineError::NotAPdf { .. }));
    assert!(!dir.path().join("out.pdf").exists());
}

#[tokio::test]
async fn test_missing_file_skipped_when_not_replaced() {
    let dir = TempDir::new().unwrap();
    let a = create_pdf(dir.path(), "a.pdf", 2);

    // Declining also declines duplicate removal, which is fine here.
    let prompter = Arc::new(ScriptedPrompter::new(false, dir.path().join("out.pdf")));
    let mut session = Session::new(
        Preferences {
            add_blank_page_between_files: false,
            ..Preferences::default()
        },
        prompter,
    );
    session.add_paths(vec![dir.path().join("gone.pdf"), a]);

    let MergeOutcome::Completed(report) = session.merge().await.unwrap() else {
        panic!("merge did not complete");
    };
    assert_eq!(report.files_skipped, 1);
    assert_eq!(page_labels(&report.output), vec![1, 2]);
}

#[tokio::test]
async fn test_missing_file_replaced_during_merge() {
    let dir = TempDir::new().unwrap();
    let replacement = create_pdf(dir.path(), "found.pdf", 3);

    let prompter = Arc::new(
        ScriptedPrompter::new(true, dir.path().join("out.pdf")).with_replacement(&replacement),
    );
    let mut session = Session::new(
        Preferences {
            add_blank_page_between_files: false,
            ..Preferences::default()
        },
        prompter,
    );
    session.add_paths(vec![dir.path().join("gone.pdf")]);

    let MergeOutcome::Completed(report) = session.merge().await.unwrap() else {
        panic!("merge did not complete");
    };
    assert_eq!(report.files_skipped, 0);
    assert_eq!(page_labels(&report.output), vec![1, 2, 3]);
}

#[tokio::test]
async fn test_cancelled_without_output_path() {
    let dir = TempDir::new().unwrap();
    create_pdf(dir.path(), "a.pdf", 1);

    // No output path, and the retry is declined.
    let prompter = Arc::new(ScriptedPrompter::without_output(false));
    let mut session = Session::new(Preferences::default(), prompter);
    session.add_directory(dir.path()).unwrap();

    assert_eq!(session.merge().await.unwrap(), MergeOutcome::Cancelled);
}

#[test]
fn test_error_exit_codes_differ() {
    let cancelled = PdfCombineError::Cancelled.exit_code();
    let missing = PdfCombineError::file_not_found("x.pdf").exit_code();
    assert_ne!(cancelled, 0);
    assert_ne!(missing, 0);
    assert_ne!(cancelled, missing);
}

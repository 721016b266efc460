//! Integration tests for whole-file merging through a session.

use pdfcombine::config::Preferences;
use pdfcombine::list::MoveDirection;
use pdfcombine::merge::{MergeOutcome, MergeReport};
use pdfcombine::session::Session;
use std::sync::Arc;
use tempfile::TempDir;

use crate::common::{ScriptedPrompter, create_pdf, page_labels};

fn preferences(blank_pages: bool) -> Preferences {
    Preferences {
        add_blank_page_between_files: blank_pages,
        ..Preferences::default()
    }
}

fn completed(outcome: MergeOutcome) -> MergeReport {
    match outcome {
        MergeOutcome::Completed(report) => report,
        other => panic!("expected a completed merge, got {other:?}"),
    }
}

#[tokio::test]
async fn test_merge_two_pdfs() {
    let dir = TempDir::new().unwrap();
    create_pdf(dir.path(), "a.pdf", 2);
    create_pdf(dir.path(), "b.pdf", 3);

    let prompter = Arc::new(ScriptedPrompter::new(true, dir.path().join("merged")));
    let mut session = Session::new(preferences(false), prompter);
    session.add_directory(dir.path()).unwrap();

    let report = completed(session.merge().await.unwrap());

    assert_eq!(report.output, dir.path().join("merged.pdf"));
    assert_eq!(report.files_merged, 2);
    assert_eq!(report.pages_appended, 5);
    assert!(report.actual_size > 0);
    assert_eq!(page_labels(&report.output), vec![1, 2, 1, 2, 3]);
}

#[tokio::test]
async fn test_merge_with_blank_pages() {
    let dir = TempDir::new().unwrap();
    create_pdf(dir.path(), "a.pdf", 1);
    create_pdf(dir.path(), "b.pdf", 2);

    let prompter = Arc::new(ScriptedPrompter::new(true, dir.path().join("out.pdf")));
    let mut session = Session::new(preferences(true), prompter);
    session.add_directory(dir.path()).unwrap();

    let report = completed(session.merge().await.unwrap());

    assert_eq!(report.blank_pages, 2);
    assert_eq!(page_labels(&report.output), vec![1, 0, 1, 2, 0]);
}

#[tokio::test]
async fn test_merge_follows_list_order() {
    let dir = TempDir::new().unwrap();
    create_pdf(dir.path(), "a.pdf", 1);
    create_pdf(dir.path(), "b.pdf", 2);
    create_pdf(dir.path(), "c.pdf", 3);

    let prompter = Arc::new(ScriptedPrompter::new(true, dir.path().join("out.pdf")));
    let mut session = Session::new(preferences(false), prompter);
    session.add_directory(dir.path()).unwrap();
    session.select(&[2]);
    session.move_selected(MoveDirection::Top);

    let report = completed(session.merge().await.unwrap());

    assert_eq!(page_labels(&report.output), vec![1, 2, 3, 1, 1, 2]);
}

#[tokio::test]
async fn test_duplicates_removed_on_request() {
    let dir = TempDir::new().unwrap();
    let a = create_pdf(dir.path(), "a.pdf", 2);

    let prompter = Arc::new(ScriptedPrompter::new(true, dir.path().join("out.pdf")));
    let mut session = Session::new(preferences(false), prompter);
    session.add_paths(vec![a.clone(), a]);

    let report = completed(session.merge().await.unwrap());

    assert_eq!(session.list().len(), 1);
    assert_eq!(report.files_merged, 1);
    assert_eq!(page_labels(&report.output), vec![1, 2]);
}

#[tokio::test]
async fn test_duplicates_kept_when_declined() {
    let dir = TempDir::new().unwrap();
    let a = create_pdf(dir.path(), "a.pdf", 1);

    let prompter = Arc::new(ScriptedPrompter::new(false, dir.path().join("out.pdf")));
    let mut session = Session::new(preferences(false), prompter);
    session.add_paths(vec![a.clone(), a]);

    let report = completed(session.merge().await.unwrap());

    assert_eq!(page_labels(&report.output), vec![1, 1]);
}

#[tokio::test]
async fn test_compressed_output_is_readable() {
    let dir = TempDir::new().unwrap();
    create_pdf(dir.path(), "a.pdf", 3);

    let prompter = Arc::new(ScriptedPrompter::new(true, dir.path().join("out.pdf")));
    let preferences = Preferences {
        compress_output: true,
        ..preferences(false)
    };
    let mut session = Session::new(preferences, prompter);
    session.add_directory(dir.path()).unwrap();

    let report = completed(session.merge().await.unwrap());

    assert_eq!(page_labels(&report.output), vec![1, 2, 3]);
}

#[tokio::test]
async fn test_existing_output_is_replaced() {
    let dir = TempDir::new().unwrap();
    let src = TempDir::new().unwrap();
    create_pdf(src.path(), "a.pdf", 1);
    let output = dir.path().join("out.pdf");
    std::fs::write(&output, b"old contents").unwrap();

    let prompter = Arc::new(ScriptedPrompter::new(true, &output));
    let mut session = Session::new(preferences(false), prompter);
    session.add_directory(src.path()).unwrap();

    completed(session.merge().await.unwrap());

    assert_eq!(page_labels(&output), vec![1]);
}

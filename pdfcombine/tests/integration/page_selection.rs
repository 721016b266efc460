//! Integration tests for merging page subsets.

use pdfcombine::config::Preferences;
use pdfcombine::merge::MergeOutcome;
use pdfcombine::selection::RangeWarning;
use pdfcombine::session::Session;
use rstest::rstest;
use std::sync::Arc;
use tempfile::TempDir;

use crate::common::{ScriptedPrompter, create_pdf, page_labels};

async fn merge_with_range(range: &str, resort: bool, dedup: bool) -> Vec<i64> {
    let dir = TempDir::new().unwrap();
    let source = create_pdf(dir.path(), "doc.pdf", 6);
    let output = dir.path().join("out.pdf");

    let prompter = Arc::new(ScriptedPrompter::new(true, &output));
    let preferences = Preferences {
        add_blank_page_between_files: false,
        ..Preferences::default()
    };
    let mut session = Session::new(preferences, prompter);
    session.add_paths(vec![source]);
    session.set_page_selection(0, range, resort, dedup).unwrap();

    match session.merge().await.unwrap() {
        MergeOutcome::Completed(report) => page_labels(&report.output),
        other => panic!("expected a completed merge, got {other:?}"),
    }
}

#[rstest]
#[case("2-4", true, true, vec![2, 3, 4])]
#[case("5,1-2", true, true, vec![1, 2, 5])]
#[case("5,1-2", false, true, vec![5, 1, 2])]
#[case("3,1-3", false, false, vec![3, 1, 2, 3])]
#[case("3,1-3", false, true, vec![3, 1, 2])]
#[case("4-2", false, true, vec![4, 3, 2])]
#[case("1-99", true, true, vec![1, 2, 3, 4, 5, 6])]
#[tokio::test]
async fn test_merge_page_subset(
    #[case] range: &str,
    #[case] resort: bool,
    #[case] dedup: bool,
    #[case] expected: Vec<i64>,
) {
    assert_eq!(merge_with_range(range, resort, dedup).await, expected);
}

#[tokio::test]
async fn test_empty_range_selects_every_page() {
    let dir = TempDir::new().unwrap();
    let source = create_pdf(dir.path(), "doc.pdf", 3);

    let prompter = Arc::new(ScriptedPrompter::new(true, dir.path().join("out.pdf")));
    let mut session = Session::new(Preferences::default(), prompter.clone());
    session.add_paths(vec![source]);

    let parsed = session.set_page_selection(0, "", true, true).unwrap();
    assert_eq!(parsed.normalized, "1-3");
    assert_eq!(parsed.warnings, vec![RangeWarning::EmptyInput]);
    assert_eq!(*prompter.notices.lock().unwrap(), ["Page Selection"]);
}

#[tokio::test]
async fn test_clamped_range_is_reported_once() {
    let dir = TempDir::new().unwrap();
    let source = create_pdf(dir.path(), "doc.pdf", 4);

    let prompter = Arc::new(ScriptedPrompter::new(true, dir.path().join("out.pdf")));
    let mut session = Session::new(Preferences::default(), prompter);
    session.add_paths(vec![source]);

    let parsed = session.set_page_selection(0, "0-2, 9, 3-12", true, true).unwrap();
    assert_eq!(parsed.normalized, "1-2,4,3-4");
    assert_eq!(parsed.warnings, vec![RangeWarning::RangeClamped]);
}

#[tokio::test]
async fn test_range_without_pages_keeps_previous_selection() {
    let dir = TempDir::new().unwrap();
    let source = create_pdf(dir.path(), "doc.pdf", 6);

    let prompter = Arc::new(ScriptedPrompter::new(true, dir.path().join("out.pdf")));
    let preferences = Preferences {
        add_blank_page_between_files: false,
        ..Preferences::default()
    };
    let mut session = Session::new(preferences, prompter.clone());
    session.add_paths(vec![source]);
    session.set_page_selection(0, "2-4", true, true).unwrap();

    assert!(session.set_page_selection(0, "2-2", true, true).is_err());
    assert_eq!(*prompter.notices.lock().unwrap(), ["Invalid Page Range"]);

    let MergeOutcome::Completed(report) = session.merge().await.unwrap() else {
        panic!("merge did not complete");
    };
    assert_eq!(page_labels(&report.output), vec![2, 3, 4]);
}

#[tokio::test]
async fn test_malformed_range_is_rejected() {
    let dir = TempDir::new().unwrap();
    let source = create_pdf(dir.path(), "doc.pdf", 4);

    let prompter = Arc::new(ScriptedPrompter::new(true, dir.path().join("out.pdf")));
    let mut session = Session::new(Preferences::default(), prompter.clone());
    session.add_paths(vec![source]);

    for range in ["-3", "1-2-3", "1,-2", "abc"] {
        assert!(session.set_page_selection(0, range, true, true).is_err(), "{range}");
    }
    assert!(session.selections().is_empty());
    assert_eq!(prompter.notices.lock().unwrap().len(), 4);
}

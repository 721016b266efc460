//! Integration tests for saved file lists.

use pdfcombine::config::Preferences;
use pdfcombine::merge::MergeOutcome;
use pdfcombine::selection::PageSelection;
use pdfcombine::session::Session;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

use crate::common::{ScriptedPrompter, create_pdf, page_labels};

fn no_blank_pages() -> Preferences {
    Preferences {
        add_blank_page_between_files: false,
        ..Preferences::default()
    }
}

#[tokio::test]
async fn test_saved_list_round_trips_through_merge() {
    let dir = TempDir::new().unwrap();
    create_pdf(dir.path(), "a.pdf", 3);
    create_pdf(dir.path(), "b.pdf", 4);

    let prompter = Arc::new(ScriptedPrompter::new(true, dir.path().join("unused.pdf")));
    let mut first = Session::new(no_blank_pages(), prompter);
    first.add_directory(dir.path()).unwrap();
    first.set_page_selection(1, "4,2", false, true).unwrap();
    let saved = first.save_list(&dir.path().join("book")).unwrap();

    let text = fs::read_to_string(&saved).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(!lines[0].contains('\t'));
    assert!(lines[1].ends_with("b.pdf\t4,2\tFalse\tTrue"));

    let prompter = Arc::new(ScriptedPrompter::new(true, dir.path().join("out.pdf")));
    let mut second = Session::new(no_blank_pages(), prompter);
    assert_eq!(second.load_list(&saved).unwrap(), 2);

    let MergeOutcome::Completed(report) = second.merge().await.unwrap() else {
        panic!("merge did not complete");
    };
    assert_eq!(page_labels(&report.output), vec![1, 2, 3, 4, 2]);
}

#[test]
fn test_load_list_with_windows_separators_and_blank_lines() {
    let dir = TempDir::new().unwrap();
    let a = create_pdf(dir.path(), "a.pdf", 1);
    let list = dir.path().join("list.txt");
    let windows_style = a.to_string_lossy().replace('/', "\\");
    fs::write(&list, format!("\n{windows_style}\t1\tTrue\tTrue\n\n")).unwrap();

    let prompter = Arc::new(ScriptedPrompter::new(true, dir.path().join("out.pdf")));
    let mut session = Session::new(Preferences::default(), prompter);

    // Backslashes become forward slashes, which exist on every platform
    // this runs on.
    assert_eq!(session.load_list(&list).unwrap(), 1);
    let entry = &session.list().entries()[0];
    assert_eq!(entry.display_name, "a.pdf");
    assert!(!entry.full_path.contains('\\'));
    assert_eq!(
        session.page_selection(0).unwrap(),
        PageSelection::new("1", true, true)
    );
}

#[test]
fn test_missing_entry_replaced_on_load() {
    let dir = TempDir::new().unwrap();
    let replacement = create_pdf(dir.path(), "new.pdf", 2);
    let list = dir.path().join("list.txt");
    fs::write(&list, "/gone/old.pdf\t2\tTrue\tFalse\n").unwrap();

    let prompter = Arc::new(
        ScriptedPrompter::new(true, dir.path().join("out.pdf")).with_replacement(&replacement),
    );
    let mut session = Session::new(Preferences::default(), prompter);

    assert_eq!(session.load_list(&list).unwrap(), 1);
    assert_eq!(session.list().entries()[0].display_name, "new.pdf");
    // The saved selection follows the replacement.
    assert_eq!(
        session.page_selection(0).unwrap(),
        PageSelection::new("2", true, false)
    );
}

#[test]
fn test_missing_list_file() {
    let prompter = Arc::new(ScriptedPrompter::new(true, "out.pdf"));
    let mut session = Session::new(Preferences::default(), prompter);
    assert!(session.load_list(std::path::Path::new("/no/such/list.txt")).is_err());
}

//! pdfcombine - Reorder PDF files, pick page subsets, and combine them.
//!
//! Terminal front-end over the `pdfcombine` library.

mod cli;
mod prompter;

use clap::Parser;
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use crate::cli::{Cli, CombineArg, Command, DirectionArg, MergeArgs, PrefsAction};
use crate::prompter::TerminalPrompter;
use pdfcombine::config::{CombineNonSequential, Preferences};
use pdfcombine::error::{PdfCombineError, Result};
use pdfcombine::io::list_file::{format_list, read_list_file};
use pdfcombine::list::{FileListModel, MoveDirection};
use pdfcombine::merge::{LopdfBackend, MergeOutcome, PdfBackend};
use pdfcombine::output::{OutputFormatter, ProgressBar, ProgressBarSink, display_merge_report};
use pdfcombine::selection::{PageSelection, PageSelectionStore, finalize_pages, parse_and_normalize};
use pdfcombine::session::Session;
use pdfcombine::utils::collect_paths_for_patterns;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();
    init_logging(&cli);

    let formatter = OutputFormatter::new(cli.quiet, cli.verbose);

    // Run the application and handle errors
    if let Err(err) = run(cli, &formatter).await {
        formatter.error(&err.to_string());
        process::exit(err.exit_code());
    }
}

fn init_logging(cli: &Cli) {
    let level = if cli.verbose {
        LevelFilter::Debug
    } else if cli.quiet {
        LevelFilter::Error
    } else {
        LevelFilter::Warn
    };
    let config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .build();
    if TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto).is_err() {
        eprintln!("Warning: logging is unavailable");
    }
}

/// Main application logic.
async fn run(cli: Cli, formatter: &OutputFormatter) -> Result<()> {
    let preferences_path = preferences_path(cli.preferences)?;
    let preferences = Preferences::load(&preferences_path)?;
    log::debug!("Preferences from {}", preferences_path.display());

    match cli.command {
        Command::Merge(args) => merge(args, preferences, formatter).await,
        Command::Pages { pdf, range } => show_pages(&pdf, &range, formatter),
        Command::Move {
            list,
            direction,
            select,
            combine,
        } => {
            let policy = combine.map_or(preferences.combine_non_sequential, Into::into);
            move_entries(&list, direction.into(), &select, policy, formatter)
        }
        Command::List { list } => show_list(&list, formatter),
        Command::Prefs { action } => prefs(action, preferences, &preferences_path, formatter),
    }
}

fn preferences_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    explicit
        .or_else(Preferences::default_path)
        .ok_or_else(|| PdfCombineError::other("Could not determine the preferences directory"))
}

async fn merge(args: MergeArgs, mut preferences: Preferences, formatter: &OutputFormatter) -> Result<()> {
    if let Some(blank_pages) = args.blank_pages() {
        preferences.add_blank_page_between_files = blank_pages;
    }
    if args.compress {
        preferences.compress_output = true;
    }

    let prompter = Arc::new(TerminalPrompter::new(args.yes).with_output(args.output.clone()));
    let bar = if formatter.is_quiet() {
        ProgressBar::disabled()
    } else {
        ProgressBar::new(0)
    };
    let progress = Arc::new(ProgressBarSink::new(bar));
    let mut session = Session::new(preferences, prompter).with_progress(progress.clone());

    if let Some(list) = &args.list {
        let loaded = session.load_list(list)?;
        formatter.info(&format!("Loaded {loaded} file(s) from {}", list.display()));
    }
    if !args.inputs.is_empty() {
        let paths = collect_paths_for_patterns(&args.inputs)?;
        session.add_paths(paths);
    }

    for page_arg in &args.pages {
        let (index, range) = parse_page_arg(page_arg)?;
        let parsed = session.set_page_selection(index, range, !args.keep_order, !args.keep_duplicates)?;
        log::debug!("Entry {}: {}", index + 1, parsed.normalized);
    }

    if let Some(path) = &args.save_list {
        let saved = session.save_list(path)?;
        formatter.info(&format!("Saved list to {}", saved.display()));
    }

    formatter.info(&format!("Merging {} file(s)...", session.list().len()));
    let outcome = session.merge().await;
    match outcome {
        Ok(MergeOutcome::Completed(report)) => {
            progress.finish();
            display_merge_report(formatter, &report);
            Ok(())
        }
        Ok(MergeOutcome::Aborted) => {
            formatter.warning("Merge aborted; the list was left unchanged");
            Err(PdfCombineError::Cancelled)
        }
        Ok(MergeOutcome::Cancelled) => Err(PdfCombineError::Cancelled),
        Err(err) => {
            progress.clear();
            Err(err)
        }
    }
}

/// Split `N:RANGE` into a 0-based position and the range.
fn parse_page_arg(arg: &str) -> Result<(usize, &str)> {
    let invalid = |reason: &str| PdfCombineError::invalid_input(arg, reason);
    let (position, range) = arg
        .split_once(':')
        .ok_or_else(|| invalid("expected POSITION:RANGE, e.g. 2:1-3"))?;
    let position: usize = position
        .trim()
        .parse()
        .map_err(|_| invalid("position must be a number"))?;
    if position == 0 {
        return Err(invalid("positions start at 1"));
    }
    Ok((position - 1, range))
}

fn show_pages(pdf: &Path, range: &str, formatter: &OutputFormatter) -> Result<()> {
    let total = LopdfBackend::new().page_count(pdf)?;
    let parsed = parse_and_normalize(range, total)?;
    for warning in &parsed.warnings {
        formatter.warning(&warning.to_string());
    }

    let merged = finalize_pages(&PageSelection::new(parsed.normalized.clone(), true, true), Some(total));
    formatter.field("pages in document", &total.to_string());
    formatter.field("normalized", &parsed.normalized);
    formatter.field("selected", &join_pages(&parsed.pages));
    formatter.field("merged (sorted, unique)", &join_pages(&merged));
    Ok(())
}

fn join_pages(pages: &[usize]) -> String {
    pages
        .iter()
        .map(usize::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn move_entries(
    path: &Path,
    direction: MoveDirection,
    positions: &[usize],
    policy: CombineNonSequential,
    formatter: &OutputFormatter,
) -> Result<()> {
    let mut list = FileListModel::new();
    let mut selections = PageSelectionStore::new();
    for item in read_list_file(path)? {
        if let Some(selection) = item.selection {
            selections.set(item.entry.full_path.clone(), selection);
        }
        list.push(item.entry);
    }

    for &position in positions {
        if position == 0 || position > list.len() {
            return Err(PdfCombineError::invalid_input(
                position.to_string(),
                format!("the list has {} file(s)", list.len()),
            ));
        }
        list.select(position - 1);
    }

    list.move_selected(direction, policy, &TerminalPrompter::new(false));
    fs::write(path, format_list(list.entries(), &selections))
        .map_err(|err| PdfCombineError::from_output_io(path, err))?;

    formatter.success(&format!("Moved {} file(s) {direction}", positions.len()));
    print_entries(&list, &selections, formatter);
    Ok(())
}

fn show_list(path: &Path, formatter: &OutputFormatter) -> Result<()> {
    let mut list = FileListModel::new();
    let mut selections = PageSelectionStore::new();
    for item in read_list_file(path)? {
        if let Some(selection) = item.selection {
            selections.set(item.entry.full_path.clone(), selection);
        }
        list.push(item.entry);
    }

    formatter.heading(&format!("{} ({} file(s))", path.display(), list.len()));
    print_entries(&list, &selections, formatter);
    Ok(())
}

fn print_entries(list: &FileListModel, selections: &PageSelectionStore, formatter: &OutputFormatter) {
    for (i, entry) in list.entries().iter().enumerate() {
        let line = match selections.get(&entry.full_path) {
            Some(selection) => format!(
                "{} [pages {}{}{}]",
                entry.full_path,
                if selection.range.is_empty() { "all" } else { selection.range.as_str() },
                if selection.resort { ", sorted" } else { "" },
                if selection.remove_duplicates { ", unique" } else { "" },
            ),
            None => entry.full_path.clone(),
        };
        formatter.entry(i + 1, &line);
    }
}

fn prefs(
    action: PrefsAction,
    mut preferences: Preferences,
    path: &Path,
    formatter: &OutputFormatter,
) -> Result<()> {
    match action {
        PrefsAction::Show => {
            for (key, value) in preferences.entries() {
                formatter.field(key, &value);
            }
        }
        PrefsAction::Set { key, value } => {
            preferences.set(&key, &value)?;
            preferences.save(path)?;
            formatter.success(&format!("{key} set to {value}"));
        }
        PrefsAction::Path => println!("{}", path.display()),
    }
    Ok(())
}

impl From<DirectionArg> for MoveDirection {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Top => Self::Top,
            DirectionArg::Up => Self::Up,
            DirectionArg::Down => Self::Down,
            DirectionArg::Bottom => Self::Bottom,
        }
    }
}

impl From<CombineArg> for CombineNonSequential {
    fn from(arg: CombineArg) -> Self {
        match arg {
            CombineArg::Always => Self::Always,
            CombineArg::Ask => Self::Ask,
            CombineArg::Never => Self::Never,
        }
    }
}

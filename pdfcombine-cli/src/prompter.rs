//! Terminal implementation of the library's prompter.
//!
//! Questions and notices go to stderr so stdout stays usable for output.
//! Answers are read line by line from stdin.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Mutex;

use pdfcombine::prompt::{Confirmer, FileFilter, Prompter};

/// Asks on the terminal.
pub struct TerminalPrompter {
    input: Mutex<Box<dyn BufRead + Send>>,
    assume_yes: bool,
    output: Mutex<Option<PathBuf>>,
    closed: Mutex<bool>,
    last_assumed: Mutex<Option<String>>,
}

impl TerminalPrompter {
    /// Read answers from stdin.
    pub fn new(assume_yes: bool) -> Self {
        Self::with_input(Box::new(io::BufReader::new(io::stdin())), assume_yes)
    }

    /// Read answers from `input`.
    pub fn with_input(input: Box<dyn BufRead + Send>, assume_yes: bool) -> Self {
        Self {
            input: Mutex::new(input),
            assume_yes,
            output: Mutex::new(None),
            closed: Mutex::new(false),
            last_assumed: Mutex::new(None),
        }
    }

    /// Answer the first request for a save path with `output`.
    pub fn with_output(self, output: Option<PathBuf>) -> Self {
        if let Ok(mut slot) = self.output.lock() {
            *slot = output;
        }
        self
    }

    fn is_closed(&self) -> bool {
        self.closed.lock().map(|closed| *closed).unwrap_or(true)
    }

    /// Print `prompt` and read one trimmed line. `None` once input has
    /// ended.
    fn ask(&self, prompt: &str) -> Option<String> {
        if self.is_closed() {
            return None;
        }
        eprint!("{prompt}");
        io::stderr().flush().ok();

        let mut line = String::new();
        let read = self
            .input
            .lock()
            .ok()
            .and_then(|mut input| input.read_line(&mut line).ok());
        match read {
            Some(n) if n > 0 => Some(line.trim().to_string()),
            _ => {
                log::debug!("Input closed");
                if let Ok(mut closed) = self.closed.lock() {
                    *closed = true;
                }
                None
            }
        }
    }

    /// Record `title` and `message` as auto-answered. `false` when they
    /// match the previous auto-answered question.
    fn assume(&self, title: &str, message: &str) -> bool {
        let question = format!("{title}\n{message}");
        let Ok(mut last) = self.last_assumed.lock() else {
            return false;
        };
        if last.as_deref() == Some(question.as_str()) {
            *last = None;
            return false;
        }
        *last = Some(question);
        true
    }

    fn ask_path(&self, prompt: &str) -> Option<PathBuf> {
        self.ask(prompt)
            .filter(|answer| !answer.is_empty())
            .map(PathBuf::from)
    }
}

impl Confirmer for TerminalPrompter {
    /// With `assume_yes` a question is answered yes, except when it repeats
    /// the one answered just before; a retry is always asked on the
    /// terminal. Once input has ended every question is answered no.
    fn confirm(&self, title: &str, message: &str) -> bool {
        if self.is_closed() {
            return false;
        }
        if self.assume_yes && self.assume(title, message) {
            log::info!("{title}: {} -> yes", message.replace('\n', " "));
            return true;
        }
        loop {
            let Some(answer) = self.ask(&format!("{title}: {message} [y/N]: ")) else {
                return false;
            };
            match answer.to_lowercase().as_str() {
                "y" | "yes" => return true,
                "" | "n" | "no" => return false,
                _ => eprintln!("Please answer yes or no."),
            }
        }
    }

    fn notify(&self, title: &str, message: &str) {
        eprintln!("{title}: {message}");
    }
}

impl Prompter for TerminalPrompter {
    fn pick_file(&self, filter: FileFilter) -> Option<PathBuf> {
        self.ask_path(&format!(
            "Path to a file ({}, empty to cancel): ",
            filter.description()
        ))
    }

    fn pick_save_path(&self, filter: FileFilter) -> Option<PathBuf> {
        let preset = self.output.lock().ok().and_then(|mut slot| slot.take());
        preset.or_else(|| {
            self.ask_path(&format!(
                "Save as ({}, empty to cancel): ",
                filter.description()
            ))
        })
    }

    fn pick_directory(&self) -> Option<PathBuf> {
        self.ask_path("Path to a folder (empty to cancel): ")
    }
}

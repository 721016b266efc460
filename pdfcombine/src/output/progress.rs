//! Write progress.
//!
//! While the merged document is written, a sampler task polls the size of
//! the output file once a second and compares it with the size estimated
//! during the merge. Each sample becomes a [`ProgressSnapshot`] handed to a
//! [`ProgressSink`]. The numbers are advisory only; nothing here can slow
//! down or fail the write.
//!
//! # Examples
//!
//! ```
//! use pdfcombine::output::progress::{ProgressBar, EtaState, ProgressSnapshot};
//!
//! let mut bar = ProgressBar::new(4096);
//! bar.set_message("Writing");
//! bar.update(&ProgressSnapshot::new(1024, 4096, EtaState::Calculating));
//! bar.finish();
//! ```

use std::fmt;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::utils::format_file_size;

/// How often the sampler polls the output file.
pub const SAMPLE_INTERVAL: Duration = Duration::from_secs(1);

/// How often the time-remaining estimate is recomputed from scratch.
pub const ETA_RECOMPUTE_INTERVAL: Duration = Duration::from_secs(5);

/// Time-remaining display state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EtaState {
    /// Nothing written yet.
    Calculating,
    /// Estimated time left.
    Remaining(Duration),
    /// Less than a second left, or the estimate ran out.
    Finishing,
}

impl fmt::Display for EtaState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Calculating => f.write_str("Calculating"),
            Self::Remaining(left) => f.write_str(&format_clock(*left)),
            Self::Finishing => f.write_str("Finishing up"),
        }
    }
}

/// Rolling time-remaining estimate.
///
/// Every [`ETA_RECOMPUTE_INTERVAL`] the estimate is recomputed as
/// `elapsed / written * remaining`. Between recomputes it counts down by
/// one sample interval per update.
#[derive(Debug, Clone)]
pub struct EtaEstimator {
    recompute_every: Duration,
    step: Duration,
    last_recompute: Option<Duration>,
    state: EtaState,
}

impl EtaEstimator {
    /// Estimator with the default intervals.
    pub fn new() -> Self {
        Self::with_intervals(ETA_RECOMPUTE_INTERVAL, SAMPLE_INTERVAL)
    }

    /// Estimator that recomputes every `recompute_every` and counts down by
    /// `step` in between.
    pub fn with_intervals(recompute_every: Duration, step: Duration) -> Self {
        Self {
            recompute_every,
            step,
            last_recompute: None,
            state: EtaState::Calculating,
        }
    }

    /// Current state without updating.
    pub fn state(&self) -> EtaState {
        self.state
    }

    /// Feed one sample.
    ///
    /// # Arguments
    ///
    /// * `elapsed` - Time since writing started
    /// * `written` - Bytes written so far
    /// * `total` - Estimated final size in bytes
    pub fn update(&mut self, elapsed: Duration, written: u64, total: u64) -> EtaState {
        let due = self
            .last_recompute
            .is_none_or(|at| elapsed.saturating_sub(at) >= self.recompute_every);

        self.state = if due {
            self.last_recompute = Some(elapsed);
            if written == 0 {
                EtaState::Calculating
            } else {
                let remaining = total.saturating_sub(written) as f64;
                let secs = elapsed.as_secs_f64() / written as f64 * remaining;
                if secs > 1.0 {
                    EtaState::Remaining(Duration::from_secs(secs.round() as u64))
                } else {
                    EtaState::Finishing
                }
            }
        } else {
            match self.state {
                EtaState::Remaining(left) => {
                    let left = left.saturating_sub(self.step);
                    if left < Duration::from_secs(1) {
                        EtaState::Finishing
                    } else {
                        EtaState::Remaining(left)
                    }
                }
                other => other,
            }
        };

        self.state
    }
}

impl Default for EtaEstimator {
    fn default() -> Self {
        Self::new()
    }
}

/// One progress sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSnapshot {
    /// Bytes written so far.
    pub written: u64,
    /// Estimated final size in bytes.
    pub total: u64,
    /// `written / total` as a percentage, capped at 100.
    pub percent: f64,
    /// Time remaining.
    pub eta: EtaState,
}

impl ProgressSnapshot {
    /// Build a snapshot, computing the percentage.
    pub fn new(written: u64, total: u64, eta: EtaState) -> Self {
        let percent = if total > 0 {
            (written as f64 / total as f64 * 100.0).min(100.0)
        } else {
            0.0
        };
        Self {
            written,
            total,
            percent,
            eta,
        }
    }

    /// The final snapshot once writing is done.
    pub fn complete(total: u64) -> Self {
        Self::new(total, total, EtaState::Finishing)
    }
}

/// Receives progress samples.
pub trait ProgressSink: Send + Sync {
    /// Called for every sample, from the sampler task.
    fn on_progress(&self, snapshot: &ProgressSnapshot);
}

/// Discards all progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn on_progress(&self, _snapshot: &ProgressSnapshot) {}
}

/// Handle to a running sampler, see [`spawn_sampler`].
pub struct SamplerHandle {
    stop: oneshot::Sender<()>,
    task: JoinHandle<()>,
    total: u64,
    sink: Arc<dyn ProgressSink>,
}

impl SamplerHandle {
    /// Stop sampling and report completion to the sink.
    pub async fn finish(self) {
        // The task may already have exited; nothing to signal then.
        let _ = self.stop.send(());
        if let Err(e) = self.task.await {
            log::warn!("Progress sampler ended abnormally: {e}");
        }
        self.sink.on_progress(&ProgressSnapshot::complete(self.total));
    }
}

/// Poll the size of `path` every `interval` and report it to `sink` until
/// [`SamplerHandle::finish`] is called.
///
/// Must be called from within a tokio runtime.
pub fn spawn_sampler(
    path: PathBuf,
    estimated_total: u64,
    interval: Duration,
    sink: Arc<dyn ProgressSink>,
) -> SamplerHandle {
    let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
    let task_sink = Arc::clone(&sink);

    let task = tokio::spawn(async move {
        let start = Instant::now();
        let mut eta = EtaEstimator::with_intervals(ETA_RECOMPUTE_INTERVAL, interval);
        let mut ticker = tokio::time::interval(interval);

        loop {
            tokio::select! {
                _ = &mut stop_rx => break,
                _ = ticker.tick() => {
                    let written = tokio::fs::metadata(&path)
                        .await
                        .map(|m| m.len())
                        .unwrap_or(0);
                    let state = eta.update(start.elapsed(), written, estimated_total);
                    task_sink.on_progress(&ProgressSnapshot::new(written, estimated_total, state));
                }
            }
        }
    });

    SamplerHandle {
        stop: stop_tx,
        task,
        total: estimated_total,
        sink,
    }
}

/// Terminal progress bar for the write phase.
pub struct ProgressBar {
    /// Estimated total bytes.
    total: u64,
    /// Bytes written.
    current: u64,
    /// Latest time-remaining state.
    eta: EtaState,
    /// Optional message to display.
    message: Option<String>,
    /// Start time of the operation.
    start_time: Instant,
    /// Whether the progress bar is enabled.
    enabled: bool,
}

impl ProgressBar {
    /// Create a progress bar for `total` bytes.
    ///
    /// Output is only produced when stdout is a terminal.
    pub fn new(total: u64) -> Self {
        Self {
            total,
            current: 0,
            eta: EtaState::Calculating,
            message: None,
            start_time: Instant::now(),
            enabled: Self::is_terminal(),
        }
    }

    /// Create a disabled progress bar (no output).
    pub fn disabled() -> Self {
        let mut pb = Self::new(0);
        pb.enabled = false;
        pb
    }

    fn is_terminal() -> bool {
        use std::io::IsTerminal;
        io::stdout().is_terminal()
    }

    /// Set the message to display with the progress bar.
    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    /// Apply a sample and redraw.
    pub fn update(&mut self, snapshot: &ProgressSnapshot) {
        self.total = snapshot.total;
        self.current = snapshot.written;
        self.eta = snapshot.eta;
        self.render();
    }

    /// Mark the progress bar as finished.
    pub fn finish(&mut self) {
        if self.enabled {
            self.current = self.total;
            self.eta = EtaState::Finishing;
            self.render();
            println!();
        }
    }

    /// Clear the progress bar from the terminal.
    pub fn clear(&self) {
        if self.enabled {
            print!("\r\x1b[K");
            io::stdout().flush().ok();
        }
    }

    fn render(&self) {
        if !self.enabled {
            return;
        }
        print!("\r\x1b[K{}", self.render_bar());
        io::stdout().flush().ok();
    }

    fn render_bar(&self) -> String {
        let width: usize = 40;
        let filled = if self.total > 0 {
            (width as u64 * self.current.min(self.total) / self.total) as usize
        } else {
            0
        };
        let empty = width - filled;

        let bar = format!(
            "[{}{}]",
            "=".repeat(filled.saturating_sub(1)) + if filled > 0 { ">" } else { "" },
            " ".repeat(empty)
        );

        let mut parts = vec![
            bar,
            format!("{:.0}%", self.percent()),
            format!(
                "{}/{}",
                format_file_size(self.current),
                format_file_size(self.total)
            ),
            format!("ETA {}", self.eta),
            format_duration(self.start_time.elapsed()),
        ];

        if let Some(ref msg) = self.message {
            parts.insert(0, msg.clone());
        }

        parts.join(" ")
    }

    /// Get the current progress percentage.
    pub fn percent(&self) -> f64 {
        if self.total > 0 {
            (self.current as f64 / self.total as f64 * 100.0).min(100.0)
        } else {
            0.0
        }
    }

    /// Get the elapsed time since start.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// [`ProgressSink`] that draws a [`ProgressBar`].
pub struct ProgressBarSink {
    bar: Mutex<ProgressBar>,
}

impl ProgressBarSink {
    /// Wrap a bar.
    pub fn new(bar: ProgressBar) -> Self {
        Self {
            bar: Mutex::new(bar),
        }
    }

    /// Draw the bar as complete and end its line.
    pub fn finish(&self) {
        if let Ok(mut bar) = self.bar.lock() {
            bar.finish();
        }
    }

    /// Remove the bar without completing it.
    pub fn clear(&self) {
        if let Ok(bar) = self.bar.lock() {
            bar.clear();
        }
    }
}

impl ProgressSink for ProgressBarSink {
    fn on_progress(&self, snapshot: &ProgressSnapshot) {
        if let Ok(mut bar) = self.bar.lock() {
            bar.update(snapshot);
        }
    }
}

/// Format a duration as a human-readable string.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();

    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}

/// Format a duration as `MM:SS`.
pub fn format_clock(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

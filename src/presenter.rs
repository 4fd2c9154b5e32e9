use crate::celebration::Celebration;
use crate::history::HistoryItem;
use crate::stats::StatRow;
use crate::target::Target;

/// Text a presenter shows in place of an empty history list
pub const EMPTY_HISTORY_TEXT: &str = "No records yet.";

/// Readout text while running with focus mode on
pub const CONCEALED_TEXT: &str = "…focus…";

/// Gauge fill is capped a little past the target so overshoots stay visible
pub const PROGRESS_CAP: f64 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadoutPhase {
    #[default]
    Idle,
    Running,
    Stopped,
}

/// Snapshot of the elapsed-time display
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Readout {
    pub elapsed_secs: f64,
    pub progress: f64,
    pub phase: ReadoutPhase,
    pub concealed: bool,
    pub pulse: bool,
}

impl Readout {
    pub fn new(elapsed_secs: f64, target: Target, phase: ReadoutPhase, concealed: bool) -> Self {
        Self {
            elapsed_secs,
            progress: (elapsed_secs / target.secs()).min(PROGRESS_CAP),
            phase,
            concealed,
            pulse: false,
        }
    }

    pub fn text(&self) -> String {
        if self.concealed && self.phase == ReadoutPhase::Running {
            CONCEALED_TEXT.to_string()
        } else {
            format!("{:.3}s", self.elapsed_secs)
        }
    }
}

/// Boundary between the game core and whatever draws it.
///
/// The core calls these synchronously on every state change. Only stats,
/// status and history are required; the rest default to no-ops so minimal
/// front ends can ignore them.
pub trait Presenter {
    /// Always four rows: Target, Attempts, Best Diff, Last Grade.
    fn render_stats(&mut self, rows: &[StatRow]);
    fn render_status(&mut self, text: &str);
    /// Newest first, at most five. Empty means "no records yet", which the
    /// presenter must show explicitly (see [`EMPTY_HISTORY_TEXT`]).
    fn render_history(&mut self, items: &[HistoryItem]);

    fn render_readout(&mut self, _readout: &Readout) {}
    fn render_target(&mut self, _target: Target) {}
    fn render_focus(&mut self, _enabled: bool) {}
    /// `None` hides the banner.
    fn render_celebration(&mut self, _celebration: Option<&Celebration>) {}
}

/// Presenter that records every call, for tests and headless runs
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    pub stats: Vec<Vec<StatRow>>,
    pub statuses: Vec<String>,
    pub histories: Vec<Vec<HistoryItem>>,
    pub readouts: Vec<Readout>,
    pub targets: Vec<Target>,
    pub focus: Vec<bool>,
    pub celebrations: Vec<Option<Celebration>>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_stats(&self) -> Option<&[StatRow]> {
        self.stats.last().map(Vec::as_slice)
    }

    pub fn last_status(&self) -> Option<&str> {
        self.statuses.last().map(String::as_str)
    }

    pub fn last_history(&self) -> Option<&[HistoryItem]> {
        self.histories.last().map(Vec::as_slice)
    }

    pub fn last_readout(&self) -> Option<&Readout> {
        self.readouts.last()
    }

    /// Banner currently on screen, if any
    pub fn visible_celebration(&self) -> Option<&Celebration> {
        self.celebrations.last().and_then(Option::as_ref)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl Presenter for RecordingPresenter {
    fn render_stats(&mut self, rows: &[StatRow]) {
        self.stats.push(rows.to_vec());
    }

    fn render_status(&mut self, text: &str) {
        self.statuses.push(text.to_string());
    }

    fn render_history(&mut self, items: &[HistoryItem]) {
        self.histories.push(items.to_vec());
    }

    fn render_readout(&mut self, readout: &Readout) {
        self.readouts.push(*readout);
    }

    fn render_target(&mut self, target: Target) {
        self.targets.push(target);
    }

    fn render_focus(&mut self, enabled: bool) {
        self.focus.push(enabled);
    }

    fn render_celebration(&mut self, celebration: Option<&Celebration>) {
        self.celebrations.push(celebration.cloned());
    }
}

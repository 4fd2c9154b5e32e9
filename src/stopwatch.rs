use crate::clock::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopwatchState {
    #[default]
    Idle,
    Running { started_at: Timestamp },
}

/// Idle/running state of a single timing attempt
#[derive(Debug, Clone, Copy, Default)]
pub struct Stopwatch {
    state: StopwatchState,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, StopwatchState::Running { .. })
    }

    /// Begin a run at `now`. Returns false (and changes nothing) if already running.
    pub fn start(&mut self, now: Timestamp) -> bool {
        if self.is_running() {
            return false;
        }
        self.state = StopwatchState::Running { started_at: now };
        true
    }

    /// Finish the run and hand back its elapsed seconds. `None` while idle.
    pub fn stop(&mut self, now: Timestamp) -> Option<f64> {
        match self.state {
            StopwatchState::Idle => None,
            StopwatchState::Running { started_at } => {
                self.state = StopwatchState::Idle;
                Some(now.saturating_since(started_at).as_secs_f64())
            }
        }
    }

    /// Drop the current run without measuring it. Returns whether a run was dropped.
    pub fn abort(&mut self) -> bool {
        let was_running = self.is_running();
        self.state = StopwatchState::Idle;
        was_running
    }

    /// Seconds into the current run, zero while idle
    pub fn elapsed_secs(&self, now: Timestamp) -> f64 {
        match self.state {
            StopwatchState::Idle => 0.0,
            StopwatchState::Running { started_at } => {
                now.saturating_since(started_at).as_secs_f64()
            }
        }
    }
}

use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::celebration::Celebration;
use crate::clock::{Clock, Timestamp};
use crate::config::Config;
use crate::history::{Attempt, HistoryLedger};
use crate::presenter::{Presenter, Readout, ReadoutPhase};
use crate::scheduler::{Task, TaskSlot, TimerQueue};
use crate::stats::SessionStats;
use crate::stopwatch::Stopwatch;
use crate::target::Target;

pub const GREETING_STATUS: &str = "Press start and aim for the target time.";
pub const START_STATUS: &str = "Count the target time in your head.";
pub const RANDOM_TARGET_STATUS: &str = "Switched to a new random target.";
pub const TUNED_TARGET_STATUS: &str = "Target fine-tuned.";

/// Direction of a single tuner step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nudge {
    Up,
    Down,
}

/// One player's stopwatch drill: target, run state, ledger and pending timers.
///
/// All state lives here and every handler takes `&mut self`, so independent
/// sessions never share anything.
#[derive(Debug)]
pub struct Challenge<C: Clock, P: Presenter> {
    clock: C,
    presenter: P,
    config: Config,
    rng: StdRng,
    target: Target,
    stopwatch: Stopwatch,
    history: HistoryLedger,
    stats: SessionStats,
    focus_mode: bool,
    readout: Readout,
    timers: TimerQueue,
    frame: TaskSlot,
    celebration: TaskSlot,
    pulse: TaskSlot,
}

impl<C: Clock, P: Presenter> Challenge<C, P> {
    /// Start a session on a random target.
    pub fn new(clock: C, presenter: P, config: Config) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let target = Target::random(&mut rng);
        Self::build(clock, presenter, config, rng, target)
    }

    /// Start a session on a fixed target (clamped into range).
    pub fn with_target(clock: C, presenter: P, config: Config, target: f64) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::build(clock, presenter, config, rng, Target::clamped(target))
    }

    fn build(clock: C, presenter: P, config: Config, rng: StdRng, target: Target) -> Self {
        let focus_mode = config.focus_mode;
        let mut challenge = Self {
            clock,
            presenter,
            config,
            rng,
            target,
            stopwatch: Stopwatch::new(),
            history: HistoryLedger::new(),
            stats: SessionStats::new(),
            focus_mode,
            readout: Readout::new(0.0, target, ReadoutPhase::Idle, focus_mode),
            timers: TimerQueue::new(),
            frame: TaskSlot::new(),
            celebration: TaskSlot::new(),
            pulse: TaskSlot::new(),
        };
        challenge.history.clear();
        challenge.presenter.render_target(target);
        challenge.presenter.render_focus(focus_mode);
        challenge.render_stats();
        challenge.render_history();
        challenge.presenter.render_status(GREETING_STATUS);
        challenge.presenter.render_readout(&challenge.readout);
        debug!("session ready, target {target}");
        challenge
    }

    /// The single start/stop button. Returns the graded attempt on a stop.
    pub fn start_or_stop(&mut self) -> Option<Attempt> {
        if self.stopwatch.is_running() {
            self.stop()
        } else {
            self.start();
            None
        }
    }

    /// Begin a run. No-op while already running.
    pub fn start(&mut self) -> bool {
        let now = self.clock.now();
        if !self.stopwatch.start(now) {
            return false;
        }
        self.pulse.clear(&mut self.timers);
        self.presenter.render_status(START_STATUS);
        self.show_readout(Readout::new(0.0, self.target, ReadoutPhase::Running, self.focus_mode));
        self.frame
            .replace(&mut self.timers, now.after(self.config.frame_interval()), Task::Frame);
        debug!("run started at {:?}", now.as_duration());
        true
    }

    /// Finish and grade the current run. No-op while idle.
    pub fn stop(&mut self) -> Option<Attempt> {
        let now = self.clock.now();
        let elapsed = self.stopwatch.stop(now)?;
        self.frame.clear(&mut self.timers);

        let attempt = Attempt::new(self.stats.next_attempt_number(), elapsed, self.target);
        let new_best = self.stats.update(&attempt);
        self.history.record(attempt);
        info!(
            "attempt #{}: {:.3}s against {} (diff {:.3}s, grade {}{})",
            attempt.number,
            attempt.elapsed_secs,
            attempt.target,
            attempt.difference_secs,
            attempt.grade,
            if new_best { ", new best" } else { "" }
        );

        self.render_stats();
        self.render_history();
        self.presenter.render_status(attempt.grade.status_line());

        let banner = attempt
            .grade
            .celebration(attempt.difference_secs)
            .or_else(|| new_best.then(|| Celebration::new_best(attempt.difference_secs)));
        if let Some(banner) = banner {
            self.show_celebration(banner, now);
        }

        let mut readout = Readout::new(elapsed, self.target, ReadoutPhase::Stopped, self.focus_mode);
        readout.pulse = true;
        self.show_readout(readout);
        self.pulse
            .replace(&mut self.timers, now.after(self.config.pulse_duration()), Task::ReleasePulse);

        Some(attempt)
    }

    pub fn new_random_target(&mut self) -> Target {
        let target = Target::random(&mut self.rng);
        self.retarget(target, RANDOM_TARGET_STATUS);
        target
    }

    /// Set the target directly. Out-of-range values are clamped.
    pub fn set_target(&mut self, secs: f64) -> Target {
        let target = Target::clamped(secs);
        self.retarget(target, TUNED_TARGET_STATUS);
        target
    }

    /// Move the target one tuner step.
    pub fn nudge_target(&mut self, nudge: Nudge) -> Target {
        let step = match nudge {
            Nudge::Up => self.config.tuner_step,
            Nudge::Down => -self.config.tuner_step,
        };
        let target = self.target.nudged(step);
        self.retarget(target, TUNED_TARGET_STATUS);
        target
    }

    // A target change always lands the stopwatch in Idle; a run in progress
    // is dropped without grading.
    fn retarget(&mut self, target: Target, status: &str) {
        if self.stopwatch.abort() {
            debug!("run aborted by target change");
        }
        self.frame.clear(&mut self.timers);
        self.pulse.clear(&mut self.timers);
        self.target = target;
        info!("target set to {target}");

        self.presenter.render_target(target);
        self.presenter.render_status(status);
        self.hide_celebration();
        self.show_readout(Readout::new(0.0, target, ReadoutPhase::Idle, self.focus_mode));
        self.render_stats();
    }

    /// Flip focus mode. Timing is unaffected; only the live readout is hidden.
    pub fn toggle_focus_mode(&mut self) -> bool {
        self.focus_mode = !self.focus_mode;
        debug!("focus mode {}", if self.focus_mode { "on" } else { "off" });
        self.presenter.render_focus(self.focus_mode);
        if self.focus_mode {
            let now = self.clock.now();
            self.show_celebration(Celebration::focus_mode(), now);
        } else {
            self.hide_celebration();
        }
        self.focus_mode
    }

    /// Fire every task that is due. Returns whether anything was rendered.
    pub fn on_tick(&mut self) -> bool {
        let now = self.clock.now();
        let mut rendered = false;
        for (handle, task) in self.timers.take_due(now) {
            match task {
                Task::Frame => {
                    if !self.frame.claim(handle) || !self.stopwatch.is_running() {
                        continue;
                    }
                    let elapsed = self.stopwatch.elapsed_secs(now);
                    self.show_readout(Readout::new(
                        elapsed,
                        self.target,
                        ReadoutPhase::Running,
                        self.focus_mode,
                    ));
                    self.frame.replace(
                        &mut self.timers,
                        now.after(self.config.frame_interval()),
                        Task::Frame,
                    );
                    rendered = true;
                }
                Task::HideCelebration => {
                    if self.celebration.claim(handle) {
                        self.presenter.render_celebration(None);
                        rendered = true;
                    }
                }
                Task::ReleasePulse => {
                    if self.pulse.claim(handle) {
                        let mut readout = self.readout;
                        readout.pulse = false;
                        self.show_readout(readout);
                        rendered = true;
                    }
                }
            }
        }
        rendered
    }

    /// Cancel every pending task and drop any run in progress.
    pub fn teardown(&mut self) {
        self.frame.clear(&mut self.timers);
        self.celebration.clear(&mut self.timers);
        self.pulse.clear(&mut self.timers);
        self.stopwatch.abort();
        debug!("session torn down");
    }

    fn show_celebration(&mut self, banner: Celebration, now: Timestamp) {
        self.presenter.render_celebration(Some(&banner));
        self.celebration.replace(
            &mut self.timers,
            now.after(self.config.celebration_duration()),
            Task::HideCelebration,
        );
    }

    fn hide_celebration(&mut self) {
        self.celebration.clear(&mut self.timers);
        self.presenter.render_celebration(None);
    }

    fn show_readout(&mut self, readout: Readout) {
        self.readout = readout;
        self.presenter.render_readout(&readout);
    }

    fn render_stats(&mut self) {
        let rows = self.stats.rows(self.target);
        self.presenter.render_stats(&rows);
    }

    fn render_history(&mut self) {
        let items = self.history.items();
        self.presenter.render_history(&items);
    }

    pub fn target(&self) -> Target {
        self.target
    }

    pub fn is_running(&self) -> bool {
        self.stopwatch.is_running()
    }

    pub fn focus_mode(&self) -> bool {
        self.focus_mode
    }

    pub fn history(&self) -> &HistoryLedger {
        &self.history
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn readout(&self) -> &Readout {
        &self.readout
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Tasks still waiting to fire
    pub fn pending_tasks(&self) -> usize {
        self.timers.len()
    }

    /// Seconds into the current run, zero while idle
    pub fn elapsed_secs(&self) -> f64 {
        self.stopwatch.elapsed_secs(self.clock.now())
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }
}

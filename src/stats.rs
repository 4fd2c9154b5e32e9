use crate::history::Attempt;
use crate::target::Target;

/// Shown in place of a value when nothing has been recorded yet
pub const NO_VALUE: &str = "-";

/// Label/value pair for the scoreboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatRow {
    pub label: &'static str,
    pub value: String,
}

impl StatRow {
    fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }
}

/// Aggregate counters for the running session
#[derive(Debug, Clone, Default)]
pub struct SessionStats {
    attempt_count: u32,
    best_difference: Option<f64>,
    last: Option<Attempt>,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold in a new attempt. Returns true when it matches or beats the best
    /// difference so far; the first attempt always does.
    pub fn update(&mut self, attempt: &Attempt) -> bool {
        self.attempt_count += 1;
        let best = self
            .best_difference
            .map_or(attempt.difference_secs, |b| b.min(attempt.difference_secs));
        self.best_difference = Some(best);
        self.last = Some(*attempt);
        attempt.difference_secs <= best + f64::EPSILON
    }

    pub fn attempt_count(&self) -> u32 {
        self.attempt_count
    }

    pub fn best_difference(&self) -> Option<f64> {
        self.best_difference
    }

    pub fn last(&self) -> Option<&Attempt> {
        self.last.as_ref()
    }

    /// Number the next attempt will carry
    pub fn next_attempt_number(&self) -> u32 {
        self.attempt_count + 1
    }

    /// Scoreboard rows, always in the order Target, Attempts, Best Diff, Last Grade
    pub fn rows(&self, target: Target) -> [StatRow; 4] {
        let best = self
            .best_difference
            .map_or_else(|| NO_VALUE.to_string(), |b| format!("{b:.3}s"));
        let last = self.last.map_or_else(
            || NO_VALUE.to_string(),
            |a| format!("{} ({:.3}s)", a.grade, a.difference_secs),
        );
        [
            StatRow::new("Target", target.to_string()),
            StatRow::new("Attempts", self.attempt_count.to_string()),
            StatRow::new("Best Diff", best),
            StatRow::new("Last Grade", last),
        ]
    }
}

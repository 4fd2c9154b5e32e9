use std::collections::VecDeque;

use crate::grade::{Grade, Tone};
use crate::target::Target;

/// Number of attempts the ledger keeps
pub const HISTORY_LIMIT: usize = 5;

// Differences are kept at microsecond resolution so a run that is exactly
// 50ms off reads 0.050 and grades as 0.050.
const DIFFERENCE_RESOLUTION: f64 = 1e6;

fn difference_between(elapsed_secs: f64, target: Target) -> f64 {
    let raw = (elapsed_secs - target.secs()).abs();
    (raw * DIFFERENCE_RESOLUTION).round() / DIFFERENCE_RESOLUTION
}

/// One completed start/stop cycle. Never mutated after creation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attempt {
    pub number: u32,
    pub elapsed_secs: f64,
    pub target: Target,
    pub difference_secs: f64,
    pub grade: Grade,
}

impl Attempt {
    pub fn new(number: u32, elapsed_secs: f64, target: Target) -> Self {
        let difference_secs = difference_between(elapsed_secs, target);
        Self {
            number,
            elapsed_secs,
            target,
            difference_secs,
            grade: Grade::from_difference(difference_secs),
        }
    }

    pub fn as_item(&self) -> HistoryItem {
        HistoryItem {
            label: format!("#{} {:.3}s", self.number, self.elapsed_secs),
            value: format!(
                "{:.3}s ・ {} {}",
                self.difference_secs,
                self.grade,
                self.grade.emoji()
            ),
            tone: self.grade.tone(),
        }
    }
}

/// Display row handed to the presenter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryItem {
    pub label: String,
    pub value: String,
    pub tone: Tone,
}

/// Most recent attempts, newest first, bounded by `HISTORY_LIMIT`
#[derive(Debug, Clone, Default)]
pub struct HistoryLedger {
    attempts: VecDeque<Attempt>,
}

impl HistoryLedger {
    pub fn new() -> Self {
        Self {
            attempts: VecDeque::with_capacity(HISTORY_LIMIT + 1),
        }
    }

    pub fn record(&mut self, attempt: Attempt) {
        self.attempts.push_front(attempt);
        self.attempts.truncate(HISTORY_LIMIT);
    }

    pub fn clear(&mut self) {
        self.attempts.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attempt> {
        self.attempts.iter()
    }

    pub fn latest(&self) -> Option<&Attempt> {
        self.attempts.front()
    }

    pub fn len(&self) -> usize {
        self.attempts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attempts.is_empty()
    }

    pub fn items(&self) -> Vec<HistoryItem> {
        self.iter().map(Attempt::as_item).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn attempt(number: u32, elapsed: f64) -> Attempt {
        Attempt::new(number, elapsed, Target::clamped(3.0))
    }

    #[test]
    fn attempt_derives_difference_and_grade() {
        let a = attempt(1, 3.10);
        assert!((a.difference_secs - 0.10).abs() < 1e-9);
        assert_eq!(a.grade, Grade::A);

        let early = attempt(2, 2.80);
        assert!((early.difference_secs - 0.20).abs() < 1e-9);
        assert_eq!(early.grade, Grade::B);
    }

    #[test]
    fn clock_exact_runs_land_on_grade_bounds() {
        let run = |ms: u64, target: f64| {
            let elapsed = Duration::from_millis(ms).as_secs_f64();
            Attempt::new(1, elapsed, Target::clamped(target))
        };

        let on_s_bound = run(3_050, 3.0);
        assert_eq!(on_s_bound.difference_secs, 0.05);
        assert_eq!(on_s_bound.grade, Grade::A);
        assert_eq!(on_s_bound.as_item().value, "0.050s ・ A ✨");

        assert_eq!(run(3_000, 2.95).grade, Grade::A);
        assert_eq!(run(2_950, 3.0).grade, Grade::A);
        assert_eq!(run(3_049, 3.0).grade, Grade::S);
        assert_eq!(run(3_120, 3.0).grade, Grade::B);
        assert_eq!(run(2_880, 3.0).grade, Grade::B);
        assert_eq!(run(3_250, 3.0).grade, Grade::C);
        assert_eq!(run(3_249, 3.0).grade, Grade::B);
    }

    #[test]
    fn ledger_is_newest_first_and_bounded() {
        let mut ledger = HistoryLedger::new();
        for n in 1..=12 {
            ledger.record(attempt(n, 3.0 + n as f64 * 0.01));
            assert!(ledger.len() <= HISTORY_LIMIT);
        }
        let numbers: Vec<u32> = ledger.iter().map(|a| a.number).collect();
        assert_eq!(numbers, vec![12, 11, 10, 9, 8]);
        assert_eq!(ledger.latest().map(|a| a.number), Some(12));
    }

    #[test]
    fn clear_empties_ledger() {
        let mut ledger = HistoryLedger::new();
        ledger.record(attempt(1, 3.0));
        ledger.clear();
        assert!(ledger.is_empty());
        assert!(ledger.items().is_empty());
    }

    #[test]
    fn item_formatting() {
        let item = attempt(3, 3.021).as_item();
        assert_eq!(item.label, "#3 3.021s");
        assert_eq!(item.value, "0.021s ・ S 🌟");
        assert_eq!(item.tone, Tone::Positive);

        let c = attempt(4, 4.0).as_item();
        assert_eq!(c.value, "1.000s ・ C 💪");
        assert_eq!(c.tone, Tone::Plain);
    }
}

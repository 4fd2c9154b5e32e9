use crate::celebration::{Celebration, CelebrationTone};

/// Upper bounds (exclusive) of the S, A and B buckets, in seconds.
pub const S_LIMIT: f64 = 0.05;
pub const A_LIMIT: f64 = 0.12;
pub const B_LIMIT: f64 = 0.25;

/// Declared best first, so `Ord` ranks S < A < B < C.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, strum_macros::Display)]
pub enum Grade {
    S,
    A,
    B,
    C,
}

/// Visual accent of a history row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    Positive,
    Bright,
    #[default]
    Plain,
}

impl Grade {
    /// Bucket a difference. Bounds are exclusive, so exactly 0.05 is an A.
    /// Anything that is not below a limit (including NaN) falls through to C.
    pub fn from_difference(difference_secs: f64) -> Self {
        if difference_secs < S_LIMIT {
            Grade::S
        } else if difference_secs < A_LIMIT {
            Grade::A
        } else if difference_secs < B_LIMIT {
            Grade::B
        } else {
            Grade::C
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Grade::S => "🌟",
            Grade::A => "✨",
            Grade::B => "👍",
            Grade::C => "💪",
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            Grade::S => Tone::Positive,
            Grade::A => Tone::Bright,
            Grade::B | Grade::C => Tone::Plain,
        }
    }

    pub fn status_line(&self) -> &'static str {
        match self {
            Grade::S => "Godlike! Practically zero error.",
            Grade::A => "Great sense of timing.",
            Grade::B => "Not bad! Keep your rhythm steady.",
            Grade::C => "That drifted. Take a breath and try again.",
        }
    }

    /// Celebration shown after an attempt with this grade; C gets none.
    pub fn celebration(&self, difference_secs: f64) -> Option<Celebration> {
        let (title, subtitle, tone) = match self {
            Grade::S => (
                "S RANK",
                format!("off by ±{difference_secs:.3}s"),
                CelebrationTone::S,
            ),
            Grade::A => (
                "Good rhythm",
                format!("±{difference_secs:.3}s"),
                CelebrationTone::A,
            ),
            Grade::B => (
                "Nice try",
                format!("±{difference_secs:.3}s"),
                CelebrationTone::B,
            ),
            Grade::C => return None,
        };
        Some(Celebration::new(title, subtitle, tone))
    }
}

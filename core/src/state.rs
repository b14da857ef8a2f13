use crate::color::{self, Color};
use crate::counts::BuildCounts;
use std::fmt;

/// Share of successful builders below which the fleet is declared on fire.
pub const EMERGENCY_SUCCESS_RATIO: f64 = 0.6;

/// What the beacon should be showing right now.
///
/// Exactly one value is current inside the controller; no history is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayState {
    /// Everything is green (or at least not red).
    Idle,
    /// At least one builder failed.
    Failure,
    /// At least one infrastructure failure, no plain failures.
    Exception,
    /// Most of the fleet is broken. Rendered as a pulse, not a steady color.
    Emergency,
    /// The dashboard could not be fetched or understood.
    TransientError(String),
}

impl DisplayState {
    /// Steady color for this state, `None` for the animated [`DisplayState::Emergency`].
    pub fn color(&self) -> Option<Color> {
        match self {
            DisplayState::Idle => Some(color::OFF),
            DisplayState::Failure => Some(color::FAILURE),
            DisplayState::Exception => Some(color::EXCEPTION),
            DisplayState::Emergency => None,
            DisplayState::TransientError(_) => Some(color::TRANSIENT_ERROR),
        }
    }

    pub fn is_emergency(&self) -> bool {
        matches!(self, DisplayState::Emergency)
    }

    /// Human-readable reason logged when the state is rendered.
    pub fn reason(&self) -> &str {
        match self {
            DisplayState::Idle => "All builders healthy",
            DisplayState::Failure => "Builders failing",
            DisplayState::Exception => "Infra failures present",
            DisplayState::Emergency => "Hair on fire",
            DisplayState::TransientError(message) => message,
        }
    }
}

impl fmt::Display for DisplayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayState::Idle => f.write_str("idle"),
            DisplayState::Failure => f.write_str("failure"),
            DisplayState::Exception => f.write_str("exception"),
            DisplayState::Emergency => f.write_str("emergency"),
            DisplayState::TransientError(message) => write!(f, "transient error ({message})"),
        }
    }
}

/// Pure classification of one tick's counts.
///
/// Precedence is Emergency, Failure, Exception, Idle. An empty fleet is Idle:
/// the ratio test is skipped rather than dividing by zero. Small fleets are
/// judged literally, so a single failing builder is an emergency.
pub fn classify(counts: &BuildCounts) -> DisplayState {
    let total = counts.total();
    if total > 0 && (counts.successes() as f64) < (total as f64) * EMERGENCY_SUCCESS_RATIO {
        DisplayState::Emergency
    } else if counts.failures() > 0 {
        DisplayState::Failure
    } else if counts.exceptions() > 0 {
        DisplayState::Exception
    } else {
        DisplayState::Idle
    }
}

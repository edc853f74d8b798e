//! Error type shared by the sequencing engine, its steps and the loaders
//! that feed it reference data.

use thiserror::Error;

/// Errors surfaced by choreography construction and per-tick driving.
///
/// Configuration problems are raised when a sequence is generated or a step
/// is built, never in the middle of a tick. Contract violations
/// ([`ChoreographyError::UnknownDrone`]) are raised from `run` and abort the
/// whole tick.
#[derive(Debug, Error, PartialEq)]
pub enum ChoreographyError {
    #[error("Invalid step duration {0}: must be a non-negative number of seconds")]
    InvalidDuration(f32),

    #[error("Invalid finite-difference step {0}: must be greater than zero")]
    InvalidTimeStep(f32),

    #[error("Choreography '{0}' needs at least one drone")]
    EmptyRoster(String),

    #[error("Drone {index} is assigned to more than one sub-group")]
    OverlappingSubGroups { index: usize },

    #[error("Drone {index} is not part of the roster this step was given")]
    UnknownDrone { index: usize },

    #[error("Unknown choreography '{0}'")]
    UnknownChoreography(String),

    #[error("Keyframe table line {line}: {reason}")]
    Keyframes { line: usize, reason: String },

    #[error("Keyframe table has no data for slot {0}")]
    MissingSlot(usize),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ChoreographyError {
    fn from(e: std::io::Error) -> Self {
        ChoreographyError::Io(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ChoreographyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offender() {
        let e = ChoreographyError::OverlappingSubGroups { index: 3 };
        assert_eq!(e.to_string(), "Drone 3 is assigned to more than one sub-group");

        let e = ChoreographyError::Keyframes {
            line: 7,
            reason: "expected 5 fields".into(),
        };
        assert!(e.to_string().contains("line 7"));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let e: ChoreographyError = io.into();
        assert!(matches!(e, ChoreographyError::Io(msg) if msg.contains("gone")));
    }
}

use thiserror::Error;

use crate::config::PhaseId;

/// Defects in the static phase table, caught once at startup.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("phase table is empty")]
    EmptyTable,

    #[error("start phase {0} is not in the table")]
    MissingStart(PhaseId),

    #[error("phase {phase} transitions to {target}, which is not in the table")]
    DanglingTransition { phase: PhaseId, target: PhaseId },

    #[error("phase {phase} wants {capacity} entities, registry holds {max}")]
    CapacityTooLarge { phase: PhaseId, capacity: usize, max: usize },

    #[error("phase {0} runs a behavior but has a zero tick interval")]
    ZeroInterval(PhaseId),

    #[error("phase {0} runs a behavior but has no sprite")]
    MissingSprite(PhaseId),

    #[error("boss phase {phase} has {offsets} shot origins for {capacity} slots")]
    ShotOffsetMismatch { phase: PhaseId, offsets: usize, capacity: usize },

    #[error("boss phase {phase} drives from slot {driver}, capacity is {capacity}")]
    DriverOutOfRange { phase: PhaseId, driver: usize, capacity: usize },
}

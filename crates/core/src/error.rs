use crate::draft::EditMode;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("unknown stat: {0}")]
    UnknownStat(String),
    #[error("unknown survivor status: {0}")]
    UnknownStatus(String),
    #[error("unknown gender: {0} (expected M or F)")]
    UnknownGender(String),
    #[error("{0} cannot be changed on an existing survivor")]
    NotEditable(String),
    #[error("disorder slot {slot} out of range (survivors have {max} slots)")]
    SlotOutOfRange { slot: usize, max: usize },
    #[error("draft was validated for {actual:?} but {expected:?} was requested")]
    WrongMode {
        expected: EditMode,
        actual: EditMode,
    },
    #[error("failed to serialize payload: {0}")]
    Serialization(serde_json::Error),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;

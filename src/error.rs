use thiserror::Error;

/// Caller contract violations. Everything else this crate reports is a
/// recoverable [`crate::Diagnostic`], never an error.
#[derive(Debug, Error)]
pub enum EpochError {
    #[error("DAC channel {channel} out of range; header describes {available} channels")]
    ChannelOutOfRange { channel: usize, available: usize },
    #[error("sweep sample count must be greater than zero")]
    EmptySweep,
}

//! Kernel error types

use thiserror::Error;
use uos_allocator::AllocError;

/// Errors surfaced by kernel components
///
/// Allocation failures are always handed back to the caller. Unknown commands
/// are recovered by the shell. Rejected logins and configuration errors end in
/// a halt.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum KernelError {
    #[error("allocation failed: {0}")]
    Allocation(#[from] AllocError),

    #[error("authentication rejected")]
    AuthenticationRejected,

    #[error("unknown command")]
    UnknownCommand,

    #[error("configuration error: {0}")]
    Configuration(&'static str),

    #[error("display negotiation failed")]
    DisplayUnavailable,
}

pub type Result<T> = core::result::Result<T, KernelError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::string::ToString;

    #[test]
    fn test_allocation_error_converts() {
        let err: KernelError = AllocError::OutOfMemory {
            requested: 64,
            available: 8,
        }
        .into();
        assert!(matches!(err, KernelError::Allocation(_)));
        assert!(err.to_string().starts_with("allocation failed: "));
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            KernelError::Configuration("invalid heap bounds").to_string(),
            "configuration error: invalid heap bounds"
        );
        assert_eq!(KernelError::UnknownCommand.to_string(), "unknown command");
    }
}

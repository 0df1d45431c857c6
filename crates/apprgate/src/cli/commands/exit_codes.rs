//! Process exit codes.
//!
//! These line up with [`ApprovalGateError::exit_code`](apprgate_core::ApprovalGateError::exit_code).

/// Success; also used when no policy matched.
pub const EXIT_SUCCESS: i32 = 0;

/// The approval or policy evaluation rejected the request.
pub const EXIT_REJECTED: i32 = 1;

/// Configuration, I/O or service error.
pub const EXIT_ERROR: i32 = 2;

/// The approval was still pending when polling gave up.
pub const EXIT_TIMEOUT: i32 = 3;

/// The payload could not be normalized.
pub const EXIT_INVALID_INPUT: i32 = 4;

#[cfg(test)]
mod tests {
    use super::*;
    use apprgate_core::error::{ApprovalGateError, ConfigError, NormalizeError, ProtocolError};

    #[test]
    fn test_codes_match_error_mapping() {
        let cases = [
            (ApprovalGateError::from(ProtocolError::rejected("r1")), EXIT_REJECTED),
            (ApprovalGateError::from(ProtocolError::timeout("r1", 15)), EXIT_TIMEOUT),
            (
                ApprovalGateError::from(NormalizeError::unsupported_chain("Cosmos")),
                EXIT_INVALID_INPUT,
            ),
            (ApprovalGateError::from(ConfigError::no_home_directory()), EXIT_ERROR),
        ];

        for (err, code) in cases {
            assert_eq!(err.exit_code(), code, "{err}");
        }
        assert_ne!(EXIT_SUCCESS, EXIT_ERROR);
    }
}

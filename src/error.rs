//! Application-level error type.
//!
//! Every failure that reaches `main` carries a process exit code:
//!
//! - `2`: bad input or configuration (unreadable CSV, missing columns, invalid flags, I/O)
//! - `3`: not enough usable data to price anything (empty baseline)
//! - `4`: internal numeric failure

use thiserror::Error;

/// Exit code for malformed input, invalid configuration and I/O failures.
pub const EXIT_INPUT: u8 = 2;
/// Exit code when the data is well-formed but insufficient to proceed.
pub const EXIT_NO_DATA: u8 = 3;
/// Exit code for internal numeric failures.
pub const EXIT_NUMERIC: u8 = 4;

#[derive(Clone, Error)]
#[error("{message}")]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    /// Malformed input, invalid configuration, or an I/O failure.
    pub fn input(message: impl Into<String>) -> Self {
        Self::new(EXIT_INPUT, message)
    }

    /// Well-formed input that leaves nothing to optimize.
    pub fn no_data(message: impl Into<String>) -> Self {
        Self::new(EXIT_NO_DATA, message)
    }

    /// Internal numeric or setup failure.
    pub fn numeric(message: impl Into<String>) -> Self {
        Self::new(EXIT_NUMERIC, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_bare_message() {
        let err = AppError::no_data("Baseline is empty.");
        assert_eq!(err.to_string(), "Baseline is empty.");
        assert_eq!(err.exit_code(), EXIT_NO_DATA);
    }

    #[test]
    fn constructors_carry_their_exit_codes() {
        assert_eq!(AppError::input("bad").exit_code(), EXIT_INPUT);
        assert_eq!(AppError::numeric("nan").exit_code(), EXIT_NUMERIC);
        assert_eq!(EXIT_NUMERIC, 4);
    }
}

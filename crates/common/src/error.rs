//! Construction errors for Imperivm programs.

use thiserror::Error;

/// Errors raised while assembling a subroutine table into a [`Program`](crate::Program).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgramError {
    /// No subroutine named `main` was defined.
    #[error("no 'main' subroutine defined")]
    MissingEntryPoint,

    /// Two subroutines share a name.
    #[error("subroutine '{name}' is defined more than once")]
    DuplicateSubroutine { name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_missing_entry_point() {
        assert_eq!(
            ProgramError::MissingEntryPoint.to_string(),
            "no 'main' subroutine defined"
        );
    }

    #[test]
    fn display_duplicate_subroutine() {
        assert_eq!(
            ProgramError::DuplicateSubroutine {
                name: "helper".to_string()
            }
            .to_string(),
            "subroutine 'helper' is defined more than once"
        );
    }
}

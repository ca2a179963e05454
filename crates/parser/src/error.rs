//! Error types for the Imperivm front end.

use imperivm_common::ProgramError;
use thiserror::Error;

/// Errors produced while turning source text into a program.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A character that cannot start any token.
    #[error("line {line}: unexpected character '{ch}'")]
    InvalidCharacter { line: usize, ch: char },

    /// A numeric literal is malformed or out of range.
    #[error("line {line}: invalid number '{token}'")]
    InvalidNumber { line: usize, token: String },

    /// A string literal has no closing quote.
    #[error("line {line}: unterminated string")]
    UnterminatedString { line: usize },

    /// A token appeared where something else was required.
    #[error("line {line}: expected {expected}, found {found}")]
    UnexpectedToken {
        line: usize,
        found: String,
        expected: &'static str,
    },

    /// The input ended in the middle of a construct.
    #[error("line {line}: expected {expected}, found end of input")]
    UnexpectedEnd { line: usize, expected: &'static str },

    /// Blocks nested deeper than the parser accepts.
    #[error("line {line}: blocks nested deeper than {limit} levels")]
    NestingTooDeep { line: usize, limit: usize },

    /// The subroutines parsed but do not form a valid program.
    #[error(transparent)]
    Program(#[from] ProgramError),
}

//! Runtime errors for the Imperivm executor.
//!
//! Every error is fatal: the run stops at the first one and nothing is
//! retried or defaulted.

use imperivm_common::Value;
use thiserror::Error;

/// Errors that occur during program execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// An identifier is not bound anywhere in the current scope chain.
    #[error("unbound name '{name}'")]
    UnboundName { name: String },

    /// An invocation names a subroutine the program does not define.
    #[error("no subroutine called '{name}'")]
    UnknownSubroutine { name: String },

    /// Negative or non-integer address to STORE, or an address LOAD cannot read.
    #[error("invalid memory address {address}")]
    InvalidMemoryAddress { address: Value },

    /// STORE would grow the heap past the configured cell limit.
    #[error("address {address} exceeds heap limit of {limit} cells")]
    HeapLimitExceeded { address: i64, limit: usize },

    /// DIVIDE with a zero divisor.
    #[error("division by zero in 'divide {target}'")]
    DivisionByZero { target: String },

    /// An instruction needed a stack element and the stack was empty.
    #[error("stack underflow in '{op}'")]
    StackUnderflow { op: &'static str },

    /// A binary operation received operands it cannot combine.
    #[error("unsupported operand kinds for '{op}': {left} and {right}")]
    TypeMismatch {
        op: &'static str,
        left: &'static str,
        right: &'static str,
    },

    /// A unary operation received an operand it cannot handle.
    #[error("unsupported operand kind for '{op}': {kind}")]
    UnsupportedOperand { op: &'static str, kind: &'static str },

    /// String concatenation or repetition would exceed the configured length.
    #[error("string result of '{op}' exceeds limit of {limit} bytes")]
    StringLimitExceeded { op: &'static str, limit: usize },

    /// Subroutine invocations nested deeper than the configured limit.
    #[error("call depth exceeded limit {limit}")]
    CallDepthExceeded { limit: usize },

    /// Writing PRINT output failed.
    #[error("cannot write output: {message}")]
    Output { message: String },
}

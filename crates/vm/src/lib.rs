//! Imperivm executor: walks subroutine bodies and runs their instructions.
//!
//! The executor owns:
//! - A value stack shared by every subroutine call (the calling convention)
//! - A growable heap of optional values, addressed from zero
//! - A fresh [`Bindings`] scope chain per subroutine call
//!
//! # Usage
//!
//! ```
//! use imperivm_common::{Block, Instruction, Operand, Program, Value};
//! use imperivm_vm::{run_with, Config, Exit};
//!
//! let main = Block::new(vec![
//!     Instruction::Print(Operand::String("hi".to_string())),
//!     Instruction::Halt(Operand::Integer(4)),
//! ]);
//! let program = Program::new(vec![("main".to_string(), main)]).unwrap();
//!
//! let mut out = Vec::new();
//! let exit = run_with(&program, Config::default(), &mut out).unwrap();
//! assert_eq!(exit, Exit::Halted(Value::Integer(4)));
//! assert_eq!(out, b"hi\n");
//! ```

pub mod bindings;
pub mod error;
pub mod execute;
pub mod machine;

pub use bindings::Bindings;
pub use error::RuntimeError;
pub use machine::{Config, Executor, Flow};

use std::io::Write;

use imperivm_common::{Program, Value};

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exit {
    /// `main` returned, either by running off its end or through `stop`.
    Completed,
    /// An `exit` instruction ran with this code.
    Halted(Value),
}

impl Exit {
    /// Process exit status for this outcome.
    ///
    /// Integer codes are used as-is (truncated to 32 bits). Any other code
    /// value maps to 1.
    pub fn status(&self) -> i32 {
        match self {
            Exit::Completed => 0,
            Exit::Halted(Value::Integer(n)) => *n as i32,
            Exit::Halted(_) => 1,
        }
    }
}

/// Execute a program, printing to standard output.
///
/// # Errors
///
/// Returns [`RuntimeError`] for the first failure (unbound name, unknown
/// subroutine, division by zero, bad heap address, ...).
pub fn run(program: &Program) -> Result<Exit, RuntimeError> {
    let mut executor = Executor::new(program);
    finish(executor.execute()?)
}

/// Execute a program with an explicit configuration and output sink.
pub fn run_with<W: Write>(
    program: &Program,
    config: Config,
    out: W,
) -> Result<Exit, RuntimeError> {
    let mut executor = Executor::with_config(program, config, out);
    finish(executor.execute()?)
}

fn finish(flow: Flow) -> Result<Exit, RuntimeError> {
    Ok(match flow {
        Flow::Halt(code) => Exit::Halted(code),
        Flow::Continue | Flow::Unwind => Exit::Completed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_status_mapping() {
        assert_eq!(Exit::Completed.status(), 0);
        assert_eq!(Exit::Halted(Value::Integer(7)).status(), 7);
        assert_eq!(Exit::Halted(Value::Integer(0)).status(), 0);
        assert_eq!(Exit::Halted(Value::from("bye")).status(), 1);
        assert_eq!(Exit::Halted(Value::Float(2.0)).status(), 1);
    }
}

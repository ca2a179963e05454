//! Executor state: shared stack, heap, configuration and output sink.

use std::io::{self, Write};

use crate::error::RuntimeError;
use imperivm_common::{Program, Value};

/// Default limit on nested subroutine invocations.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 1024;

/// Default limit on heap cells.
pub const DEFAULT_MAX_HEAP_CELLS: usize = 1 << 24;

/// Default limit on the length of a string built by `add` or `multiply`.
pub const DEFAULT_MAX_STRING_BYTES: usize = 1 << 26;

/// Executor configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of subroutine calls active at once, `main` included.
    pub max_call_depth: usize,
    /// Maximum number of heap cells STORE may grow the heap to.
    pub max_heap_cells: usize,
    /// Maximum length in bytes of a string produced by arithmetic.
    pub max_string_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            max_heap_cells: DEFAULT_MAX_HEAP_CELLS,
            max_string_bytes: DEFAULT_MAX_STRING_BYTES,
        }
    }
}

/// How a block or instruction finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    /// Carry on with the next instruction.
    Continue,
    /// A `stop` ran: skip everything up to the enclosing subroutine call.
    Unwind,
    /// An `exit` ran: end the whole program with this code.
    Halt(Value),
}

/// The Imperivm executor.
///
/// The stack and heap are shared by every subroutine call and every nested
/// block for the lifetime of the executor.
pub struct Executor<'a, W: Write = io::Stdout> {
    /// The program being executed.
    pub(crate) program: &'a Program,
    /// Shared value stack.
    pub(crate) stack: Vec<Value>,
    /// Shared heap. `None` marks a cell that was grown into but never written.
    pub(crate) heap: Vec<Option<Value>>,
    /// Number of subroutine calls currently active.
    pub(crate) call_depth: usize,
    pub(crate) config: Config,
    /// Where PRINT writes.
    pub(crate) out: W,
}

impl<'a> Executor<'a, io::Stdout> {
    /// Create an executor that prints to standard output.
    pub fn new(program: &'a Program) -> Self {
        Self::with_config(program, Config::default(), io::stdout())
    }
}

impl<'a, W: Write> Executor<'a, W> {
    /// Create an executor with an explicit configuration and output sink.
    pub fn with_config(program: &'a Program, config: Config, out: W) -> Self {
        Self {
            program,
            stack: Vec::new(),
            heap: Vec::new(),
            call_depth: 0,
            config,
            out,
        }
    }

    /// Current stack contents, bottom first.
    pub fn stack(&self) -> &[Value] {
        &self.stack
    }

    /// Current heap contents.
    pub fn heap(&self) -> &[Option<Value>] {
        &self.heap
    }

    /// Consume the executor and return its output sink.
    pub fn into_output(self) -> W {
        self.out
    }

    /// Push a value onto the shared stack.
    pub(crate) fn push(&mut self, value: Value) {
        self.stack.push(value);
    }

    /// Pop a value from the shared stack.
    pub(crate) fn pop(&mut self, op: &'static str) -> Result<Value, RuntimeError> {
        self.stack.pop().ok_or(RuntimeError::StackUnderflow { op })
    }

    /// Validate a STORE address, returning the heap index it names.
    pub(crate) fn store_index(&self, address: &Value) -> Result<usize, RuntimeError> {
        let n = match address.as_integer() {
            Some(n) if n >= 0 => n,
            _ => {
                return Err(RuntimeError::InvalidMemoryAddress {
                    address: address.clone(),
                })
            }
        };
        match usize::try_from(n) {
            Ok(index) if index < self.config.max_heap_cells => Ok(index),
            _ => Err(RuntimeError::HeapLimitExceeded {
                address: n,
                limit: self.config.max_heap_cells,
            }),
        }
    }

    /// Validate a LOAD address, returning the heap index it names.
    pub(crate) fn load_index(&self, address: &Value) -> Result<usize, RuntimeError> {
        address
            .as_integer()
            .and_then(|n| usize::try_from(n).ok())
            .filter(|&index| index < self.heap.len())
            .ok_or_else(|| RuntimeError::InvalidMemoryAddress {
                address: address.clone(),
            })
    }

    /// Write one line of PRINT output.
    pub(crate) fn emit(&mut self, value: &Value) -> Result<(), RuntimeError> {
        writeln!(self.out, "{value}").map_err(|e| RuntimeError::Output {
            message: e.to_string(),
        })
    }
}

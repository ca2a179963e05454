//! Block execution and instruction dispatch for the Imperivm executor.

use std::io::Write;

use crate::bindings::Bindings;
use crate::error::RuntimeError;
use crate::machine::{Executor, Flow};
use imperivm_common::{
    ensure_sufficient_stack, ArithmeticOp, BitwiseOp, Block, Branch, Instruction, Operand,
    Value, ENTRY_POINT,
};

impl<'a, W: Write> Executor<'a, W> {
    /// Invoke `main` and run until it returns or the program halts.
    pub fn execute(&mut self) -> Result<Flow, RuntimeError> {
        self.invoke(ENTRY_POINT)
    }

    /// Call a subroutine with a brand-new root scope.
    ///
    /// A `stop` inside the callee ends the call here and is reported as
    /// [`Flow::Continue`]. [`Flow::Halt`] passes through.
    pub fn invoke(&mut self, name: &str) -> Result<Flow, RuntimeError> {
        let program = self.program;
        let body = program
            .subroutine(name)
            .ok_or_else(|| RuntimeError::UnknownSubroutine {
                name: name.to_string(),
            })?;

        if self.call_depth >= self.config.max_call_depth {
            return Err(RuntimeError::CallDepthExceeded {
                limit: self.config.max_call_depth,
            });
        }

        self.call_depth += 1;
        tracing::debug!(subroutine = name, depth = self.call_depth, "invoke");
        let mut bindings = Bindings::new();
        let result = ensure_sufficient_stack(|| self.execute_block(body, &mut bindings));
        self.call_depth -= 1;

        match result? {
            Flow::Halt(code) => Ok(Flow::Halt(code)),
            Flow::Continue | Flow::Unwind => {
                tracing::debug!(subroutine = name, "return");
                Ok(Flow::Continue)
            }
        }
    }

    /// Run each instruction of `block` in order against `bindings`.
    ///
    /// Stops at the first instruction that does not return
    /// [`Flow::Continue`] and hands its flow to the caller.
    pub fn execute_block(
        &mut self,
        block: &Block,
        bindings: &mut Bindings,
    ) -> Result<Flow, RuntimeError> {
        for instr in block {
            match self.execute_instruction(instr, bindings)? {
                Flow::Continue => {}
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Continue)
    }

    fn execute_instruction(
        &mut self,
        instr: &Instruction,
        bindings: &mut Bindings,
    ) -> Result<Flow, RuntimeError> {
        tracing::trace!(op = instr.mnemonic(), stack = self.stack.len(), "dispatch");

        match instr {
            Instruction::Assign { src, target } => {
                let value = evaluate(src, bindings)?;
                bindings.assign(target, value);
            }
            Instruction::Arithmetic { op, target } => self.exec_arithmetic(*op, target, bindings)?,
            Instruction::Bitwise { op, target } => self.exec_bitwise(*op, target, bindings)?,
            Instruction::Conditional {
                branches,
                else_block,
            } => return self.exec_conditional(branches, else_block.as_ref(), bindings),
            Instruction::Loop { condition, block } => {
                return self.exec_loop(condition, block, bindings)
            }
            Instruction::Push(src) => {
                let value = evaluate(src, bindings)?;
                self.push(value);
            }
            Instruction::Pop(target) => {
                let value = self.pop("pop")?;
                bindings.assign(target, value);
            }
            Instruction::Print(src) => {
                let value = evaluate(src, bindings)?;
                self.emit(&value)?;
            }
            Instruction::Halt(code) => {
                let code = evaluate(code, bindings)?;
                tracing::debug!(%code, "halt");
                return Ok(Flow::Halt(code));
            }
            Instruction::Stop => return Ok(Flow::Unwind),
            Instruction::Store => self.exec_store()?,
            Instruction::Load => self.exec_load()?,
            Instruction::Invoke(name) => return self.invoke(name),
        }

        Ok(Flow::Continue)
    }

    // ---- Control flow ----

    fn exec_conditional(
        &mut self,
        branches: &[Branch],
        else_block: Option<&Block>,
        bindings: &mut Bindings,
    ) -> Result<Flow, RuntimeError> {
        for branch in branches {
            if evaluate(&branch.condition, bindings)?.is_truthy() {
                return self.execute_child(&branch.block, bindings);
            }
        }
        match else_block {
            Some(block) => self.execute_child(block, bindings),
            None => Ok(Flow::Continue),
        }
    }

    fn exec_loop(
        &mut self,
        condition: &Operand,
        block: &Block,
        bindings: &mut Bindings,
    ) -> Result<Flow, RuntimeError> {
        // The condition is read in the enclosing scope; each iteration gets
        // a fresh child scope.
        while evaluate(condition, bindings)?.is_truthy() {
            match self.execute_child(block, bindings)? {
                Flow::Continue => {}
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Continue)
    }

    /// Execute `block` in a new child scope that is discarded afterwards.
    fn execute_child(
        &mut self,
        block: &Block,
        bindings: &mut Bindings,
    ) -> Result<Flow, RuntimeError> {
        bindings.inherit();
        let result = ensure_sufficient_stack(|| self.execute_block(block, bindings));
        bindings.leave();
        result
    }

    // ---- Arithmetic & bitwise ----

    fn exec_arithmetic(
        &mut self,
        op: ArithmeticOp,
        target: &str,
        bindings: &mut Bindings,
    ) -> Result<(), RuntimeError> {
        let operand = self.pop(op.keyword())?;
        let current = bindings.resolve(target)?.clone();
        let result = arithmetic(op, current, operand, target, self.config.max_string_bytes)?;
        bindings.assign(target, result);
        Ok(())
    }

    fn exec_bitwise(
        &mut self,
        op: BitwiseOp,
        target: &str,
        bindings: &mut Bindings,
    ) -> Result<(), RuntimeError> {
        let operand = if op.pops_operand() {
            Some(self.pop(op.keyword())?)
        } else {
            None
        };
        let current = bindings.resolve(target)?.clone();
        let result = bitwise(op, current, operand)?;
        bindings.assign(target, result);
        Ok(())
    }

    // ---- Heap ----

    fn exec_store(&mut self) -> Result<(), RuntimeError> {
        // A lone element left at the bottom is not part of a pair and stays.
        while self.stack.len() >= 2 {
            let address = self.pop("store")?;
            let value = self.pop("store")?;
            let index = self.store_index(&address)?;

            if index >= self.heap.len() {
                tracing::trace!(from = self.heap.len(), to = index + 1, "grow heap");
                self.heap.resize(index + 1, None);
            }
            self.heap[index] = Some(value);
        }
        Ok(())
    }

    fn exec_load(&mut self) -> Result<(), RuntimeError> {
        let mut addresses = Vec::with_capacity(self.stack.len());
        while let Some(address) = self.stack.pop() {
            addresses.push(address);
        }

        // Reverse of pop order is the order the addresses were pushed in.
        for address in addresses.iter().rev() {
            let index = self.load_index(address)?;
            let value = self.heap[index].clone().unwrap_or(Value::Empty);
            self.push(value);
        }
        Ok(())
    }
}

/// Evaluate an operand: literals are themselves, identifiers are resolved.
pub(crate) fn evaluate(operand: &Operand, bindings: &Bindings) -> Result<Value, RuntimeError> {
    Ok(match operand {
        Operand::Integer(n) => Value::Integer(*n),
        Operand::Float(x) => Value::Float(*x),
        Operand::String(s) => Value::String(s.clone()),
        Operand::Identifier(name) => bindings.resolve(name)?.clone(),
    })
}

/// Integer division rounding toward negative infinity.
fn floor_div(a: i64, b: i64) -> i64 {
    let q = a.wrapping_div(b);
    if a.wrapping_rem(b) != 0 && ((a < 0) != (b < 0)) {
        q - 1
    } else {
        q
    }
}

fn as_float(value: &Value) -> Option<f64> {
    match value {
        Value::Integer(n) => Some(*n as f64),
        Value::Float(x) => Some(*x),
        _ => None,
    }
}

/// `left <op> right`, where `left` is the target's value and `right` the
/// popped stack top.
fn arithmetic(
    op: ArithmeticOp,
    left: Value,
    right: Value,
    target: &str,
    max_string_bytes: usize,
) -> Result<Value, RuntimeError> {
    let division_by_zero = || RuntimeError::DivisionByZero {
        target: target.to_string(),
    };
    let string_limit = || RuntimeError::StringLimitExceeded {
        op: op.keyword(),
        limit: max_string_bytes,
    };

    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(match op {
            ArithmeticOp::Add => a.wrapping_add(b),
            ArithmeticOp::Sub => a.wrapping_sub(b),
            ArithmeticOp::Mul => a.wrapping_mul(b),
            ArithmeticOp::Div if b == 0 => return Err(division_by_zero()),
            ArithmeticOp::Div => floor_div(a, b),
        })),
        (Value::String(a), Value::String(b)) if op == ArithmeticOp::Add => {
            if a.len().saturating_add(b.len()) > max_string_bytes {
                return Err(string_limit());
            }
            Ok(Value::String(a + &b))
        }
        (Value::String(s), Value::Integer(n)) | (Value::Integer(n), Value::String(s))
            if op == ArithmeticOp::Mul =>
        {
            let count = usize::try_from(n).unwrap_or(0);
            match s.len().checked_mul(count) {
                Some(len) if len <= max_string_bytes => Ok(Value::String(s.repeat(count))),
                _ => Err(string_limit()),
            }
        }
        (left, right) => match (as_float(&left), as_float(&right)) {
            (Some(a), Some(b)) => Ok(Value::Float(match op {
                ArithmeticOp::Add => a + b,
                ArithmeticOp::Sub => a - b,
                ArithmeticOp::Mul => a * b,
                ArithmeticOp::Div if b == 0.0 => return Err(division_by_zero()),
                ArithmeticOp::Div => (a / b).floor(),
            })),
            _ => Err(RuntimeError::TypeMismatch {
                op: op.keyword(),
                left: left.kind(),
                right: right.kind(),
            }),
        },
    }
}

fn bitwise(op: BitwiseOp, current: Value, operand: Option<Value>) -> Result<Value, RuntimeError> {
    match (op, operand) {
        (BitwiseOp::Not, _) => Ok(if current.is_truthy() {
            Value::Integer(0)
        } else {
            current
        }),
        (BitwiseOp::Negate, _) => match current {
            Value::Integer(n) => Ok(Value::Integer(!n)),
            other => Err(RuntimeError::UnsupportedOperand {
                op: op.keyword(),
                kind: other.kind(),
            }),
        },
        (_, Some(operand)) => match (&current, &operand) {
            (Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(match op {
                BitwiseOp::And => a & b,
                BitwiseOp::Or => a | b,
                _ => a ^ b,
            })),
            _ => Err(RuntimeError::TypeMismatch {
                op: op.keyword(),
                left: current.kind(),
                right: operand.kind(),
            }),
        },
        (_, None) => Err(RuntimeError::StackUnderflow { op: op.keyword() }),
    }
}

//! Instruction and operand shapes for the Imperivm language.
//!
//! These are the tree the front end produces and the executor walks. There
//! is no behavior here beyond naming.

/// A variable or subroutine name.
pub type Name = String;

/// An instruction operand: a literal, or an identifier resolved at
/// evaluation time through the scope chain.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Decimal integer literal.
    Integer(i64),
    /// Decimal float literal.
    Float(f64),
    /// String literal, escapes kept verbatim.
    String(String),
    /// Reference to a variable.
    Identifier(Name),
}

impl Operand {
    /// Shorthand for an identifier operand.
    pub fn ident(name: &str) -> Self {
        Operand::Identifier(name.to_string())
    }
}

/// Read-modify-write arithmetic against the stack top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Mul,
    /// Floor division.
    Div,
}

/// Bitwise and logical operations on a named variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BitwiseOp {
    And,
    Or,
    Xor,
    /// Bitwise complement. Does not touch the stack.
    Negate,
    /// `0` when the target is truthy, otherwise the target unchanged.
    /// Does not touch the stack.
    Not,
}

impl ArithmeticOp {
    /// Source keyword for this operation.
    pub fn keyword(&self) -> &'static str {
        match self {
            ArithmeticOp::Add => "add",
            ArithmeticOp::Sub => "subtract",
            ArithmeticOp::Mul => "multiply",
            ArithmeticOp::Div => "divide",
        }
    }
}

impl BitwiseOp {
    /// Source keyword for this operation.
    pub fn keyword(&self) -> &'static str {
        match self {
            BitwiseOp::And => "and",
            BitwiseOp::Or => "or",
            BitwiseOp::Xor => "xor",
            BitwiseOp::Negate => "negate",
            BitwiseOp::Not => "not",
        }
    }

    /// Whether the operation pops its second operand from the stack.
    pub fn pops_operand(&self) -> bool {
        matches!(self, BitwiseOp::And | BitwiseOp::Or | BitwiseOp::Xor)
    }
}

/// One `if`/`elif` arm.
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    pub condition: Operand,
    pub block: Block,
}

/// An ordered sequence of instructions owned by a subroutine, branch, or loop.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Block {
    pub instructions: Vec<Instruction>,
}

impl Block {
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.instructions.iter()
    }
}

impl From<Vec<Instruction>> for Block {
    fn from(instructions: Vec<Instruction>) -> Self {
        Self::new(instructions)
    }
}

impl<'a> IntoIterator for &'a Block {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.instructions.iter()
    }
}

/// A single Imperivm instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// `assign <value> <name>`
    Assign { src: Operand, target: Name },
    /// `add|subtract|multiply|divide <name>`: combine the target with the
    /// popped stack top.
    Arithmetic { op: ArithmeticOp, target: Name },
    /// `and|or|xor|negate|not <name>`
    Bitwise { op: BitwiseOp, target: Name },
    /// `if ... elif ... else ...`
    Conditional {
        branches: Vec<Branch>,
        else_block: Option<Block>,
    },
    /// `while <value> <block>`
    Loop { condition: Operand, block: Block },
    /// `push <value>`
    Push(Operand),
    /// `pop <name>`
    Pop(Name),
    /// `print <value>`
    Print(Operand),
    /// `exit <value>`: end the whole program with a status code.
    Halt(Operand),
    /// `stop`: return early from the current subroutine.
    Stop,
    /// `store`: move (value, address) pairs from the stack into the heap.
    Store,
    /// `load`: replace every stacked address with the heap value it names.
    Load,
    /// A bare identifier line: call that subroutine.
    Invoke(Name),
}

impl Instruction {
    /// Source keyword used for logging and diagnostics.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Instruction::Assign { .. } => "assign",
            Instruction::Arithmetic { op, .. } => op.keyword(),
            Instruction::Bitwise { op, .. } => op.keyword(),
            Instruction::Conditional { .. } => "if",
            Instruction::Loop { .. } => "while",
            Instruction::Push(_) => "push",
            Instruction::Pop(_) => "pop",
            Instruction::Print(_) => "print",
            Instruction::Halt(_) => "exit",
            Instruction::Stop => "stop",
            Instruction::Store => "store",
            Instruction::Load => "load",
            Instruction::Invoke(_) => "invoke",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mnemonics_are_lowercase_keywords() {
        let instrs = [
            Instruction::Arithmetic {
                op: ArithmeticOp::Div,
                target: "x".into(),
            },
            Instruction::Bitwise {
                op: BitwiseOp::Negate,
                target: "x".into(),
            },
            Instruction::Halt(Operand::Integer(0)),
            Instruction::Invoke("helper".into()),
        ];
        let names: Vec<_> = instrs.iter().map(Instruction::mnemonic).collect();
        assert_eq!(names, ["divide", "negate", "exit", "invoke"]);
    }

    #[test]
    fn only_binary_bitwise_ops_pop() {
        assert!(BitwiseOp::And.pops_operand());
        assert!(BitwiseOp::Or.pops_operand());
        assert!(BitwiseOp::Xor.pops_operand());
        assert!(!BitwiseOp::Negate.pops_operand());
        assert!(!BitwiseOp::Not.pops_operand());
    }

    #[test]
    fn block_from_vec() {
        let block = Block::from(vec![Instruction::Stop, Instruction::Store]);
        assert_eq!(block.len(), 2);
        assert!(!block.is_empty());
        assert!(Block::default().is_empty());
        assert_eq!(block.iter().next(), Some(&Instruction::Stop));
    }
}

//! Reserved words of the Imperivm language.

/// A reserved word. Matched case-insensitively; never usable as a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Begin,
    Do,
    End,
    Stop,
    If,
    Elif,
    Else,
    While,
    Push,
    Pop,
    Assign,
    Add,
    Subtract,
    Multiply,
    Divide,
    And,
    Or,
    Xor,
    Negate,
    Not,
    Print,
    Exit,
    Store,
    Load,
}

/// Every keyword.
pub const ALL_KEYWORDS: [Keyword; 24] = [
    Keyword::Begin,
    Keyword::Do,
    Keyword::End,
    Keyword::Stop,
    Keyword::If,
    Keyword::Elif,
    Keyword::Else,
    Keyword::While,
    Keyword::Push,
    Keyword::Pop,
    Keyword::Assign,
    Keyword::Add,
    Keyword::Subtract,
    Keyword::Multiply,
    Keyword::Divide,
    Keyword::And,
    Keyword::Or,
    Keyword::Xor,
    Keyword::Negate,
    Keyword::Not,
    Keyword::Print,
    Keyword::Exit,
    Keyword::Store,
    Keyword::Load,
];

impl Keyword {
    /// Canonical lowercase spelling.
    pub fn text(&self) -> &'static str {
        match self {
            Keyword::Begin => "begin",
            Keyword::Do => "do",
            Keyword::End => "end",
            Keyword::Stop => "stop",
            Keyword::If => "if",
            Keyword::Elif => "elif",
            Keyword::Else => "else",
            Keyword::While => "while",
            Keyword::Push => "push",
            Keyword::Pop => "pop",
            Keyword::Assign => "assign",
            Keyword::Add => "add",
            Keyword::Subtract => "subtract",
            Keyword::Multiply => "multiply",
            Keyword::Divide => "divide",
            Keyword::And => "and",
            Keyword::Or => "or",
            Keyword::Xor => "xor",
            Keyword::Negate => "negate",
            Keyword::Not => "not",
            Keyword::Print => "print",
            Keyword::Exit => "exit",
            Keyword::Store => "store",
            Keyword::Load => "load",
        }
    }

    /// Find the keyword spelled by `word`, ignoring case.
    pub fn lookup(word: &str) -> Option<Keyword> {
        ALL_KEYWORDS
            .iter()
            .find(|kw| kw.text().eq_ignore_ascii_case(word))
            .copied()
    }

    /// `begin` and `do` both open a block.
    pub fn opens_block(&self) -> bool {
        matches!(self, Keyword::Begin | Keyword::Do)
    }
}

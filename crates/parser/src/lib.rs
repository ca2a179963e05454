//! Imperivm front end: source text to [`Program`].
//!
//! Parsing runs in three stages: comments are stripped, the text is
//! tokenized, and a recursive-descent parser builds the subroutine table.
//!
//! # Usage
//!
//! ```
//! use imperivm_common::{Instruction, Operand};
//! use imperivm_parser::parse;
//!
//! let text = "\
//! main do
//!     print \"hello\"   # greet
//! end
//! ";
//! let program = parse(text).unwrap();
//! assert_eq!(
//!     program.entry().instructions,
//!     vec![Instruction::Print(Operand::String("hello".to_string()))]
//! );
//! ```

pub mod error;
pub mod keyword;

mod lexer;
mod parser;
mod preprocessor;

pub use error::ParseError;
pub use keyword::Keyword;
pub use parser::MAX_NESTING_DEPTH;

use imperivm_common::{Block, Name, Program};
use parser::Parser;

/// Parse source text into a program.
///
/// Returns the first error encountered. Blocks may nest at most
/// [`MAX_NESTING_DEPTH`] deep. A program without a `main`
/// subroutine, or with two subroutines of the same name, is rejected with
/// [`ParseError::Program`].
pub fn parse(text: &str) -> Result<Program, ParseError> {
    let subroutines = parse_subroutines(text)?;
    Ok(Program::new(subroutines)?)
}

/// Parse source text into `(name, body)` pairs in definition order, without
/// checking the entry point or name uniqueness.
pub fn parse_subroutines(text: &str) -> Result<Vec<(Name, Block)>, ParseError> {
    let source = preprocessor::strip_comments(text);
    let lexemes = lexer::tokenize(&source)?;
    let subroutines = Parser::new(&lexemes).parse_program()?;
    tracing::debug!(
        subroutines = subroutines.len(),
        tokens = lexemes.len(),
        "parsed"
    );
    Ok(subroutines)
}

//! Recursive-descent parser: tokens → subroutine table.
//!
//! Operands must sit on the same line as their instruction. Line breaks
//! separate instructions and may appear between a condition and its block,
//! and before `elif`, `else` and `end`.

use crate::error::ParseError;
use crate::keyword::Keyword;
use crate::lexer::{Lexeme, Token};
use imperivm_common::{
    ensure_sufficient_stack, ArithmeticOp, BitwiseOp, Block, Branch, Instruction, Name, Operand,
};

/// Maximum number of blocks open at once, the subroutine body included.
pub const MAX_NESTING_DEPTH: usize = 512;

pub(crate) struct Parser<'a> {
    lexemes: &'a [Lexeme],
    pos: usize,
    /// Blocks currently open.
    depth: usize,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(lexemes: &'a [Lexeme]) -> Self {
        Self {
            lexemes,
            pos: 0,
            depth: 0,
        }
    }

    /// `program = subroutine (NEWLINE+ subroutine)*`
    pub(crate) fn parse_program(&mut self) -> Result<Vec<(Name, Block)>, ParseError> {
        let mut subroutines = Vec::new();
        self.skip_newlines();

        loop {
            subroutines.push(self.parse_subroutine()?);

            match self.peek() {
                None => break,
                Some(Token::Newline) => {
                    self.skip_newlines();
                    if self.peek().is_none() {
                        break;
                    }
                }
                Some(_) => return Err(self.unexpected("end of line after 'end'")),
            }
        }

        Ok(subroutines)
    }

    /// `subroutine = identifier block`
    fn parse_subroutine(&mut self) -> Result<(Name, Block), ParseError> {
        let name = self.expect_ident("subroutine name")?;
        self.skip_newlines();
        let block = self.parse_block()?;
        Ok((name, block))
    }

    /// `block = (begin|do) instruction* end`
    fn parse_block(&mut self) -> Result<Block, ParseError> {
        match self.lexemes.get(self.pos) {
            Some(Lexeme {
                token: Token::Keyword(kw),
                line,
            }) if kw.opens_block() => {
                if self.depth >= MAX_NESTING_DEPTH {
                    return Err(ParseError::NestingTooDeep {
                        line: *line,
                        limit: MAX_NESTING_DEPTH,
                    });
                }
                self.pos += 1;
            }
            _ => return Err(self.unexpected("'begin' or 'do'")),
        }

        self.depth += 1;
        let block = ensure_sufficient_stack(|| self.parse_block_body());
        self.depth -= 1;
        block
    }

    /// Instructions up to and including the closing `end`.
    fn parse_block_body(&mut self) -> Result<Block, ParseError> {
        let mut instructions = Vec::new();
        self.skip_newlines();

        loop {
            if self.eat_keyword(Keyword::End) {
                return Ok(Block::new(instructions));
            }
            instructions.push(self.parse_instruction()?);

            // Either a line break before the next instruction, or `end` on
            // the same line.
            match self.peek() {
                Some(Token::Newline) => self.skip_newlines(),
                Some(Token::Keyword(Keyword::End)) => {}
                _ => return Err(self.unexpected("end of line or 'end'")),
            }
        }
    }

    fn parse_instruction(&mut self) -> Result<Instruction, ParseError> {
        let keyword = match self.peek() {
            Some(Token::Ident(name)) => {
                let name = name.clone();
                self.pos += 1;
                return Ok(Instruction::Invoke(name));
            }
            Some(Token::Keyword(kw)) => *kw,
            _ => return Err(self.unexpected("an instruction")),
        };

        self.pos += 1;

        Ok(match keyword {
            Keyword::If => self.parse_conditional()?,
            Keyword::While => self.parse_loop()?,
            Keyword::Assign => {
                let src = self.parse_operand()?;
                let target = self.expect_ident("a variable name")?;
                Instruction::Assign { src, target }
            }
            Keyword::Push => Instruction::Push(self.parse_operand()?),
            Keyword::Pop => Instruction::Pop(self.expect_ident("a variable name")?),
            Keyword::Print => Instruction::Print(self.parse_operand()?),
            Keyword::Exit => Instruction::Halt(self.parse_operand()?),
            Keyword::Stop => Instruction::Stop,
            Keyword::Store => Instruction::Store,
            Keyword::Load => Instruction::Load,
            Keyword::Add => self.arithmetic(ArithmeticOp::Add)?,
            Keyword::Subtract => self.arithmetic(ArithmeticOp::Sub)?,
            Keyword::Multiply => self.arithmetic(ArithmeticOp::Mul)?,
            Keyword::Divide => self.arithmetic(ArithmeticOp::Div)?,
            Keyword::And => self.bitwise(BitwiseOp::And)?,
            Keyword::Or => self.bitwise(BitwiseOp::Or)?,
            Keyword::Xor => self.bitwise(BitwiseOp::Xor)?,
            Keyword::Negate => self.bitwise(BitwiseOp::Negate)?,
            Keyword::Not => self.bitwise(BitwiseOp::Not)?,
            Keyword::Begin | Keyword::Do | Keyword::End | Keyword::Elif | Keyword::Else => {
                self.pos -= 1;
                return Err(self.unexpected("an instruction"));
            }
        })
    }

    fn arithmetic(&mut self, op: ArithmeticOp) -> Result<Instruction, ParseError> {
        let target = self.expect_ident("a variable name")?;
        Ok(Instruction::Arithmetic { op, target })
    }

    fn bitwise(&mut self, op: BitwiseOp) -> Result<Instruction, ParseError> {
        let target = self.expect_ident("a variable name")?;
        Ok(Instruction::Bitwise { op, target })
    }

    /// `if value block (elif value block)* (else block)?`
    fn parse_conditional(&mut self) -> Result<Instruction, ParseError> {
        let mut branches = vec![self.parse_branch()?];
        let mut else_block = None;

        loop {
            if self.eat_after_newlines(Keyword::Elif) {
                branches.push(self.parse_branch()?);
            } else if self.eat_after_newlines(Keyword::Else) {
                self.skip_newlines();
                else_block = Some(self.parse_block()?);
                break;
            } else {
                break;
            }
        }

        Ok(Instruction::Conditional {
            branches,
            else_block,
        })
    }

    fn parse_branch(&mut self) -> Result<Branch, ParseError> {
        let condition = self.parse_operand()?;
        self.skip_newlines();
        let block = self.parse_block()?;
        Ok(Branch { condition, block })
    }

    /// `while value block`
    fn parse_loop(&mut self) -> Result<Instruction, ParseError> {
        let condition = self.parse_operand()?;
        self.skip_newlines();
        let block = self.parse_block()?;
        Ok(Instruction::Loop { condition, block })
    }

    fn parse_operand(&mut self) -> Result<Operand, ParseError> {
        let operand = match self.peek() {
            Some(Token::Integer(n)) => Operand::Integer(*n),
            Some(Token::Float(x)) => Operand::Float(*x),
            Some(Token::Str(s)) => Operand::String(s.clone()),
            Some(Token::Ident(name)) => Operand::Identifier(name.clone()),
            _ => return Err(self.unexpected("a value")),
        };
        self.pos += 1;
        Ok(operand)
    }

    // ---- Token helpers ----

    fn peek(&self) -> Option<&Token> {
        self.lexemes.get(self.pos).map(|l| &l.token)
    }

    fn skip_newlines(&mut self) {
        while self.peek() == Some(&Token::Newline) {
            self.pos += 1;
        }
    }

    fn eat_keyword(&mut self, keyword: Keyword) -> bool {
        if self.peek() == Some(&Token::Keyword(keyword)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consume `keyword` if it is the next token after any line breaks.
    /// Leaves the position untouched otherwise.
    fn eat_after_newlines(&mut self, keyword: Keyword) -> bool {
        let saved = self.pos;
        self.skip_newlines();
        if self.eat_keyword(keyword) {
            true
        } else {
            self.pos = saved;
            false
        }
    }

    fn expect_ident(&mut self, expected: &'static str) -> Result<Name, ParseError> {
        match self.peek() {
            Some(Token::Ident(name)) => {
                let name = name.clone();
                self.pos += 1;
                Ok(name)
            }
            _ => Err(self.unexpected(expected)),
        }
    }

    fn unexpected(&self, expected: &'static str) -> ParseError {
        match self.lexemes.get(self.pos) {
            Some(lexeme) => ParseError::UnexpectedToken {
                line: lexeme.line,
                found: lexeme.token.describe(),
                expected,
            },
            None => ParseError::UnexpectedEnd {
                line: self.lexemes.last().map_or(1, |l| l.line),
                expected,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn parse(text: &str) -> Result<Vec<(Name, Block)>, ParseError> {
        let lexemes = tokenize(text)?;
        Parser::new(&lexemes).parse_program()
    }

    fn body(text: &str) -> Vec<Instruction> {
        let mut subs = parse(text).unwrap();
        assert_eq!(subs.len(), 1);
        subs.remove(0).1.instructions
    }

    #[test]
    fn empty_block() {
        assert_eq!(body("main do\nend"), vec![]);
        assert_eq!(body("main begin end"), vec![]);
    }

    #[test]
    fn single_line_block() {
        assert_eq!(body("main do stop end"), vec![Instruction::Stop]);
    }

    #[test]
    fn operand_forms() {
        assert_eq!(
            body("main do\npush 1\npush -2.5\npush \"s\"\npush x\nend"),
            vec![
                Instruction::Push(Operand::Integer(1)),
                Instruction::Push(Operand::Float(-2.5)),
                Instruction::Push(Operand::String("s".to_string())),
                Instruction::Push(Operand::ident("x")),
            ]
        );
    }

    #[test]
    fn assign_takes_value_then_target() {
        assert_eq!(
            body("main do\nassign 5 x\nend"),
            vec![Instruction::Assign {
                src: Operand::Integer(5),
                target: "x".to_string()
            }]
        );
    }

    #[test]
    fn bare_identifier_invokes() {
        assert_eq!(
            body("main do\nhelper\nend"),
            vec![Instruction::Invoke("helper".to_string())]
        );
    }

    #[test]
    fn conditional_with_elif_and_else() {
        let instrs = body(
            "main do\n\
             if a do\n print 1\n end\n\
             elif b do\n print 2\n end\n\
             else do\n print 3\n end\n\
             end",
        );
        match &instrs[..] {
            [Instruction::Conditional {
                branches,
                else_block: Some(else_block),
            }] => {
                assert_eq!(branches.len(), 2);
                assert_eq!(branches[0].condition, Operand::ident("a"));
                assert_eq!(branches[1].condition, Operand::ident("b"));
                assert_eq!(else_block.len(), 1);
            }
            other => panic!("unexpected parse: {other:?}"),
        }
    }

    #[test]
    fn block_may_start_on_next_line() {
        let instrs = body("main\ndo\nwhile x\ndo\nstop\nend\nend");
        assert!(matches!(&instrs[..], [Instruction::Loop { .. }]));
    }

    #[test]
    fn operand_must_be_on_same_line() {
        let err = parse("main do\npush\n1\nend").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedToken {
                line: 2,
                found: "end of line".to_string(),
                expected: "a value"
            }
        );
    }

    #[test]
    fn two_instructions_on_one_line_rejected() {
        let err = parse("main do\nstop stop\nend").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { line: 2, .. }));
    }

    #[test]
    fn keyword_cannot_be_a_target() {
        let err = parse("main do\npop end\nend").unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnexpectedToken {
                expected: "a variable name",
                ..
            }
        ));
    }

    #[test]
    fn missing_end_reports_end_of_input() {
        let err = parse("main do\nstop\n").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEnd { line: 2, .. }));
    }

    #[test]
    fn empty_source_has_no_subroutine() {
        let err = parse("").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedEnd {
                line: 1,
                expected: "subroutine name"
            }
        );
    }

    fn nested_ifs(depth: usize) -> String {
        let mut text = String::from("main do\n");
        for _ in 0..depth {
            text.push_str("if 1 do\n");
        }
        text.push_str("stop\n");
        for _ in 0..depth {
            text.push_str("end\n");
        }
        text.push_str("end\n");
        text
    }

    #[test]
    fn nesting_up_to_the_limit_parses() {
        assert!(parse(&nested_ifs(MAX_NESTING_DEPTH - 1)).is_ok());
    }

    #[test]
    fn nesting_past_the_limit_is_rejected() {
        let err = parse(&nested_ifs(MAX_NESTING_DEPTH)).unwrap_err();
        assert_eq!(
            err,
            ParseError::NestingTooDeep {
                line: MAX_NESTING_DEPTH + 1,
                limit: MAX_NESTING_DEPTH
            }
        );
    }

    #[test]
    fn multiple_subroutines() {
        let subs = parse("\n\nmain do\nhelper\nend\n\nhelper do\nstop\nend\n\n").unwrap();
        let names: Vec<_> = subs.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["main", "helper"]);
    }
}

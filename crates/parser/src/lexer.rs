//! Tokenizer for Imperivm source text.

use std::iter::Peekable;
use std::str::Chars;

use crate::error::ParseError;
use crate::keyword::Keyword;

/// A single token.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    /// A reserved word, in any letter case.
    Keyword(Keyword),
    /// A name: `[A-Za-z][A-Za-z0-9_]*`, case preserved.
    Ident(String),
    Integer(i64),
    Float(f64),
    /// String literal contents, escapes kept verbatim.
    Str(String),
    /// Line break. Instructions are separated by these.
    Newline,
}

impl Token {
    /// How the token reads in a diagnostic.
    pub(crate) fn describe(&self) -> String {
        match self {
            Token::Keyword(kw) => format!("'{}'", kw.text()),
            Token::Ident(name) => format!("'{name}'"),
            Token::Integer(n) => n.to_string(),
            Token::Float(x) => format!("{x:?}"),
            Token::Str(s) => format!("\"{s}\""),
            Token::Newline => "end of line".to_string(),
        }
    }
}

/// A token and the 1-based line it starts on.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Lexeme {
    pub token: Token,
    pub line: usize,
}

struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
}

/// Tokenize preprocessed source text.
pub(crate) fn tokenize(text: &str) -> Result<Vec<Lexeme>, ParseError> {
    let mut lexer = Lexer {
        chars: text.chars().peekable(),
        line: 1,
    };
    let mut lexemes = Vec::new();

    while let Some(&c) = lexer.chars.peek() {
        let line = lexer.line;
        let token = match c {
            '\n' => {
                lexer.chars.next();
                lexer.line += 1;
                Token::Newline
            }
            c if c.is_whitespace() => {
                lexer.chars.next();
                continue;
            }
            '"' => lexer.string()?,
            c if c.is_ascii_digit() || c == '-' => lexer.number()?,
            c if c.is_ascii_alphabetic() => lexer.word(),
            other => return Err(ParseError::InvalidCharacter { line, ch: other }),
        };
        lexemes.push(Lexeme { token, line });
    }

    Ok(lexemes)
}

impl Lexer<'_> {
    fn word(&mut self) -> Token {
        let mut text = String::new();
        while let Some(&c) = self.chars.peek() {
            if !(c.is_ascii_alphanumeric() || c == '_') {
                break;
            }
            text.push(c);
            self.chars.next();
        }
        match Keyword::lookup(&text) {
            Some(kw) => Token::Keyword(kw),
            None => Token::Ident(text),
        }
    }

    fn number(&mut self) -> Result<Token, ParseError> {
        let mut text = String::new();
        if self.chars.peek() == Some(&'-') {
            text.push('-');
            self.chars.next();
            if !self.chars.peek().is_some_and(|c| c.is_ascii_digit()) {
                return Err(ParseError::InvalidCharacter {
                    line: self.line,
                    ch: '-',
                });
            }
        }
        // Swallow trailing letters too so `12ab` is reported whole.
        while let Some(&c) = self.chars.peek() {
            if !(c.is_ascii_alphanumeric() || c == '_' || c == '.') {
                break;
            }
            text.push(c);
            self.chars.next();
        }
        parse_number(&text, self.line)
    }

    fn string(&mut self) -> Result<Token, ParseError> {
        let start = self.line;
        self.chars.next(); // opening quote
        let mut text = String::new();
        loop {
            match self.chars.next() {
                Some('"') => return Ok(Token::Str(text)),
                Some('\\') => {
                    text.push('\\');
                    match self.chars.next() {
                        Some('\n') | None => {
                            return Err(ParseError::UnterminatedString { line: start })
                        }
                        Some(c) => text.push(c),
                    }
                }
                Some(c) => {
                    if c == '\n' {
                        self.line += 1;
                    }
                    text.push(c);
                }
                None => return Err(ParseError::UnterminatedString { line: start }),
            }
        }
    }
}

/// Parse `-?(0|[1-9][0-9]*)(\.[0-9]+)?`.
fn parse_number(text: &str, line: usize) -> Result<Token, ParseError> {
    let invalid = || ParseError::InvalidNumber {
        line,
        token: text.to_string(),
    };

    let unsigned = text.strip_prefix('-').unwrap_or(text);
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (unsigned, None),
    };

    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(whole) || (whole.len() > 1 && whole.starts_with('0')) {
        return Err(invalid());
    }

    match fraction {
        Some(f) if all_digits(f) => text.parse().map(Token::Float).map_err(|_| invalid()),
        Some(_) => Err(invalid()),
        None => text.parse().map(Token::Integer).map_err(|_| invalid()),
    }
}

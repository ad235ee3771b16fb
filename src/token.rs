//! Token definitions for the K language
//!
//! This module defines all the tokens that the lexer can produce.

use crate::lexer::LexError;
use crate::span::Span;
use logos::Logos;

/// A token produced by the lexer
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Get the text of this token from source
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        self.span.text(source)
    }
}

/// All possible token types in the K language
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(error = LexError)]
#[logos(skip r"[ \t\n\r\v\f]+")] // Skip whitespace (CRLF handled by the source map)
#[logos(skip r"//[^\n\r]*")] // Skip line comments
pub enum TokenKind {
    // ============ Literals ============
    /// Number literal: digits with at most one interior decimal point.
    /// The malformed forms (leading dot, trailing dot, two dots) are caught
    /// by dedicated error patterns so they fail at lex time.
    #[regex(r"[0-9]+(\.[0-9]+)?", parse_number)]
    #[regex(r"[0-9]+\.[0-9]+\.[0-9.]*", |_| Err(LexError::MultipleDecimalPoints))]
    #[regex(r"[0-9]+\.", |_| Err(LexError::TrailingDecimalPoint))]
    #[regex(r"\.[0-9]*", |_| Err(LexError::LeadingDecimalPoint))]
    Number(f64),

    /// String literal: `"hello"`, one line, escapes processed.
    /// A string that reaches a newline or EOF before its closing quote only
    /// matches the open-ended pattern and fails as unterminated.
    #[regex(r#""([^"\\\n\r]|\\[^\n\r])*""#, unescape_string)]
    #[regex(r#""([^"\\\n\r]|\\[^\n\r])*"#, |_| Err(LexError::UnterminatedString))]
    Str(String),

    // ============ Keywords ============
    #[token("print")]
    Print,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    #[token("mut")]
    Mut,

    // ============ Operators ============
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,

    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,

    #[token("=")]
    Eq,

    // ============ Delimiters ============
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,

    // ============ Punctuation ============
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,

    // ============ Identifiers ============
    /// Identifier: `foo`, `_bar`, `total_2`. Non-ASCII characters are
    /// accepted as identifier characters.
    #[regex(r"([A-Za-z_]|[^\x00-\x7F])([A-Za-z0-9_]|[^\x00-\x7F])*")]
    Ident,

    // ============ Special ============
    /// End of file
    Eof,
}

fn parse_number(lex: &mut logos::Lexer<'_, TokenKind>) -> Result<f64, LexError> {
    lex.slice()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or(LexError::NumberOutOfRange)
}

fn unescape_string(lex: &mut logos::Lexer<'_, TokenKind>) -> Result<String, LexError> {
    let slice = lex.slice();
    let inner = &slice[1..slice.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.char_indices();
    while let Some((i, c)) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some((_, 'n')) => out.push('\n'),
            Some((_, 't')) => out.push('\t'),
            Some((_, 'r')) => out.push('\r'),
            Some((_, '\\')) => out.push('\\'),
            Some((_, '"')) => out.push('"'),
            // i indexes the backslash in `inner`; +2 lands on the bad
            // escape character within the quoted slice.
            _ => return Err(LexError::InvalidEscape { offset: i + 2 }),
        }
    }
    Ok(out)
}

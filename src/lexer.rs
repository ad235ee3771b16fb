//! Lexer for the K language
//!
//! The lexer converts source code into a stream of tokens. It uses the
//! `logos` crate for the actual scanning; this module wraps the generated
//! lexer so that every failure surfaces as a located [`Diagnostic`].

use crate::diagnostics::Diagnostic;
use crate::span::Span;
use crate::token::{Token, TokenKind};
use logos::Logos;
use thiserror::Error;

/// Lexer errors
#[derive(Error, Debug, Clone, PartialEq, Default)]
pub enum LexError {
    #[default]
    #[error("Unknown character")]
    UnexpectedCharacter,

    #[error("Unterminated string literal")]
    UnterminatedString,

    #[error("Invalid escape sequence in string literal")]
    InvalidEscape {
        /// Byte offset of the bad escape character within the token.
        offset: usize,
    },

    #[error("Invalid number format: multiple decimal points")]
    MultipleDecimalPoints,

    #[error("Invalid number format: number cannot end with decimal point")]
    TrailingDecimalPoint,

    #[error("Invalid number format: number cannot start with decimal point")]
    LeadingDecimalPoint,

    #[error("Invalid number format: literal out of range")]
    NumberOutOfRange,
}

/// The lexer for the K language
pub struct Lexer<'src> {
    source: &'src str,
    inner: logos::Lexer<'src, TokenKind>,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source code
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            inner: TokenKind::lexer(source),
        }
    }

    /// Get the source code
    pub fn source(&self) -> &'src str {
        self.source
    }

    /// Get the next token. Once the input is exhausted this keeps returning
    /// an EOF token positioned at the end of the buffer.
    pub fn next_token(&mut self) -> Result<Token, Diagnostic> {
        match self.inner.next() {
            Some(Ok(kind)) => {
                let span = self.inner.span();
                Ok(Token::new(kind, Span::new(span.start, span.end)))
            }
            Some(Err(err)) => {
                let span = self.inner.span();
                Err(self.diagnostic_for(err, Span::new(span.start, span.end)))
            }
            None => {
                let pos = self.source.len();
                Ok(Token::new(TokenKind::Eof, Span::new(pos, pos)))
            }
        }
    }

    /// Collect all tokens up to and including EOF.
    pub fn tokenize(mut self) -> Result<Vec<Token>, Diagnostic> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn diagnostic_for(&self, err: LexError, span: Span) -> Diagnostic {
        match err {
            LexError::UnexpectedCharacter => Diagnostic::error(
                format!("Unknown character: {}", span.text(self.source)),
                span,
            ),
            // The original position of the fault: just past the last
            // character read for an unterminated string, on the offending
            // character for a bad escape.
            LexError::UnterminatedString => Diagnostic::error(err.to_string(), Span::point(span.end)),
            LexError::InvalidEscape { offset } => {
                Diagnostic::error(err.to_string(), Span::point(span.start + offset))
            }
            _ => Diagnostic::error(err.to_string(), span),
        }
    }
}

/// Helper function to lex source code
pub fn lex(source: &str) -> Result<Vec<Token>, Diagnostic> {
    Lexer::new(source).tokenize()
}

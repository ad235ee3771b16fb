//! Compile error reporting
//!
//! Every stage of the pipeline fails with a [`Diagnostic`]: a message plus
//! the span it applies to, optionally extended with notes (which may point at
//! another location) and a help hint. [`render`] turns one into the
//! user-facing form:
//!
//! ```text
//! file.k:3:5: error: Cannot reassign to immutable variable 'x'
//! x = 2;
//! ^
//! note: first assignment here: file.k:1:1
//! help: consider making this binding mutable: 'mut x'
//! ```

use crate::source::SourceMap;
use crate::span::Span;

/// A compile-time error with a location, rendered to stderr with a
/// caret-underlined source snippet.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub message: String,
    pub span: Span,
    pub notes: Vec<Note>,
    pub help: Option<String>,
}

/// An auxiliary line attached to a diagnostic, optionally referencing a
/// second source location (e.g. the first assignment of a variable).
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub message: String,
    pub span: Option<Span>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            notes: Vec::new(),
            help: None,
        }
    }

    pub fn with_note(mut self, message: impl Into<String>, span: Option<Span>) -> Self {
        self.notes.push(Note {
            message: message.into(),
            span,
        });
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

/// Format a diagnostic against the source it came from.
///
/// The caret sits under the start of the diagnostic's span. An empty source
/// line suppresses the snippet and caret.
pub fn render(diag: &Diagnostic, map: &SourceMap) -> String {
    let pos = map.position(diag.span.start);
    let mut out = format!(
        "{}:{}:{}: error: {}\n",
        map.name(),
        pos.line,
        pos.column,
        diag.message
    );

    if let Some(line) = map.line(pos.line) {
        if !line.is_empty() {
            out.push_str(line);
            out.push('\n');
            for _ in 1..pos.column {
                out.push(' ');
            }
            out.push_str("^\n");
        }
    }

    for note in &diag.notes {
        match note.span {
            Some(span) => {
                let p = map.position(span.start);
                out.push_str(&format!(
                    "note: {}: {}:{}:{}\n",
                    note.message,
                    map.name(),
                    p.line,
                    p.column
                ));
            }
            None => out.push_str(&format!("note: {}\n", note.message)),
        }
    }
    if let Some(help) = &diag.help {
        out.push_str(&format!("help: {}\n", help));
    }

    out
}

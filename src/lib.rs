//! K Language Compiler
//!
//! Compiler front end for the K arithmetic language (`.k` files): source is
//! lexed, parsed, checked, and lowered to LLVM textual IR.
//!
//! # Architecture
//!
//! ```text
//! Source Code (.k)
//!       │
//!       ▼
//! ┌─────────────┐
//! │    Lexer    │  → Tokens
//! └─────────────┘
//!       │
//!       ▼
//! ┌─────────────┐
//! │   Parser    │  → AST
//! └─────────────┘
//!       │
//!       ▼
//! ┌─────────────┐
//! │   Checker   │  → assignment resolutions
//! └─────────────┘
//!       │
//!       ▼
//! ┌─────────────┐
//! │  Code Gen   │  → LLVM IR
//! └─────────────┘
//! ```
//!
//! Any stage's failure aborts the pipeline with a single [`Diagnostic`].

pub mod ast;
pub mod codegen;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod source;
pub mod span;
pub mod token;
pub mod typeck;

// Re-exports for convenience
pub use diagnostics::Diagnostic;
pub use lexer::Lexer;
pub use source::SourceMap;
pub use span::{Position, Span};
pub use token::{Token, TokenKind};

/// Compiler version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// File extension for K source files
pub const FILE_EXTENSION: &str = "k";

/// Compile one source file to LLVM IR text.
///
/// The module is named `module_id`; its `source_filename` is the source
/// map's file name.
pub fn compile(map: &SourceMap, module_id: &str) -> Result<String, Diagnostic> {
    let program = parser::parse(map.text())?;
    let checked = typeck::check_program(&program)?;

    let context = inkwell::context::Context::create();
    let mut codegen = codegen::Codegen::new(&context, module_id, map.name())
        .with_assign_kinds(checked.assign_kinds);
    codegen.compile_program(&program)?;
    Ok(codegen.print_to_string())
}

//! K Language Compiler CLI
//!
//! The `kc` command compiles one `.k` source file to LLVM textual IR.
//! Compile errors render to stderr with a caret-annotated snippet; I/O and
//! usage errors get a short one-line message. Exit code is 0 on success and
//! 1 on any failure.

use anyhow::{bail, Context as _};
use clap::Parser;
use klang::{diagnostics, SourceMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "kc")]
#[command(version = klang::VERSION)]
#[command(about = "LLVM-based compiler for the K arithmetic language", long_about = None)]
struct Cli {
    /// Input file to compile (.k)
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Output file for the generated LLVM IR
    #[arg(short, long, value_name = "FILE", default_value = "a.ll")]
    output: PathBuf,
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        eprintln!("error: {err:#}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    if cli.input.extension().and_then(|e| e.to_str()) != Some(klang::FILE_EXTENSION) {
        bail!(
            "input file must have a .{} extension: {}",
            klang::FILE_EXTENSION,
            cli.input.display()
        );
    }

    let text = fs::read_to_string(&cli.input)
        .with_context(|| format!("cannot read {}", cli.input.display()))?;
    let map = SourceMap::new(cli.input.display().to_string(), text);

    let ir = match klang::compile(&map, &module_id(&cli.input)) {
        Ok(ir) => ir,
        Err(diag) => {
            eprint!("{}", diagnostics::render(&diag, &map));
            process::exit(1);
        }
    };

    fs::write(&cli.output, ir)
        .with_context(|| format!("cannot write {}", cli.output.display()))?;

    println!("IR이 생성되었습니다: {}", cli.output.display());
    Ok(())
}

/// Derive the LLVM module id from the input path: extension stripped, path
/// separators mapped to dots, no leading dot.
fn module_id(path: &Path) -> String {
    let stem = path.with_extension("");
    let id: String = stem
        .to_string_lossy()
        .chars()
        .map(|c| if c == '/' || c == '\\' { '.' } else { c })
        .collect();
    id.trim_start_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_id() {
        assert_eq!(module_id(Path::new("input.k")), "input");
        assert_eq!(module_id(Path::new("dir/sub/input.k")), "dir.sub.input");
        assert_eq!(module_id(Path::new("./input.k")), "input");
    }
}

//! `chtlc`: the CHTL compiler CLI. Reads a `.chtl` file, compiles it, and
//! writes the resulting HTML document, or prints diagnostics and exits
//! non-zero.

use std::path::PathBuf;
use std::process;

use clap::Parser;

use chtl_compiler::CompilerConfig;
use chtl_compiler_cli::{compile_file, format_diagnostic};

#[derive(Parser)]
#[command(name = "chtlc", version, about = "CHTL compiler")]
struct Cli {
    /// Path to the .chtl source file.
    input: PathBuf,

    /// Output HTML path (defaults to the input path with a .html extension).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Emit structured trace on classification decisions and token emission.
    #[arg(long)]
    debug: bool,

    /// Module search path entries, consumed by the import subsystem.
    #[arg(short = 'I', long = "module-path")]
    module_path: Vec<String>,

    /// Treat unresolved module paths as a hard error.
    #[arg(long)]
    strict: bool,
}

fn main() {
    let cli = Cli::parse();

    let mut config = CompilerConfig {
        debug: cli.debug,
        strict: cli.strict,
        ..CompilerConfig::default()
    };
    config.set_module_paths(cli.module_path);

    let input_display = cli.input.display().to_string();

    match compile_file(&cli.input, cli.output.as_deref(), &config) {
        Ok(result) => {
            for diag in &result.diagnostics {
                eprintln!("{}", format_diagnostic(&input_display, diag));
            }
            match result.output_path {
                Some(path) => println!("wrote {}", path.display()),
                None => process::exit(1),
            }
        }
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    }
}

//! Jmm compiler driver
//!
//! Reads a typed AST (JSON node tree) and an optional symbol table, then
//! prints the IR listing or writes the Jasmin assembly.

mod commands;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "jmmc")]
#[command(about = "Jmm compiler backend: AST to IR to Jasmin", long_about = None)]
#[command(version)]
struct Cli {
    /// Compiler options file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// When to use colors
    #[arg(long, global = true, value_parser = ["auto", "always", "never"])]
    color: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the IR listing of a program
    Ir {
        /// AST file (JSON)
        input: PathBuf,
        /// Symbol table file (JSON); derived from the AST when omitted
        #[arg(long)]
        symbols: Option<PathBuf>,
    },

    /// Compile a program to Jasmin
    Build {
        /// AST file (JSON)
        input: PathBuf,
        /// Symbol table file (JSON); derived from the AST when omitted
        #[arg(long)]
        symbols: Option<PathBuf>,
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// What to emit
        #[arg(long, value_enum, default_value_t = Emit::Jasmin)]
        emit: Emit,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Emit {
    Ir,
    Jasmin,
    Both,
}

fn init_logging(verbose: u8) {
    use tracing_subscriber::{fmt, EnvFilter};

    // JMMC_LOG wins over -v
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env("JMMC_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let choice = output::resolve_color_choice(cli.color.as_deref());
    let mut out = output::StyledOutput::new(choice);

    let result = match cli.command {
        Commands::Ir { input, symbols } => {
            commands::ir::execute(&input, symbols.as_deref(), cli.config.as_deref())
        }
        Commands::Build {
            input,
            symbols,
            output,
            emit,
        } => commands::build::execute(
            &input,
            symbols.as_deref(),
            cli.config.as_deref(),
            output.as_deref(),
            emit,
            &mut out,
        ),
    };

    if let Err(e) = result {
        out.stderr_error("error");
        out.stderr_plain(&format!(": {:#}\n", e));
        std::process::exit(1);
    }
}

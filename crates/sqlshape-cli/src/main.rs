//! sqlshape CLI
//!
//! Command-line tool for inspecting how SQL is tokenized and parsed.

use std::fmt::Debug;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use sqlshape_core::{parse_all, StatementSlice, Tokenizer};

/// Inspect SQL tokens, statements and syntax trees.
#[derive(Parser)]
#[command(name = "sqlshape")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// SQL file to read, `-` for stdin.
    #[arg(short, long, env = "SQLSHAPE_INPUT", default_value = "-")]
    input: PathBuf,

    /// Output format.
    #[arg(short, long, env = "SQLSHAPE_FORMAT", value_enum, default_value_t = Format::Debug)]
    format: Format,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Rust debug formatting.
    Debug,
    /// Pretty-printed JSON.
    Json,
}

#[derive(Debug, PartialEq, Eq, Subcommand)]
enum Commands {
    /// Print the tokens of every statement.
    Tokens,

    /// Print statement slices: tokens, offsets and carried comments.
    Statements,

    /// Print the syntax tree of every statement.
    Ast,

    /// Print every statement rendered back to SQL.
    Render,
}

fn read_input(input: &Path) -> anyhow::Result<String> {
    if input.as_os_str() == "-" {
        let mut sql = String::new();
        std::io::stdin()
            .read_to_string(&mut sql)
            .context("failed to read SQL from stdin")?;
        return Ok(sql);
    }
    std::fs::read_to_string(input).with_context(|| format!("failed to read {}", input.display()))
}

fn emit<T: Serialize + Debug>(format: Format, value: &T) -> anyhow::Result<()> {
    match format {
        Format::Debug => println!("{value:#?}"),
        Format::Json => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}

fn read_slices(sql: &str) -> anyhow::Result<Vec<StatementSlice>> {
    let slices = Tokenizer::new(sql)
        .statements()
        .collect::<Result<Vec<_>, _>>()?;
    debug!(count = slices.len(), "read statement slices");
    Ok(slices)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so JSON output stays clean.
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let sql = read_input(&cli.input)?;
    debug!(bytes = sql.len(), input = %cli.input.display(), "read input");

    match cli.command {
        Commands::Tokens => {
            let tokens: Vec<_> = read_slices(&sql)?
                .into_iter()
                .map(|slice| slice.tokens)
                .collect();
            emit(cli.format, &tokens)?;
        }

        Commands::Statements => {
            emit(cli.format, &read_slices(&sql)?)?;
        }

        Commands::Ast => {
            let statements = parse_all(&sql).map_err(|err| anyhow::anyhow!(err.render(&sql)))?;
            info!("Parsed {} statement(s).", statements.len());
            emit(cli.format, &statements)?;
        }

        Commands::Render => {
            let statements = parse_all(&sql).map_err(|err| anyhow::anyhow!(err.render(&sql)))?;
            for parsed in &statements {
                for comment in &parsed.leading_comments {
                    println!("/* {comment} */");
                }
                println!("{};", parsed.statement);
                for comment in &parsed.trailing_comments {
                    println!("/* {comment} */");
                }
            }
        }
    }

    Ok(())
}

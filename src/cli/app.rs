//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};

use super::edit;
use super::modflag::ModFlag;
use super::output::{Output, OutputFormat};
use crate::domain::EscapeKind;
use crate::storage::{Config, Document, DEFAULT_SEPARATOR};

#[derive(Parser)]
#[command(name = "cfgfile")]
#[command(author, version, about = "Edit key/value configuration files from the command line")]
pub struct Cli {
    /// How to escape config values [default: none]
    #[arg(long, short = 'e', env = "CFGFILE_ESCAPE", value_enum)]
    pub escape: Option<EscapeKind>,

    /// Key/value separator [default: '=']
    #[arg(long, short = 's', env = "CFGFILE_SEPARATOR", value_parser = parse_separator)]
    pub separator: Option<String>,

    /// Create the modflag file if the file has been modified
    #[arg(long)]
    pub modflag: bool,

    /// Do not delete the modflag file before running (chains several edits)
    #[arg(long, requires = "modflag")]
    pub keepflag: bool,

    /// Location of the modflag file [default: <temp dir>/modflag]
    #[arg(long, env = "CFGFILE_MODFLAG")]
    pub modflag_path: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', value_enum)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Configuration file to edit
    pub file: PathBuf,

    #[command(subcommand)]
    pub action: Action,
}

#[derive(Subcommand)]
pub enum Action {
    /// Set one or more keys, then save once
    Set {
        /// Alternating keys and values: KEY VALUE [KEY VALUE...]
        #[arg(required = true, num_args = 2.., allow_hyphen_values = true, value_names = ["KEY", "VALUE"])]
        pairs: Vec<String>,
    },

    /// Print the value of a key
    Get {
        key: String,

        /// Printed when the key is missing
        #[arg(allow_hyphen_values = true)]
        default: Option<String>,
    },

    /// Delete one or more keys, then save once
    Del {
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// Print all keys
    Keylist,
}

fn parse_separator(s: &str) -> Result<String, String> {
    if s.is_empty() {
        Err("separator must not be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Action::Set { pairs } = &cli.action {
        if pairs.len() % 2 != 0 {
            Cli::command()
                .error(
                    ErrorKind::WrongNumberOfValues,
                    format!("'set' expects KEY VALUE pairs, got {} arguments", pairs.len()),
                )
                .exit();
        }
    }

    let config = Config::load()?;
    let output = Output::new(cli.format.unwrap_or(config.default_format), cli.verbose);

    let escape = cli.escape.or(config.escape).unwrap_or_default();
    let separator = cli
        .separator
        .or_else(|| config.separator.clone())
        .unwrap_or_else(|| DEFAULT_SEPARATOR.to_string());
    output.verbose_ctx(
        "config",
        &format!("escape={}, separator={:?}", escape, separator),
    );

    let modflag = cli.modflag.then(|| {
        ModFlag::new(
            cli.modflag_path
                .clone()
                .unwrap_or_else(|| config.modflag_path()),
        )
    });
    if let Some(flag) = &modflag {
        if !cli.keepflag && flag.clear()? {
            output.verbose_ctx("modflag", &format!("Removed {}", flag.path().display()));
        }
    }

    let mut document = Document::new()
        .with_separator(separator)
        .with_escape(escape);
    document.load(&cli.file)?;
    output.verbose_ctx(
        "load",
        &format!("Loaded {} key(s) from {}", document.len(), cli.file.display()),
    );

    let editor = edit::Editor {
        document: &mut document,
        path: &cli.file,
        modflag: modflag.as_ref(),
        output: &output,
    };

    match cli.action {
        Action::Set { pairs } => editor.set(&pairs)?,
        Action::Get { key, default } => editor.get(&key, default.as_deref().unwrap_or("")),
        Action::Del { keys } => editor.del(&keys)?,
        Action::Keylist => editor.keylist(),
    }

    output.verbose("Command completed successfully");
    Ok(())
}

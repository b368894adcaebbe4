//! Interactive shell over an in-memory virtual file system.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use vfs_tree::TreeFS;
use vfs_tree::logging::{LoggingConfig, init_logging};
use vfs_tree::shell::{Shell, ShellConfig};

#[derive(Debug, Parser)]
#[command(name = "vfs-shell", version, about = "Shell over an in-memory virtual file system")]
struct Cli {
    /// Read commands from this file instead of stdin
    #[arg(long, value_name = "FILE")]
    script: Option<PathBuf>,

    /// Suppress the banner and the prompt
    #[arg(short, long)]
    quiet: bool,

    /// Log level written to stderr (trace, debug, info, warn, error, off)
    #[arg(long, env = "VFS_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    /// Spaces per nesting level in toJson output
    #[arg(long, value_name = "N", default_value_t = 4)]
    indent: usize,
}

impl Cli {
    fn shell_config(&self) -> ShellConfig {
        let base = if self.quiet || self.script.is_some() {
            ShellConfig::quiet()
        } else {
            ShellConfig::default()
        };
        ShellConfig {
            json_indent: self.indent,
            ..base
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    init_logging(&LoggingConfig {
        level: cli.log_level.clone(),
        ..LoggingConfig::default()
    })?;

    let mut shell = Shell::new(TreeFS::new(), cli.shell_config());
    match &cli.script {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("cannot open script {}", path.display()))?;
            shell.run(BufReader::new(file), io::stdout().lock(), io::stderr())
        }
        None => shell.run(io::stdin().lock(), io::stdout().lock(), io::stderr()),
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

//! Line-oriented interactive shell over any [`FsBackend`].
//!
//! The shell owns its backend, reads one command per line and writes results to an output
//! stream. File system failures are reported on the error stream as `Error: <message>` and the
//! loop keeps going; only `exit`, `quit` or the end of input stop it.

mod command;

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use thiserror::Error;
use tracing::{debug, info};

use crate::core::{FsBackend, FsError, Mapping};
pub use command::{Command, Redirect, tokenize};

/// Failure of a single shell input line.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("Invalid command")]
    UnknownCommand(String),

    #[error("Invalid arguments")]
    InvalidArguments,

    /// Flag placed somewhere other than the first or last argument.
    #[error("invalid operation: invalid command for {0} operation")]
    Usage(&'static str),

    #[error(transparent)]
    Fs(#[from] FsError),

    /// Failure outside the virtual tree, such as writing an export file.
    #[error(transparent)]
    Host(#[from] anyhow::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Presentation settings of a [`Shell`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    /// Print `[<cwd>] $ ` before reading each line.
    pub prompt: bool,
    /// Print a greeting before the first prompt.
    pub banner: bool,
    /// Spaces per nesting level in `toJson` output.
    pub json_indent: usize,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: true,
            banner: true,
            json_indent: 4,
        }
    }
}

impl ShellConfig {
    /// No prompt and no banner, for scripts and tests.
    pub fn quiet() -> Self {
        Self {
            prompt: false,
            banner: false,
            ..Self::default()
        }
    }
}

/// Whether the read loop should go on after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Interactive front end that drives a backend from text commands.
///
/// The shell owns the backend (`fs`) and its presentation settings (`config`). It holds no
/// state of its own beyond those, so the cwd shown in the prompt is always the backend's.
pub struct Shell<B: FsBackend> {
    fs: B,
    config: ShellConfig,
}

impl<B: FsBackend> Shell<B> {
    pub fn new(fs: B, config: ShellConfig) -> Self {
        Self { fs, config }
    }

    pub fn fs(&self) -> &B {
        &self.fs
    }

    pub fn into_inner(self) -> B {
        self.fs
    }

    pub fn prompt(&self) -> String {
        format!("[{}] $ ", self.fs.cwd_name())
    }

    /// Runs the read loop until `exit`/`quit` or the end of `input`.
    ///
    /// Command output goes to `out`, failures to `err`. Only I/O errors on the streams
    /// themselves end the loop with an error.
    pub fn run<R, W, E>(&mut self, input: R, mut out: W, mut err: E) -> anyhow::Result<()>
    where
        R: BufRead,
        W: Write,
        E: Write,
    {
        info!(prompt = self.config.prompt, "shell started");
        if self.config.banner {
            writeln!(out, "Virtual file system shell. Type 'exit' to quit.")?;
        }

        let mut lines = input.lines();
        loop {
            if self.config.prompt {
                write!(out, "{}", self.prompt())?;
                out.flush()?;
            }
            let Some(line) = lines.next() else { break };
            let line = line.context("failed to read input line")?;

            match self.execute(&line, &mut out) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => break,
                Err(e) => self.report(e, &mut out, &mut err)?,
            }
        }
        if self.config.prompt {
            writeln!(out)?;
        }
        info!("shell stopped");
        Ok(())
    }

    /// Parses and runs a single input line, writing its output to `out`.
    pub fn execute<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Flow, ShellError> {
        let Some(command) = Command::parse(&tokenize(line))? else {
            return Ok(Flow::Continue);
        };
        debug!(?command, "executing");

        match command {
            Command::Pwd => writeln!(out, "{}", self.fs.pwd())?,
            Command::Cd(path) => self.fs.cd(&path)?,
            Command::Ls(path) => {
                let names = self.fs.ls(path.as_deref())?;
                if !names.is_empty() {
                    writeln!(out, "{}", names.join(" "))?;
                }
            }
            Command::Mkdir(name) => self.fs.mkdir(&name)?,
            Command::Rmdir { name, recursive } => self.fs.rmdir(&name, recursive)?,
            Command::Rm(name) => self.fs.rm(&name)?,
            Command::Touch(names) => self.fs.touch(&names)?,
            Command::Echo { text, redirect } => match redirect {
                Some(Redirect { file, append }) => self.fs.write(&file, &text, append)?,
                None => writeln!(out, "{text}")?,
            },
            Command::Cat(name) => {
                let content = self.fs.read(&name)?;
                write!(out, "{content}")?;
                if !content.is_empty() && !content.ends_with('\n') {
                    writeln!(out)?;
                }
            }
            Command::Cp {
                src,
                dst,
                recursive,
            } => self.fs.cp(&src, &dst, recursive)?,
            Command::Mv {
                src,
                dst,
                recursive,
            } => self.fs.mv(&src, &dst, recursive)?,
            Command::Grep {
                path,
                pattern,
                recursive,
            } => match self.fs.search(&path, &pattern, recursive)? {
                Some(found) => {
                    for name in found {
                        writeln!(out, "{name}")?;
                    }
                }
                None => writeln!(out, "Pattern not found")?,
            },
            Command::ToJson { path, output } => {
                let mapping = self.fs.to_mapping(&path)?;
                export_json(&mapping, &output, self.config.json_indent)?;
                writeln!(out, "Saved '{}' to {}", path, output.display())?;
            }
            Command::Exit => return Ok(Flow::Exit),
        }
        Ok(Flow::Continue)
    }

    fn report<W: Write, E: Write>(
        &self,
        error: ShellError,
        out: &mut W,
        err: &mut E,
    ) -> io::Result<()> {
        debug!(%error, "command failed");
        match &error {
            ShellError::UnknownCommand(_) | ShellError::InvalidArguments => {
                writeln!(out, "{error}")
            }
            ShellError::Host(e) => writeln!(err, "Error: {e:#}"),
            _ => writeln!(err, "Error: {error}"),
        }
    }
}

/// Writes `mapping` as pretty JSON with `indent` spaces per level.
fn export_json(mapping: &Mapping, output: &Path, indent: usize) -> anyhow::Result<()> {
    let indent = vec![b' '; indent];
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(&indent));
    mapping
        .serialize(&mut ser)
        .context("failed to serialize tree")?;
    buf.push(b'\n');

    fs::write(output, &buf)
        .with_context(|| format!("cannot write output file {}", output.display()))?;
    debug!(path = %output.display(), bytes = buf.len(), "exported json");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TreeFS;
    use tempdir::TempDir;

    fn shell() -> Shell<TreeFS> {
        Shell::new(TreeFS::new(), ShellConfig::quiet())
    }

    /// Runs `script` and returns (stdout, stderr).
    fn run_script(shell: &mut Shell<TreeFS>, script: &str) -> (String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        shell.run(script.as_bytes(), &mut out, &mut err).unwrap();
        (
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn test_prompt_shows_cwd_name() {
        let mut sh = shell();
        assert_eq!(sh.prompt(), "[] $ ");
        let mut out = Vec::new();
        sh.execute("mkdir home", &mut out).unwrap();
        sh.execute("cd home", &mut out).unwrap();
        assert_eq!(sh.prompt(), "[home] $ ");
    }

    #[test]
    fn test_session() {
        let mut sh = shell();
        let (out, err) = run_script(
            &mut sh,
            "mkdir docs\n\
             cd docs\n\
             echo buy milk > todo.txt\n\
             echo and eggs >> todo.txt\n\
             cat todo.txt\n\
             pwd\n\
             cd ..\n\
             ls\n\
             grep -r / milk\n\
             grep / nothing\n",
        );
        assert_eq!(err, "");
        assert_eq!(
            out,
            "buy milk\nand eggs\n/docs\ndocs\n/docs/todo.txt\nPattern not found\n"
        );
    }

    #[test]
    fn test_errors_do_not_stop_the_loop() {
        let mut sh = shell();
        let (out, err) = run_script(&mut sh, "cd nowhere\nfrobnicate\npwd x\nmkdir a\nls\n");
        assert_eq!(err, "Error: directory 'nowhere' does not exist\n");
        assert_eq!(out, "Invalid command\nInvalid arguments\na\n");
    }

    #[test]
    fn test_exit_stops_reading() {
        let mut sh = shell();
        let (_, _) = run_script(&mut sh, "mkdir a\nexit\nmkdir b\n");
        assert_eq!(sh.fs().ls(None).unwrap(), vec!["a"]);
    }

    #[test]
    fn test_prompt_and_banner() {
        let mut sh = Shell::new(TreeFS::new(), ShellConfig::default());
        let (out, _) = run_script(&mut sh, "pwd\n");
        assert!(out.starts_with("Virtual file system shell."));
        assert!(out.contains("[] $ /\n[] $ "));
    }

    #[test]
    fn test_echo_missing_target() {
        let mut sh = shell();
        let (_, err) = run_script(&mut sh, "echo text >\n");
        assert_eq!(
            err,
            "Error: invalid operation: no file specified for redirection\n"
        );
    }

    #[test]
    fn test_rmdir_options() {
        let mut sh = shell();
        let (_, err) = run_script(
            &mut sh,
            "mkdir a\ncd a\ntouch f\ncd ..\nrmdir a\nrmdir a -f\nrmdir -r a\n",
        );
        assert_eq!(
            err,
            "Error: directory 'a' is not empty\nError: invalid option: -f\n"
        );
        assert!(sh.fs().ls(None).unwrap().is_empty());
    }

    #[test]
    fn test_to_json_writes_file() {
        let tmp = TempDir::new("vfs-shell").unwrap();
        let target = tmp.path().join("tree.json");

        let mut sh = shell();
        let script = format!(
            "mkdir a\ncd a\necho hi > f.txt\ncd /\ntoJson / > {}\n",
            target.display()
        );
        let (_, err) = run_script(&mut sh, &script);
        assert_eq!(err, "");

        let text = std::fs::read_to_string(&target).unwrap();
        assert!(text.contains("\n    \"a\": {"));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value, serde_json::json!({ "a": { "f.txt": "hi\n" } }));
    }

    #[test]
    fn test_to_json_reports_host_failure() {
        let tmp = TempDir::new("vfs-shell").unwrap();
        let target = tmp.path().join("missing").join("tree.json");

        let mut sh = shell();
        let (_, err) = run_script(&mut sh, &format!("toJson / > {}\n", target.display()));
        assert!(err.starts_with("Error: cannot write output file"));
    }
}

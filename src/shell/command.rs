//! Parsing of shell input lines into commands.

use std::path::PathBuf;

use crate::core::{FsError, Violation};
use crate::shell::ShellError;

const RECURSIVE_FLAG: &str = "-r";

/// Target of an `echo` redirection (`> file` or `>> file`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub file: String,
    pub append: bool,
}

/// A fully parsed shell command with its arguments checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Pwd,
    Cd(String),
    Ls(Option<String>),
    Mkdir(String),
    Rmdir { name: String, recursive: bool },
    Rm(String),
    Touch(Vec<String>),
    Echo { text: String, redirect: Option<Redirect> },
    Cat(String),
    Cp { src: String, dst: String, recursive: bool },
    Mv { src: String, dst: String, recursive: bool },
    Grep { path: String, pattern: String, recursive: bool },
    ToJson { path: String, output: PathBuf },
    Exit,
}

/// Splits an input line into whitespace separated tokens.
pub fn tokenize(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

impl Command {
    /// Builds a command from its tokens; the first token is the command name.
    ///
    /// Returns `Ok(None)` for an empty line.
    pub fn parse(tokens: &[&str]) -> Result<Option<Command>, ShellError> {
        let Some((&name, args)) = tokens.split_first() else {
            return Ok(None);
        };

        let command = match (name, args) {
            ("pwd", []) => Command::Pwd,
            ("cd", [path]) => Command::Cd(owned(path)),
            ("ls", []) => Command::Ls(None),
            ("ls", [path]) => Command::Ls(Some(owned(path))),
            ("mkdir", [dir]) => Command::Mkdir(owned(dir)),
            ("rmdir", [dir]) => Command::Rmdir {
                name: owned(dir),
                recursive: false,
            },
            ("rmdir", [first, second]) => Self::parse_rmdir(first, second)?,
            ("rm", [file]) => Command::Rm(owned(file)),
            ("touch", names) if !names.is_empty() => {
                Command::Touch(names.iter().map(|s| s.to_string()).collect())
            }
            ("echo", words) if !words.is_empty() => Self::parse_echo(words)?,
            ("cat", [file]) => Command::Cat(owned(file)),
            ("cp", args) if matches!(args.len(), 2 | 3) => {
                let (src, dst, recursive) = split_flag(args, "copy")?;
                Command::Cp { src, dst, recursive }
            }
            ("mv", args) if matches!(args.len(), 2 | 3) => {
                let (src, dst, recursive) = split_flag(args, "move")?;
                Command::Mv { src, dst, recursive }
            }
            ("grep", args) if matches!(args.len(), 2 | 3) => {
                let (path, pattern, recursive) = split_flag(args, "grep")?;
                Command::Grep {
                    path,
                    pattern,
                    recursive,
                }
            }
            ("toJson", [path, ">", output]) => Command::ToJson {
                path: owned(path),
                output: PathBuf::from(output),
            },
            ("exit" | "quit", []) => Command::Exit,
            (
                "pwd" | "cd" | "ls" | "mkdir" | "rmdir" | "rm" | "touch" | "echo" | "cat" | "cp"
                | "mv" | "grep" | "toJson" | "exit" | "quit",
                _,
            ) => return Err(ShellError::InvalidArguments),
            (other, _) => return Err(ShellError::UnknownCommand(other.to_string())),
        };
        Ok(Some(command))
    }

    /// `rmdir <name> -r` and `rmdir -r <name>` are both accepted.
    fn parse_rmdir(first: &str, second: &str) -> Result<Command, ShellError> {
        let name = match (first, second) {
            (name, RECURSIVE_FLAG) => name,
            (RECURSIVE_FLAG, name) => name,
            (_, option) => return Err(FsError::InvalidOption(option.to_string()).into()),
        };
        Ok(Command::Rmdir {
            name: name.to_string(),
            recursive: true,
        })
    }

    fn parse_echo(words: &[&str]) -> Result<Command, ShellError> {
        let Some(pos) = words.iter().position(|w| matches!(*w, ">" | ">>")) else {
            return Ok(Command::Echo {
                text: words.join(" "),
                redirect: None,
            });
        };

        let file = words
            .get(pos + 1)
            .ok_or(FsError::InvalidOperation(Violation::MissingRedirectTarget))?;
        Ok(Command::Echo {
            text: words[..pos].join(" "),
            redirect: Some(Redirect {
                file: file.to_string(),
                append: words[pos] == ">>",
            }),
        })
    }
}

fn owned(s: &str) -> String {
    s.to_string()
}

/// Two positional arguments plus an optional `-r` in first or last position.
fn split_flag(args: &[&str], what: &'static str) -> Result<(String, String, bool), ShellError> {
    match args {
        [a, b] => Ok((a.to_string(), b.to_string(), false)),
        [RECURSIVE_FLAG, a, b] | [a, b, RECURSIVE_FLAG] => {
            Ok((a.to_string(), b.to_string(), true))
        }
        _ => Err(ShellError::Usage(what)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<Option<Command>, ShellError> {
        Command::parse(&tokenize(line))
    }

    #[test]
    fn test_empty_line() {
        assert!(matches!(parse("   "), Ok(None)));
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse("pwd").unwrap(), Some(Command::Pwd));
        assert_eq!(parse("cd ..").unwrap(), Some(Command::Cd("..".into())));
        assert_eq!(parse("ls").unwrap(), Some(Command::Ls(None)));
        assert_eq!(
            parse("ls  /a ").unwrap(),
            Some(Command::Ls(Some("/a".into())))
        );
        assert_eq!(
            parse("touch a b").unwrap(),
            Some(Command::Touch(vec!["a".into(), "b".into()]))
        );
    }

    #[test]
    fn test_rmdir_flag_positions() {
        let expected = Some(Command::Rmdir {
            name: "d".into(),
            recursive: true,
        });
        assert_eq!(parse("rmdir d -r").unwrap(), expected);
        assert_eq!(parse("rmdir -r d").unwrap(), expected);
        assert!(matches!(
            parse("rmdir d -f"),
            Err(ShellError::Fs(FsError::InvalidOption(o))) if o == "-f"
        ));
    }

    #[test]
    fn test_copy_flag_positions() {
        let expected = Some(Command::Cp {
            src: "a".into(),
            dst: "b".into(),
            recursive: true,
        });
        assert_eq!(parse("cp -r a b").unwrap(), expected);
        assert_eq!(parse("cp a b -r").unwrap(), expected);
        assert!(matches!(parse("cp a -r b"), Err(ShellError::Usage("copy"))));
        assert_eq!(
            parse("mv a b").unwrap(),
            Some(Command::Mv {
                src: "a".into(),
                dst: "b".into(),
                recursive: false
            })
        );
    }

    #[test]
    fn test_grep() {
        assert_eq!(
            parse("grep -r /x needle").unwrap(),
            Some(Command::Grep {
                path: "/x".into(),
                pattern: "needle".into(),
                recursive: true
            })
        );
    }

    #[test]
    fn test_echo_forms() {
        assert_eq!(
            parse("echo hello   world").unwrap(),
            Some(Command::Echo {
                text: "hello world".into(),
                redirect: None
            })
        );
        assert_eq!(
            parse("echo hello world >> f.txt").unwrap(),
            Some(Command::Echo {
                text: "hello world".into(),
                redirect: Some(Redirect {
                    file: "f.txt".into(),
                    append: true
                })
            })
        );
        assert!(matches!(
            parse("echo hello >"),
            Err(ShellError::Fs(FsError::InvalidOperation(
                Violation::MissingRedirectTarget
            )))
        ));
    }

    #[test]
    fn test_to_json() {
        assert_eq!(
            parse("toJson / > out.json").unwrap(),
            Some(Command::ToJson {
                path: "/".into(),
                output: PathBuf::from("out.json")
            })
        );
        assert!(matches!(
            parse("toJson / out.json"),
            Err(ShellError::InvalidArguments)
        ));
    }

    #[test]
    fn test_arity_and_unknown() {
        assert!(matches!(parse("pwd x"), Err(ShellError::InvalidArguments)));
        assert!(matches!(parse("cd"), Err(ShellError::InvalidArguments)));
        assert!(matches!(parse("touch"), Err(ShellError::InvalidArguments)));
        assert!(matches!(parse("cp a"), Err(ShellError::InvalidArguments)));
        assert!(matches!(
            parse("format c:"),
            Err(ShellError::UnknownCommand(name)) if name == "format"
        ));
    }
}

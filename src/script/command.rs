//! Script command parsing

use std::str::FromStr;

use crate::ledger::VersionId;

/// A single script command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `build <x0> <x1> ...`
    Build(Vec<i64>),
    /// `empty <len>`
    Empty(usize),
    /// `set <v> <index> <value>`
    Set {
        /// Source version
        version: VersionId,
        /// Index to assign
        index: usize,
        /// New element
        value: i64,
    },
    /// `apply <v> <start> <end> <update>`
    Apply {
        /// Source version
        version: VersionId,
        /// Range start
        start: usize,
        /// Range end (exclusive)
        end: usize,
        /// Update to apply
        update: i64,
    },
    /// `fold <v> <start> <end>`
    Fold {
        /// Version queried
        version: VersionId,
        /// Range start
        start: usize,
        /// Range end (exclusive)
        end: usize,
    },
    /// `get <v> <index>`
    Get {
        /// Version queried
        version: VersionId,
        /// Element index
        index: usize,
    },
    /// `all <v>`
    All {
        /// Version queried
        version: VersionId,
    },
    /// `dump <v>`
    Dump {
        /// Version queried
        version: VersionId,
    },
    /// `lineage <v>`
    Lineage {
        /// Version queried
        version: VersionId,
    },
    /// `stats`
    Stats,
}

impl Command {
    /// Parse one line. Blank lines and comments yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Command>, String> {
        let content = match line.find('#') {
            Some(pos) => &line[..pos],
            None => line,
        };
        let mut tokens = content.split_whitespace();
        let keyword = match tokens.next() {
            Some(keyword) => keyword,
            None => return Ok(None),
        };
        let args: Vec<&str> = tokens.collect();

        let command = match keyword {
            "build" => Command::Build(
                args.iter()
                    .map(|token| number(token))
                    .collect::<Result<Vec<i64>, String>>()?,
            ),
            "empty" => {
                let [len] = exact::<1>(keyword, &args)?;
                Command::Empty(number(len)?)
            }
            "set" => {
                let [version, index, value] = exact::<3>(keyword, &args)?;
                Command::Set {
                    version: number(version)?,
                    index: number(index)?,
                    value: number(value)?,
                }
            }
            "apply" => {
                let [version, start, end, update] = exact::<4>(keyword, &args)?;
                Command::Apply {
                    version: number(version)?,
                    start: number(start)?,
                    end: number(end)?,
                    update: number(update)?,
                }
            }
            "fold" => {
                let [version, start, end] = exact::<3>(keyword, &args)?;
                Command::Fold {
                    version: number(version)?,
                    start: number(start)?,
                    end: number(end)?,
                }
            }
            "get" => {
                let [version, index] = exact::<2>(keyword, &args)?;
                Command::Get {
                    version: number(version)?,
                    index: number(index)?,
                }
            }
            "all" => {
                let [version] = exact::<1>(keyword, &args)?;
                Command::All {
                    version: number(version)?,
                }
            }
            "dump" => {
                let [version] = exact::<1>(keyword, &args)?;
                Command::Dump {
                    version: number(version)?,
                }
            }
            "lineage" => {
                let [version] = exact::<1>(keyword, &args)?;
                Command::Lineage {
                    version: number(version)?,
                }
            }
            "stats" => {
                exact::<0>(keyword, &args)?;
                Command::Stats
            }
            other => return Err(format!("unknown command '{}'", other)),
        };

        Ok(Some(command))
    }
}

fn exact<'a, const N: usize>(keyword: &str, args: &[&'a str]) -> Result<[&'a str; N], String> {
    <[&'a str; N]>::try_from(args).map_err(|_| {
        format!(
            "'{}' takes {} argument(s), got {}",
            keyword,
            N,
            args.len()
        )
    })
}

fn number<T: FromStr>(token: &str) -> Result<T, String> {
    token
        .parse()
        .map_err(|_| format!("invalid number '{}'", token))
}

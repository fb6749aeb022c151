//! Line-oriented command scripts
//!
//! One command per line; `#` starts a comment. Every version lives in a
//! single [`VersionLedger`] backed by one shared pool.
//!
//! ```text
//! build 1 2 3 4 5        # -> v0
//! apply 0 1 4 10         # -> v1
//! fold 1 0 5             # -> 45
//! dump 0                 # -> 1 2 3 4 5
//! ```

mod command;

pub use command::Command;

use std::io::{BufRead, Write};

use thiserror::Error;
use tracing::debug;

use crate::algebra::ScalarAction;
use crate::ledger::{Origin, VersionId, VersionLedger};
use crate::space::{NodePool, PoolProfile, SharedPool};
use crate::tree::PersistentSegTree;
use crate::{PoolConfig, SegTreeError};

/// Errors raised while running a script
#[derive(Error, Debug)]
pub enum ScriptError {
    /// Line could not be parsed
    #[error("line {line}: {message}")]
    Parse {
        /// 1-based line number
        line: usize,
        /// What was wrong
        message: String,
    },

    /// Command rejected by the tree or the ledger
    #[error("line {line}: {source}")]
    Tree {
        /// 1-based line number
        line: usize,
        /// Underlying error
        #[source]
        source: SegTreeError,
    },

    /// Reading the script or writing output failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Executes commands against a ledger of versions
#[derive(Debug)]
pub struct ScriptRunner<M: ScalarAction> {
    ledger: VersionLedger<M>,
    pool: SharedPool<M>,
}

impl<M: ScalarAction> ScriptRunner<M> {
    /// Create a runner whose versions share one pool built from `config`
    pub fn new(config: &PoolConfig) -> Self {
        Self {
            ledger: VersionLedger::new(),
            pool: NodePool::shared(config),
        }
    }

    /// Versions created so far
    pub fn ledger(&self) -> &VersionLedger<M> {
        &self.ledger
    }

    /// Allocation counters of the shared pool
    pub fn profile(&self) -> PoolProfile {
        self.pool.borrow().profile()
    }

    /// Execute one command and return its output line
    pub fn execute(&mut self, command: &Command) -> Result<String, SegTreeError> {
        match *command {
            Command::Build(ref values) => {
                let values: Vec<M::Value> = values.iter().map(|&x| M::value_of(x)).collect();
                let tree = PersistentSegTree::build_in(&values, &self.pool);
                let id = self
                    .ledger
                    .insert_root(tree, Origin::Build { len: values.len() });
                Ok(version_label(id))
            }
            Command::Empty(len) => {
                let tree = PersistentSegTree::new_in(len, &self.pool);
                let id = self.ledger.insert_root(tree, Origin::Empty { len });
                Ok(version_label(id))
            }
            Command::Set {
                version,
                index,
                value,
            } => {
                let id = self.ledger.derive(version, Origin::Set { index }, |tree| {
                    tree.try_set(index, M::value_of(value))
                })?;
                Ok(version_label(id))
            }
            Command::Apply {
                version,
                start,
                end,
                update,
            } => {
                let id = self
                    .ledger
                    .derive(version, Origin::Apply { start, end }, |tree| {
                        tree.try_apply(start..end, M::update_of(update))
                    })?;
                Ok(version_label(id))
            }
            Command::Fold {
                version,
                start,
                end,
            } => {
                let value = self.ledger.get(version)?.try_fold(start..end)?;
                Ok(M::render(&value))
            }
            Command::Get { version, index } => {
                let value = self.ledger.get(version)?.try_get(index)?;
                Ok(M::render(&value))
            }
            Command::All { version } => {
                let value = self.ledger.get(version)?.fold_all();
                Ok(M::render(&value))
            }
            Command::Dump { version } => {
                let values = self.ledger.get(version)?.to_vec();
                let rendered: Vec<String> = values.iter().map(M::render).collect();
                Ok(rendered.join(" "))
            }
            Command::Lineage { version } => {
                let chain = self.ledger.lineage(version)?;
                let mut parts = Vec::with_capacity(chain.len());
                for id in chain {
                    parts.push(format!("{} {}", version_label(id), self.ledger.origin(id)?));
                }
                Ok(parts.join(" <- "))
            }
            Command::Stats => {
                let profile = self.profile();
                Ok(format!(
                    "nodes={} blocks={} reserved={}",
                    profile.nodes_allocated, profile.blocks, profile.reserved_slots
                ))
            }
        }
    }

    /// Run every line of `input`, writing one output line per command.
    ///
    /// Stops at the first failing line. Returns the number of commands run.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut out: W) -> Result<usize, ScriptError> {
        let mut executed = 0;

        for (idx, line) in input.lines().enumerate() {
            let line_no = idx + 1;
            let line = line?;
            let command = match Command::parse(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(message) => {
                    return Err(ScriptError::Parse {
                        line: line_no,
                        message,
                    })
                }
            };

            let output = self.execute(&command).map_err(|source| ScriptError::Tree {
                line: line_no,
                source,
            })?;
            writeln!(out, "{}", output)?;
            executed += 1;
        }

        debug!(
            executed,
            versions = self.ledger.len(),
            "script finished"
        );
        Ok(executed)
    }
}

fn version_label(id: VersionId) -> String {
    format!("v{}", id)
}

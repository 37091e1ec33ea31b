//! Compiler event streams.
//!
//! The compilers run outside the server. A watch-mode compiler prints one
//! status line of JSON on stdout after every compile, an object with
//! `errors` and `warnings` arrays. [`CompilerProcess`] bridges those lines
//! onto a channel of [`CompileEvent`]s whose artifacts are read from the
//! compiler's output directory; tests drive the same channels with
//! [`MemoryArtifacts`] instead.

use crate::error::{Result, ServerError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;

/// Read access to the artifacts a compile produced.
#[async_trait]
pub trait ArtifactSource: Send + Sync {
    /// Read one artifact by name.
    async fn read(&self, name: &str) -> io::Result<Vec<u8>>;
}

/// Artifacts written to a directory on disk.
#[derive(Debug, Clone)]
pub struct DirArtifacts {
    dir: PathBuf,
}

impl DirArtifacts {
    /// Artifacts under `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl ArtifactSource for DirArtifacts {
    async fn read(&self, name: &str) -> io::Result<Vec<u8>> {
        tokio::fs::read(self.dir.join(name)).await
    }
}

/// Artifacts held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryArtifacts {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryArtifacts {
    /// An empty set of artifacts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an artifact.
    pub fn insert(&mut self, name: impl Into<String>, content: impl Into<Vec<u8>>) {
        self.files.insert(name.into(), content.into());
    }
}

#[async_trait]
impl ArtifactSource for MemoryArtifacts {
    async fn read(&self, name: &str) -> io::Result<Vec<u8>> {
        self.files.get(name).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no artifact named '{}'", name),
            )
        })
    }
}

/// One completed compile, successful or not.
#[derive(Clone)]
pub struct CompileEvent {
    /// Compile errors. Any entry here means the outputs must not be used.
    pub errors: Vec<String>,
    /// Warnings, logged but otherwise ignored.
    pub warnings: Vec<String>,
    /// Where this compile's artifacts can be read from.
    pub output: Arc<dyn ArtifactSource>,
}

impl CompileEvent {
    /// An event for a clean compile.
    pub fn success(output: Arc<dyn ArtifactSource>) -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
            output,
        }
    }

    /// An event for a failed compile.
    pub fn failed(errors: Vec<String>, output: Arc<dyn ArtifactSource>) -> Self {
        Self {
            errors,
            warnings: Vec::new(),
            output,
        }
    }

    /// True when the compile produced no errors.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Debug for CompileEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompileEvent")
            .field("errors", &self.errors)
            .field("warnings", &self.warnings)
            .finish_non_exhaustive()
    }
}

/// The status line a watch-mode compiler prints after every compile.
///
/// Both fields are required so ordinary JSON log lines are not mistaken
/// for compile statuses.
#[derive(Debug, serde::Deserialize)]
struct CompileStatus {
    errors: Vec<String>,
    warnings: Vec<String>,
}

/// A watch-mode compiler child process bridged onto a channel.
///
/// Dropping the receiver stops the bridge; the child itself is stopped
/// through [`CompilerProcess::shutdown`].
#[derive(Debug)]
pub struct CompilerProcess {
    child: Child,
    name: &'static str,
}

impl CompilerProcess {
    /// Spawn `argv` and bridge its status lines onto the returned channel.
    ///
    /// `artifact_dir` is where the compiler writes its outputs; every
    /// event reads artifacts from there.
    pub fn spawn(
        name: &'static str,
        argv: &[String],
        artifact_dir: &Path,
    ) -> Result<(Self, mpsc::Receiver<CompileEvent>)> {
        let (program, args) = argv.split_first().ok_or_else(|| ServerError::InvalidConfig {
            field: format!("{}_compiler", name),
            value: "[]".to_string(),
            hint: "provide the command to run, e.g. [\"npx\", \"webpack\", \"--watch\"]"
                .to_string(),
        })?;

        let mut child = Command::new(program)
            .args(args)
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|e| {
                ServerError::Compiler(format!("failed to spawn {} compiler '{}': {}", name, program, e))
            })?;

        let stdout = child.stdout.take().ok_or_else(|| {
            ServerError::Compiler(format!("{} compiler has no stdout", name))
        })?;

        let (tx, rx) = mpsc::channel(16);
        let source: Arc<dyn ArtifactSource> = Arc::new(DirArtifacts::new(artifact_dir));

        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => match serde_json::from_str::<CompileStatus>(&line) {
                        Ok(status) => {
                            let event = CompileEvent {
                                errors: status.errors,
                                warnings: status.warnings,
                                output: Arc::clone(&source),
                            };
                            if tx.send(event).await.is_err() {
                                break;
                            }
                        }
                        // Compilers chatter; pass everything else to the log.
                        Err(_) => tracing::debug!("{} compiler: {}", name, line),
                    },
                    Ok(None) => {
                        tracing::warn!("{} compiler exited", name);
                        break;
                    }
                    Err(e) => {
                        tracing::warn!("{} compiler output unreadable: {}", name, e);
                        break;
                    }
                }
            }
        });

        Ok((Self { child, name }, rx))
    }

    /// Stop the compiler process.
    pub async fn shutdown(mut self) {
        tracing::debug!("stopping {} compiler", self.name);
        let _ = self.child.kill().await;
    }
}

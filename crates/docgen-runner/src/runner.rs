//! node process runner.

use blake3::Hasher;
use camino::{Utf8Path, Utf8PathBuf};
use docgen_transform::{DocExtractor, DocRecord, ExtractError, ResolverStrategy};
use std::fs;
use std::io::{self, Write};
use std::process::{Command, Stdio};
use std::thread;
use thiserror::Error;

const DOCGEN_SCRIPT_FILENAME: &str = "react-docgen-runner.cjs";
const DOCGEN_SCRIPT_SOURCE: &str = r#"'use strict';
const { createRequire } = require('node:module');
const path = require('node:path');

const args = process.argv.slice(2);
const flag = args.indexOf('--resolver');
const resolverName = flag >= 0 ? args[flag + 1] : 'findAllExportedComponentDefinitions';

let docgen = null;
try {
  const requireFromCwd = createRequire(path.join(process.cwd(), 'noop.js'));
  docgen = requireFromCwd('react-docgen');
} catch (err) {
  const message = err && err.message ? err.message : String(err);
  console.error(`docgen runner failed to load react-docgen: ${message}`);
  process.exit(2);
}

const resolver = docgen.resolver && docgen.resolver[resolverName];
if (typeof resolver !== 'function') {
  console.error(`docgen runner: unknown resolver ${resolverName}`);
  process.exit(2);
}

const chunks = [];
process.stdin.on('data', (chunk) => chunks.push(chunk));
process.stdin.on('end', () => {
  const source = Buffer.concat(chunks).toString('utf8');
  try {
    const result = docgen.parse(source, resolver);
    process.stdout.write(JSON.stringify(result === undefined ? [] : result));
  } catch (err) {
    const message = err && err.message ? err.message : String(err);
    console.error(message);
    process.exit(1);
  }
});
"#;

/// Message react-docgen raises when a module has nothing to document.
const NO_COMPONENT_MESSAGE: &str = "No suitable component definition found";

/// Error types for the docgen runner.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// Failed to spawn or talk to the extractor process.
    #[error("failed to spawn extractor: {0}")]
    SpawnFailed(#[from] io::Error),

    /// The extractor process exited with an error.
    #[error("extractor exited with code {code}: {stderr}")]
    ProcessFailed { code: i32, stderr: String },

    /// node binary not found.
    #[error("node binary not found at: {0}")]
    NotFound(Utf8PathBuf),

    /// Failed to write the runner script.
    #[error("failed to install docgen runner script: {0}")]
    ScriptInstall(String),

    /// Failed to parse extractor output.
    #[error("failed to parse extractor output: {0}")]
    ParseError(String),
}

impl From<RunnerError> for ExtractError {
    fn from(err: RunnerError) -> Self {
        match &err {
            RunnerError::ProcessFailed { stderr, .. } if stderr.contains(NO_COMPONENT_MESSAGE) => {
                ExtractError::NoComponent
            }
            _ => ExtractError::Failed(err.to_string()),
        }
    }
}

/// Runs react-docgen in a child process, one process per module.
///
/// The process receives the module source on stdin and
/// `--resolver <name>` as its last two arguments, and must print the
/// documentation as JSON (an object or an array of objects) on stdout.
#[derive(Debug, Clone)]
pub struct DocgenRunner {
    program: Utf8PathBuf,
    args: Vec<String>,
    workspace_root: Utf8PathBuf,
}

impl DocgenRunner {
    /// Creates a runner that executes the bundled script with `node_path`.
    pub fn new(node_path: Utf8PathBuf, workspace_root: Utf8PathBuf) -> Result<Self, RunnerError> {
        if node_path.is_absolute() && !node_path.exists() {
            return Err(RunnerError::NotFound(node_path));
        }
        let script_path = ensure_script()?;
        Ok(Self {
            program: node_path,
            args: vec![script_path.into_string()],
            workspace_root,
        })
    }

    /// Creates a runner using the first node found for `workspace_root`.
    pub fn for_workspace(workspace_root: Utf8PathBuf) -> Result<Self, RunnerError> {
        let node_path = Self::find_node(Some(&workspace_root))
            .ok_or_else(|| RunnerError::NotFound(Utf8PathBuf::from("node")))?;
        Self::new(node_path, workspace_root)
    }

    /// Creates a runner around an arbitrary command speaking the same
    /// stdin/stdout protocol.
    pub fn from_command<I, S>(
        program: impl Into<Utf8PathBuf>,
        args: I,
        workspace_root: Utf8PathBuf,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            workspace_root,
        }
    }

    /// Attempts to find node in the workspace or on PATH.
    /// 1. Workspace node_modules/.bin/node (if workspace_root provided)
    /// 2. PATH
    pub fn find_node(workspace_root: Option<&Utf8Path>) -> Option<Utf8PathBuf> {
        if let Some(workspace) = workspace_root {
            let bin = workspace.join("node_modules/.bin");
            if let Some(path) = find_node_in_bin(&bin) {
                return Some(path);
            }
        }

        which::which("node")
            .ok()
            .and_then(|path| Utf8PathBuf::try_from(path).ok())
    }

    /// Gets the cache directory the runner script is written to.
    pub fn get_cache_dir() -> Option<Utf8PathBuf> {
        dirs::cache_dir()
            .and_then(|p| Utf8PathBuf::try_from(p).ok())
            .map(|p| p.join("docgen-rs"))
    }

    pub fn workspace_root(&self) -> &Utf8Path {
        &self.workspace_root
    }

    /// Extracts documentation records for one module.
    pub fn run(
        &self,
        source: &str,
        resolver: ResolverStrategy,
    ) -> Result<Vec<DocRecord>, RunnerError> {
        tracing::debug!(
            "running {} with resolver {} in {}",
            self.program,
            resolver,
            self.workspace_root
        );

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg("--resolver")
            .arg(resolver.as_str())
            .current_dir(&self.workspace_root)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let mut stdin = child.stdin.take().ok_or_else(|| {
            RunnerError::SpawnFailed(io::Error::other("failed to open extractor stdin"))
        })?;
        // Feed stdin from its own thread so a chatty child cannot block on a
        // full stdout pipe while we are still writing.
        let source = source.to_owned();
        let writer = thread::spawn(move || stdin.write_all(source.as_bytes()));

        let output = child.wait_with_output()?;
        if let Ok(Err(err)) = writer.join() {
            // The child may legitimately exit without reading its input.
            if err.kind() != io::ErrorKind::BrokenPipe {
                return Err(RunnerError::SpawnFailed(err));
            }
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RunnerError::ProcessFailed {
                code: output.status.code().unwrap_or(-1),
                stderr: stderr.trim().to_string(),
            });
        }

        let stdout = String::from_utf8(output.stdout)
            .map_err(|e| RunnerError::ParseError(format!("output is not UTF-8: {e}")))?;
        let value: serde_json::Value = serde_json::from_str(stdout.trim())
            .map_err(|e| RunnerError::ParseError(format!("invalid JSON: {e}")))?;
        DocRecord::from_json(value).map_err(|e| RunnerError::ParseError(e.to_string()))
    }
}

impl DocExtractor for DocgenRunner {
    fn extract(
        &self,
        source: &str,
        resolver: ResolverStrategy,
    ) -> Result<Vec<DocRecord>, ExtractError> {
        self.run(source, resolver).map_err(ExtractError::from)
    }
}

fn find_node_in_bin(bin: &Utf8Path) -> Option<Utf8PathBuf> {
    let candidates: &[&str] = if cfg!(windows) {
        &["node.exe", "node.cmd", "node"]
    } else {
        &["node"]
    };

    candidates
        .iter()
        .map(|candidate| bin.join(candidate))
        .find(|path| path.exists())
}

fn ensure_script() -> Result<Utf8PathBuf, RunnerError> {
    let cache_dir = DocgenRunner::get_cache_dir()
        .ok_or_else(|| RunnerError::ScriptInstall("could not determine cache directory".into()))?;
    install_script(&cache_dir)
}

/// Writes the runner script into `dir` unless an identical copy is there.
fn install_script(dir: &Utf8Path) -> Result<Utf8PathBuf, RunnerError> {
    fs::create_dir_all(dir)
        .map_err(|e| RunnerError::ScriptInstall(format!("failed to create cache dir: {e}")))?;

    let script_path = dir.join(DOCGEN_SCRIPT_FILENAME);
    let mut hasher = Hasher::new();
    hasher.update(DOCGEN_SCRIPT_SOURCE.as_bytes());
    let expected_hash = hasher.finalize();

    if let Ok(existing) = fs::read(&script_path) {
        let mut hasher = Hasher::new();
        hasher.update(&existing);
        if hasher.finalize() == expected_hash {
            return Ok(script_path);
        }
    }

    tracing::debug!("writing docgen runner script to {}", script_path);
    fs::write(&script_path, DOCGEN_SCRIPT_SOURCE)
        .map_err(|e| RunnerError::ScriptInstall(format!("failed to write runner script: {e}")))?;

    Ok(script_path)
}

//! Profiling engine seam.
//!
//! The engine is an external collaborator: it receives a view name and the
//! serialized option set, and writes its output under the scratch directory as
//! directed by the `output` option. This crate never inspects what it computes.

use serde_json::{Map, Value};

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::{EngineConfig, UiError, UiResult};

pub const MISSING_CONTEXT_MESSAGE: &str = "Please provide a value for \"profile_context_path\".";

pub trait ProfileEngine: Send + Sync {
    /// Runs one profile to completion. Blocks for as long as the engine runs.
    fn profile(&self, view: &str, options: &Map<String, Value>) -> UiResult<()>;
}

/// Engine backed by an external process, bound to one profile context.
#[derive(Debug, Clone)]
pub struct CommandEngine {
    program: String,
    args: Vec<String>,
    context_path: PathBuf,
    max_serving_secs: u64,
    max_tracing_secs: u64,
    trace_steps: u32,
}

impl CommandEngine {
    pub fn from_context(context_path: &Path, config: &EngineConfig) -> UiResult<Self> {
        if context_path.as_os_str().is_empty() {
            return Err(UiError::Usage(MISSING_CONTEXT_MESSAGE.to_string()));
        }
        if !context_path.exists() {
            return Err(UiError::Usage(format!(
                "profile context {} does not exist",
                context_path.display()
            )));
        }
        Ok(Self {
            program: config.program.clone(),
            args: config.args.clone(),
            context_path: context_path.to_path_buf(),
            max_serving_secs: config.max_serving_secs,
            max_tracing_secs: config.max_tracing_secs,
            trace_steps: config.trace_steps,
        })
    }

    pub fn context_path(&self) -> &Path {
        &self.context_path
    }

    fn command(&self, view: &str, options: &Map<String, Value>) -> UiResult<Command> {
        let blob = serde_json::to_string(options)?;
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg(format!("--profile_path={}", self.context_path.display()))
            .arg(format!("--max_serving_secs={}", self.max_serving_secs))
            .arg(format!("--max_tracing_secs={}", self.max_tracing_secs))
            .arg(format!("--trace_steps={}", self.trace_steps))
            .arg(format!("--view={view}"))
            .arg(format!("--options={blob}"));
        Ok(cmd)
    }
}

impl ProfileEngine for CommandEngine {
    fn profile(&self, view: &str, options: &Map<String, Value>) -> UiResult<()> {
        let output = self
            .command(view, options)?
            .output()
            .map_err(|e| UiError::Engine(format!("failed to run {}: {e}", self.program)))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(UiError::Engine(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }
        tracing::debug!(view, "engine finished");
        Ok(())
    }
}

//! Best-effort rendering of a pprof log into a vector image.

use std::path::Path;
use std::process::{Command, Stdio};

use crate::RendererConfig;

/// Whether the renderer could be run. Callers check the output file, not this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invocation {
    Ran,
    Failed,
}

pub trait Renderer: Send + Sync {
    fn render(&self, input: &Path, output: &Path) -> Invocation;
}

#[derive(Debug, Clone)]
pub struct PprofRenderer {
    program: String,
    node_count: u32,
    sample_index: u32,
}

impl PprofRenderer {
    pub fn new(config: &RendererConfig) -> Self {
        Self {
            program: config.program.clone(),
            node_count: config.node_count,
            sample_index: config.sample_index,
        }
    }

    fn command(&self, input: &Path, output: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-svg")
            .arg(format!("--nodecount={}", self.node_count))
            .arg(format!("--sample_index={}", self.sample_index))
            .arg(format!("-output={}", output.display()))
            .arg(input)
            .stdin(Stdio::null());
        cmd
    }
}

impl Renderer for PprofRenderer {
    fn render(&self, input: &Path, output: &Path) -> Invocation {
        match self.command(input, output).status() {
            Ok(status) if status.success() => Invocation::Ran,
            Ok(status) => {
                tracing::warn!("{} exited with {status}", self.program);
                Invocation::Ran
            }
            Err(err) => {
                tracing::warn!("failed to run {}: {err}", self.program);
                Invocation::Failed
            }
        }
    }
}

//! Turning engine output into a response body, one strategy per output format.

use std::path::Path;

use crate::{Config, Renderer, ScratchDir, UiResult};

pub const NOT_GENERATED: &str = "Profile was not generated.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileOutput {
    /// Raw bytes of the selected artifact.
    Artifact(Vec<u8>),
    /// Neither the engine nor the renderer left the expected file behind.
    NotGenerated,
}

impl ProfileOutput {
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Artifact(bytes) => bytes,
            Self::NotGenerated => NOT_GENERATED.as_bytes().to_vec(),
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(self, Self::Artifact(_))
    }
}

/// Largest item by size. On ties the earliest item wins.
pub fn pick_largest<T, I>(entries: I) -> Option<T>
where
    I: IntoIterator<Item = (T, u64)>,
{
    entries
        .into_iter()
        .fold(None, |best: Option<(T, u64)>, (item, size)| match best {
            Some((_, best_size)) if size <= best_size => best,
            _ => Some((item, size)),
        })
        .map(|(item, _)| item)
}

/// Renders the canonical log to an image and returns the image.
pub fn render_pprof(
    config: &Config,
    scratch: &ScratchDir,
    renderer: &dyn Renderer,
) -> UiResult<ProfileOutput> {
    let image = config.image_path();
    let invocation = renderer.render(&config.log_path(), &image);
    tracing::debug!(?invocation, "renderer returned");
    load_profile(scratch, &image)
}

/// Returns the largest per-step trace file; each step writes its own.
pub fn largest_trace(config: &Config, scratch: &ScratchDir) -> UiResult<ProfileOutput> {
    let infix = config.trace_infix();
    let traces = scratch
        .artifacts()?
        .into_iter()
        .filter(|e| e.name.contains(&infix))
        .map(|e| {
            let size = e.size;
            (e, size)
        });
    match pick_largest(traces) {
        Some(entry) => {
            tracing::debug!(file = %entry.name, size = entry.size, "selected trace");
            load_profile(scratch, &entry.path)
        }
        None => {
            scratch.purge()?;
            Ok(ProfileOutput::NotGenerated)
        }
    }
}

/// Returns the canonical log file as written by the engine.
pub fn pass_through(config: &Config, scratch: &ScratchDir) -> UiResult<ProfileOutput> {
    load_profile(scratch, &config.log_path())
}

/// Reads `path` if it exists, then purges the scratch directory either way.
pub fn load_profile(scratch: &ScratchDir, path: &Path) -> UiResult<ProfileOutput> {
    let output = if path.is_file() {
        std::fs::read(path).map(ProfileOutput::Artifact)
    } else {
        Ok(ProfileOutput::NotGenerated)
    };
    scratch.purge()?;
    Ok(output?)
}

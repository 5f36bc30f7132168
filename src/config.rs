//! `profiler-ui.toml` config loading and the fixed scratch layout.

use serde::{Deserialize, Serialize};

use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Directory holding the artifacts of one profiling run at a time.
    #[serde(default = "default_scratch_dir")]
    pub scratch_dir: PathBuf,

    /// File name the engine is told to write its primary output to.
    #[serde(default = "default_log_basename")]
    pub log_basename: String,

    /// Every artifact whose name starts with this prefix belongs to the profiler.
    #[serde(default = "default_artifact_prefix")]
    pub artifact_prefix: String,

    /// Base URL of the Material Components assets used by the home page.
    #[serde(default = "default_asset_base_url")]
    pub asset_base_url: String,

    /// Optional directory served under `/static`.
    #[serde(default)]
    pub static_dir: Option<PathBuf>,

    #[serde(default = "default_browser_delay_ms")]
    pub browser_delay_ms: u64,

    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub renderer: RendererConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EngineConfig {
    #[serde(default = "default_engine_program")]
    pub program: String,

    /// Extra arguments placed before the per-run flags.
    #[serde(default)]
    pub args: Vec<String>,

    /// Upper bound for serving-style profiles.
    #[serde(default = "default_max_serving_secs")]
    pub max_serving_secs: u64,

    /// Upper bound for tracing-style profiles.
    #[serde(default = "default_max_tracing_secs")]
    pub max_tracing_secs: u64,

    #[serde(default = "default_trace_steps")]
    pub trace_steps: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RendererConfig {
    #[serde(default = "default_renderer_program")]
    pub program: String,

    #[serde(default = "default_node_count")]
    pub node_count: u32,

    #[serde(default = "default_sample_index")]
    pub sample_index: u32,
}

fn default_scratch_dir() -> PathBuf {
    PathBuf::from("/tmp/tensorflow/profiler")
}

fn default_log_basename() -> String {
    "profiler-ui.log".to_string()
}

fn default_artifact_prefix() -> String {
    "profiler-ui.".to_string()
}

fn default_asset_base_url() -> String {
    "https://unpkg.com/material-components-web@0.20.0/dist/".to_string()
}

fn default_browser_delay_ms() -> u64 {
    1000
}

fn default_engine_program() -> String {
    "tfprof".to_string()
}

fn default_max_serving_secs() -> u64 {
    60 * 60
}

fn default_max_tracing_secs() -> u64 {
    300
}

fn default_trace_steps() -> u32 {
    5
}

fn default_renderer_program() -> String {
    "pprof".to_string()
}

fn default_node_count() -> u32 {
    100
}

fn default_sample_index() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scratch_dir: default_scratch_dir(),
            log_basename: default_log_basename(),
            artifact_prefix: default_artifact_prefix(),
            asset_base_url: default_asset_base_url(),
            static_dir: None,
            browser_delay_ms: default_browser_delay_ms(),
            engine: EngineConfig::default(),
            renderer: RendererConfig::default(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            program: default_engine_program(),
            args: Vec::new(),
            max_serving_secs: default_max_serving_secs(),
            max_tracing_secs: default_max_tracing_secs(),
            trace_steps: default_trace_steps(),
        }
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            program: default_renderer_program(),
            node_count: default_node_count(),
            sample_index: default_sample_index(),
        }
    }
}

impl Config {
    pub fn load_optional(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(s) => match toml::from_str::<Config>(&s) {
                Ok(cfg) => cfg,
                Err(err) => {
                    tracing::warn!("failed to parse config {}: {err}", path.display());
                    Self::default()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(err) => {
                tracing::warn!("failed to read config {}: {err}", path.display());
                Self::default()
            }
        }
    }

    /// Config rooted at `scratch_dir`, everything else default.
    pub fn with_scratch_dir(scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            scratch_dir: scratch_dir.into(),
            ..Self::default()
        }
    }

    /// Canonical log file the engine writes to.
    pub fn log_path(&self) -> PathBuf {
        self.scratch_dir.join(&self.log_basename)
    }

    /// Canonical rendered-image path, `<log stem>.pprof.png`.
    pub fn image_path(&self) -> PathBuf {
        let stem = Path::new(&self.log_basename)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.log_basename);
        self.scratch_dir.join(format!("{stem}.pprof.png"))
    }

    /// Infix shared by the per-step trace files (`<log>_<step>`).
    pub fn trace_infix(&self) -> String {
        format!("{}_", self.log_basename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_matches_canonical_names() {
        let cfg = Config::default();
        assert_eq!(
            cfg.log_path(),
            PathBuf::from("/tmp/tensorflow/profiler/profiler-ui.log")
        );
        assert_eq!(
            cfg.image_path(),
            PathBuf::from("/tmp/tensorflow/profiler/profiler-ui.pprof.png")
        );
        assert_eq!(cfg.trace_infix(), "profiler-ui.log_");
        assert_eq!(cfg.renderer.node_count, 100);
        assert_eq!(cfg.engine.max_serving_secs, 3600);
    }

    #[test]
    fn partial_toml_keeps_defaults_for_missing_fields() {
        let cfg: Config = toml::from_str(
            r#"
            scratch_dir = "/var/tmp/prof"

            [renderer]
            program = "/opt/pprof"
            "#,
        )
        .expect("parse");
        assert_eq!(cfg.scratch_dir, PathBuf::from("/var/tmp/prof"));
        assert_eq!(cfg.renderer.program, "/opt/pprof");
        assert_eq!(cfg.renderer.sample_index, 1);
        assert_eq!(cfg.engine.program, "tfprof");
        assert_eq!(cfg.log_basename, "profiler-ui.log");
    }

    #[test]
    fn load_optional_falls_back_on_missing_file() {
        let missing = std::env::temp_dir().join(format!(
            "profiler-ui-config-{}.toml",
            uuid::Uuid::new_v4()
        ));
        let cfg = Config::load_optional(&missing);
        assert_eq!(cfg.scratch_dir, default_scratch_dir());
    }
}

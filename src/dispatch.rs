//! Profile requests: view to output-format routing and the run pipeline.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use uuid::Uuid;

use crate::{
    Config, ProfileEngine, ProfileOutput, Renderer, ScratchDir, UiError, UiResult, largest_trace,
    pass_through, render_pprof,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Pprof,
    Timeline,
    File,
}

impl OutputFormat {
    /// Output format for a requested view, and the view the engine should run.
    pub fn route(view: &str) -> (Self, &str) {
        match view {
            "pprof" => (Self::Pprof, "code"),
            "graph" => (Self::Timeline, view),
            _ => (Self::File, view),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pprof => "pprof",
            Self::Timeline => "timeline",
            Self::File => "file",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Option set the UI starts from; request keys override these.
pub fn default_options() -> Map<String, Value> {
    let defaults = serde_json::json!({
        "select": ["micros"],
        "order_by": "micros",
        "max_depth": 10000,
        "min_bytes": 0,
        "min_float_ops": 0,
        "min_micros": 0,
        "min_occurrence": 0,
        "min_params": 0,
        "account_type_regexes": [".*"],
        "account_displayed_op_only": true,
        "hide_name_regexes": [],
        "show_name_regexes": [".*"],
        "start_name_regexes": [".*"],
        "trim_name_regexes": [],
        "step": -1
    });
    match defaults {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileRequest {
    pub view: String,
    /// Engine options, forwarded as-is apart from `view` and `output`.
    pub options: Map<String, Value>,
}

impl ProfileRequest {
    pub fn new(view: impl Into<String>, options: Map<String, Value>) -> Self {
        Self {
            view: view.into(),
            options,
        }
    }

    /// Parses the `options` query parameter: a JSON object with a string `view`.
    pub fn from_json(text: &str) -> UiResult<Self> {
        let value: Value = serde_json::from_str(text)?;
        let Value::Object(supplied) = value else {
            return Err(UiError::InvalidRequest(
                "options must be a JSON object".to_string(),
            ));
        };
        let view = match supplied.get("view") {
            Some(Value::String(view)) => view.clone(),
            Some(_) => {
                return Err(UiError::InvalidRequest(
                    "options.view must be a string".to_string(),
                ));
            }
            None => {
                return Err(UiError::InvalidRequest(
                    "options.view is required".to_string(),
                ));
            }
        };
        let mut options = default_options();
        options.extend(supplied);
        Ok(Self { view, options })
    }
}

/// Runs profiles one at a time against the shared scratch directory.
pub struct Dispatcher {
    config: Arc<Config>,
    scratch: ScratchDir,
    engine: Arc<dyn ProfileEngine>,
    renderer: Arc<dyn Renderer>,
    run_lock: Mutex<()>,
}

impl Dispatcher {
    pub fn new(
        config: Arc<Config>,
        engine: Arc<dyn ProfileEngine>,
        renderer: Arc<dyn Renderer>,
    ) -> UiResult<Self> {
        let scratch = ScratchDir::new(&config)?;
        Ok(Self {
            config,
            scratch,
            engine,
            renderer,
            run_lock: Mutex::new(()),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn scratch(&self) -> &ScratchDir {
        &self.scratch
    }

    /// Runs the engine and the matching post-processor. Blocks until both finish.
    pub fn dispatch(&self, request: ProfileRequest) -> UiResult<ProfileOutput> {
        let ProfileRequest { view, mut options } = request;
        let (format, engine_view) = OutputFormat::route(&view);
        let engine_view = engine_view.to_string();

        let span = tracing::info_span!(
            "profile",
            request_id = %Uuid::new_v4(),
            view = %view,
            format = %format
        );
        let _enter = span.enter();

        let _guard = self
            .run_lock
            .lock()
            .map_err(|_| UiError::Engine("profile run lock poisoned".to_string()))?;

        self.scratch.ensure_clean()?;

        options.insert("view".to_string(), Value::String(engine_view.clone()));
        options.insert(
            "output".to_string(),
            Value::String(format!(
                "{format}:outfile={}",
                self.config.log_path().display()
            )),
        );

        let started = Instant::now();
        self.engine.profile(&engine_view, &options)?;
        let elapsed_ms = started.elapsed().as_millis() as u64;
        tracing::info!(elapsed_ms, "engine run complete");

        let output = match format {
            OutputFormat::Pprof => render_pprof(&self.config, &self.scratch, self.renderer.as_ref())?,
            OutputFormat::Timeline => largest_trace(&self.config, &self.scratch)?,
            OutputFormat::File => pass_through(&self.config, &self.scratch)?,
        };
        if !output.is_generated() {
            tracing::warn!("profile was not generated");
        }
        Ok(output)
    }
}

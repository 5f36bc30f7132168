//! Stub engine and renderer shared by the HTTP tests.

#![allow(dead_code)]

use profiler_ui::{Config, Dispatcher, Invocation, ProfileEngine, Renderer, UiResult};
use serde_json::{Map, Value};

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub const LOG_BYTES: &[u8] = b"op | micros\nMatMul | 1200\n";
pub const IMAGE_BYTES: &[u8] = b"<svg xmlns=\"http://www.w3.org/2000/svg\"><g id=\"graph0\"/></svg>";

/// Writes the canonical log (plus step traces for timeline output) and
/// records how many profiler artifacts were already present when it ran.
#[derive(Default)]
pub struct StubEngine {
    pub calls: Mutex<Vec<String>>,
    pub preexisting: Mutex<Vec<usize>>,
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    pub delay: Option<Duration>,
}

impl StubEngine {
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }
}

fn count_artifacts(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .filter(|e| e.file_name().to_string_lossy().starts_with("profiler-ui."))
                .count()
        })
        .unwrap_or(0)
}

impl ProfileEngine for StubEngine {
    fn profile(&self, view: &str, options: &Map<String, Value>) -> UiResult<()> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let output = options
            .get("output")
            .and_then(|v| v.as_str())
            .expect("output option");
        let (format, path) = output.split_once(":outfile=").expect("outfile");
        let log = PathBuf::from(path);
        let dir = log.parent().expect("scratch dir").to_path_buf();
        self.preexisting
            .lock()
            .expect("lock")
            .push(count_artifacts(&dir));

        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }

        std::fs::write(&log, LOG_BYTES).expect("write log");
        if format == "timeline" {
            for (step, size) in [(0, 10usize), (1, 50), (2, 30)] {
                let name = format!("{}_{step}", log.display());
                std::fs::write(name, vec![b'0' + step as u8; size]).expect("write step");
            }
        }
        self.calls.lock().expect("lock").push(view.to_string());
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Writes a fixed image to the requested output path.
pub struct StubRenderer;

impl Renderer for StubRenderer {
    fn render(&self, input: &Path, output: &Path) -> Invocation {
        assert!(input.exists(), "renderer input missing: {}", input.display());
        std::fs::write(output, IMAGE_BYTES).expect("write image");
        Invocation::Ran
    }
}

pub fn temp_root(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("profiler-ui-it-{name}-{}", uuid::Uuid::new_v4()))
}

pub fn dispatcher_with(config: Config, engine: Arc<StubEngine>) -> Arc<Dispatcher> {
    Arc::new(Dispatcher::new(Arc::new(config), engine, Arc::new(StubRenderer)).expect("dispatcher"))
}

/// Percent-encodes the handful of characters JSON options use.
pub fn encode_options(json: &str) -> String {
    let mut out = String::with_capacity(json.len() * 3);
    for c in json.chars() {
        match c {
            '{' => out.push_str("%7B"),
            '}' => out.push_str("%7D"),
            '"' => out.push_str("%22"),
            ':' => out.push_str("%3A"),
            ',' => out.push_str("%2C"),
            ' ' => out.push_str("%20"),
            '[' => out.push_str("%5B"),
            ']' => out.push_str("%5D"),
            _ => out.push(c),
        }
    }
    out
}

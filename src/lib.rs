//! Profiler UI core library: routes browser profile requests to an external
//! profiling engine and hands back the artifact it produced.

mod browser;
mod config;
mod dispatch;
mod engine;
mod error;
mod postprocess;
mod render;
mod scratch;
mod server;

pub use browser::*;
pub use config::*;
pub use dispatch::*;
pub use engine::*;
pub use error::*;
pub use postprocess::*;
pub use render::*;
pub use scratch::*;
pub use server::*;

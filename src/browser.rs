//! Opening the UI in the user's browser once the server is up.

use std::process::{Command, Stdio};
use std::time::Duration;

/// Platform launcher for `url`, if this platform has one.
pub fn browser_command(url: &str) -> Option<Command> {
    #[cfg(target_os = "macos")]
    let program = Some("open");
    #[cfg(target_os = "windows")]
    let program = Some("explorer");
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let program = Some("xdg-open");

    program.map(|program| {
        let mut cmd = Command::new(program);
        cmd.arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        cmd
    })
}

/// Opens `url` after `delay` without holding up the caller.
pub fn open_after(url: String, delay: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let Some(mut cmd) = browser_command(&url) else {
            tracing::info!("open {url} in a browser");
            return;
        };
        match cmd.spawn() {
            Ok(_) => tracing::debug!("opened browser at {url}"),
            Err(err) => tracing::warn!("could not open browser ({err}); visit {url}"),
        }
    })
}

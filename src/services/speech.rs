//! External text-to-speech program launching

use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, warn};

/// Launch `program [args..] text` and reap it in the background.
///
/// Returns as soon as the process is spawned; playback is fire-and-forget.
/// Fails if there is no tokio runtime or the program cannot be started.
pub fn spawn_speech(program: &str, args: &[String], text: &str) -> std::io::Result<()> {
    let handle = tokio::runtime::Handle::try_current()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    let _guard = handle.enter();
    let mut child = Command::new(program)
        .args(args)
        .arg(text)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    debug!("Spawned {} to speak {:?}", program, text);

    let program = program.to_string();
    handle.spawn(async move {
        match child.wait().await {
            Ok(status) if !status.success() => warn!("{} exited with {}", program, status),
            Ok(_) => {}
            Err(e) => warn!("Failed to wait for {}: {}", program, e),
        }
    });

    Ok(())
}

/// Check whether a speech program can be launched at all
pub async fn check_speech_available(program: &str) -> Result<(), String> {
    Command::new(program)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map_err(|_| format!("{} is not available, spoken cues will fall back", program))?;

    debug!("{} is available", program);
    Ok(())
}

//! Completion alert playback

use std::time::Duration;

use tokio::{io::AsyncWriteExt, process::Command, time::timeout};
use tracing::{debug, info, warn};

/// Longest an alert program may run before it is killed
pub const ALERT_TIMEOUT: Duration = Duration::from_secs(10);

/// How the completion alert is produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AlertCommand {
    /// Ring the terminal bell
    #[default]
    Bell,
    /// Run an external program, e.g. `paplay crack.oga`
    Command { program: String, args: Vec<String> },
}

impl AlertCommand {
    /// Build from a shell-like command line; an empty line means the bell
    pub fn from_command_line(line: &str) -> Result<Self, String> {
        let mut parts = shlex::split(line)
            .ok_or_else(|| format!("Invalid alert command: {}", line))?
            .into_iter();

        match parts.next() {
            Some(program) => Ok(AlertCommand::Command {
                program,
                args: parts.collect(),
            }),
            None => Ok(AlertCommand::Bell),
        }
    }
}

/// Play the completion alert once
pub async fn play_completion_alert(alert: &AlertCommand) -> Result<(), String> {
    play_completion_alert_within(alert, ALERT_TIMEOUT).await
}

/// Play the completion alert, killing the alert program after `limit`
pub async fn play_completion_alert_within(alert: &AlertCommand, limit: Duration) -> Result<(), String> {
    match alert {
        AlertCommand::Bell => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(b"\x07")
                .await
                .map_err(|e| format!("Failed to ring terminal bell: {}", e))?;
            stdout.flush()
                .await
                .map_err(|e| format!("Failed to flush terminal bell: {}", e))?;
            debug!("Terminal bell rung");
            Ok(())
        }
        AlertCommand::Command { program, args } => {
            debug!("Running alert command {} {:?}", program, args);

            let run = Command::new(program)
                .args(args)
                .kill_on_drop(true)
                .output();

            let output = timeout(limit, run)
                .await
                .map_err(|_| format!("{} did not finish within {:?}", program, limit))?
                .map_err(|e| format!("Failed to execute {}: {}", program, e))?;

            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr);
                return Err(format!("{} failed: {}", program, stderr.trim()));
            }

            info!("Completion alert played");
            Ok(())
        }
    }
}

/// Check whether the alert program can be launched at all
pub async fn check_alert_available(alert: &AlertCommand) -> Result<(), String> {
    let AlertCommand::Command { program, .. } = alert else {
        return Ok(());
    };

    match Command::new("which").arg(program).output().await {
        Ok(output) if output.status.success() => {
            info!("Alert program {} is available", program);
            Ok(())
        }
        Ok(_) => Err(format!("Alert program {} was not found on PATH", program)),
        Err(e) => {
            warn!("Could not look up {}: {}", program, e);
            Ok(())
        }
    }
}

use std::process::{Command, Stdio};

use crate::config::PlayerConfig;
use crate::error::PlayerError;

/// Hands embed player and trailer URLs to an external opener (a browser, usually)
pub struct Player {
    config: PlayerConfig,
}

impl Player {
    pub fn new(config: PlayerConfig) -> Self {
        Self { config }
    }

    /// Check if the configured opener is available in PATH
    pub fn is_available(&self) -> bool {
        which::which(&self.config.command).is_ok()
    }

    /// Full command line for `url`, without running it
    pub fn command_line(&self, url: &str) -> Vec<String> {
        let mut line = Vec::with_capacity(self.config.args.len() + 2);
        line.push(self.config.command.clone());
        line.extend(self.config.args.iter().cloned());
        line.push(url.to_string());
        line
    }

    /// Open a URL with the configured command
    pub fn open(&self, url: &str) -> Result<(), PlayerError> {
        if !self.is_available() {
            return Err(PlayerError::NotFound(self.config.command.clone()));
        }

        let mut cmd = Command::new(&self.config.command);
        cmd.args(&self.config.args).arg(url);

        // Openers hand off to a GUI application; keep the terminal clean
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit());

        tracing::info!("Opening player: {}", self.command_line(url).join(" "));

        let status = cmd
            .status()
            .map_err(|e| PlayerError::LaunchFailed(e.to_string()))?;

        if !status.success() {
            if let Some(code) = status.code() {
                return Err(PlayerError::ExitError(format!("Exit code: {}", code)));
            }
        }

        Ok(())
    }
}

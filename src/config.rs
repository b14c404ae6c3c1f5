//! Configuration and CLI argument handling

use std::path::PathBuf;
use clap::Parser;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "just-hiit")]
#[command(about = "An interval workout timer server with spoken cues")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "5000")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Directory holding the built web UI
    #[arg(long, default_value = "dist/public")]
    pub static_dir: PathBuf,

    /// JSON file the workout settings are saved to
    #[arg(long, default_value = "hiit-settings.json")]
    pub settings_file: PathBuf,

    /// Text-to-speech command line; the phrase is appended as the last argument
    #[arg(long, default_value = "espeak")]
    pub speech_command: String,

    /// Never speak cues, fall back to the terminal bell and the log
    #[arg(long)]
    pub no_speech: bool,

    /// Do not inhibit host sleep while a workout is running
    #[arg(long)]
    pub no_keep_awake: bool,

    /// Start a workout as soon as the server is up
    #[arg(long)]
    pub autostart: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

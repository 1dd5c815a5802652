//! Config command - inspect and reset configuration.

use anyhow::Result;
use clap::{Args, Subcommand};
use osiris_store::{
    SettingsStore, default_config_dir, default_schedule_cache_path, default_settings_path,
    default_token_path,
};

use super::emit;
use crate::Cli;
use crate::output::ActionOutput;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration.
    Show,

    /// Show configuration paths.
    Path,

    /// Reset to defaults.
    Reset,
}

/// Runs the config command.
pub async fn run(args: &ConfigArgs, cli: &Cli) -> Result<()> {
    match &args.action {
        ConfigAction::Show => show_config(cli).await,
        ConfigAction::Path => show_paths(cli),
        ConfigAction::Reset => reset_config(cli).await,
    }
}

async fn show_config(cli: &Cli) -> Result<()> {
    let store = SettingsStore::load_default().await?;
    let settings = store.get();

    emit(cli, settings, |f| {
        [
            f.paint(crate::output::Style::Bold, "Osiris Configuration"),
            "─".repeat(40),
            format!("Language:          {}", settings.language),
            format!("Request timeout:   {}s", settings.request_timeout_secs),
            format!("Result limit:      {}", settings.result_limit),
            format!("Default weeks:     {}", settings.default_weeks),
            format!("Schedule cache:    {}", on_off(settings.schedule_cache_enabled)),
        ]
        .join("\n")
    })
}

fn show_paths(cli: &Cli) -> Result<()> {
    let config_dir = default_config_dir();
    let settings_path = default_settings_path();
    let cache_path = default_schedule_cache_path();
    let token_path = default_token_path();

    let paths = serde_json::json!({
        "config_dir": config_dir.display().to_string(),
        "settings_file": settings_path.display().to_string(),
        "schedule_cache": cache_path.display().to_string(),
        "token_file": token_path.display().to_string(),
    });
    emit(cli, &paths, |_| {
        [
            format!("Config dir:     {}", config_dir.display()),
            format!("Settings file:  {}", settings_path.display()),
            format!("Schedule cache: {}", cache_path.display()),
            format!("Token file:     {}", token_path.display()),
        ]
        .join("\n")
    })
}

async fn reset_config(cli: &Cli) -> Result<()> {
    let mut store = SettingsStore::new(default_settings_path());
    store.reset().await?;
    emit(cli, &ActionOutput::new("config_reset", true), |_| {
        "Configuration reset to defaults".to_string()
    })
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}

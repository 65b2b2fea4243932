use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::logging::{self, LogTarget};
use crate::services::{
    load_calendar, HttpFetcher, SettingsService, SettingsStore, UsernameOverride,
};
use crate::tui::{self, widgets::heatmap::GridSurface, Theme};
use crate::types::CalendarData;

/// GitHub contribution calendar in your terminal
#[derive(Parser)]
#[command(name = "contribgraph")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// GitHub username (overrides CONTRIBGRAPH_USER and the settings file)
    #[arg(short, long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch interactive TUI (default)
    Tui,

    /// Print the contribution grid once
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage stored settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Store the GitHub username
    SetUser { username: String },
    /// Print the stored settings
    Show,
    /// Remove the stored username
    Clear,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            None | Some(Commands::Tui) => {
                logging::init(LogTarget::File);
                // Detect before raw mode
                let theme = Theme::detect();
                let store = UsernameOverride::from_env(SettingsService::new()?, self.user);
                tui::run(Arc::new(store), Arc::new(HttpFetcher::new()?), theme)
            }
            Some(Commands::Show { json }) => {
                logging::init(LogTarget::Stderr);
                let store = UsernameOverride::from_env(SettingsService::new()?, self.user);
                let data = load_calendar(&store, &HttpFetcher::new()?)?;
                print!("{}", render_show(&data, json)?);
                Ok(())
            }
            Some(Commands::Config { action }) => {
                logging::init(LogTarget::Stderr);
                run_config(&SettingsService::new()?, action)
            }
        }
    }
}

fn run_config(service: &SettingsService, action: ConfigAction) -> anyhow::Result<()> {
    match action {
        ConfigAction::SetUser { username } => {
            let settings = service.set_username(&username)?;
            println!(
                "Username set to {} ({})",
                settings.username().unwrap_or_default(),
                service.path().display()
            );
        }
        ConfigAction::Show => {
            let settings = service.load()?;
            println!("settings: {}", service.path().display());
            println!("username: {}", settings.username().unwrap_or("(not set)"));
            println!("base_url: {}", settings.base_url);
        }
        ConfigAction::Clear => {
            service.clear_username()?;
            println!("Username cleared");
        }
    }
    Ok(())
}

/// Text or JSON output for `show`
fn render_show(data: &CalendarData, json: bool) -> anyhow::Result<String> {
    if json {
        let mut out = serde_json::to_string_pretty(data).context("serializing calendar")?;
        out.push('\n');
        return Ok(out);
    }

    let mut surface = GridSurface::new();
    surface.render(&data.total_label, &data.weeks);
    Ok(format!(
        "{}\n@{} on GitHub · {}\n",
        surface.to_plain_text(),
        data.username,
        data.profile_url
    ))
}

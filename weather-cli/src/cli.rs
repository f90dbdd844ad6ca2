use anyhow::{Context, anyhow, bail};
use clap::{Parser, Subcommand};
use inquire::Text;
use weather_core::{
    Config, ExportFormat, HistoryList, HttpBackend, Orchestrator, backend_from_config,
};

use crate::{app, view};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather lookup and trip history client")]
pub struct Cli {
    /// Backend base URL, overriding the configured one.
    #[arg(long, global = true)]
    pub backend: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the backend address.
    Configure,

    /// Show current conditions and the 5-day forecast for a location.
    Search {
        /// City name, postal code, "lat,lon" or landmark.
        location: String,
    },

    /// Search a location and save it with a trip date range.
    Save {
        location: String,

        /// Trip start date (YYYY-MM-DD); defaults to today.
        #[arg(long)]
        start: Option<String>,

        /// Trip end date (YYYY-MM-DD); defaults to five days from today.
        #[arg(long)]
        end: Option<String>,
    },

    /// List saved searches, newest first.
    History,

    /// Show a saved search with its stored forecast.
    Show { id: i64 },

    /// Re-fetch a saved search on the backend and show it.
    Refresh { id: i64 },

    /// Delete a saved search and its forecast.
    Delete {
        id: i64,

        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },

    /// Print export download links.
    Export {
        /// "csv" or "json"; both when omitted.
        #[arg(long)]
        format: Option<String>,
    },

    /// Interactive session (default).
    App,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load()?;
        tracing::debug!(
            backend = self.backend.as_deref().unwrap_or(config.backend_url()),
            "starting"
        );

        if let Some(Command::Configure) = self.command {
            return configure(&mut config);
        }

        let backend = backend_from_config(&config, self.backend.as_deref())?;
        let mut orch = Orchestrator::new(backend.clone());
        let mut history = HistoryList::new(backend.clone());

        match self.command.unwrap_or(Command::App) {
            Command::Configure | Command::App => app::run(backend).await?,

            Command::Search { location } => {
                orch.search(&location).await;
                print_screen(&orch)?;
            }

            Command::Save {
                location,
                start,
                end,
            } => {
                orch.search(&location).await;
                fail_on_error(&orch)?;

                orch.request_save();
                let defaults = orch
                    .state()
                    .save_prompt
                    .as_ref()
                    .map(|p| p.defaults)
                    .ok_or_else(|| anyhow!("Nothing to save for '{location}'"))?;
                let start = start.unwrap_or_else(|| defaults.start.to_string());
                let end = end.unwrap_or_else(|| defaults.end.to_string());

                orch.confirm_save(&start, &end).await;
                if let Some(err) = orch.state().save_prompt.as_ref().and_then(|p| p.error.clone()) {
                    bail!(err);
                }
                print_screen(&orch)?;
            }

            Command::History => {
                load_history(&mut history).await?;
                match view::history_list(history.records()) {
                    Some(list) => println!("{list}"),
                    None => println!("No saved searches."),
                }
            }

            Command::Show { id } => {
                load_history(&mut history).await?;
                let record = history
                    .get(id)
                    .cloned()
                    .ok_or_else(|| anyhow!("No saved search with id {id}"))?;
                orch.select_history(record).await;
                print_screen(&orch)?;
            }

            Command::Refresh { id } => {
                load_history(&mut history).await?;
                let record = history
                    .get(id)
                    .cloned()
                    .ok_or_else(|| anyhow!("No saved search with id {id}"))?;
                orch.select_history(record).await;
                fail_on_error(&orch)?;
                orch.refresh().await;
                print_screen(&orch)?;
            }

            Command::Delete { id, yes } => {
                let deleted = if yes {
                    history.delete(id, &|_: &str| true).await?
                } else {
                    history.delete(id, &app::confirm_in_terminal).await?
                };
                if deleted {
                    println!("Deleted saved search #{id}.");
                } else {
                    println!("Cancelled.");
                }
            }

            Command::Export { format } => match format {
                Some(format) => {
                    let format = ExportFormat::try_from(format.as_str())?;
                    println!("{}", orch.export_url(format));
                }
                None => println!("{}", view::export_links(backend.as_ref())),
            },
        }

        Ok(())
    }
}

async fn load_history(history: &mut HistoryList) -> anyhow::Result<()> {
    history
        .try_reload()
        .await
        .context("Failed to load saved searches")
}

fn fail_on_error(orch: &Orchestrator) -> anyhow::Result<()> {
    match &orch.state().error {
        Some(err) => Err(anyhow!(err.clone())),
        None => Ok(()),
    }
}

fn print_screen(orch: &Orchestrator) -> anyhow::Result<()> {
    fail_on_error(orch)?;
    println!("{}", view::screen(orch.state()));
    Ok(())
}

fn configure(config: &mut Config) -> anyhow::Result<()> {
    let url = Text::new("Backend URL:")
        .with_default(config.backend_url())
        .prompt()
        .context("Failed to read backend URL")?;

    HttpBackend::new(url.trim(), config.timeout())?;
    config.set_backend_url(url.trim());
    config.save()?;

    println!(
        "Saved backend URL to {}",
        Config::config_file_path()?.display()
    );
    Ok(())
}

//! Interactive session: one screen, one menu, repeated until quit.

use anyhow::Result;
use inquire::{InquireError, Select, Text};
use std::{fmt, sync::Arc};
use weather_core::{HistoryList, HistoryRecord, Orchestrator, WeatherBackend};

use crate::view;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuItem {
    Search,
    Save,
    Refresh,
    Open,
    Delete,
    Export,
    Quit,
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MenuItem::Search => "Search a location",
            MenuItem::Save => "Save to history",
            MenuItem::Refresh => "Refresh data",
            MenuItem::Open => "Open a saved search",
            MenuItem::Delete => "Delete a saved search",
            MenuItem::Export => "Export links",
            MenuItem::Quit => "Quit",
        })
    }
}

/// Entries that make sense for the current state.
fn menu(orch: &Orchestrator, history: &HistoryList) -> Vec<MenuItem> {
    let state = orch.state();
    let mut items = vec![MenuItem::Search];

    if state.weather.is_some() {
        items.push(if state.is_from_history() {
            MenuItem::Refresh
        } else {
            MenuItem::Save
        });
    }
    if !history.records().is_empty() {
        items.extend([MenuItem::Open, MenuItem::Delete]);
    }
    items.extend([MenuItem::Export, MenuItem::Quit]);
    items
}

struct RecordChoice<'a>(&'a HistoryRecord);

impl fmt::Display for RecordChoice<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.0.id, self.0.conditions.display_name())?;
        if let Some(trip) = self.0.trip() {
            write!(f, " ({trip})")?;
        }
        Ok(())
    }
}

/// `Ok(None)` when the user backs out with Esc.
fn cancellable<T>(res: Result<T, InquireError>) -> Result<Option<T>> {
    match res {
        Ok(v) => Ok(Some(v)),
        Err(InquireError::OperationCanceled) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn confirm_in_terminal(prompt: &str) -> bool {
    inquire::Confirm::new(prompt)
        .with_default(false)
        .prompt()
        .unwrap_or(false)
}

fn pick_record(history: &HistoryList, title: &str) -> Result<Option<i64>> {
    let choices: Vec<_> = history.records().iter().map(RecordChoice).collect();
    Ok(cancellable(Select::new(title, choices).prompt())?.map(|c| c.0.id))
}

async fn save_flow(orch: &mut Orchestrator) -> Result<()> {
    orch.request_save();

    while let Some(prompt) = orch.state().save_prompt.clone() {
        println!("{}", view::date_range_prompt(&prompt));

        let start = Text::new("Start date (YYYY-MM-DD):")
            .with_default(&prompt.defaults.start.to_string())
            .prompt();
        let Some(start) = cancellable(start)? else {
            orch.cancel_save();
            break;
        };

        let end = Text::new("End date (YYYY-MM-DD):")
            .with_default(&prompt.defaults.end.to_string())
            .prompt();
        let Some(end) = cancellable(end)? else {
            orch.cancel_save();
            break;
        };

        orch.confirm_save(&start, &end).await;
    }

    Ok(())
}

pub async fn run(backend: Arc<dyn WeatherBackend>) -> Result<()> {
    let mut orch = Orchestrator::new(Arc::clone(&backend));
    let mut history = HistoryList::new(backend);

    loop {
        history.sync(orch.state().history_reload).await;

        let screen = view::screen(orch.state());
        if !screen.is_empty() {
            println!("{screen}\n");
        }
        if let Some(list) = view::history_list(history.records()) {
            println!("{list}\n");
        }
        orch.dismiss_notice();

        let Some(choice) = cancellable(Select::new("What next?", menu(&orch, &history)).prompt())?
        else {
            break;
        };

        match choice {
            MenuItem::Search => {
                let input = Text::new("Location:")
                    .with_placeholder(view::SEARCH_PLACEHOLDER)
                    .prompt();
                if let Some(input) = cancellable(input)? {
                    orch.search(&input).await;
                }
            }
            MenuItem::Save => save_flow(&mut orch).await?,
            MenuItem::Refresh => orch.refresh().await,
            MenuItem::Open => {
                if let Some(id) = pick_record(&history, "Open which saved search?")? {
                    if let Some(record) = history.get(id).cloned() {
                        orch.select_history(record).await;
                    }
                }
            }
            MenuItem::Delete => {
                if let Some(id) = pick_record(&history, "Delete which saved search?")? {
                    if let Err(e) = history.delete(id, &confirm_in_terminal).await {
                        println!("✗ Failed to delete record: {e}");
                    }
                }
            }
            MenuItem::Export => println!("{}\n", view::export_links(orch.backend().as_ref())),
            MenuItem::Quit => break,
        }
    }

    Ok(())
}

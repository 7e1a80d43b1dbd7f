mod action;
mod app;
mod auth;
mod config;
mod error;
mod event;
mod fetcher;
mod filter;
mod selection;
mod source;
mod tmdb;
mod tui;
mod types;
mod ui;

use std::panic;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::action::Action;
use crate::app::App;
use crate::config::Config;
use crate::error::MarqueeError;
use crate::event::Event;
use crate::tmdb::Tmdb;
use crate::tui::EventHandler;
use crate::types::Category;

/// Browse TMDB movie listings in the terminal
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Listing to open with
    #[arg(short, long, value_parser = parse_category)]
    category: Option<Category>,

    /// Response language, e.g. "de-DE"
    #[arg(short, long)]
    language: Option<String>,

    /// Config file (default: ~/.config/marquee/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn parse_category(s: &str) -> Result<Category, String> {
    Category::ALL
        .into_iter()
        .find(|c| c.as_api_str() == s.replace('-', "_"))
        .ok_or_else(|| {
            let names: Vec<_> = Category::ALL.iter().map(|c| c.as_api_str()).collect();
            format!("unknown category '{}', expected one of: {}", s, names.join(", "))
        })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = match &cli.config {
        Some(path) if !path.exists() => {
            let msg = format!("{} does not exist", path.display());
            return Err(MarqueeError::Config(msg).into());
        }
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    if let Some(language) = cli.language {
        config.api.language = language;
    }
    let category = cli.category.unwrap_or(config.general.default_category);

    let api_key = auth::load_api_key(&config.api)?;
    let tmdb = Tmdb::new(&config.api, api_key)?;

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = tui::restore();
        original_hook(panic_info);
    }));

    let result = run(Arc::new(tmdb), category, config.general.load_more_threshold).await;

    tui::restore()?;

    result
}

async fn run(
    tmdb: Arc<Tmdb>,
    category: Category,
    load_more_threshold: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut terminal = tui::init()?;

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let mut app = App::new(tmdb, category, load_more_threshold, action_tx.clone());

    let tick_rate = Duration::from_millis(250);
    let render_rate = Duration::from_millis(16); // ~60fps
    let mut events = EventHandler::new(tick_rate, render_rate);

    loop {
        tokio::select! {
            Some(event) = events.next() => {
                if event.is_quit() {
                    break;
                }

                match event {
                    Event::Render => {
                        terminal.draw(|frame| ui::render(frame, &app))?;
                    }
                    Event::Resize => {
                        terminal.autoresize()?;
                    }
                    _ => {
                        let action = app.handle_event(event);
                        if !matches!(action, Action::None) {
                            action_tx.send(action)?;
                        }
                    }
                }
            }
            Some(action) = action_rx.recv() => {
                app.update(action);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_flag_accepts_api_names_and_dashes() {
        assert_eq!(parse_category("top_rated"), Ok(Category::TopRated));
        assert_eq!(parse_category("now-playing"), Ok(Category::NowPlaying));
        assert!(parse_category("cult").unwrap_err().contains("upcoming"));
    }

    #[test]
    fn cli_parses_overrides() {
        let cli = Cli::parse_from(["marquee", "-c", "popular", "--language", "de-DE"]);
        assert_eq!(cli.category, Some(Category::Popular));
        assert_eq!(cli.language.as_deref(), Some("de-DE"));
        assert!(cli.config.is_none());
    }
}

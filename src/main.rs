use anyhow::{bail, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use wallmodal::cli::{Cli, Commands};
use wallmodal::page::{COLLECTION_ID_KEY, WALLPAPER_ID_KEY};
use wallmodal::{
    load_config, run_modal_loop, Config, Document, Element, HttpFragmentApi, PageEvent,
    WallpaperModal,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Open {
            wallpaper_id,
            collection_id,
        } => open_once(&config, wallpaper_id, collection_id).await,
        Commands::Replay { script } => replay_script(&config, &script).await,
    }
}

/// Build a one-element page, click it, and report the modal that results.
async fn open_once(
    config: &Config,
    wallpaper_id: Option<String>,
    collection_id: Option<String>,
) -> Result<()> {
    let mut document = Document::new();
    document.delegate(&config.trigger_class);

    let mut element = Element::new("cli-trigger").with_class(&config.trigger_class);
    if let Some(id) = &wallpaper_id {
        element = element.with_data(WALLPAPER_ID_KEY, id);
    }
    if let Some(id) = &collection_id {
        element = element.with_data(COLLECTION_ID_KEY, id);
    }
    document.insert(element);

    let (events_tx, events_rx) = mpsc::channel(1);
    events_tx
        .send(PageEvent::Click {
            id: "cli-trigger".to_string(),
        })
        .await
        .context("event loop closed before the click was delivered")?;
    drop(events_tx);

    let spinner = start_spinner("Loading wallpaper modal...");
    let modal = run_loop(config, document, events_rx).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    print_modal(&modal);
    if let Some(error) = modal.error() {
        bail!("modal load failed: {}", error);
    }
    Ok(())
}

/// Replay a scripted page session (JSON array of page events).
async fn replay_script(config: &Config, script: &std::path::Path) -> Result<()> {
    let raw = fs::read_to_string(script)
        .with_context(|| format!("failed to read script {}", script.display()))?;
    let events: Vec<PageEvent> = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse script {}", script.display()))?;

    let mut document = Document::new();
    document.delegate(&config.trigger_class);

    let (events_tx, events_rx) = mpsc::channel(events.len().max(1));
    for event in events {
        events_tx
            .send(event)
            .await
            .context("event loop closed before the script finished")?;
    }
    drop(events_tx);

    let modal = run_loop(config, document, events_rx).await;
    print_modal(&modal);
    Ok(())
}

async fn run_loop(
    config: &Config,
    document: Document,
    events: mpsc::Receiver<PageEvent>,
) -> WallpaperModal {
    let api = Arc::new(HttpFragmentApi::new(
        &config.server_url,
        Duration::from_secs(config.request_timeout_secs),
    ));
    run_modal_loop(
        api,
        document,
        WallpaperModal::new(),
        config.fragment_policy,
        events,
    )
    .await
}

fn start_spinner(message: &str) -> Option<ProgressBar> {
    if !atty::is(atty::Stream::Stderr) {
        return None;
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    Some(spinner)
}

fn print_modal(modal: &WallpaperModal) {
    if let Some(error) = modal.error() {
        eprintln!("wallmodal: last activation failed: {}", error);
    }
    println!("modal visible: {}", modal.is_visible());
    if modal.is_visible() {
        println!("{}", modal.content());
    }
}

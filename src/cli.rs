use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "wallmodal",
    version,
    about = "Client-side loader for the wallpaper gallery detail modal"
)]
pub struct Cli {
    /// TOML config file; defaults to $WALLMODAL_CONFIG or the platform
    /// config dir
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Simulate one trigger activation and print the resulting modal state
    Open {
        /// Wallpaper identifier; omitted from the request when absent
        #[arg(long)]
        wallpaper_id: Option<String>,
        /// Collection identifier; omitted from the request when absent
        #[arg(long)]
        collection_id: Option<String>,
    },
    /// Replay a JSON page-event script through the modal event loop
    Replay {
        /// Path to a JSON array of page events (add_element / remove_element
        /// / click)
        script: PathBuf,
    },
}

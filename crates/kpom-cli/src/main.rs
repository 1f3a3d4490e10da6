use clap::{Parser, Subcommand};
use colored::Colorize;
use kpom::{
    commands::{
        config::{self, ConfigAction},
        decode::{self, DecodeCommand},
        merge::{self, MergeCommand},
        render::{self, RenderCommand},
    },
    logging, GlobalOpts,
};
use kpom_config::Settings;
use kpom_model::DescriptorEngine;
use tracing::warn;

#[derive(Parser)]
#[command(name = "kpom")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Project descriptor editor",
    long_about = "kpom renders, merges and decodes kjar project descriptors, keeping every part of an existing descriptor it does not edit."
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a new descriptor from an edit model
    Render(RenderCommand),
    /// Apply an edit model onto an existing descriptor
    Merge(MergeCommand),
    /// Print the edit model of a descriptor
    Decode(DecodeCommand),
    /// Show or change kpom settings
    #[command(subcommand_required = false, arg_required_else_help = false)]
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

fn main() {
    let cli = Cli::parse();

    let (settings, load_error) = match Settings::load() {
        Ok(settings) => (settings, None),
        Err(e) => (Settings::default(), Some(e)),
    };
    logging::init_logging(&cli.global, settings.log_filter.as_deref());
    if let Some(e) = load_error {
        warn!("Ignoring settings file {}: {}", Settings::path().display(), e);
    }

    let engine = DescriptorEngine::new(settings.plugin_spec());
    let result = match cli.command {
        Commands::Render(cmd) => render::handle_render(&cmd, &engine),
        Commands::Merge(cmd) => merge::handle_merge(&cmd, &engine),
        Commands::Decode(cmd) => decode::handle_decode(&cmd),
        Commands::Config { action } => config::handle_config(action, &settings),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

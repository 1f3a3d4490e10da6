use crate::errors::CliError;
use crate::model_io::{read_model, write_output};
use clap::Args;
use kpom_model::DescriptorEngine;
use std::path::PathBuf;
use tracing::info;

/// Write a new descriptor for an edit model
#[derive(Args, Debug, Clone)]
pub struct RenderCommand {
    /// Edit model file (.json, .toml, .yaml)
    pub model: PathBuf,

    /// Write the descriptor here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn handle_render(cmd: &RenderCommand, engine: &DescriptorEngine) -> Result<(), CliError> {
    let model = read_model(&cmd.model)?;
    let descriptor = engine.render(&model)?;
    write_output(cmd.output.as_deref(), &descriptor)?;
    info!("Rendered descriptor for {}", model.gav);
    Ok(())
}

use crate::errors::CliError;
use crate::model_io::{read_model, read_text, write_output};
use clap::Args;
use kpom_model::DescriptorEngine;
use std::path::PathBuf;
use tracing::info;

/// Apply an edit model onto an existing descriptor
#[derive(Args, Debug, Clone)]
pub struct MergeCommand {
    /// Edit model file (.json, .toml, .yaml)
    pub model: PathBuf,

    /// Descriptor to merge into
    pub descriptor: PathBuf,

    /// Write the merged descriptor here instead of stdout
    #[arg(short, long, conflicts_with = "in_place")]
    pub output: Option<PathBuf>,

    /// Overwrite the descriptor file
    #[arg(long)]
    pub in_place: bool,
}

impl MergeCommand {
    fn destination(&self) -> Option<&std::path::Path> {
        if self.in_place {
            Some(self.descriptor.as_path())
        } else {
            self.output.as_deref()
        }
    }
}

pub fn handle_merge(cmd: &MergeCommand, engine: &DescriptorEngine) -> Result<(), CliError> {
    let model = read_model(&cmd.model)?;
    let original = read_text(&cmd.descriptor)?;
    let merged = engine
        .merge(&model, &original)
        .map_err(|source| CliError::Descriptor {
            path: cmd.descriptor.clone(),
            source,
        })?;
    write_output(cmd.destination(), &merged)?;
    info!("Merged {} into {}", model.gav, cmd.descriptor.display());
    Ok(())
}

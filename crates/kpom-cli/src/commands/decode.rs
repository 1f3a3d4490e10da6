use crate::errors::CliError;
use crate::model_io::{format_model, read_text, write_output, ModelFormat};
use clap::Args;
use kpom_model::decode;
use std::path::PathBuf;

/// Print the edit model carried by a descriptor
#[derive(Args, Debug, Clone)]
pub struct DecodeCommand {
    /// Descriptor to read
    pub descriptor: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = ModelFormat::Json)]
    pub format: ModelFormat,
}

pub fn handle_decode(cmd: &DecodeCommand) -> Result<(), CliError> {
    let text = read_text(&cmd.descriptor)?;
    let model = decode(&text).map_err(|source| CliError::Descriptor {
        path: cmd.descriptor.clone(),
        source,
    })?;
    write_output(None, &format_model(&model, cmd.format)?)
}

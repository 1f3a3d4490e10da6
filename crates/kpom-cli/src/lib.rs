//! kpom library - command implementations shared with the integration tests

pub mod commands;
pub mod common;
pub mod errors;
pub mod logging;
pub mod model_io;

pub use common::GlobalOpts;
pub use errors::CliError;

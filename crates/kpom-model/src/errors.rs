use crate::types::IdentityField;
use kpom_tree::MalformedDescriptorError;
use thiserror::Error;

/// Errors that can occur while mapping or merging descriptors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error(transparent)]
    Malformed(#[from] MalformedDescriptorError),

    #[error("Malformed descriptor: expected root element <project>, found <{found}>")]
    UnexpectedRoot { found: String },

    #[error("Incomplete identity: '{field}' is not set and no parent reference provides it")]
    IncompleteIdentity { field: IdentityField },
}

impl ModelError {
    /// True when the input text was not a usable descriptor document
    pub fn is_malformed(&self) -> bool {
        matches!(self, ModelError::Malformed(_) | ModelError::UnexpectedRoot { .. })
    }
}

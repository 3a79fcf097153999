use thiserror::Error;

/// Errors that can occur while resolving a healthcare relation graph.
#[derive(Error, Debug)]
pub enum HealthGraphError {
    #[error("invalid entity reference: '{reference}'")]
    InvalidReference { reference: String },

    #[error("cyclic relation graph: {}", format_path(.path))]
    CyclicRelationGraph { path: Vec<usize> },

    #[error("duplicate relation from entity {from} to entity {to}")]
    DuplicateRelation { from: usize, to: usize },

    #[error("wire error: {message}")]
    Wire { message: String },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl HealthGraphError {
    pub(crate) fn invalid_reference(reference: &str) -> Self {
        HealthGraphError::InvalidReference {
            reference: reference.to_string(),
        }
    }
}

fn format_path(path: &[usize]) -> String {
    path.iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Convenience alias for results using `HealthGraphError`.
pub type Result<T> = std::result::Result<T, HealthGraphError>;

use thiserror::Error;

use crate::catalog::ComponentId;

pub type Result<T> = std::result::Result<T, PlaceError>;

#[derive(Debug, Error)]
pub enum PlaceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid catalog: {0}")]
    Catalog(String),

    #[error("Unknown component: {0}")]
    UnknownComponent(ComponentId),

    #[error("No placement satisfies '{root}' (search exhausted after {steps} steps)")]
    Unsatisfiable { root: ComponentId, steps: u64 },

    #[error("Search budget of {budget} steps exhausted while placing '{root}'")]
    BudgetExhausted { root: ComponentId, budget: u64 },

    #[error("Node {node} sits at offset ({dx}, {dy}) from its parent, which is not a grid neighbour")]
    InvalidOffset { node: usize, dx: i32, dy: i32 },

    #[error("Blueprint decode error: {0}")]
    Decode(String),
}

impl PlaceError {
    /// Both exhaustion and budget cut-off mean the request could not be placed.
    pub fn is_unsatisfiable(&self) -> bool {
        matches!(
            self,
            PlaceError::Unsatisfiable { .. } | PlaceError::BudgetExhausted { .. }
        )
    }
}

impl From<toml::de::Error> for PlaceError {
    fn from(err: toml::de::Error) -> Self {
        PlaceError::Config(format!("TOML parse error: {}", err))
    }
}

impl From<base64::DecodeError> for PlaceError {
    fn from(err: base64::DecodeError) -> Self {
        PlaceError::Decode(format!("base64: {}", err))
    }
}

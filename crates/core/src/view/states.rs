use serde::{Deserialize, Serialize};

use crate::domain::product::Product;

/// Client-side view of the catalog. Exactly one variant holds at a time, so a
/// loaded product list and an error message can never coexist.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ViewState {
    #[default]
    Loading,
    Error {
        message: String,
    },
    Loaded {
        products: Vec<Product>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewStatus {
    Loading,
    Error,
    Loaded,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewEvent {
    FetchStarted,
    FetchSucceeded(Vec<Product>),
    /// The service answered but reported `success: false`.
    FetchRejected,
    FetchFailed(String),
}

impl ViewState {
    pub fn status(&self) -> ViewStatus {
        match self {
            Self::Loading => ViewStatus::Loading,
            Self::Error { .. } => ViewStatus::Error,
            Self::Loaded { .. } => ViewStatus::Loaded,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error { message } => Some(message),
            _ => None,
        }
    }

    pub fn products(&self) -> &[Product] {
        match self {
            Self::Loaded { products } => products,
            _ => &[],
        }
    }
}

impl ViewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Error => "error",
            Self::Loaded => "loaded",
        }
    }
}

impl std::fmt::Display for ViewStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ViewEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::FetchStarted => "fetch_started",
            Self::FetchSucceeded(_) => "fetch_succeeded",
            Self::FetchRejected => "fetch_rejected",
            Self::FetchFailed(_) => "fetch_failed",
        }
    }
}

use thiserror::Error;

/// Failures the dashboard can observe. None of them is fatal to the page.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("request to {endpoint} failed: {message}")]
    Request { endpoint: String, message: String },

    #[error("{endpoint} responded with status {status}")]
    Status { endpoint: String, status: u16 },

    #[error("failed to decode response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    #[error("invalid dashboard configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl DashboardError {
    pub fn request(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Request {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    pub fn decode(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }
}

pub type Result<T, E = DashboardError> = std::result::Result<T, E>;

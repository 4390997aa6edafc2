//! Error taxonomy for a translate call.
//!
//! Every failure maps into one of five reportable kinds before it reaches the
//! caller. An error that already carries a kind is forwarded untouched; only
//! unrecognized failures get wrapped into `Unknown`.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    Network,
    NotFound,
    Param,
    SecretKey,
    Unknown,
}

#[derive(Debug, Error)]
pub enum SolveError {
    #[error("{message}")]
    Network { message: String, detail: String },

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Param(String),

    #[error("{0}")]
    SecretKey(String),

    #[error("{message}")]
    Unknown { message: String, detail: String },

    /// The caller aborted the request. Boundary adapters swallow this
    /// instead of reporting it.
    #[error("request cancelled")]
    Cancelled,
}

impl SolveError {
    pub fn network(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            detail: detail.into(),
        }
    }

    pub fn unknown(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Unknown {
            message: message.into(),
            detail: detail.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Network { .. } => ErrorKind::Network,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Param(_) => ErrorKind::Param,
            Self::SecretKey(_) => ErrorKind::SecretKey,
            Self::Unknown { .. } | Self::Cancelled => ErrorKind::Unknown,
        }
    }

    pub fn to_record(&self) -> ErrorRecord {
        let detail = match self {
            Self::Network { detail, .. } | Self::Unknown { detail, .. } => detail.clone(),
            _ => String::new(),
        };
        let help_link = match self {
            Self::SecretKey(_) => Some("https://platform.openai.com/api-keys".to_string()),
            _ => None,
        };
        ErrorRecord {
            kind: self.kind(),
            message: self.to_string(),
            detail,
            help_link,
        }
    }
}

/// Uniform failure shape handed to boundary adapters.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorRecord {
    pub kind: ErrorKind,
    pub message: String,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_link: Option<String>,
}

/// Fold a transport failure into the taxonomy, sub-classifying the usual
/// suspects into a friendlier message plus a remediation hint.
pub(crate) fn classify_transport_error(err: &reqwest::Error) -> SolveError {
    let mut chain = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        chain.push_str(": ");
        chain.push_str(&cause.to_string());
        source = cause.source();
    }
    let lower = chain.to_lowercase();

    let (message, hint) = if err.is_timeout() || lower.contains("timed out") {
        (
            "request timed out",
            "check network connectivity, the API base URL, and whether a proxy is required",
        )
    } else if lower.contains("connection refused") {
        (
            "connection refused",
            "verify the API base URL and that any configured proxy is running",
        )
    } else if lower.contains("dns") || lower.contains("failed to lookup") {
        (
            "DNS lookup failed",
            "check the hostname in the API base URL and the network connection",
        )
    } else if lower.contains("certificate") || lower.contains("tls") || lower.contains("ssl") {
        (
            "TLS certificate verification failed",
            "check the network environment or proxy settings",
        )
    } else if lower.contains("connection reset") || lower.contains("broken pipe") {
        (
            "connection reset by peer",
            "check network stability and proxy settings",
        )
    } else if lower.contains("proxy") {
        (
            "proxy connection failed",
            "verify the proxy address and that the proxy service is running",
        )
    } else {
        ("network request failed", "")
    };

    let detail = if hint.is_empty() {
        chain
    } else {
        format!("{hint} ({chain})")
    };
    SolveError::network(message, detail)
}

/// Best-effort extraction of an upstream error message from a failure body.
/// Falls back to a bounded preview of the raw text.
pub(crate) fn extract_api_error(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(msg) = value.pointer("/error/message").and_then(|m| m.as_str()) {
            return msg.to_string();
        }
        if let Some(msg) = value.get("error").and_then(|m| m.as_str()) {
            return msg.to_string();
        }
        if let Some(msg) = value.get("message").and_then(|m| m.as_str()) {
            return msg.to_string();
        }
        if let Some(msg) = value.get("msg").and_then(|m| m.as_str()) {
            return msg.to_string();
        }
    }
    body.chars().take(500).collect()
}

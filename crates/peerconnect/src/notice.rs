//! Transient user-visible notices.
//!
//! View operations report their outcome as a [`Notice`] rather than an error,
//! so a failed write is shown to the user without aborting the view.

use std::fmt;

use serde::Serialize;

/// How a notice should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// The action succeeded.
    Success,
    /// Nothing changed, for information only.
    Info,
    /// The action failed; state was left unchanged.
    Error,
}

/// A short message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// Presentation severity.
    pub severity: Severity,
    /// Message text.
    pub message: String,
}

impl Notice {
    /// A success notice.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Success,
            message: message.into(),
        }
    }

    /// An informational notice.
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            message: message.into(),
        }
    }

    /// An error notice.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    /// Whether this notice reports a failure.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

//! Headless screen controllers
//!
//! Each controller holds the loaded list, the form draft, the banner and the
//! route navigation should take next. A renderer reads that state after each
//! operation.

mod auth_screen;
mod obras_screen;

pub use auth_screen::AuthScreen;
pub use obras_screen::{ObrasScreen, Tab, CREATED_MESSAGE, UPDATED_MESSAGE};

/// Screen the user should be looking at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Login / registration
    Auth,
    /// Production catalog
    Obras,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    Success,
    Error,
    Info,
}

/// Transient banner message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub message: String,
    pub kind: FeedbackKind,
}

impl Feedback {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: FeedbackKind::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: FeedbackKind::Error,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: FeedbackKind::Info,
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == FeedbackKind::Error
    }
}

impl std::fmt::Display for Feedback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

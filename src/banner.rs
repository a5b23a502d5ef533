use crate::errors::ApiError;

/// Dismissible error banner: at most one message at a time.
///
/// A newer error replaces the older one; nothing is queued. Dismissing has
/// no effect on requests in flight.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorBanner {
    message: Option<String>,
}

impl ErrorBanner {
    pub const TITLE: &'static str = "Error";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    /// Show the server's message, or `fallback` when it sent none.
    pub fn show_api_error(&mut self, err: &ApiError, fallback: &str) {
        self.show(err.display_message(fallback));
    }

    pub fn dismiss(&mut self) {
        self.message = None;
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn is_visible(&self) -> bool {
        self.message.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn starts_hidden() {
        let banner = ErrorBanner::new();
        assert!(!banner.is_visible());
        assert!(banner.message().is_none());
    }

    #[test]
    fn newer_error_overwrites_older() {
        let mut banner = ErrorBanner::new();
        banner.show("first");
        banner.show("second");
        assert_eq!(banner.message(), Some("second"));
    }

    #[test]
    fn dismiss_clears() {
        let mut banner = ErrorBanner::new();
        banner.show("boom");
        banner.dismiss();
        assert!(!banner.is_visible());
    }

    #[test]
    fn api_error_uses_server_message_or_fallback() {
        let mut banner = ErrorBanner::new();
        banner.show_api_error(
            &ApiError::Server {
                status: StatusCode::BAD_REQUEST,
                message: "Invalid platform".into(),
            },
            "Failed to create release",
        );
        assert_eq!(banner.message(), Some("Invalid platform"));

        banner.show_api_error(
            &ApiError::Status {
                status: StatusCode::BAD_GATEWAY,
            },
            "Failed to create release",
        );
        assert_eq!(banner.message(), Some("Failed to create release"));
    }
}

// Session expiry notification
// A library cannot navigate a browsing context; the embedding shell
// decides what "redirect to login" means.

/// Receives the configured login path when authentication cannot be
/// recovered. Fired after both stored tokens have been cleared.
pub trait SessionListener: Send + Sync {
    fn on_session_expired(&self, login_path: &str);
}

/// Default listener: records the redirect in the log stream.
#[derive(Debug, Default)]
pub struct LogRedirect;

impl SessionListener for LogRedirect {
    fn on_session_expired(&self, login_path: &str) {
        tracing::warn!(
            login_path = %login_path,
            "Session expired, redirecting to login"
        );
    }
}

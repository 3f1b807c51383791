use tracing::info;

/// Navigation targets this crate can send the user to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    SignIn,
}

/// Screen-to-router seam: fire-and-forget "go to route".
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Blocking user notification seam. The mobile shell renders these as alert
/// dialogs; the demo binary just logs them.
pub trait Notifier: Send + Sync {
    fn alert(&self, message: &str);
}

/// Headless shell used by the demo binary: navigation and alerts become log
/// lines.
#[derive(Debug, Default)]
pub struct TerminalShell;

impl Navigator for TerminalShell {
    fn navigate(&self, route: Route) {
        info!(?route, "navigating");
    }
}

impl Notifier for TerminalShell {
    fn alert(&self, message: &str) {
        info!(alert = %message, "user alert");
    }
}

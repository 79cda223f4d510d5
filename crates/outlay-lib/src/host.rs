use crate::route::Route;

/// Effects the client needs from the page it runs in.
pub trait Host {
    fn navigate(&self, route: &Route);

    /// Shows a short notice to the user.
    fn notify(&self, message: &str);

    /// Asks the user to confirm; `false` when declined.
    fn confirm(&self, message: &str) -> bool;
}

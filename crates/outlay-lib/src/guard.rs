//! Page-level authorization.
//!
//! [`check_access`] decides and returns the navigation effect as a value;
//! [`require_auth`] applies it through a [`Host`].

use crate::host::Host;
use crate::models::Role;
use crate::route::Route;
use crate::session::SessionStore;

pub const PERMISSION_DENIED: &str = "You do not have permission to access this page";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redirect {
    Navigate(Route),
    /// Clear the session, then go to the login page.
    Logout,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Granted,
    Denied {
        notice: Option<String>,
        redirect: Redirect,
    },
}

impl Access {
    pub fn is_granted(&self) -> bool {
        matches!(self, Access::Granted)
    }
}

pub fn redirect_to_dashboard(role: Option<Role>) -> Redirect {
    match role {
        Some(role) => Redirect::Navigate(Route::dashboard(role)),
        None => Redirect::Logout,
    }
}

pub fn check_access(session: &dyn SessionStore, allowed_roles: &[Role]) -> Access {
    if !session.is_authenticated() {
        return Access::Denied {
            notice: None,
            redirect: Redirect::Navigate(Route::Login),
        };
    }
    if allowed_roles.is_empty() {
        return Access::Granted;
    }

    match session.role() {
        Some(role) if allowed_roles.contains(&role) => Access::Granted,
        role => Access::Denied {
            notice: Some(PERMISSION_DENIED.to_string()),
            redirect: redirect_to_dashboard(role),
        },
    }
}

pub fn apply(redirect: &Redirect, session: &dyn SessionStore, host: &dyn Host) {
    match redirect {
        Redirect::Navigate(route) => host.navigate(route),
        Redirect::Logout => {
            session.clear();
            host.navigate(&Route::Login);
        }
    }
}

pub fn require_auth(session: &dyn SessionStore, host: &dyn Host, allowed_roles: &[Role]) -> bool {
    match check_access(session, allowed_roles) {
        Access::Granted => true,
        Access::Denied { notice, redirect } => {
            if let Some(notice) = notice {
                host.notify(&notice);
            }
            info!("access denied, redirecting: {:?}", redirect);
            apply(&redirect, session, host);
            false
        }
    }
}

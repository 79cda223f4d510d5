use std::rc::Rc;

use dominator::{clone, html, link, Dom};
use futures_signals::signal::{Mutable, SignalExt};
use outlay_lib::client::ApiClient;
use outlay_lib::error::Error;
use outlay_lib::models::Role;
use outlay_lib::route::Route;
use outlay_lib::session::SessionStore;

use crate::common::{events, snackbar};
use crate::utils::AsyncLoader;

pub struct Dashboard {
    client: Rc<ApiClient>,
    role: Role,
    user_name: Mutable<Option<String>>,
    loader: AsyncLoader,
}

impl Dashboard {
    pub fn new(client: Rc<ApiClient>, role: Role) -> Rc<Self> {
        let user_name = client.session().load().user_name;
        Rc::new(Self {
            client,
            role,
            user_name: Mutable::new(user_name),
            loader: AsyncLoader::new(),
        })
    }

    fn title(&self) -> &'static str {
        match self.role {
            Role::Admin => "Admin dashboard",
            Role::Manager => "Manager dashboard",
            Role::Employee => "Employee dashboard",
        }
    }

    fn links(&self) -> Vec<(Route, &'static str)> {
        match self.role {
            Role::Admin => vec![
                (Route::CreateEmployee, "Create employee"),
                (Route::Expenses, "Expenses"),
            ],
            Role::Manager | Role::Employee => vec![(Route::Expenses, "My expenses")],
        }
    }

    /// Refreshes the displayed name from the server.
    fn fetch_user(dashboard: Rc<Self>) {
        dashboard.loader.load(clone!(dashboard => async move {
            match dashboard.client.current_user().await {
                Ok(user) => dashboard.user_name.set(Some(user.name)),
                Err(Error::Unauthenticated) => {}
                Err(e) => {
                    warn!("error fetching current user: {}", e);
                }
            }
        }));
    }

    pub fn render_topbar(dashboard: Rc<Self>) -> Dom {
        html!("div", {
            .class("topbar")
            .children(&mut [
                html!("span", {
                    .class("title")
                    .text(dashboard.title())
                }),
                html!("span", {
                    .text_signal(dashboard.user_name.signal_cloned().map(|name| name.unwrap_or_default()))
                }),
                html!("button", {
                    .text("Logout")
                    .event(clone!(dashboard => move |_: events::Click| {
                        dashboard.client.logout();
                        snackbar::show("You have been logged out".to_string());
                    }))
                }),
            ])
        })
    }

    pub fn render(dashboard: Rc<Self>) -> Dom {
        Self::fetch_user(dashboard.clone());

        html!("div", {
            .class("main")
            .children(&mut [
                Self::render_topbar(dashboard.clone()),
                html!("div", {
                    .class("topbar-spacing")
                }),
                html!("div", {
                    .class("content")
                    .children(dashboard.links().into_iter().map(|(route, label)| {
                        link!(route.url(), {
                            .class("card")
                            .text(label)
                        })
                    }))
                }),
            ])
        })
    }
}

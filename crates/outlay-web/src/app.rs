use std::rc::Rc;

use dominator::{clone, html, Dom};
use futures_signals::signal::SignalExt;
use outlay_lib::client::ApiClient;
use outlay_lib::guard;
use outlay_lib::models::Role;
use outlay_lib::route::Route;
use outlay_lib::transport::ReqwestTransport;

use crate::common::{route_signal, snackbar};
use crate::create_employee::CreateEmployee;
use crate::dashboard::Dashboard;
use crate::expenses::Expenses;
use crate::forgot_password::ForgotPassword;
use crate::host::BrowserHost;
use crate::login::Login;
use crate::signup::Signup;
use crate::storage::LocalSessionStore;
use crate::utils::api_host;

pub struct App {
    pub client: Rc<ApiClient>,
}

impl App {
    pub fn new() -> Rc<Self> {
        let client = ApiClient::new(
            Rc::new(LocalSessionStore::new()),
            Rc::new(ReqwestTransport::new(api_host())),
            Rc::new(BrowserHost),
        );

        Rc::new(App {
            client: Rc::new(client),
        })
    }

    /// Runs the page guard. On `false` the user has already been sent
    /// somewhere else and nothing should render.
    fn authorize(&self, allowed_roles: &[Role]) -> bool {
        guard::require_auth(
            self.client.session().as_ref(),
            self.client.host().as_ref(),
            allowed_roles,
        )
    }

    fn render_dashboard(app: &Rc<Self>, role: Role) -> Option<Dom> {
        app.authorize(&[role])
            .then(|| Dashboard::render(Dashboard::new(app.client.clone(), role)))
    }

    pub fn render(app: Rc<Self>) -> Dom {
        html!("div", {
            .child_signal(route_signal().map(clone!(app => move |route| {
                debug!("route: {:?}", route);
                match route {
                    Route::Login => Some(
                        Login::render(Login::new(app.client.clone()))
                    ),
                    Route::Signup => Some(
                        Signup::render(Signup::new(app.client.clone()))
                    ),
                    Route::ForgotPassword => Some(
                        ForgotPassword::render(ForgotPassword::new(app.client.clone()))
                    ),
                    Route::AdminDashboard => Self::render_dashboard(&app, Role::Admin),
                    Route::ManagerDashboard => Self::render_dashboard(&app, Role::Manager),
                    Route::EmployeeDashboard => Self::render_dashboard(&app, Role::Employee),
                    Route::CreateEmployee => app.authorize(&[Role::Admin]).then(|| {
                        CreateEmployee::render(CreateEmployee::new(app.client.clone()))
                    }),
                    Route::Expenses => app.authorize(&[]).then(|| {
                        Expenses::render(Expenses::new(app.client.clone()))
                    }),
                    Route::NotFound => Some(
                        html!("div", {
                            .class("content")
                            .text("not found")
                        }),
                    ),
                }
            })))
            .children(&mut [
                snackbar::render(),
            ])
        })
    }
}

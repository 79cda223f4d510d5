use std::rc::Rc;

use dominator::{clone, html, link, Dom, EventOptions};
use futures_signals::signal::{Mutable, SignalExt};
use outlay_lib::client::ApiClient;
use outlay_lib::error::{Field, FieldErrors};
use outlay_lib::guard;
use outlay_lib::route::Route;

use crate::common::{events, form, snackbar};
use crate::utils::AsyncLoader;

pub struct Login {
    client: Rc<ApiClient>,
    email: Mutable<String>,
    password: Mutable<String>,
    errors: Mutable<FieldErrors>,
    loader: AsyncLoader,
}

impl Login {
    pub fn new(client: Rc<ApiClient>) -> Rc<Self> {
        Rc::new(Self {
            client,
            email: Mutable::new("".to_string()),
            password: Mutable::new("".to_string()),
            errors: Mutable::new(FieldErrors::new()),
            loader: AsyncLoader::new(),
        })
    }

    pub fn login(login: Rc<Self>) {
        let email = login.email.get_cloned();
        let password = login.password.get_cloned();

        let mut errors = FieldErrors::new();
        if email.trim().is_empty() {
            errors.push(Field::Email, "Email is required");
        }
        if password.is_empty() {
            errors.push(Field::Password, "Password is required");
        }
        if !errors.is_empty() {
            login.errors.set(errors);
            return;
        }

        login.loader.load(clone!(login => async move {
            match login.client.login(&email, &password).await {
                Ok(session) => {
                    login.password.set("".to_string());
                    guard::apply(
                        &guard::redirect_to_dashboard(session.role),
                        login.client.session().as_ref(),
                        login.client.host().as_ref(),
                    );
                }
                Err(e) => {
                    snackbar::show(format!("Login failed: {}", e.user_message()));
                }
            }
        }));
    }

    pub fn render(login: Rc<Self>) -> Dom {
        html!("div", {
            .class("main")
            .children(&mut [
                html!("div", {
                    .class("content")
                    .style("display", "flex")
                    .style("flex-direction", "column")
                    .style("max-width", "480px")
                    .style("margin", "auto")
                    .style("padding", "0.5rem")
                    .children(&mut [
                        html!("h1", {
                            .text("Sign in")
                        }),
                        html!("form", {
                            .style("display", "flex")
                            .style("flex-direction", "column")
                            .event_with_options(&EventOptions::preventable(), |e: events::KeyDown| {
                                if e.key() == "Enter" {
                                    e.prevent_default();
                                }
                            })
                            .children(&mut [
                                form::input("email", "Email", &login.email, &login.errors, Field::Email),
                                form::input("password", "Password", &login.password, &login.errors, Field::Password),
                                html!("button", {
                                    .attribute("type", "submit")
                                    .attribute_signal("disabled", login.loader.is_loading().map(|loading| loading.then_some("true")))
                                    .text("Login")
                                    .event_with_options(&EventOptions::preventable(), clone!(login => move |e: events::Click| {
                                        e.prevent_default();
                                        Self::login(login.clone());
                                    }))
                                }),
                            ])
                        }),
                        html!("div", {
                            .style("display", "flex")
                            .style("justify-content", "space-between")
                            .style("margin-top", "0.5rem")
                            .children(&mut [
                                link!(Route::ForgotPassword.url(), {
                                    .text("Forgot password?")
                                }),
                                link!(Route::Signup.url(), {
                                    .text("Create a company account")
                                }),
                            ])
                        }),
                    ])
                })
            ])
        })
    }
}

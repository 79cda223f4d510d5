use std::rc::Rc;

use dominator::{clone, html, link, Dom, EventOptions};
use futures_signals::signal::{Mutable, SignalExt};
use outlay_lib::client::ApiClient;
use outlay_lib::error::{Field, FieldErrors};
use outlay_lib::models::SignupRequest;
use outlay_lib::route::Route;

use crate::common::{events, form, snackbar};
use crate::utils::AsyncLoader;

/// Self-service sign up. Creates a company together with its admin.
pub struct Signup {
    client: Rc<ApiClient>,
    name: Mutable<String>,
    email: Mutable<String>,
    password: Mutable<String>,
    confirm_password: Mutable<String>,
    country: Mutable<String>,
    errors: Mutable<FieldErrors>,
    loader: AsyncLoader,
}

impl Signup {
    pub fn new(client: Rc<ApiClient>) -> Rc<Self> {
        Rc::new(Self {
            client,
            name: Mutable::new("".to_string()),
            email: Mutable::new("".to_string()),
            password: Mutable::new("".to_string()),
            confirm_password: Mutable::new("".to_string()),
            country: Mutable::new("".to_string()),
            errors: Mutable::new(FieldErrors::new()),
            loader: AsyncLoader::new(),
        })
    }

    fn request(&self) -> SignupRequest {
        SignupRequest {
            name: self.name.get_cloned(),
            email: self.email.get_cloned(),
            password: self.password.get_cloned(),
            confirm_password: self.confirm_password.get_cloned(),
            country: self.country.get_cloned(),
        }
    }

    pub fn signup(signup: Rc<Self>) {
        let request = signup.request();
        if let Err(e) = request.validate() {
            form::show_field_errors(&signup.errors, &e);
            return;
        }

        signup.loader.load(clone!(signup => async move {
            match signup.client.signup(&request).await {
                Ok(res) => {
                    info!("signed up company {:?}", res.company_id);
                    snackbar::show(res.message);
                    signup.client.host().navigate(&Route::Login);
                }
                Err(e) => {
                    if !form::show_field_errors(&signup.errors, &e) {
                        snackbar::show_error(&e);
                    }
                }
            }
        }));
    }

    pub fn render(signup: Rc<Self>) -> Dom {
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
                            .text("Create a company account")
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
                                form::input("text", "Full name", &signup.name, &signup.errors, Field::Name),
                                form::input("email", "Email", &signup.email, &signup.errors, Field::Email),
                                form::input("password", "Password", &signup.password, &signup.errors, Field::Password),
                                form::input("password", "Confirm password", &signup.confirm_password, &signup.errors, Field::ConfirmPassword),
                                form::input("text", "Country", &signup.country, &signup.errors, Field::Country),
                                html!("button", {
                                    .attribute("type", "submit")
                                    .attribute_signal("disabled", signup.loader.is_loading().map(|loading| loading.then_some("true")))
                                    .text("Sign up")
                                    .event_with_options(&EventOptions::preventable(), clone!(signup => move |e: events::Click| {
                                        e.prevent_default();
                                        Self::signup(signup.clone());
                                    }))
                                }),
                            ])
                        }),
                        link!(Route::Login.url(), {
                            .style("margin-top", "0.5rem")
                            .text("Already have an account? Sign in")
                        }),
                    ])
                })
            ])
        })
    }
}

use std::rc::Rc;

use dominator::{clone, html, link, Dom, EventOptions};
use futures_signals::signal::{Mutable, SignalExt};
use outlay_lib::client::ApiClient;
use outlay_lib::error::{Field, FieldErrors};
use outlay_lib::route::Route;

use crate::common::{events, form, snackbar};
use crate::utils::AsyncLoader;

const DEFAULT_MESSAGE: &str = "If an account exists for that email, a reset link has been sent.";

pub struct ForgotPassword {
    client: Rc<ApiClient>,
    email: Mutable<String>,
    errors: Mutable<FieldErrors>,
    message: Mutable<Option<String>>,
    loader: AsyncLoader,
}

impl ForgotPassword {
    pub fn new(client: Rc<ApiClient>) -> Rc<Self> {
        Rc::new(Self {
            client,
            email: Mutable::new("".to_string()),
            errors: Mutable::new(FieldErrors::new()),
            message: Mutable::new(None),
            loader: AsyncLoader::new(),
        })
    }

    pub fn submit(page: Rc<Self>) {
        let email = page.email.get_cloned();
        if email.trim().is_empty() {
            let mut errors = FieldErrors::new();
            errors.push(Field::Email, "Email is required");
            page.errors.set(errors);
            return;
        }

        page.message.set(None);
        page.loader.load(clone!(page => async move {
            match page.client.forgot_password(&email).await {
                Ok(res) => {
                    page.message.set(Some(res.message.unwrap_or_else(|| DEFAULT_MESSAGE.to_string())));
                }
                Err(e) => snackbar::show_error(&e),
            }
        }));
    }

    pub fn render(page: Rc<Self>) -> Dom {
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
                            .text("Reset password")
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
                                form::input("email", "Email", &page.email, &page.errors, Field::Email),
                                html!("button", {
                                    .attribute("type", "submit")
                                    .attribute_signal("disabled", page.loader.is_loading().map(|loading| loading.then_some("true")))
                                    .text("Send reset link")
                                    .event_with_options(&EventOptions::preventable(), clone!(page => move |e: events::Click| {
                                        e.prevent_default();
                                        Self::submit(page.clone());
                                    }))
                                }),
                            ])
                        }),
                    ])
                    .child_signal(page.message.signal_cloned().map(|message| message.map(|message| html!("div", {
                        .class("notice")
                        .text(&message)
                    }))))
                    .children(&mut [
                        link!(Route::Login.url(), {
                            .style("margin-top", "0.5rem")
                            .text("Back to sign in")
                        }),
                    ])
                })
            ])
        })
    }
}

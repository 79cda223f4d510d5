use std::cell::RefCell;
use std::rc::Rc;

use dominator::{clone, html, svg, Dom};
use futures_signals::signal::{Mutable, SignalExt};
use gloo_timers::callback::Timeout;
use outlay_lib::error::Error;

use crate::common::events;

const DISMISS_AFTER_MS: u32 = 5_000;

thread_local! {
    static SNACKBAR: RefCell<Rc<Snackbar>> = RefCell::new(Snackbar::new());
}

pub fn show(message: String) {
    SNACKBAR.with(|s| s.borrow().show(message));
}

/// Reports a failed request. A 401 has already sent the user to the login
/// page, so it gets no message.
pub fn show_error(e: &Error) {
    match e {
        Error::Unauthenticated => {}
        e => show(e.user_message()),
    }
}

pub fn render() -> Dom {
    SNACKBAR.with(|s| Snackbar::render(s.borrow().clone()))
}

pub struct Snackbar {
    message: Mutable<Option<String>>,
    dismiss: RefCell<Option<Timeout>>,
}

impl Snackbar {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            message: Mutable::new(None),
            dismiss: RefCell::new(None),
        })
    }

    pub fn show(&self, message: String) {
        self.message.set(Some(message));

        // replacing the timer cancels the previous one
        let current = self.message.clone();
        self.dismiss.replace(Some(Timeout::new(DISMISS_AFTER_MS, move || {
            current.set(None)
        })));
    }

    pub fn render(snackbar: Rc<Self>) -> Dom {
        html!("div", {
            .class("snackbar")
            .visible_signal(snackbar.message.signal_ref(|message| message.is_some()))
            .children(&mut [
                html!("div", {
                    .child_signal(snackbar.message.signal_cloned().map(|message| message.map(|msg| html!("span", {
                            .text(msg.as_str())
                        })
                    )))
                    .children(&mut [
                        html!("button", {
                            .event(clone!(snackbar => move |_: events::Click| {
                                snackbar.dismiss.replace(None);
                                snackbar.message.set(None);
                            }))
                            .children(&mut [
                                svg!("svg", {
                                    .attribute("xmlns", "http://www.w3.org/2000/svg")
                                    .attribute("viewBox", "0 0 24 24")
                                    .attribute("stroke", "currentColor")
                                    .attribute("fill", "none")
                                    .class("icon")
                                    .children(&mut [
                                        svg!("path", {
                                            .attribute("stroke-linecap", "round")
                                            .attribute("stroke-linejoin", "round")
                                            .attribute("stroke-width", "2")
                                            .attribute("d", "M6 18L18 6M6 6l12 12")
                                        }),
                                    ])
                                })
                            ])
                        })
                    ])
                })
            ])
        })
    }
}

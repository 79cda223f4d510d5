use dominator::{html, Dom};
use futures_signals::signal::Signal;

pub struct Spinner;

impl Spinner {
    /// A loading indicator shown while `active` is `true`.
    pub fn render<S>(active: S) -> Dom
    where
        S: Signal<Item = bool> + 'static,
    {
        html!("div", {
            .class("spinner")
            .visible_signal(active)
            .children(&mut [
                html!("div", {
                    .class("loader")
                })
            ])
        })
    }
}

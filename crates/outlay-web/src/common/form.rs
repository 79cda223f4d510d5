//! Small building blocks shared by the page forms.

use dominator::{clone, html, with_node, Dom};
use futures_signals::signal::Mutable;
use outlay_lib::error::{Error, Field, FieldErrors};
use web_sys::HtmlInputElement;

use crate::common::events;

/// A text input two-way bound to `value`. Typing clears `field`'s error.
pub fn input(
    kind: &'static str,
    placeholder: &'static str,
    value: &Mutable<String>,
    errors: &Mutable<FieldErrors>,
    field: Field,
) -> Dom {
    html!("div", {
        .class("field")
        .children(&mut [
            html!("input" => HtmlInputElement, {
                .attribute("type", kind)
                .attribute("placeholder", placeholder)
                .class_signal("invalid", errors.signal_ref(move |errors| errors.get(field).is_some()))
                .property_signal("value", value.signal_cloned())
                .with_node!(input => {
                    .event(clone!(value, errors => move |_: events::Input| {
                        value.set(input.value());
                        errors.lock_mut().remove(field);
                    }))
                })
            }),
            error(errors, field),
        ])
    })
}

pub fn error(errors: &Mutable<FieldErrors>, field: Field) -> Dom {
    html!("span", {
        .class("field-error")
        .visible_signal(errors.signal_ref(move |errors| errors.get(field).is_some()))
        .text_signal(errors.signal_ref(move |errors| errors.get(field).unwrap_or_default().to_string()))
    })
}

/// Copies a failed validation onto the form, returning `false` for any
/// other kind of error.
pub fn show_field_errors(errors: &Mutable<FieldErrors>, e: &Error) -> bool {
    match e.field_errors() {
        Some(field_errors) => {
            errors.set(field_errors.clone());
            true
        }
        None => false,
    }
}

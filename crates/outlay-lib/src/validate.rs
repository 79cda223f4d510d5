//! Local checks that run before anything is sent to the server.

use crate::error::{Field, FieldErrors, Result};

pub const MAX_RECEIPT_BYTES: u64 = 10 * 1024 * 1024;

pub const RECEIPT_MIME_TYPES: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/jpg",
    "image/gif",
    "image/bmp",
    "image/webp",
];

pub const MIN_PASSWORD_LEN: usize = 6;

pub fn receipt(mime: &str, size: u64) -> Result<()> {
    let mut errors = FieldErrors::new();

    let mime = mime
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    if !RECEIPT_MIME_TYPES.contains(&mime.as_str()) {
        errors.push(
            Field::Receipt,
            "Please select a valid image file (PNG, JPEG, GIF, BMP or WEBP)",
        );
    } else if size > MAX_RECEIPT_BYTES {
        errors.push(Field::Receipt, "File size must be less than 10MB");
    }

    errors.into_result()
}

pub fn is_email(value: &str) -> bool {
    let value = value.trim();
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && !value.contains(char::is_whitespace)
                && domain
                    .split_once('.')
                    .is_some_and(|(host, rest)| !host.is_empty() && !rest.is_empty())
                && !domain.ends_with('.')
        }
        None => false,
    }
}

pub(crate) fn required(errors: &mut FieldErrors, field: Field, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.push(field, message);
    }
}

pub(crate) fn email(errors: &mut FieldErrors, value: &str) {
    if value.trim().is_empty() {
        errors.push(Field::Email, "Email is required");
    } else if !is_email(value) {
        errors.push(Field::Email, "Please enter a valid email address");
    }
}

pub(crate) fn new_password(errors: &mut FieldErrors, password: &str, confirm: &str) {
    if password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(
            Field::Password,
            format!("Password must be at least {} characters long", MIN_PASSWORD_LEN),
        );
    }
    if password != confirm {
        errors.push(Field::ConfirmPassword, "Passwords do not match");
    }
}

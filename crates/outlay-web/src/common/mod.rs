mod route;
pub use route::route_signal;

mod spinner;
pub use spinner::Spinner;

pub mod events;

pub mod form;

pub mod snackbar;

pub mod session;
pub use session::*;

pub mod auth;
pub use auth::*;

pub mod employee;
pub use employee::*;

pub mod expense;
pub use expense::*;

pub mod ocr;
pub use ocr::*;

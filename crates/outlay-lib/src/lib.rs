//! Client-side core of the Outlay expense tracker: session handling,
//! the REST API client, page authorization and the expense workflow.

#[macro_use]
extern crate log;

pub mod client;
pub mod error;
pub mod guard;
pub mod host;
pub mod models;
pub mod route;
pub mod session;
pub mod transport;
pub mod validate;
pub mod workflow;

#[cfg(test)]
mod testing;

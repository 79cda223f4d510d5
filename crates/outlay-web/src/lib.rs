#[macro_use]
extern crate log;

mod app;
mod common;
mod create_employee;
mod dashboard;
mod expenses;
mod forgot_password;
mod host;
mod login;
mod signup;
mod storage;
mod utils;

use wasm_bindgen::prelude::*;

use app::App;

#[wasm_bindgen(start)]
pub async fn main_js() -> Result<(), JsValue> {
    #[cfg(debug_assertions)]
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());

    utils::initialize_urls();

    dominator::append_dom(&dominator::body(), App::render(App::new()));

    Ok(())
}

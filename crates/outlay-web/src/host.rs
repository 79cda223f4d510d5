use dominator::routing;
use outlay_lib::host::Host;
use outlay_lib::route::Route;

use crate::common::snackbar;
use crate::utils::window;

pub struct BrowserHost;

impl Host for BrowserHost {
    fn navigate(&self, route: &Route) {
        routing::go_to_url(&route.url());
    }

    fn notify(&self, message: &str) {
        snackbar::show(message.to_string());
    }

    fn confirm(&self, message: &str) -> bool {
        window().confirm_with_message(message).unwrap_or_else(|e| {
            error!("error showing confirm dialog: {:?}", e);
            false
        })
    }
}

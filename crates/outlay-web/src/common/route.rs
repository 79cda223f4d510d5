use dominator::routing;
use futures_signals::signal::{Signal, SignalExt};
use outlay_lib::route::Route;
use web_sys::Url;

/// The page for the current browser URL.
pub fn route_signal() -> impl Signal<Item = Route> {
    routing::url()
        .signal_ref(|url| Url::new(url).map(|url| url.pathname()))
        .map(|pathname| match pathname {
            Ok(pathname) => Route::from_path(&pathname),
            Err(e) => {
                error!("error parsing url: {:?}", e);
                Route::NotFound
            }
        })
}

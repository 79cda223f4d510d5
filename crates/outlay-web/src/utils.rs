use futures::Future;
use futures_signals::signal::{Mutable, Signal};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Storage, Window};

thread_local! {
    static WINDOW: Window = web_sys::window().unwrap_throw();
    static LOCAL_STORAGE: Storage = WINDOW.with(|w| w.local_storage().unwrap_throw().unwrap_throw());
    static API_HOST: std::cell::RefCell<String> = std::cell::RefCell::new("".to_string());
}

/// Runs page requests on the event loop and counts the ones still running.
pub struct AsyncLoader {
    inflight: Mutable<usize>,
}

impl Default for AsyncLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl AsyncLoader {
    pub fn new() -> Self {
        Self {
            inflight: Mutable::new(0),
        }
    }

    pub fn load<F>(&self, fut: F)
    where
        F: Future<Output = ()> + 'static,
    {
        *self.inflight.lock_mut() += 1;

        let inflight = self.inflight.clone();
        spawn_local(async move {
            fut.await;
            let mut inflight = inflight.lock_mut();
            *inflight = inflight.saturating_sub(1);
        });
    }

    pub fn is_loading(&self) -> impl Signal<Item = bool> + use<> {
        self.inflight.signal_ref(|count| *count > 0)
    }
}

/// Resolves where the API lives. A host page may set `window.__OUTLAY_API__`
/// to point at another origin, otherwise requests go to the page's own.
pub fn initialize_urls() {
    let api_host = match js_sys::eval("window.__OUTLAY_API__") {
        Ok(val) if val.is_string() => val.as_string().unwrap_or_default(),
        _ => window()
            .location()
            .origin()
            .unwrap_or_else(|e| {
                error!("error reading page origin: {:?}", e);
                "".to_string()
            }),
    };

    info!("api host: {}", api_host);
    API_HOST.with(|s| *s.borrow_mut() = api_host);
}

pub fn api_host() -> String {
    API_HOST.with(|s| s.borrow().clone())
}

pub fn window() -> Window {
    WINDOW.with(|s| s.clone())
}

pub fn local_storage() -> Storage {
    LOCAL_STORAGE.with(|s| s.clone())
}

//! Thin wrappers over the browser APIs the views need.
//!
//! Every function degrades to a no-op (or a neutral answer) when there is no
//! `window`, so callers never have to unwrap.

use wasm_bindgen::{closure::Closure, JsCast, JsValue};

pub fn current_path() -> String {
    web_sys::window()
        .and_then(|window| window.location().pathname().ok())
        .unwrap_or_default()
}

/// Add `path` to the session history.
pub fn push_path(path: &str) {
    if let Some(history) = web_sys::window().and_then(|window| window.history().ok()) {
        if history
            .push_state_with_url(&JsValue::NULL, "", Some(path))
            .is_err()
        {
            tracing::warn!("Could not push {path} onto the history");
        }
    }
}

/// Swap the current history entry for `path`, used for redirects.
pub fn replace_path(path: &str) {
    if let Some(history) = web_sys::window().and_then(|window| window.history().ok()) {
        if history
            .replace_state_with_url(&JsValue::NULL, "", Some(path))
            .is_err()
        {
            tracing::warn!("Could not replace the history entry with {path}");
        }
    }
}

/// A `popstate` listener that is removed when dropped.
pub struct PopStateListener {
    callback: Closure<dyn FnMut()>,
}

impl PopStateListener {
    pub fn new(on_change: impl FnMut() + 'static) -> Self {
        let callback = Closure::<dyn FnMut()>::new(on_change);
        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", callback.as_ref().unchecked_ref());
        }
        Self { callback }
    }
}

impl Drop for PopStateListener {
    fn drop(&mut self) {
        if let Some(window) = web_sys::window() {
            let _ = window.remove_event_listener_with_callback(
                "popstate",
                self.callback.as_ref().unchecked_ref(),
            );
        }
    }
}

/// Run `f` once after `delay_ms` milliseconds.
pub fn set_timeout(delay_ms: i32, f: impl FnOnce() + 'static) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let callback = Closure::once_into_js(f);
    if window
        .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), delay_ms)
        .is_err()
    {
        tracing::warn!("Could not schedule a timer");
    }
}

/// Ask the user to confirm with the native dialog. Answers `false` when the
/// dialog cannot be shown.
pub fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|window| window.confirm_with_message(message).ok())
        .unwrap_or(false)
}

/// A `blob:` URL previewing a file the user picked.
pub fn object_url(file: &web_sys::File) -> Option<String> {
    web_sys::Url::create_object_url_with_blob(file).ok()
}

pub fn revoke_object_url(url: &str) {
    if url.starts_with("blob:") {
        let _ = web_sys::Url::revoke_object_url(url);
    }
}

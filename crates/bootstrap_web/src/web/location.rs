use asset_bootstrap::{AddressBar, LaunchError};
use wasm_bindgen::JsValue;

use super::fetch::describe;

/// `window.location` for reads, `history.replaceState` for the rewrite.
pub(super) struct BrowserAddressBar;

impl BrowserAddressBar {
    fn window() -> Result<web_sys::Window, LaunchError> {
        web_sys::window().ok_or_else(|| LaunchError::Location("no window".to_string()))
    }
}

impl AddressBar for BrowserAddressBar {
    fn href(&self) -> Result<String, LaunchError> {
        Self::window()?
            .location()
            .href()
            .map_err(|e| LaunchError::Location(describe(&e)))
    }

    fn search(&self) -> Result<String, LaunchError> {
        Self::window()?
            .location()
            .search()
            .map_err(|e| LaunchError::Location(describe(&e)))
    }

    fn replace_url(&self, url: &str) -> Result<(), LaunchError> {
        Self::window()?
            .history()
            .map_err(|e| LaunchError::ReplaceUrl(describe(&e)))?
            .replace_state_with_url(&JsValue::NULL, "", Some(url))
            .map_err(|e| LaunchError::ReplaceUrl(describe(&e)))
    }
}

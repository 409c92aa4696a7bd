use asset_bootstrap::{AssetFetcher, FetchError};
use log::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use crate::errors::Thrown;

/// `window.fetch(url)` followed by `response.arrayBuffer()`.
///
/// HTTP error statuses are not failures: like a bare `fetch`, their body is
/// used as the asset. They are logged so a 404 page standing in for a texture
/// is easy to spot.
pub(super) struct BrowserFetcher;

impl AssetFetcher for BrowserFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let network = |reason: String| FetchError::Network {
            url: url.to_string(),
            reason,
        };
        let body = |reason: String| FetchError::Body {
            url: url.to_string(),
            reason,
        };

        let window = web_sys::window().ok_or_else(|| network("no window".to_string()))?;
        let response = JsFuture::from(window.fetch_with_str(url))
            .await
            .map_err(|e| network(describe(&e)))?
            .dyn_into::<web_sys::Response>()
            .map_err(|_| network("fetch did not resolve to a Response".to_string()))?;

        if !response.ok() {
            warn!(
                "{url}: HTTP {} {}; using the response body anyway",
                response.status(),
                response.status_text()
            );
        }

        let promise = response.array_buffer().map_err(|e| body(describe(&e)))?;
        let buffer = JsFuture::from(promise)
            .await
            .map_err(|e| body(describe(&e)))?;
        Ok(js_sys::Uint8Array::new(&buffer).to_vec())
    }
}

/// Same text JS gets from `String(e)`.
pub(super) fn describe(value: &JsValue) -> String {
    thrown(value).to_string()
}

fn thrown(value: &JsValue) -> Thrown {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return Thrown::Error {
            name: err.name().into(),
            message: err.message().into(),
        };
    }
    if let Some(text) = value.as_string() {
        return Thrown::Text(text);
    }
    if let Some(n) = value.as_f64() {
        return Thrown::Number(n);
    }
    if let Some(b) = value.as_bool() {
        return Thrown::Bool(b);
    }
    if value.is_null() {
        return Thrown::Null;
    }
    if value.is_undefined() {
        return Thrown::Undefined;
    }
    match value.dyn_ref::<js_sys::Object>() {
        Some(obj) => Thrown::Text(obj.to_string().into()),
        None => Thrown::Text(format!("{value:?}")),
    }
}

use asset_bootstrap::{AssetMap, AssetValue, LoadError};
use log::debug;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use super::fetch::describe;

/// Copy a JS `Map<string, string | Uint8Array>` into an [`AssetMap`],
/// keeping the map's insertion order.
///
/// Any other value is coerced to a string and fetched as a URL, the same as
/// passing it to `fetch`. Keys must be strings so the bytes can be written back.
pub(super) fn asset_map_from_js(map: &js_sys::Map) -> Result<AssetMap, LoadError> {
    let mut out = AssetMap::new();
    let mut bad_key = None;
    map.for_each(&mut |value: JsValue, key: JsValue| {
        if bad_key.is_some() {
            return;
        }
        let Some(key) = key.as_string() else {
            bad_key = Some(describe(&key));
            return;
        };
        if let Some(url) = value.as_string() {
            out.insert(key, AssetValue::Url(url));
        } else if let Some(bytes) = value.dyn_ref::<js_sys::Uint8Array>() {
            out.insert(key, AssetValue::Bytes(bytes.to_vec()));
        } else {
            let url = describe(&value);
            debug!("asset `{key}` is not a string; fetching `{url}`");
            out.insert(key, AssetValue::Url(url));
        }
    });

    match bad_key {
        Some(key) => Err(LoadError::InvalidEntry {
            key,
            reason: "key is not a string".to_string(),
        }),
        None => Ok(out),
    }
}

/// Overwrite each entry of `map` with the bytes held by `assets`.
pub(super) fn write_back(map: &js_sys::Map, assets: &AssetMap) {
    for (key, value) in assets.iter() {
        if let Some(bytes) = value.as_bytes() {
            map.set(&JsValue::from_str(key), &js_sys::Uint8Array::from(bytes));
        }
    }
}

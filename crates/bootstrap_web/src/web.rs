use std::cell::RefCell;

use asset_bootstrap::page::{report_failure, CrashLatch};
use asset_bootstrap::{
    capture_launch_params, failure_message, AssetLoader, AssetManifest, AssetMap, Assets,
    BootConfig, LaunchParams,
};
use log::{error, info, warn};
use wasm_bindgen::prelude::*;

mod console_logger;
mod dom;
mod fetch;
mod js_map;
mod location;
mod spawn;

use dom::DomPage;
use fetch::BrowserFetcher;
use location::BrowserAddressBar;
use spawn::BrowserSpawner;

/// Optional `<script type="application/json">` element holding a `BootConfig`.
const CONFIG_ELEMENT_ID: &str = "bootstrap-config";

thread_local! {
    static CONFIG: RefCell<BootConfig> = RefCell::new(BootConfig::default());
    static LAUNCH: RefCell<LaunchParams> = RefCell::new(LaunchParams::default());
    static CRASHED: CrashLatch = const { CrashLatch::new() };
}

/// Module start: logging, panic reporting, then launch parameter capture.
#[wasm_bindgen(start)]
pub fn start() {
    let (config, config_err) = match dom::element_text(CONFIG_ELEMENT_ID) {
        Some(raw) => match BootConfig::from_json(&raw) {
            Ok(config) => (config, None),
            Err(e) => (BootConfig::default(), Some(e)),
        },
        None => (BootConfig::default(), None),
    };

    if console_logger::init(config.level_filter()).is_err() {
        warn!("logger already installed");
    }
    if let Some(e) = config_err {
        warn!("ignoring #{CONFIG_ELEMENT_ID}: {e}");
    }

    std::panic::set_hook(Box::new(|info| panic_hook(&info.to_string())));

    match capture_launch_params(&BrowserAddressBar, &config.code_param) {
        Ok(params) => {
            info!("launch code present: {}", params.code.is_some());
            LAUNCH.with(|cell| *cell.borrow_mut() = params);
        }
        Err(e) => warn!("could not read launch parameters: {e}"),
    }

    CONFIG.with(|cell| *cell.borrow_mut() = config);
}

/// The `code` query parameter captured at start, if the page had one.
#[wasm_bindgen]
pub fn launch_code() -> Option<String> {
    LAUNCH.with(|cell| cell.borrow().code.clone())
}

/// Fetch every URL in `map` and call `init(map)` once all of them resolved,
/// with each URL replaced by a `Uint8Array`. Returns immediately. A map with
/// a non-string key is reported like a failed fetch and `init` is not called.
#[wasm_bindgen]
pub fn load_asset(map: js_sys::Map, init: js_sys::Function) {
    let assets = match js_map::asset_map_from_js(&map) {
        Ok(assets) => assets,
        Err(e) => {
            report_failure(&DomPage, &config(), &failure_message(&e));
            return;
        }
    };
    let loader = AssetLoader::new(BrowserFetcher, DomPage, config());

    let hook = move |resolved: AssetMap| {
        js_map::write_back(&map, &resolved);
        if let Err(e) = init.call1(&JsValue::NULL, &map) {
            error!("init hook threw: {}", fetch::describe(&e));
        }
    };

    if let Err(e) = loader.start(assets, hook, &BrowserSpawner) {
        report_failure(&DomPage, &config(), &format!("failed to start asset loader: {e}"));
    }
}

/// Rust-side entry: load `manifest`, then call `app` with the resolved assets
/// and the launch parameters captured at start.
pub fn boot<A>(manifest: AssetManifest, app: A)
where
    A: FnOnce(Assets, LaunchParams) + 'static,
{
    let launch = LAUNCH.with(|cell| cell.borrow().clone());
    let loader = AssetLoader::new(BrowserFetcher, DomPage, config());
    if let Err(e) = loader.start_boot(manifest, launch, app, &BrowserSpawner) {
        report_failure(&DomPage, &config(), &format!("failed to start asset loader: {e}"));
    }
}

fn config() -> BootConfig {
    CONFIG.with(|cell| cell.borrow().clone())
}

/// Log the panic and show it on the page. Only the first panic is reported.
fn panic_hook(message: &str) {
    if !CRASHED.with(CrashLatch::trip) {
        return;
    }
    report_failure(&DomPage, &config(), message);
}

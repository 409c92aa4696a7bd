//! Browser bootstrap for a WASM application.
//!
//! Host-testable core: the asset mapping, the all-or-nothing loader, launch
//! parameter capture and the page elements the bootstrap reports to. The
//! browser bindings live in the `bootstrap_web` crate.

pub mod assets;
pub mod config;
pub mod error;
pub mod fetch;
pub mod launch;
pub mod loader;
pub mod page;

pub use assets::{AssetManifest, AssetMap, AssetValue, Assets};
pub use config::BootConfig;
pub use error::{FetchError, LaunchError, LoadError};
pub use fetch::{AssetFetcher, MemoryFetcher};
pub use launch::{capture_launch_params, AddressBar, LaunchParams};
pub use loader::{failure_message, load_assets, AssetLoader, FetchMode, InitHook};
pub use page::{CrashLatch, LoadingStage, Page};

//! Fetch every asset in a map, then hand the map to the application.
//!
//! Loading is all-or-nothing: the first failing fetch aborts the run, the
//! failure is written to the page, and the init hook is never called. There
//! is no retry and no caching, so running a loader twice fetches everything
//! twice.

use futures::future::try_join_all;
use futures::task::{LocalSpawn, LocalSpawnExt, SpawnError};
use log::{debug, error, info};

use crate::assets::{AssetManifest, AssetMap, Assets};
use crate::config::BootConfig;
use crate::error::LoadError;
use crate::fetch::AssetFetcher;
use crate::launch::LaunchParams;
use crate::page::{report_failure, show_stage, LoadingStage, Page};

/// Prefix of every user-visible loader failure.
pub const FAILURE_PREFIX: &str = "Error fetching assets: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum FetchMode {
    /// One request in flight at a time, in key order.
    #[default]
    Sequential,
    /// Every request issued at once; the map is only written once all succeed.
    Concurrent,
}

/// Receives the resolved map. Called at most once per run.
pub trait InitHook {
    fn init(self, assets: AssetMap);
}

impl<F: FnOnce(AssetMap)> InitHook for F {
    fn init(self, assets: AssetMap) {
        self(assets)
    }
}

pub fn failure_message(err: &LoadError) -> String {
    format!("{FAILURE_PREFIX}{err}")
}

/// Replace every URL in `map` with the bytes behind it.
///
/// Entries that already hold bytes are skipped. In sequential mode entries
/// fetched before a failure keep their bytes; in concurrent mode a failure
/// leaves the map untouched.
pub async fn load_assets<F: AssetFetcher>(
    map: &mut AssetMap,
    fetcher: &F,
    mode: FetchMode,
) -> Result<(), LoadError> {
    let pending = map.pending();

    match mode {
        FetchMode::Sequential => {
            for (key, url) in pending {
                let bytes = fetcher.fetch(&url).await.map_err(|source| {
                    error!("fetching {key} from {} failed", source.url());
                    LoadError::Fetch {
                        key: key.clone(),
                        source,
                    }
                })?;
                debug!("fetched {key} ({} bytes) from {url}", bytes.len());
                map.set_bytes(&key, bytes);
            }
        }
        FetchMode::Concurrent => {
            let fetched = try_join_all(pending.iter().map(|(key, url)| async move {
                match fetcher.fetch(url).await {
                    Ok(bytes) => Ok((key, bytes)),
                    Err(source) => {
                        error!("fetching {key} from {} failed", source.url());
                        Err(LoadError::Fetch {
                            key: key.clone(),
                            source,
                        })
                    }
                }
            }))
            .await?;
            for (key, bytes) in fetched {
                debug!("fetched {key} ({} bytes)", bytes.len());
                map.set_bytes(key, bytes);
            }
        }
    }

    Ok(())
}

/// Loader bound to a fetcher and the page it reports to.
pub struct AssetLoader<F, P> {
    fetcher: F,
    page: P,
    config: BootConfig,
}

impl<F: AssetFetcher, P: Page> AssetLoader<F, P> {
    pub fn new(fetcher: F, page: P, config: BootConfig) -> Self {
        Self {
            fetcher,
            page,
            config,
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Load `map` and pass it to `hook` on success. On failure the error is
    /// already on the page and in the log when this returns.
    pub async fn run(&self, mut map: AssetMap, hook: impl InitHook) -> Result<(), LoadError> {
        self.fetch_or_report(&mut map).await?;
        hook.init(map);
        Ok(())
    }

    /// Full startup sequence for a Rust application: show loading stages,
    /// load the manifest, then call `app` with the resolved assets and the
    /// launch parameters captured earlier.
    pub async fn boot<A>(
        &self,
        manifest: &AssetManifest,
        launch: LaunchParams,
        app: A,
    ) -> Result<(), LoadError>
    where
        A: FnOnce(Assets, LaunchParams),
    {
        show_stage(&self.page, &self.config, LoadingStage::Assets);
        let mut map = manifest.to_asset_map();
        self.fetch_or_report(&mut map).await?;

        show_stage(&self.page, &self.config, LoadingStage::Graphics);
        let assets = map.into_assets().inspect_err(|err| self.report(err))?;
        app(assets, launch);
        Ok(())
    }

    async fn fetch_or_report(&self, map: &mut AssetMap) -> Result<(), LoadError> {
        info!(
            "fetching {} assets ({:?})",
            map.pending().len(),
            self.config.fetch_mode
        );
        load_assets(map, &self.fetcher, self.config.fetch_mode)
            .await
            .inspect_err(|err| self.report(err))?;
        info!("assets ready");
        Ok(())
    }

    fn report(&self, err: &LoadError) {
        report_failure(&self.page, &self.config, &failure_message(err));
    }
}

impl<F: AssetFetcher + 'static, P: Page + 'static> AssetLoader<F, P> {
    /// Spawn [`run`](Self::run) and return immediately. The outcome is only
    /// visible through the hook or the page.
    pub fn start<H, S>(self, map: AssetMap, hook: H, spawner: &S) -> Result<(), SpawnError>
    where
        H: InitHook + 'static,
        S: LocalSpawn + ?Sized,
    {
        spawner.spawn_local(async move {
            let _ = self.run(map, hook).await;
        })
    }

    /// Spawned form of [`boot`](Self::boot).
    pub fn start_boot<A, S>(
        self,
        manifest: AssetManifest,
        launch: LaunchParams,
        app: A,
        spawner: &S,
    ) -> Result<(), SpawnError>
    where
        A: FnOnce(Assets, LaunchParams) + 'static,
        S: LocalSpawn + ?Sized,
    {
        spawner.spawn_local(async move {
            let _ = self.boot(&manifest, launch, app).await;
        })
    }
}

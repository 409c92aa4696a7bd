//! Where asset bytes come from.

use std::cell::RefCell;

use hashbrown::HashMap;

use crate::error::FetchError;

/// Retrieves the full body behind a URL as raw bytes.
///
/// Futures are not required to be `Send`; the loader runs on a single-threaded
/// executor (the browser event loop, or a local pool natively).
#[allow(async_fn_in_trait)]
pub trait AssetFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

impl<T: AssetFetcher + ?Sized> AssetFetcher for &T {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        (**self).fetch(url).await
    }
}

impl<T: AssetFetcher + ?Sized> AssetFetcher for std::rc::Rc<T> {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        (**self).fetch(url).await
    }
}

/// In-memory fetcher. Records every URL it is asked for, in order.
#[derive(Debug, Default)]
pub struct MemoryFetcher {
    bodies: HashMap<String, Result<Vec<u8>, FetchError>>,
    requests: RefCell<Vec<String>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.insert(url, body);
        self
    }

    pub fn with_failure(mut self, url: impl Into<String>, err: FetchError) -> Self {
        self.bodies.insert(url.into(), Err(err));
        self
    }

    pub fn insert(&mut self, url: impl Into<String>, body: impl Into<Vec<u8>>) {
        self.bodies.insert(url.into(), Ok(body.into()));
    }

    /// URLs requested so far, duplicates included.
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl AssetFetcher for MemoryFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.requests.borrow_mut().push(url.to_string());
        match self.bodies.get(url) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(err)) => Err(err.clone()),
            None => Err(FetchError::NotFound {
                url: url.to_string(),
            }),
        }
    }
}

#[cfg(feature = "std")]
pub use dir::DirFetcher;

#[cfg(feature = "std")]
mod dir {
    use std::io::ErrorKind;
    use std::path::PathBuf;

    use super::AssetFetcher;
    use crate::error::FetchError;
    use crate::launch::percent_decode;

    /// Serves URLs out of a directory, the way a static file server would map
    /// page-relative asset paths.
    #[derive(Debug, Clone)]
    pub struct DirFetcher {
        root: PathBuf,
    }

    impl DirFetcher {
        pub fn new(root: impl Into<PathBuf>) -> Self {
            Self { root: root.into() }
        }

        /// Map a URL onto a path under `root`. Scheme and host are dropped,
        /// as are query and fragment; segments are percent-decoded. `None`
        /// for paths escaping the root.
        pub fn resolve(&self, url: &str) -> Option<PathBuf> {
            let path = match url.split_once("://") {
                Some((_, rest)) => rest.find('/').map(|i| &rest[i..]).unwrap_or(""),
                None => url,
            };
            let path = path.split(['?', '#']).next().unwrap_or("");

            let mut out = self.root.clone();
            let mut pushed = false;
            for segment in path.split('/') {
                let segment = percent_decode(segment, false);
                match segment.as_str() {
                    "" | "." => {}
                    ".." => return None,
                    s if s.contains(['/', '\\', '\0']) => return None,
                    s => {
                        out.push(s);
                        pushed = true;
                    }
                }
            }
            pushed.then_some(out)
        }
    }

    impl AssetFetcher for DirFetcher {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
            let path = self.resolve(url).ok_or_else(|| FetchError::NotFound {
                url: url.to_string(),
            })?;
            std::fs::read(&path).map_err(|e| match e.kind() {
                ErrorKind::NotFound => FetchError::NotFound {
                    url: url.to_string(),
                },
                _ => FetchError::Body {
                    url: url.to_string(),
                    reason: e.to_string(),
                },
            })
        }
    }
}

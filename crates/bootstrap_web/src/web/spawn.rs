use futures::task::{LocalFutureObj, LocalSpawn, SpawnError};

/// Hands futures to the browser's microtask queue.
pub(super) struct BrowserSpawner;

impl LocalSpawn for BrowserSpawner {
    fn spawn_local_obj(&self, future: LocalFutureObj<'static, ()>) -> Result<(), SpawnError> {
        wasm_bindgen_futures::spawn_local(future);
        Ok(())
    }
}

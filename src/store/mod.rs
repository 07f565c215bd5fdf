pub mod disk;
pub mod memory;

use crate::core::cache::{KeyValueCollection, Store};
use disk::DiskCollection;
use fjall::{Keyspace, PartitionCreateOptions};
use memory::MemoryCollection;
use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, RwLock},
};
use tracing::{debug, warn};

/// A thread-safe key-value store that can hold multiple collections.
///
/// When the on-disk keyspace cannot be opened, persistent collections
/// degrade to memory so reads miss and writes vanish at exit.
pub struct KeyValueStore {
    collections: RwLock<HashMap<String, Arc<dyn KeyValueCollection>>>,
    keyspace: Option<Keyspace>,
}

impl KeyValueStore {
    /// Opens the store rooted at `data_path`, keeping its files in `cache/`.
    pub fn open(data_path: &Path) -> Self {
        let cache_dir = data_path.join("cache");
        let keyspace = match fjall::Config::new(&cache_dir).open() {
            Ok(keyspace) => Some(keyspace),
            Err(e) => {
                warn!(
                    "Local store unavailable at {}: {}. Using memory only.",
                    cache_dir.display(),
                    e
                );
                None
            }
        };

        Self {
            collections: RwLock::new(HashMap::new()),
            keyspace,
        }
    }

    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            keyspace: None,
        }
    }

    fn create_collection(&self, name: &str, persist: bool) -> Arc<dyn KeyValueCollection> {
        if persist {
            let partition = self.keyspace.as_ref().and_then(|ks| {
                ks.open_partition(name, PartitionCreateOptions::default())
                    .map_err(|e| warn!("Failed to open partition {}: {}", name, e))
                    .ok()
                    .map(|partition| (ks.clone(), partition))
            });
            if let Some((keyspace, partition)) = partition {
                debug!("Opened persistent collection {}", name);
                return Arc::new(DiskCollection::new(keyspace, partition));
            }
        }
        debug!("Opened memory collection {}", name);
        Arc::new(MemoryCollection::new())
    }
}

impl Store for KeyValueStore {
    fn get_collection(
        &self,
        name: &str,
        persist: bool,
        create_if_missing: bool,
    ) -> Option<Arc<dyn KeyValueCollection>> {
        if let Some(collection) = self
            .collections
            .read()
            .ok()
            .and_then(|collections| collections.get(name).cloned())
        {
            return Some(collection);
        }

        if !create_if_missing {
            return None;
        }

        let mut collections = self.collections.write().ok()?;
        let collection = collections
            .entry(name.to_string())
            .or_insert_with(|| self.create_collection(name, persist));
        Some(Arc::clone(collection))
    }
}

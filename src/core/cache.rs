//! Key-value storage abstractions

use async_trait::async_trait;
use std::sync::Arc;

/// A named collection of raw key-value pairs.
///
/// Writes are best effort: implementations log failures instead of
/// returning them.
#[async_trait]
pub trait KeyValueCollection: Send + Sync {
    async fn get(&self, key: &[u8]) -> Option<Vec<u8>>;
    async fn put(&self, key: &[u8], value: &[u8]);
    async fn remove(&self, key: &[u8]);
}

pub trait Store: Send + Sync {
    /// Returns the collection called `name`, creating it when
    /// `create_if_missing` is set. `persist` selects disk over memory.
    fn get_collection(
        &self,
        name: &str,
        persist: bool,
        create_if_missing: bool,
    ) -> Option<Arc<dyn KeyValueCollection>>;
}

//! Project configuration lookup.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::Result;
use crate::target::{URLS_OPTION, clean_urls};

/// Read access to per-project plugin options, supplied by the host.
pub trait ProjectConfigStore: Send + Sync {
    /// Returns the stored value of `key` for the project, if any.
    fn get_option(&self, project: &str, key: &str) -> Option<String>;
}

impl<T> ProjectConfigStore for std::sync::Arc<T>
where
    T: ProjectConfigStore + ?Sized,
{
    fn get_option(&self, project: &str, key: &str) -> Option<String> {
        (**self).get_option(project, key)
    }
}

/// In-memory [`ProjectConfigStore`] keyed by project slug and option name.
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    options: RwLock<HashMap<(String, String), String>>,
}

impl MemoryConfigStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a raw option value.
    pub fn set_option(
        &self,
        project: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) {
        let mut options = self.options.write().unwrap_or_else(PoisonError::into_inner);
        options.insert((project.into(), key.into()), value.into());
    }

    /// Cleans and stores the `urls` option of a project.
    pub fn set_urls(&self, project: impl Into<String>, value: &str) -> Result<()> {
        let cleaned = clean_urls(value)?;
        self.set_option(project, URLS_OPTION, cleaned);
        Ok(())
    }

    /// Removes an option, returning its previous value.
    pub fn remove_option(&self, project: &str, key: &str) -> Option<String> {
        let mut options = self.options.write().unwrap_or_else(PoisonError::into_inner);
        options.remove(&(project.to_owned(), key.to_owned()))
    }
}

impl ProjectConfigStore for MemoryConfigStore {
    fn get_option(&self, project: &str, key: &str) -> Option<String> {
        let options = self.options.read().unwrap_or_else(PoisonError::into_inner);
        options.get(&(project.to_owned(), key.to_owned())).cloned()
    }
}

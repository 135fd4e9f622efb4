use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use super::error::LookupError;
use super::table::AtmosphereTable;

/// Source of named reference atmosphere tables.
///
/// Tables handed out are shared and must be treated as read-only. Providers
/// used from several threads must make `get` safe for concurrent reads.
pub trait AtmosphereProvider {
    fn get(&self, name: &str) -> Result<Arc<AtmosphereTable>, LookupError>;
}

/// Memoizing provider backed by a directory of `<name>.json` tables.
///
/// Each table is parsed at most once; later lookups return the cached `Arc`.
#[derive(Debug, Default)]
pub struct DataCache {
    data_dir: Option<PathBuf>,
    tables: Mutex<HashMap<String, Arc<AtmosphereTable>>>,
}

impl DataCache {
    pub fn new<P: Into<PathBuf>>(data_dir: P) -> Self {
        Self {
            data_dir: Some(data_dir.into()),
            tables: Mutex::new(HashMap::new()),
        }
    }

    /// Registers a table under `name`, replacing any cached entry.
    pub fn insert(&self, name: &str, table: AtmosphereTable) {
        self.lock().insert(name.to_string(), Arc::new(table));
    }

    pub fn with_table(self, name: &str, table: AtmosphereTable) -> Self {
        self.insert(name, table);
        self
    }

    pub fn is_cached(&self, name: &str) -> bool {
        self.lock().contains_key(name)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Arc<AtmosphereTable>>> {
        // Cached tables are immutable, so a poisoned map is still consistent
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl AtmosphereProvider for DataCache {
    fn get(&self, name: &str) -> Result<Arc<AtmosphereTable>, LookupError> {
        if let Some(table) = self.lock().get(name) {
            return Ok(Arc::clone(table));
        }

        let path = self
            .data_dir
            .as_ref()
            .map(|dir| dir.join(format!("{}.json", name)))
            .filter(|path| path.is_file())
            .ok_or_else(|| LookupError::UnknownTable(name.to_string()))?;

        // Parse without holding the lock so cached lookups are not blocked
        log::info!("Loading {:?}...", path);
        let table = AtmosphereTable::from_file(&path)?;
        log::debug!("... {} rows", table.len());

        // Another thread may have loaded the same table meanwhile
        let table = self
            .lock()
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(table))
            .clone();
        Ok(table)
    }
}

//! Durable store for the proxy pool and the proxy-to-device assignment map
//!
//! Both documents live as pretty-printed JSON files that are rewritten in
//! full on every mutation. A missing or corrupt file resets to an empty
//! default rather than failing the caller.

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::{error, info};

use crate::error::Result;

const POOL_FILE: &str = "proxy.json";
const ASSIGNMENTS_FILE: &str = "assignments.json";

/// Store for the proxy pool and assignment map
///
/// The pool is re-read from disk on every access; the assignment map is
/// held in memory and flushed on every mutation.
#[derive(Debug)]
pub struct ProxyRegistry {
    pool_path: PathBuf,
    assignments_path: PathBuf,
    assignments: HashMap<String, String>,
}

impl ProxyRegistry {
    /// Open the registry rooted at `data_dir`, creating empty documents on
    /// first run and loading the assignment map
    pub fn open(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        let pool_path = data_dir.join(POOL_FILE);
        let assignments_path = data_dir.join(ASSIGNMENTS_FILE);

        if let Err(e) = ensure_file(data_dir, &pool_path, &serde_json::json!([])) {
            error!("Failed to initialize {}: {}", pool_path.display(), e);
        }
        if let Err(e) = ensure_file(data_dir, &assignments_path, &serde_json::json!({})) {
            error!("Failed to initialize {}: {}", assignments_path.display(), e);
        }

        let assignments = match read_json::<HashMap<String, String>>(&assignments_path) {
            Ok(map) => map,
            Err(e) => {
                error!("Error loading assignments: {}", e);
                HashMap::new()
            }
        };

        Self {
            pool_path,
            assignments_path,
            assignments,
        }
    }

    /// Load the proxy pool from disk
    ///
    /// Returns an empty pool and logs if the file is missing, unreadable,
    /// or not a JSON array of strings.
    pub fn load_pool(&self) -> Vec<String> {
        match read_json::<Vec<String>>(&self.pool_path) {
            Ok(pool) => pool,
            Err(e) => {
                error!("Error loading proxies: {}", e);
                Vec::new()
            }
        }
    }

    /// Persist the proxy pool, deduplicated and sorted
    pub fn save_pool(&self, proxies: &[String]) -> bool {
        let unique: BTreeSet<&String> = proxies.iter().collect();
        let ordered: Vec<&String> = unique.into_iter().collect();

        match write_json(&self.pool_path, &ordered) {
            Ok(()) => true,
            Err(e) => {
                error!("Error saving proxies: {}", e);
                false
            }
        }
    }

    /// Current proxy-to-device bindings
    pub fn assignments(&self) -> &HashMap<String, String> {
        &self.assignments
    }

    /// Bind a proxy to a device, overwriting any existing binding for that
    /// proxy, and persist
    pub fn assign(&mut self, proxy: impl Into<String>, device_id: impl Into<String>) -> bool {
        self.assignments.insert(proxy.into(), device_id.into());
        self.save_assignments()
    }

    /// Remove a proxy binding if present; persists only when a removal
    /// occurred. Returns whether the binding existed.
    pub fn unassign(&mut self, proxy: &str) -> bool {
        if self.assignments.remove(proxy).is_some() {
            self.save_assignments();
            true
        } else {
            false
        }
    }

    /// Drop every binding and persist the empty map
    pub fn clear_assignments(&mut self) -> bool {
        self.assignments.clear();
        self.save_assignments()
    }

    /// Reverse lookup: the proxy currently bound to `device_id`
    ///
    /// Linear scan over the map, first match wins.
    pub fn proxy_for_device(&self, device_id: &str) -> Option<String> {
        self.assignments
            .iter()
            .find(|(_, assigned)| assigned.as_str() == device_id)
            .map(|(proxy, _)| proxy.clone())
    }

    fn save_assignments(&self) -> bool {
        match write_json(&self.assignments_path, &self.assignments) {
            Ok(()) => true,
            Err(e) => {
                error!("Error saving assignments: {}", e);
                false
            }
        }
    }
}

fn ensure_file(dir: &Path, path: &Path, default: &serde_json::Value) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(dir)?;
        write_json(path, default)?;
        info!("Created {}", path.display());
    }
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Write a JSON document pretty-printed with a 4-space indent
fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    fs::write(path, buf)?;
    Ok(())
}

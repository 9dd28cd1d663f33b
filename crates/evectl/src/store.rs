//! File-backed client for local use
//!
//! Stands in for the remote backend: each namespace gets a directory under
//! the platform data dir with one JSON map per resource kind. Useful for
//! trying the CLI without a cluster; the command layer only ever sees the
//! `EventingClient` trait, so swapping in a remote implementation touches
//! nothing else.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use evectl_core::client::{EventingClient, ListFilter};
use evectl_core::destination::ReferenceLookup;
use evectl_core::error::ClientError;
use evectl_core::resources::{Broker, Trigger};
use serde::de::DeserializeOwned;
use serde::Serialize;

const BROKERS_FILE: &str = "brokers.json";
const TRIGGERS_FILE: &str = "triggers.json";

/// Root directory for all namespaces.
pub fn default_root() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("~/.local/share"))
        .join("evectl")
}

fn backend<E: Display>(err: E) -> ClientError {
    ClientError::Backend(err.to_string())
}

fn load_map<T: DeserializeOwned>(path: &Path) -> Result<BTreeMap<String, T>, ClientError> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let data = fs::read_to_string(path).map_err(backend)?;
    serde_json::from_str(&data).map_err(backend)
}

fn save_map<T: Serialize>(path: &Path, map: &BTreeMap<String, T>) -> Result<(), ClientError> {
    let data = serde_json::to_string_pretty(map).map_err(backend)?;
    fs::write(path, data).map_err(backend)
}

/// An `EventingClient` that persists resources as JSON files.
pub struct FileStoreClient {
    namespace: String,
    dir: PathBuf,
}

impl FileStoreClient {
    pub fn open(namespace: &str) -> Result<Self> {
        Self::open_at(&default_root(), namespace)
    }

    pub fn open_at(root: &Path, namespace: &str) -> Result<Self> {
        let dir = root.join(namespace);
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create data directory: {}", dir.display()))?;
        Ok(Self {
            namespace: namespace.to_string(),
            dir,
        })
    }

    /// A standalone lookup handle over the same files, so sink resolution
    /// can run while the client itself is mutably borrowed.
    pub fn lookup(&self) -> FileStoreLookup {
        FileStoreLookup {
            dir: self.dir.clone(),
        }
    }

    fn brokers(&self) -> Result<BTreeMap<String, Broker>, ClientError> {
        load_map(&self.dir.join(BROKERS_FILE))
    }

    fn triggers(&self) -> Result<BTreeMap<String, Trigger>, ClientError> {
        load_map(&self.dir.join(TRIGGERS_FILE))
    }
}

impl EventingClient for FileStoreClient {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn create_broker(&mut self, broker: Broker) -> Result<(), ClientError> {
        let mut brokers = self.brokers()?;
        let name = broker.name().to_string();
        if brokers.contains_key(&name) {
            return Err(ClientError::Backend(format!(
                "broker '{}' already exists",
                name
            )));
        }
        brokers.insert(name, broker);
        save_map(&self.dir.join(BROKERS_FILE), &brokers)
    }

    fn get_broker(&mut self, name: &str) -> Result<Broker, ClientError> {
        self.brokers()?
            .get(name)
            .cloned()
            .ok_or_else(|| ClientError::not_found("Broker", name))
    }

    fn update_broker(&mut self, broker: Broker) -> Result<(), ClientError> {
        let mut brokers = self.brokers()?;
        let name = broker.name().to_string();
        if !brokers.contains_key(&name) {
            return Err(ClientError::not_found("Broker", &name));
        }
        brokers.insert(name, broker);
        save_map(&self.dir.join(BROKERS_FILE), &brokers)
    }

    fn delete_broker(&mut self, name: &str) -> Result<(), ClientError> {
        let mut brokers = self.brokers()?;
        if brokers.remove(name).is_none() {
            return Err(ClientError::not_found("Broker", name));
        }
        save_map(&self.dir.join(BROKERS_FILE), &brokers)
    }

    fn list_brokers(&mut self, _filter: &ListFilter) -> Result<Vec<Broker>, ClientError> {
        Ok(self.brokers()?.into_values().collect())
    }

    fn create_trigger(&mut self, trigger: Trigger) -> Result<(), ClientError> {
        let mut triggers = self.triggers()?;
        let name = trigger.name().to_string();
        if triggers.contains_key(&name) {
            return Err(ClientError::Backend(format!(
                "trigger '{}' already exists",
                name
            )));
        }
        triggers.insert(name, trigger);
        save_map(&self.dir.join(TRIGGERS_FILE), &triggers)
    }

    fn get_trigger(&mut self, name: &str) -> Result<Trigger, ClientError> {
        self.triggers()?
            .get(name)
            .cloned()
            .ok_or_else(|| ClientError::not_found("Trigger", name))
    }

    fn update_trigger(&mut self, trigger: Trigger) -> Result<(), ClientError> {
        let mut triggers = self.triggers()?;
        let name = trigger.name().to_string();
        if !triggers.contains_key(&name) {
            return Err(ClientError::not_found("Trigger", &name));
        }
        triggers.insert(name, trigger);
        save_map(&self.dir.join(TRIGGERS_FILE), &triggers)
    }

    fn delete_trigger(&mut self, name: &str) -> Result<(), ClientError> {
        let mut triggers = self.triggers()?;
        if triggers.remove(name).is_none() {
            return Err(ClientError::not_found("Trigger", name));
        }
        save_map(&self.dir.join(TRIGGERS_FILE), &triggers)
    }

    fn list_triggers(&mut self, filter: &ListFilter) -> Result<Vec<Trigger>, ClientError> {
        let triggers = self.triggers()?.into_values();
        Ok(match &filter.broker {
            Some(broker) => triggers.filter(|t| &t.spec.broker == broker).collect(),
            None => triggers.collect(),
        })
    }
}

/// Existence checks over the stored resources. Kinds the store does not
/// track (Service and friends) are assumed present; their existence is the
/// server's concern.
pub struct FileStoreLookup {
    dir: PathBuf,
}

impl ReferenceLookup for FileStoreLookup {
    fn exists(&self, kind: &str, name: &str, _namespace: &str) -> Result<bool, String> {
        let found = match kind {
            "Broker" => load_map::<Broker>(&self.dir.join(BROKERS_FILE))
                .map_err(|e| e.to_string())?
                .contains_key(name),
            "Trigger" => load_map::<Trigger>(&self.dir.join(TRIGGERS_FILE))
                .map_err(|e| e.to_string())?
                .contains_key(name),
            _ => true,
        };
        Ok(found)
    }
}

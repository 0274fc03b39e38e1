//! Durable storage for the personal access token.
//!
//! The browser original kept the token in a localStorage slot; here it lives
//! in a small JSON file. Every mutation bumps a generation counter so cached
//! API data fetched under an older token can be recognised as stale.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoredKey {
    api_key: Option<String>,
}

#[derive(Debug)]
pub struct ApiKeyStore {
    path: String,
    key: Option<String>,
    generation: u64,
}

impl ApiKeyStore {
    /// Reads the persisted token; a missing file means no token yet.
    pub fn load(path: &str) -> Result<Self> {
        let stored = match fs::read_to_string(path) {
            Ok(content) => serde_json::from_str::<StoredKey>(&content)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => StoredKey::default(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self {
            path: path.to_string(),
            key: stored.api_key.filter(|key| !key.is_empty()),
            generation: 0,
        })
    }

    pub fn get(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Counter bumped on every [`set`]/[`clear`]. Cached data records the
    /// generation it was fetched under and is stale once the counters differ.
    ///
    /// [`set`]: ApiKeyStore::set
    /// [`clear`]: ApiKeyStore::clear
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn set(&mut self, key: String) -> Result<()> {
        self.key = Some(key).filter(|key| !key.is_empty());
        self.generation += 1;
        self.save()
    }

    pub fn clear(&mut self) -> Result<()> {
        self.key = None;
        self.generation += 1;
        self.save()
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = Path::new(&self.path).parent() {
            fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_string_pretty(&StoredKey {
            api_key: self.key.clone(),
        })?;
        fs::write(&self.path, payload)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> String {
        std::env::temp_dir()
            .join(format!("up_tagger_{name}_{}.json", std::process::id()))
            .display()
            .to_string()
    }

    #[test]
    fn missing_file_means_no_token() {
        let store = ApiKeyStore::load("/nonexistent/dir/api_key.json").unwrap();
        assert_eq!(store.get(), None);
        assert_eq!(store.generation(), 0);
    }

    #[test]
    fn set_persists_and_bumps_generation() {
        let path = temp_path("set");
        let mut store = ApiKeyStore::load(&path).unwrap();
        store.set("up:yeah:token".to_string()).unwrap();
        assert_eq!(store.get(), Some("up:yeah:token"));
        assert_eq!(store.generation(), 1);

        let reloaded = ApiKeyStore::load(&path).unwrap();
        assert_eq!(reloaded.get(), Some("up:yeah:token"));

        store.clear().unwrap();
        assert_eq!(store.get(), None);
        assert_eq!(store.generation(), 2);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn empty_token_counts_as_absent() {
        let path = temp_path("empty");
        let mut store = ApiKeyStore::load(&path).unwrap();
        store.set(String::new()).unwrap();
        assert_eq!(store.get(), None);
        let _ = fs::remove_file(&path);
    }
}

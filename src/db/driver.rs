use anyhow::Result;
use serde::{de::DeserializeOwned, Serialize};
use sled::Db as Sled;

/// Key-value store holding JSON-encoded values.
pub struct Db {
    handle: Sled,
}
impl Db {
    pub fn new(path: &str) -> Result<Self> {
        let handle = sled::open(path)?;
        Ok(Self { handle })
    }
    // in-memory store, dropped with the handle
    pub fn temporary() -> Result<Self> {
        let handle = sled::Config::new().temporary(true).open()?;
        Ok(Self { handle })
    }

    // CRUD
    pub fn insert<T: Serialize, K: AsRef<str>>(&self, key: K, value: &T) -> Result<()> {
        let value = serde_json::to_vec(value)?;
        self.insert_raw(key, &value)
    }
    pub fn insert_raw<K: AsRef<str>>(&self, key: K, value: &[u8]) -> Result<()> {
        let key = key.as_ref();
        self.handle.insert(key, value)?;
        self.handle.flush()?;
        Ok(())
    }
    pub fn get<T: DeserializeOwned, K: AsRef<str>>(&self, key: K) -> Result<Option<T>> {
        let value = match self.get_raw(key)? {
            Some(value) => value,
            None => return Ok(None),
        };
        let value = serde_json::from_slice(&value)?;
        Ok(Some(value))
    }
    // empty values read back as absent
    pub fn get_raw<K: AsRef<str>>(&self, key: K) -> Result<Option<Vec<u8>>> {
        let key = key.as_ref();
        let value = self.handle.get(key)?;
        Ok(value.filter(|v| !v.is_empty()).map(|v| v.to_vec()))
    }
    pub fn remove<K: AsRef<str>>(&self, key: K) -> Result<()> {
        let key = key.as_ref();
        self.handle.remove(key)?;
        self.handle.flush()?;
        Ok(())
    }
}

// Required Debug implementation for `Db`
impl std::fmt::Debug for Db {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Db").finish()
    }
}

pub mod local;
pub mod memory;

/// Abstract key-value storage for persisted quote state.
/// Implementations: FileKeyValueStore (durable), MemoryKeyValueStore (session).
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value for a key. `Ok(None)` when absent.
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// Write a value, overwriting any previous one.
    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

/// Keys become file names, so only a conservative character set is allowed.
pub(crate) fn validate_key(key: &str) -> Result<(), PersistenceError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(PersistenceError::InvalidKey(key.to_string()))
    }
}

/// Memory storage whose writes can be switched to fail.
#[cfg(test)]
pub(crate) struct FlakyKeyValueStore {
    inner: memory::MemoryKeyValueStore,
    fail_writes: std::sync::atomic::AtomicBool,
}

#[cfg(test)]
impl FlakyKeyValueStore {
    pub(crate) fn new() -> Self {
        Self {
            inner: memory::MemoryKeyValueStore::new(),
            fail_writes: std::sync::atomic::AtomicBool::new(false),
        }
    }

    pub(crate) fn set_failing(&self, failing: bool) {
        self.fail_writes
            .store(failing, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(test)]
impl KeyValueStore for FlakyKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        if self.fail_writes.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full").into());
        }
        self.inner.set(key, value)
    }
}

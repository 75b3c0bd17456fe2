use crate::error::Error;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

/// Raw key-addressed byte storage underneath the typed slots.
pub trait KvBackend: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Error>;
    fn put(&self, key: &str, value: &[u8]) -> Result<(), Error>;
}

/// In-process backend with write counting and failure injection.
#[derive(Default)]
pub struct MemoryBackend {
    values: Mutex<HashMap<String, Vec<u8>>>,
    puts: AtomicUsize,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `put` calls across all keys.
    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}

impl KvBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Error> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Error::Other(format!("injected read failure for {}", key)));
        }
        Ok(self.raw(key))
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), Error> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::Other(format!("injected write failure for {}", key)));
        }
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_vec());
        self.puts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

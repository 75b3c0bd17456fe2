use super::backend::KvBackend;
use crate::error::Error;
use rocksdb::{Options, DB};
use std::path::Path;
use tracing::debug;

/// RocksDB-backed slot storage.
pub struct RocksBackend {
    db: DB,
}

impl RocksBackend {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let mut db_options = Options::default();
        db_options.create_if_missing(true);
        let db = DB::open(&db_options, path.as_ref())?;
        debug!("Opened store at '{}'", path.as_ref().display());
        Ok(Self { db })
    }
}

impl KvBackend for RocksBackend {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Error> {
        Ok(self.db.get(key.as_bytes())?)
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), Error> {
        self.db.put(key.as_bytes(), value)?;
        Ok(())
    }
}

use crate::db::{SqlitePool, connect};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// A SQLite file under the temp dir, removed on drop.
pub struct TempDb {
    path: PathBuf,
}

impl TempDb {
    pub fn new(name: &str) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before UNIX_EPOCH")
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!(
            "gatehouse-{name}-{}-{nanos}.sqlite",
            std::process::id()
        ));
        Self { path }
    }

    pub async fn pool(&self) -> SqlitePool {
        connect(&format!("sqlite:{}", self.path.display()))
            .await
            .expect("failed to open test database")
    }
}

impl Drop for TempDb {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

//! Last good copy of the listing feed, kept on disk so the dashboard has
//! something real to show while the feed is unreachable.

use std::{
    fs,
    path::{Path, PathBuf},
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::ResultSet;

const SNAPSHOT_FILENAME: &str = "snapshot.json";
const DATA_DIR_NAME: &str = "listing-dashboard";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Unix timestamp (seconds) when the feed was fetched.
    pub cached_at: u64,
    pub results: ResultSet,
}

impl Snapshot {
    pub fn new(results: ResultSet) -> Self {
        let cached_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self { cached_at, results }
    }

    pub fn age(&self) -> Duration {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Duration::from_secs(now.saturating_sub(self.cached_at))
    }

    pub fn age_string(&self) -> String {
        let secs = self.age().as_secs();
        if secs < 60 {
            format!("{secs}s")
        } else if secs < 3600 {
            format!("{}m", secs / 60)
        } else if secs < 86400 {
            format!("{}h", secs / 3600)
        } else {
            format!("{}d", secs / 86400)
        }
    }
}

#[derive(Clone, Debug)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store under the platform's local data directory.
    pub fn open_default() -> Self {
        let base = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DATA_DIR_NAME);
        Self::at(base.join(SNAPSHOT_FILENAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Option<Snapshot> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no snapshot on disk");
            return None;
        }

        match fs::read_to_string(&self.path) {
            Ok(content) => match serde_json::from_str::<Snapshot>(&content) {
                Ok(snapshot) => {
                    debug!(
                        listings = snapshot.results.matches.len(),
                        age = %snapshot.age_string(),
                        "loaded snapshot"
                    );
                    Some(snapshot)
                }
                Err(e) => {
                    warn!("failed to parse snapshot: {e}");
                    None
                }
            },
            Err(e) => {
                warn!("failed to read snapshot: {e}");
                None
            }
        }
    }

    pub fn save(&self, results: &ResultSet) -> Result<(), std::io::Error> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let snapshot = Snapshot::new(results.clone());
        let content = serde_json::to_string(&snapshot)?;
        fs::write(&self.path, content)?;
        debug!(
            listings = results.matches.len(),
            path = %self.path.display(),
            "saved snapshot"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sample::sample_results;

    #[test]
    fn save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::at(dir.path().join("deep").join(SNAPSHOT_FILENAME));
        assert!(store.load().is_none());

        store.save(&sample_results()).unwrap();
        let snapshot = store.load().unwrap();
        assert_eq!(snapshot.results, sample_results());
        assert!(snapshot.age() < Duration::from_secs(60));
        assert!(snapshot.age_string().ends_with('s'));
    }

    #[test]
    fn corrupt_snapshot_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SNAPSHOT_FILENAME);
        fs::write(&path, "{").unwrap();
        assert!(SnapshotStore::at(path).load().is_none());
    }

    #[test]
    fn age_buckets() {
        let mut snapshot = Snapshot::new(ResultSet::default());
        snapshot.cached_at = snapshot.cached_at.saturating_sub(2 * 3600);
        assert_eq!(snapshot.age_string(), "2h");
    }
}

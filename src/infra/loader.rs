use tracing::{debug, info, warn};

use crate::domain::{sample::sample_results, LoadSource, ResultSet};
use crate::infra::{
    feed::{FeedError, ListingFeed},
    snapshot::SnapshotStore,
};

/// A result set plus where it came from. `error` is set whenever the live
/// feed could not be used.
#[derive(Debug)]
pub struct Loaded {
    pub results: ResultSet,
    pub source: LoadSource,
    pub error: Option<FeedError>,
    pub snapshot_age: Option<String>,
}

/// Live feed first, then the last saved snapshot, then the built-in sample.
pub async fn load_with_fallback(location: &str, store: &SnapshotStore) -> Loaded {
    let fetched = match ListingFeed::new(location) {
        Ok(feed) => {
            debug!(source = ?feed.source(), "fetching listing feed");
            feed.fetch().await
        }
        Err(err) => Err(err),
    };

    match fetched {
        Ok(results) => {
            info!(listings = results.matches.len(), "listing feed refreshed");
            if let Err(err) = store.save(&results) {
                warn!("failed to save snapshot: {err}");
            }
            Loaded {
                results,
                source: LoadSource::Live,
                error: None,
                snapshot_age: None,
            }
        }
        Err(err) => {
            warn!(location, "listing feed unavailable: {err}");
            match store.load() {
                Some(snapshot) => Loaded {
                    snapshot_age: Some(snapshot.age_string()),
                    results: snapshot.results,
                    source: LoadSource::Cached,
                    error: Some(err),
                },
                None => Loaded {
                    results: sample_results(),
                    source: LoadSource::Sample,
                    error: Some(err),
                    snapshot_age: None,
                },
            }
        }
    }
}

//! Where rosters come from: local files, HTTP feeds, and a TTL cache over either.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::config::ColumnNames;
use crate::error::Result;
use crate::fetch::{BasicClient, HttpClient, fetch_bytes};
use crate::model::LoadedDataset;
use crate::parser::{parse_roster, parse_roster_file};

/// Abstraction over a roster provider.
#[async_trait]
pub trait RosterSource: Send + Sync {
    /// Loads a fresh snapshot of the roster.
    async fn load(&self) -> Result<LoadedDataset>;

    /// Human-readable origin, used in log fields.
    fn describe(&self) -> String;
}

#[async_trait]
impl<S: RosterSource + ?Sized> RosterSource for Arc<S> {
    async fn load(&self) -> Result<LoadedDataset> {
        (**self).load().await
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

#[async_trait]
impl<S: RosterSource + ?Sized> RosterSource for Box<S> {
    async fn load(&self) -> Result<LoadedDataset> {
        (**self).load().await
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

pub struct FileSource {
    path: String,
    columns: ColumnNames,
}

impl FileSource {
    pub fn new(path: impl Into<String>, columns: ColumnNames) -> Self {
        Self {
            path: path.into(),
            columns,
        }
    }
}

#[async_trait]
impl RosterSource for FileSource {
    async fn load(&self) -> Result<LoadedDataset> {
        Ok(parse_roster_file(&self.path, &self.columns)?.into_loaded())
    }

    fn describe(&self) -> String {
        self.path.clone()
    }
}

pub struct HttpSource<C> {
    client: C,
    url: String,
    columns: ColumnNames,
}

impl<C: HttpClient> HttpSource<C> {
    pub fn new(client: C, url: impl Into<String>, columns: ColumnNames) -> Self {
        Self {
            client,
            url: url.into(),
            columns,
        }
    }
}

#[async_trait]
impl<C: HttpClient> RosterSource for HttpSource<C> {
    async fn load(&self) -> Result<LoadedDataset> {
        let bytes = fetch_bytes(&self.client, &self.url).await?;
        debug!(bytes = bytes.len(), "Roster bytes received, parsing");
        Ok(parse_roster(&bytes, &self.columns)?.into_loaded())
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

fn is_url(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Picks an HTTP source for `http(s)://` locations and a file source otherwise.
pub fn source_for(location: &str, columns: ColumnNames) -> Box<dyn RosterSource> {
    if is_url(location) {
        Box::new(HttpSource::new(BasicClient::new(), location, columns))
    } else {
        Box::new(FileSource::new(location, columns))
    }
}

/// Serves the last successful load until it is older than `ttl`.
///
/// Failed loads are never cached.
pub struct CachedSource<S> {
    inner: S,
    ttl: Duration,
    cached: Mutex<Option<(Instant, LoadedDataset)>>,
}

impl<S: RosterSource> CachedSource<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            cached: Mutex::new(None),
        }
    }

    /// Drops the cached snapshot so the next load goes to the inner source.
    pub async fn invalidate(&self) {
        *self.cached.lock().await = None;
    }
}

#[async_trait]
impl<S: RosterSource> RosterSource for CachedSource<S> {
    async fn load(&self) -> Result<LoadedDataset> {
        let mut cached = self.cached.lock().await;
        if let Some((loaded_at, snapshot)) = cached.as_ref() {
            if loaded_at.elapsed() < self.ttl {
                debug!(age_ms = loaded_at.elapsed().as_millis() as u64, "Serving cached roster");
                return Ok(snapshot.clone());
            }
        }

        let snapshot = self.inner.load().await?;
        *cached = Some((Instant::now(), snapshot.clone()));
        Ok(snapshot)
    }

    fn describe(&self) -> String {
        format!("cached({})", self.inner.describe())
    }
}

/// Loads from `source`, degrading fetch and decode failures to an empty roster.
///
/// Structural errors such as a missing column are still returned.
#[tracing::instrument(skip(source), fields(source = %source.describe()))]
pub async fn load_or_empty<S: RosterSource + ?Sized>(source: &S) -> Result<LoadedDataset> {
    match source.load().await {
        Ok(loaded) => {
            info!(rows = loaded.len(), "Roster loaded");
            Ok(loaded)
        }
        Err(e) if e.is_structural() => Err(e),
        Err(e) => {
            error!(error = %e, "Roster load failed, continuing with empty roster");
            Ok(LoadedDataset::Empty)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RosterError;
    use crate::model::{Dataset, Record};
    use std::env;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        loads: AtomicUsize,
        fail: bool,
    }

    impl CountingSource {
        fn new(fail: bool) -> Self {
            Self {
                loads: AtomicUsize::new(0),
                fail,
            }
        }
    }

    #[async_trait]
    impl RosterSource for CountingSource {
        async fn load(&self) -> Result<LoadedDataset> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(RosterError::Io(std::io::Error::other("boom")));
            }
            Ok(Dataset::new(vec![Record::new("Ana", "X-A", 90.0, 80.0)]).into_loaded())
        }

        fn describe(&self) -> String {
            "counting".to_string()
        }
    }

    struct MissingColumnSource;

    #[async_trait]
    impl RosterSource for MissingColumnSource {
        async fn load(&self) -> Result<LoadedDataset> {
            Err(RosterError::MissingColumn {
                column: "kelas".to_string(),
            })
        }

        fn describe(&self) -> String {
            "broken".to_string()
        }
    }

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    #[tokio::test]
    async fn test_file_source_loads_roster() {
        let path = temp_path("roster_rater_test_file_source.csv");
        fs::write(&path, "nama siswa,kelas,nilai harian,nilai tes\nAna,X-A,90,80\n").unwrap();

        let loaded = FileSource::new(&path, ColumnNames::default()).load().await.unwrap();
        assert_eq!(loaded.len(), 1);

        fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_missing_file_degrades_to_empty() {
        let source = FileSource::new(temp_path("roster_rater_does_not_exist.csv"), ColumnNames::default());
        assert_eq!(load_or_empty(&source).await.unwrap(), LoadedDataset::Empty);
    }

    #[tokio::test]
    async fn test_missing_column_is_surfaced() {
        let err = load_or_empty(&MissingColumnSource).await.unwrap_err();
        assert!(matches!(err, RosterError::MissingColumn { .. }));
    }

    #[tokio::test]
    async fn test_cache_serves_within_ttl() {
        let cached = CachedSource::new(CountingSource::new(false), Duration::from_secs(300));
        cached.load().await.unwrap();
        cached.load().await.unwrap();
        assert_eq!(cached.inner.loads.load(Ordering::SeqCst), 1);

        cached.invalidate().await;
        cached.load().await.unwrap();
        assert_eq!(cached.inner.loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_zero_ttl_always_reloads() {
        let cached = CachedSource::new(CountingSource::new(false), Duration::ZERO);
        cached.load().await.unwrap();
        cached.load().await.unwrap();
        assert_eq!(cached.inner.loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failures_not_cached() {
        let cached = CachedSource::new(CountingSource::new(true), Duration::from_secs(300));
        assert!(cached.load().await.is_err());
        assert!(cached.load().await.is_err());
        assert_eq!(cached.inner.loads.load(Ordering::SeqCst), 2);
        assert_eq!(cached.describe(), "cached(counting)");
    }

    #[test]
    fn test_source_for_dispatch() {
        assert_eq!(source_for("roster.csv", ColumnNames::default()).describe(), "roster.csv");
        assert_eq!(
            source_for("https://example.org/r.csv", ColumnNames::default()).describe(),
            "https://example.org/r.csv"
        );
    }

    #[test]
    fn test_only_http_schemes_are_urls() {
        assert!(is_url("http://example.org/r.csv"));
        assert!(is_url("https://example.org/r.csv"));
        assert!(!is_url("httpdump.csv"));
        assert!(!is_url("https_exports/roster.csv"));
        assert!(!is_url("data/http://roster.csv"));
    }
}

use std::io::Write;
use std::path::{Path, PathBuf};

use lesen_config::ocr::OcrConfig;
use lesen_types::OcrStage;

use crate::ocr::OcrError;
use crate::progress::ProgressReporter;

/// Where the language model for one recognition comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    /// Shipped next to the application
    Bundled(PathBuf),
    /// Downloaded by an earlier run
    Cached(PathBuf),
    /// Downloaded by this run
    Fetched(PathBuf),
    /// Whatever the engine has installed
    System,
}

impl ModelSource {
    /// Directory to hand the engine, if it should not use its own
    pub fn tessdata_dir(&self) -> Option<&Path> {
        match self {
            ModelSource::Bundled(dir) | ModelSource::Cached(dir) | ModelSource::Fetched(dir) => {
                Some(dir)
            }
            ModelSource::System => None,
        }
    }
}

struct ModelFetch {
    client: reqwest::Client,
    base_url: String,
    cache_dir: PathBuf,
}

/// Resolves the model for the fixed recognition language
///
/// Nothing is remembered between calls, so a bundled file added while the
/// app is running is picked up by the next run.
pub struct ModelLocator {
    language: String,
    bundled_dir: PathBuf,
    fetch: Option<ModelFetch>,
}

impl ModelLocator {
    pub fn new(language: impl Into<String>, bundled_dir: impl Into<PathBuf>) -> Self {
        Self {
            language: language.into(),
            bundled_dir: bundled_dir.into(),
            fetch: None,
        }
    }

    pub fn with_fetch(mut self, base_url: impl Into<String>, cache_dir: impl Into<PathBuf>) -> Self {
        self.fetch = Some(ModelFetch {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            cache_dir: cache_dir.into(),
        });
        self
    }

    pub fn from_config(config: &OcrConfig) -> Self {
        let locator = Self::new(config.language.clone(), config.model_dir.clone());
        if config.fetch_models {
            locator.with_fetch(config.model_url.clone(), config.cache_dir.clone())
        } else {
            locator
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    fn file_name(&self) -> String {
        format!("{}.traineddata", self.language)
    }

    pub async fn resolve(&self, progress: &mut ProgressReporter) -> Result<ModelSource, OcrError> {
        progress.report(OcrStage::LoadingLanguage, 0.0).await;

        let bundled = self.bundled_dir.join(self.file_name());
        let source = if exists(&bundled).await {
            ModelSource::Bundled(self.bundled_dir.clone())
        } else if let Some(fetch) = &self.fetch {
            let cached = fetch.cache_dir.join(self.file_name());
            if exists(&cached).await {
                ModelSource::Cached(fetch.cache_dir.clone())
            } else {
                self.download(fetch, &cached, progress).await?;
                ModelSource::Fetched(fetch.cache_dir.clone())
            }
        } else {
            ModelSource::System
        };

        tracing::debug!("Using {} model from {:?}", self.language, source);
        progress.report(OcrStage::LoadingLanguage, 1.0).await;
        Ok(source)
    }

    async fn download(
        &self,
        fetch: &ModelFetch,
        target: &Path,
        progress: &mut ProgressReporter,
    ) -> Result<(), OcrError> {
        let url = format!("{}/{}", fetch.base_url.trim_end_matches('/'), self.file_name());
        tracing::info!("Downloading language model from {}", url);

        tokio::fs::create_dir_all(&fetch.cache_dir).await?;

        let mut response = fetch
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| OcrError::ModelFetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(OcrError::ModelFetch(format!(
                "HTTP {} for {}",
                response.status(),
                url
            )));
        }

        let total = response.content_length().filter(|len| *len > 0);
        // Partial downloads vanish with the temp file; only a complete one is renamed in
        let mut file = tempfile::NamedTempFile::new_in(&fetch.cache_dir)?;
        let mut received: u64 = 0;

        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| OcrError::ModelFetch(e.to_string()))?
        {
            file.write_all(&chunk)?;
            received += chunk.len() as u64;
            if let Some(total) = total {
                progress
                    .report(OcrStage::LoadingLanguage, received as f32 / total as f32)
                    .await;
            }
        }

        if received == 0 {
            return Err(OcrError::ModelFetch(format!("Empty model file from {url}")));
        }

        file.persist(target).map_err(|e| OcrError::Io(e.error))?;
        tracing::info!("Stored {} bytes at {}", received, target.display());
        Ok(())
    }
}

async fn exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::Router;
    use axum::routing::get;
    use lesen_types::OcrProgress;

    use super::*;

    async fn model_server(hits: Arc<AtomicUsize>) -> String {
        let app = Router::new().route(
            "/deu.traineddata",
            get(move || {
                let hits = hits.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    vec![7u8; 64 * 1024]
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_system_model_without_bundle_or_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let locator = ModelLocator::new("deu", dir.path().join("tessdata"));

        let source = locator.resolve(&mut ProgressReporter::silent()).await.unwrap();
        assert_eq!(source, ModelSource::System);
        assert_eq!(source.tessdata_dir(), None);
    }

    #[tokio::test]
    async fn test_bundled_file_added_later_is_picked_up() {
        let dir = tempfile::tempdir().unwrap();
        let locator = ModelLocator::new("deu", dir.path());

        let first = locator.resolve(&mut ProgressReporter::silent()).await.unwrap();
        assert_eq!(first, ModelSource::System);

        std::fs::write(dir.path().join("deu.traineddata"), b"model").unwrap();
        let second = locator.resolve(&mut ProgressReporter::silent()).await.unwrap();
        assert_eq!(second, ModelSource::Bundled(dir.path().to_path_buf()));
    }

    #[tokio::test]
    async fn test_fetch_downloads_once_then_uses_cache() {
        let hits = Arc::new(AtomicUsize::new(0));
        let base_url = model_server(hits.clone()).await;
        let bundled = tempfile::tempdir().unwrap();
        let cache = tempfile::tempdir().unwrap();
        let locator = ModelLocator::new("deu", bundled.path()).with_fetch(base_url, cache.path());

        let (tx, rx) = kanal::unbounded_async::<OcrProgress>();
        let mut reporter = ProgressReporter::new(tx);
        let source = locator.resolve(&mut reporter).await.unwrap();
        drop(reporter);

        assert_eq!(source, ModelSource::Fetched(cache.path().to_path_buf()));
        let stored = std::fs::read(cache.path().join("deu.traineddata")).unwrap();
        assert_eq!(stored.len(), 64 * 1024);

        let mut fractions = Vec::new();
        while let Ok(update) = rx.recv().await {
            assert_eq!(update.stage, OcrStage::LoadingLanguage);
            fractions.push(update.fraction);
        }
        assert_eq!(fractions.first(), Some(&0.0));
        assert_eq!(fractions.last(), Some(&1.0));
        assert!(fractions.windows(2).all(|w| w[0] < w[1]));

        let again = locator.resolve(&mut ProgressReporter::silent()).await.unwrap();
        assert_eq!(again, ModelSource::Cached(cache.path().to_path_buf()));
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        // A bundled model still wins over the cache
        std::fs::write(bundled.path().join("deu.traineddata"), b"model").unwrap();
        let bundled_source = locator.resolve(&mut ProgressReporter::silent()).await.unwrap();
        assert_eq!(bundled_source, ModelSource::Bundled(bundled.path().to_path_buf()));
    }

    #[tokio::test]
    async fn test_fetch_http_error_is_reported() {
        let app = Router::new();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let cache = tempfile::tempdir().unwrap();
        let locator = ModelLocator::new("deu", cache.path().join("none"))
            .with_fetch(format!("http://{addr}"), cache.path());

        let err = locator.resolve(&mut ProgressReporter::silent()).await.unwrap_err();
        assert!(matches!(err, OcrError::ModelFetch(_)));
        assert!(!cache.path().join("deu.traineddata").exists());
    }
}

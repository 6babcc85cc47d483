use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Source that counts fetches and fails the first `failures` of them
#[derive(Default)]
struct CountingSource {
    fetches: AtomicUsize,
    failures: usize,
    delay: Option<Duration>,
}

#[async_trait]
impl LibrarySource for CountingSource {
    async fn fetch(&self, name: &str, url: &str) -> Result<LibraryHandle, LoaderError> {
        let attempt = self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if attempt < self.failures {
            return Err(LoaderError::LoadFailed {
                url: url.to_string(),
                reason: "network unreachable".to_string(),
            });
        }
        Ok(LibraryHandle {
            name: name.to_string(),
            url: url.to_string(),
        })
    }
}

#[tokio::test]
async fn test_get_loads_known_library_once() {
    let loader = LibraryLoader::new(CountingSource::default());

    let first = loader.get("marked").await.unwrap();
    let second = loader.get("marked").await.unwrap();

    assert_eq!(first, second);
    assert!(first.url.contains("marked"));
    assert_eq!(loader.source.fetches.load(Ordering::SeqCst), 1);
    assert!(loader.is_loaded("marked"));
}

#[tokio::test]
async fn test_unknown_name_is_rejected_without_fetch() {
    let loader = LibraryLoader::new(CountingSource::default());

    let result = loader.get("coffeescript").await;

    assert_eq!(result, Err(LoaderError::Unknown("coffeescript".to_string())));
    assert_eq!(loader.source.fetches.load(Ordering::SeqCst), 0);
    assert_eq!(
        result.unwrap_err().to_string(),
        "Transpiler coffeescript not defined."
    );
}

#[tokio::test]
async fn test_failed_load_is_retried_on_next_get() {
    let loader = LibraryLoader::new(CountingSource {
        failures: 1,
        ..Default::default()
    });

    assert!(matches!(
        loader.get("babel").await,
        Err(LoaderError::LoadFailed { .. })
    ));
    assert!(!loader.is_loaded("babel"));

    let handle = loader.get("babel").await.unwrap();
    assert_eq!(handle.name, "babel");
    assert_eq!(loader.source.fetches.load(Ordering::SeqCst), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_concurrent_gets_share_one_load() {
    let loader = Arc::new(LibraryLoader::new(CountingSource {
        delay: Some(Duration::from_millis(30)),
        ..Default::default()
    }));

    let mut tasks = Vec::new();
    for _ in 0..4 {
        let loader = Arc::clone(&loader);
        tasks.push(tokio::spawn(async move { loader.get("typescript").await }));
    }
    for task in tasks {
        assert!(task.await.unwrap().is_ok());
    }

    assert_eq!(loader.source.fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_custom_urls_replace_defaults() {
    let loader = LibraryLoader::with_urls(
        CountingSource::default(),
        [("mdx".to_string(), "https://example.test/mdx.js".to_string())],
    );

    assert_eq!(
        loader.get("mdx").await.unwrap().url,
        "https://example.test/mdx.js"
    );
    assert!(matches!(
        loader.get("babel").await,
        Err(LoaderError::Unknown(_))
    ));
}

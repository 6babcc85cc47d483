use super::*;
use std::sync::atomic::AtomicUsize;

fn counter() -> (Arc<AtomicUsize>, impl Fn() + Send + Sync + Clone + 'static) {
    let count = Arc::new(AtomicUsize::new(0));
    let count_clone = count.clone();
    (count, move || {
        count_clone.fetch_add(1, Ordering::SeqCst);
    })
}

#[test]
fn test_current_without_runtime_fails() {
    assert!(matches!(Debouncer::current(), Err(SchedulerError::NoRuntime)));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_single_request_fires_after_window() {
    let debouncer = Debouncer::current().unwrap();
    let (count, bump) = counter();

    debouncer.schedule("k", Duration::from_millis(30), bump);
    assert_eq!(debouncer.pending_count(), 1);
    assert_eq!(count.load(Ordering::SeqCst), 0, "must not fire immediately");

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert_eq!(debouncer.pending_count(), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_burst_of_requests_fires_once() {
    let debouncer = Debouncer::current().unwrap();
    let (count, bump) = counter();

    for _ in 0..5 {
        debouncer.schedule("k", Duration::from_millis(60), bump.clone());
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(debouncer.pending_count(), 1);

    tokio::time::sleep(Duration::from_millis(250)).await;
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_keys_are_independent() {
    let debouncer = Debouncer::current().unwrap();
    let (count, bump) = counter();

    debouncer.schedule("a", Duration::from_millis(20), bump.clone());
    debouncer.schedule("b", Duration::from_millis(20), bump);
    assert_eq!(debouncer.pending_count(), 2);

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(count.load(Ordering::SeqCst), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cancel_drops_pending_action() {
    let debouncer = Debouncer::current().unwrap();
    let (count, bump) = counter();

    debouncer.schedule("k", Duration::from_millis(30), bump);
    assert!(debouncer.cancel("k"));
    assert!(!debouncer.cancel("k"));

    tokio::time::sleep(Duration::from_millis(120)).await;
    assert_eq!(count.load(Ordering::SeqCst), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_debounced_preview_refreshes_once_per_quiet_window() {
    let (count, bump) = counter();
    let preview = DebouncedPreview::new(
        Debouncer::current().unwrap(),
        Duration::from_millis(40),
        bump,
    );

    preview.schedule_refresh();
    preview.schedule_refresh();
    preview.schedule_refresh();
    assert!(preview.is_pending());

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert!(!preview.is_pending());

    preview.schedule_refresh();
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(count.load(Ordering::SeqCst), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_preview_from_settings_uses_configured_window() {
    let (count, bump) = counter();
    let settings = Settings {
        preview_debounce_ms: 25,
        ..Settings::default()
    };
    let preview = DebouncedPreview::from_settings(Debouncer::current().unwrap(), &settings, bump);
    assert_eq!(preview.window(), Duration::from_millis(25));

    preview.schedule_refresh();
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn test_default_settings_window_is_300ms() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let preview =
        DebouncedPreview::from_settings(Debouncer::new(runtime.handle().clone()), &Settings::default(), || {});
    assert_eq!(preview.window(), Duration::from_millis(DEFAULT_PREVIEW_DEBOUNCE_MS));
}

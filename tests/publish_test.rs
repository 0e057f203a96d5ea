//! Snapshot publication across threads and tasks

use framegauge::testing::{noise_plane, uniform_plane, SyntheticStream};
use framegauge::{EngineConfig, MetricsEngine, SharedEngine};
use std::thread;
use std::time::Duration;

#[test]
fn test_reader_on_another_thread_sees_whole_snapshots() {
    let mut engine = MetricsEngine::default();
    let reader = engine.subscribe();

    let watcher = thread::spawn(move || {
        for _ in 0..2_000 {
            let metrics = reader.current();
            assert!(metrics.values().within_ranges());
            assert_eq!(metrics.is_capture_ready(), metrics.flags().all());
        }
    });

    for (i, ts) in SyntheticStream::camera_rate().take(300).enumerate() {
        let plane = noise_plane(32, 24, i as u64);
        engine.on_frame(&plane, 32, 24, 32, ts).unwrap();
    }

    watcher.join().unwrap();
    // 300 frames at ~30 fps with a 120 ms throttle
    let counters = engine.counters();
    assert!(counters.processed >= 70 && counters.processed <= 80, "{:?}", counters);
}

#[tokio::test]
async fn test_display_task_waits_for_updates() {
    let shared = SharedEngine::new(MetricsEngine::new(&EngineConfig::default()).unwrap());
    let mut reader = shared.subscribe();

    let producer = {
        let shared = shared.clone();
        tokio::task::spawn_blocking(move || {
            let plane = uniform_plane(16, 16, 200);
            for i in 0..3u64 {
                shared
                    .on_frame(&plane, 16, 16, 16, Duration::from_millis(i * 500))
                    .unwrap();
            }
        })
    };

    let first = reader.changed().await.expect("engine alive");
    assert!(first.brightness() > 0.0);

    producer.await.unwrap();
    let latest = shared.current_metrics();
    assert!(latest.brightness() >= first.brightness());
}

#[tokio::test]
async fn test_reader_ends_when_engine_is_dropped() {
    let engine = MetricsEngine::default();
    let mut reader = engine.subscribe();
    drop(engine);
    assert!(reader.changed().await.is_none());
}

#[test]
fn test_changed_resolves_after_publish_from_sync_code() {
    let mut engine = MetricsEngine::default();
    let mut reader = engine.subscribe();
    let plane = uniform_plane(8, 8, 90);
    engine.on_frame(&plane, 8, 8, 8, Duration::ZERO).unwrap();

    let metrics = tokio_test::block_on(reader.changed()).expect("engine alive");
    assert_eq!(metrics, engine.current_metrics());
    assert!(!reader.has_changed());
}

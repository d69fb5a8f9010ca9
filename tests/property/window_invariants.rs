//! Property-based tests for the queue window
//!
//! Whatever sequence of extends runs, the window stays a contiguous, in-order slice of
//! the collection.

use proptest::prelude::*;
use scene_queue::catalog::SceneCatalog;
use scene_queue::filter::OrderedCollectionSpec;
use scene_queue::navigation::{RecordingNavigator, RouteParams};
use scene_queue::queue::QueueWindowManager;
use scene_queue::scene::SceneRecord;
use std::sync::Arc;

fn catalog(total: u64) -> Arc<SceneCatalog> {
    Arc::new(SceneCatalog::new(
        (1..=total)
            .map(|i| SceneRecord::new(i, format!("/media/{}.mp4", i)))
            .collect(),
    ))
}

/// Test that any mix of extends keeps the window contiguous and aligned
#[test]
fn test_window_stays_contiguous_property() {
    let mut runner = proptest::test_runner::TestRunner::default();
    let strategy = (0u64..120, 1u32..25, 1u32..8, prop::collection::vec(any::<bool>(), 0..10));

    runner
        .run(&strategy, |(total, page_size, page, steps)| {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .build()
                .unwrap();
            runtime.block_on(async {
                let manager =
                    QueueWindowManager::new(catalog(total), Arc::new(RecordingNavigator::new()));
                let spec = OrderedCollectionSpec::new("id", page_size).with_page(page);
                manager.initialize_from_spec(spec.clone()).await;

                let state = manager.state();
                assert_eq!(state.window_start, spec.window_start());

                for forward in steps {
                    if forward {
                        manager.extend_forward().await;
                    } else {
                        manager.extend_backward().await;
                    }

                    let state = manager.state();
                    assert_eq!(state.total_count, total);
                    assert!(state.window_start >= 1);
                    assert_eq!((state.window_start - 1) % u64::from(page_size), 0);
                    assert_eq!(state.has_more(), state.window_end() < total);
                    if !state.is_empty() {
                        assert!(state.window_end() <= total);
                    }
                    for (offset, item) in state.items.iter().enumerate() {
                        let position = state.window_start + offset as u64;
                        assert_eq!(item.id.as_str(), position.to_string());
                    }
                }
            });
            Ok(())
        })
        .unwrap();
}

/// Test that a page's first position maps back to the page
#[test]
fn test_page_arithmetic_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(1u32..500, 1u32..10_000), |(page_size, page)| {
            let spec = OrderedCollectionSpec::new("id", page_size).with_page(page);
            let start = spec.window_start();
            prop_assert_eq!(start, u64::from(page - 1) * u64::from(page_size) + 1);
            prop_assert_eq!(spec.page_for_position(start), page);
            prop_assert_eq!(spec.page_for_position(start + u64::from(page_size) - 1), page);
            prop_assert_eq!(spec.page_count(start + u64::from(page_size) - 1), u64::from(page));
            Ok(())
        })
        .unwrap();
}

/// Test that route parameter parsing is total and reads the leading digits of `t`
#[test]
fn test_route_params_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(any::<u32>(), "[a-z]{0,4}", "[ -~]{0,24}"), |(t, suffix, noise)| {
            let params = RouteParams::parse(&format!("?t={}{}&autoplay=true", t, suffix));
            prop_assert_eq!(params.timestamp, u64::from(t));
            prop_assert!(params.autoplay);

            // Arbitrary printable input never panics.
            let _ = RouteParams::parse(&noise);
            Ok(())
        })
        .unwrap();
}

//! Integration tests for materializing and growing the queue window

use crate::integration::test_utils::{catalog, ids, FailingSource};
use scene_queue::filter::{OrderedCollectionSpec, Predicate};
use scene_queue::navigation::RecordingNavigator;
use scene_queue::queue::{QueuePhase, QueueSource, QueueWindowManager};
use scene_queue::scene::SceneRecord;
use scene_queue::catalog::SceneCatalog;
use scene_queue::types::ItemId;
use std::sync::Arc;

fn manager(count: u64) -> (QueueWindowManager, Arc<RecordingNavigator>) {
    let navigator = Arc::new(RecordingNavigator::new());
    let manager = QueueWindowManager::new(Arc::new(catalog(count)), navigator.clone());
    (manager, navigator)
}

fn spec(page_size: u32, page: u32) -> OrderedCollectionSpec {
    OrderedCollectionSpec::new("id", page_size).with_page(page)
}

#[tokio::test]
async fn test_window_grows_in_both_directions() {
    let (manager, _) = manager(45);
    manager.initialize_from_spec(spec(20, 2)).await;

    let state = manager.state();
    assert_eq!(manager.phase(), QueuePhase::Ready);
    assert_eq!(state.total_count, 45);
    assert_eq!(state.window_start, 21);
    assert_eq!(state.len(), 20);
    assert_eq!(state.items[0].id, ItemId::from(21));
    assert!(manager.has_more());

    manager.extend_forward().await;
    let state = manager.state();
    assert_eq!(state.window_start, 21);
    assert_eq!(state.len(), 25);
    assert_eq!(state.window_end(), 45);
    assert!(!manager.has_more());

    manager.extend_backward().await;
    let state = manager.state();
    assert_eq!(state.window_start, 1);
    assert_eq!(state.len(), 45);
    let expected: Vec<String> = (1..=45).map(|i| i.to_string()).collect();
    assert_eq!(ids(&state.items), expected);
}

#[tokio::test]
async fn test_extends_at_the_edges_are_noops() {
    let (manager, _) = manager(45);
    manager.initialize_from_spec(spec(20, 1)).await;
    manager.extend_backward().await;
    assert_eq!(manager.state().window_start, 1);
    assert_eq!(manager.state().len(), 20);

    assert!(manager.has_more());

    manager.extend_forward().await;
    assert_eq!(manager.state().len(), 40);
    assert!(manager.has_more());

    manager.extend_forward().await;
    let full = manager.state();
    assert_eq!(full.len(), 45);
    assert!(!manager.has_more());

    manager.extend_forward().await;
    assert_eq!(manager.state(), full);
}

#[tokio::test]
async fn test_next_does_not_extend_even_with_more_available() {
    let (manager, navigator) = manager(45);
    manager.initialize_from_spec(spec(20, 1)).await;
    assert!(manager.has_more());

    assert_eq!(manager.navigate_next(&ItemId::from(20)), None);
    assert_eq!(navigator.count(), 0);
    assert_eq!(manager.state().len(), 20);

    assert_eq!(manager.navigate_next(&ItemId::from(19)), Some(ItemId::from(20)));
    let (target, options) = navigator.last().unwrap();
    assert_eq!(target, ItemId::from(20));
    assert!(options.autoplay);
    assert_eq!(options.page, None);
}

#[tokio::test]
async fn test_id_list_queue_keeps_given_order() {
    let (manager, navigator) = manager(12);
    manager
        .initialize_from_id_list(vec![ItemId::from(7), ItemId::from(3), ItemId::from(9)])
        .await;

    let state = manager.state();
    assert_eq!(ids(&state.items), vec!["7", "3", "9"]);
    assert_eq!(state.window_start, 1);
    assert_eq!(state.total_count, 3);
    assert!(!state.has_more());

    assert_eq!(manager.navigate_previous(&ItemId::from(3)), Some(ItemId::from(7)));
    assert_eq!(manager.navigate_next(&ItemId::from(3)), Some(ItemId::from(9)));
    assert_eq!(manager.navigate_next(&ItemId::from(9)), None);
    assert_eq!(navigator.count(), 2);

    manager.extend_forward().await;
    manager.extend_backward().await;
    assert_eq!(manager.state(), state);
}

#[tokio::test]
async fn test_empty_collection() {
    let (manager, navigator) = manager(0);
    manager.initialize_from_spec(spec(20, 1)).await;

    let state = manager.state();
    assert!(state.is_empty());
    assert_eq!(state.total_count, 0);
    assert!(!state.has_more());
    assert_eq!(manager.navigate_random().await, None);
    assert_eq!(navigator.count(), 0);
}

#[tokio::test]
async fn test_predicate_narrows_the_collection() {
    let mut scenes = Vec::new();
    for i in 1..=30u64 {
        let mut scene = SceneRecord::new(i, format!("/media/{}.mp4", i));
        scene.organized = i % 3 == 0;
        scenes.push(scene);
    }
    let navigator = Arc::new(RecordingNavigator::new());
    let manager = QueueWindowManager::new(Arc::new(SceneCatalog::new(scenes)), navigator);

    let mut predicate = Predicate::default();
    predicate
        .criteria
        .insert("organized".to_string(), "true".to_string());
    manager
        .initialize_from_spec(OrderedCollectionSpec::new("id", 4).with_predicate(predicate))
        .await;

    let state = manager.state();
    assert_eq!(state.total_count, 10);
    assert_eq!(ids(&state.items), vec!["3", "6", "9", "12"]);
}

#[tokio::test]
async fn test_fetch_failure_leaves_window_empty_and_ready() {
    let navigator = Arc::new(RecordingNavigator::new());
    let manager = QueueWindowManager::new(Arc::new(FailingSource), navigator);
    manager.initialize_from_spec(spec(20, 3)).await;

    assert_eq!(manager.phase(), QueuePhase::Ready);
    assert!(manager.state().is_empty());
    manager.extend_backward().await;
    assert!(manager.state().is_empty());
}

#[tokio::test]
async fn test_switching_source_rebuilds_window() {
    let (manager, _) = manager(45);
    manager.initialize_from_spec(spec(20, 1)).await;
    manager.extend_forward().await;
    assert_eq!(manager.state().len(), 40);

    manager.set_source(Some(QueueSource::Ids(vec![ItemId::from(2)])));
    assert_eq!(manager.source(), Some(QueueSource::Ids(vec![ItemId::from(2)])));
    assert_eq!(manager.phase(), QueuePhase::Uninitialized);
    assert!(manager.state().is_empty());

    manager.initialize().await;
    assert_eq!(ids(&manager.state().items), vec!["2"]);
}

#[tokio::test]
async fn test_setting_the_same_source_keeps_window() {
    let (manager, _) = manager(45);
    manager.initialize_from_spec(spec(20, 1)).await;
    manager.extend_forward().await;

    manager.set_source(Some(QueueSource::Query(spec(20, 1))));
    assert_eq!(manager.phase(), QueuePhase::Ready);
    assert_eq!(manager.state().len(), 40);
}

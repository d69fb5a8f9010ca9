//! Integration tests for navigation decisions turning into routes

use crate::integration::test_utils::catalog;
use scene_queue::filter::OrderedCollectionSpec;
use scene_queue::navigation::{RecordingNavigator, RouteParams, SceneRoute};
use scene_queue::queue::{QueueOptions, QueueSource, QueueWindowManager};
use scene_queue::session::SceneSession;
use scene_queue::types::ItemId;
use std::sync::Arc;

fn paged_route(id: u64, page_size: u32, page: u32) -> SceneRoute {
    SceneRoute::new(ItemId::from(id)).with_queue(QueueSource::Query(
        OrderedCollectionSpec::new("id", page_size).with_page(page),
    ))
}

#[tokio::test]
async fn test_random_route_materializes_the_picked_page() {
    let remote = Arc::new(catalog(45));
    let mut landed = 0;

    for seed in 0..20 {
        let mut session = SceneSession::new(remote.clone(), QueueOptions::default()).with_seed(seed);
        session.open(paged_route(1, 10, 1)).await;

        let Some(picked) = session.random().await else {
            continue;
        };
        landed += 1;
        let route = session.pending_route().expect("random pick issues a route");
        assert_eq!(route.item_id, picked);
        assert!(route.autoplay);

        let page = match &route.queue {
            Some(QueueSource::Query(spec)) => spec.current_page,
            other => panic!("unexpected queue source: {:?}", other),
        };
        session.open(route).await;
        let state = session.queue_state();
        assert_eq!(state.window_start, u64::from(page - 1) * 10 + 1);
        assert!(state.index_of(&picked).is_some());
    }
    assert!(landed > 0);
}

#[tokio::test]
async fn test_random_is_biased_against_short_last_page() {
    let remote = Arc::new(catalog(45));
    let mut hits = 0;
    let mut misses = 0;

    for seed in 0..200 {
        let navigator = Arc::new(RecordingNavigator::new());
        let manager = QueueWindowManager::new(remote.clone(), navigator.clone()).with_seed(seed);
        manager
            .initialize_from_spec(OrderedCollectionSpec::new("id", 20))
            .await;
        match manager.navigate_random().await {
            Some(id) => {
                hits += 1;
                let (_, options) = navigator.last().unwrap();
                let page = options.page.unwrap();
                let position: u64 = id.as_str().parse().unwrap();
                assert_eq!(u64::from(page), position.div_ceil(20));
            }
            None => {
                misses += 1;
                assert_eq!(navigator.count(), 0);
            }
        }
    }
    assert!(hits > 0);
    assert!(misses > 0, "offsets past the 5-item last page must miss");
}

#[tokio::test]
async fn test_random_on_collection_smaller_than_a_page_always_lands() {
    let remote = Arc::new(catalog(3));
    for seed in 0..50 {
        let navigator = Arc::new(RecordingNavigator::new());
        let manager = QueueWindowManager::new(remote.clone(), navigator).with_seed(seed);
        manager
            .initialize_from_spec(OrderedCollectionSpec::new("id", 20))
            .await;
        assert!(manager.navigate_random().await.is_some());
    }
}

#[tokio::test]
async fn test_random_on_id_list_picks_a_listed_item() {
    let remote = Arc::new(catalog(12));
    let listed = vec![ItemId::from(7), ItemId::from(3), ItemId::from(9)];
    for seed in 0..30 {
        let navigator = Arc::new(RecordingNavigator::new());
        let manager = QueueWindowManager::new(remote.clone(), navigator.clone()).with_seed(seed);
        manager.initialize_from_id_list(listed.clone()).await;

        let picked = manager.navigate_random().await.unwrap();
        assert!(listed.contains(&picked));
        assert_eq!(navigator.last().unwrap().1.page, None);
    }
}

#[tokio::test]
async fn test_previous_from_window_start_does_not_extend() {
    let mut session = SceneSession::new(Arc::new(catalog(45)), QueueOptions::default());
    session.open(paged_route(11, 10, 2)).await;

    assert_eq!(session.previous(), None);
    assert!(session.pending_route().is_none());
    assert_eq!(session.queue_state().window_start, 11);

    session.load_less().await;
    assert_eq!(session.previous(), Some(ItemId::from(10)));
    let route = session.pending_route().unwrap();
    assert_eq!(route.location(), "/scenes/10?autoplay=true");
}

#[tokio::test]
async fn test_route_params_carry_into_location() {
    let mut session = SceneSession::new(Arc::new(catalog(45)), QueueOptions::default());
    let route = paged_route(4, 10, 1).with_params(RouteParams::parse("?autoplay=true&t=30"));
    session.open(route).await;
    assert_eq!(
        session.route().unwrap().location(),
        "/scenes/4?autoplay=true&t=30"
    );

    assert_eq!(session.next(), Some(ItemId::from(5)));
    let next = session.pending_route().unwrap();
    assert_eq!(next.timestamp, 0, "a new scene starts from the beginning");
    assert!(next.autoplay);
    assert_eq!(next.to_string(), "/scenes/5?autoplay=true (page 1)");
}

#[tokio::test]
async fn test_load_more_then_next_crosses_page_boundary() {
    let mut session = SceneSession::new(Arc::new(catalog(45)), QueueOptions::default());
    session.open(paged_route(10, 10, 1)).await;

    assert_eq!(session.next(), None);
    session.load_more().await;
    assert_eq!(session.next(), Some(ItemId::from(11)));
    assert!(session.follow_pending().await);
    assert_eq!(session.current_item(), Some(&ItemId::from(11)));
    // The route keeps the originating page, so the new window is page 1 again.
    assert_eq!(session.queue_state().window_start, 1);
}

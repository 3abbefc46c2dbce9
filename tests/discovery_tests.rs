mod common;

use common::{at, stream, streams, ScriptedService};
use cwlogs::reader::{discover, ReaderError, TimeWindow, MAX_STREAMS};
use cwlogs::remote::StreamOrder;

fn names(found: &[cwlogs::remote::LogStreamDescriptor]) -> Vec<&str> {
    found.iter().map(|s| s.name.as_str()).collect()
}

#[tokio::test]
async fn test_prefix_scans_every_page() {
    let service = ScriptedService::with_group("svc")
        .stream_page(None, streams(vec![stream("web-a", 0, Some(1_000))], Some("p2")))
        .stream_page(
            Some("p2"),
            streams(vec![stream("web-b", 0, Some(9_000))], Some("p3")),
        )
        .stream_page(Some("p3"), streams(vec![stream("web-c", 0, None)], None));

    let window = TimeWindow::new(at(5_000), None);
    let found = discover(&service, "svc", Some("web"), &window, MAX_STREAMS)
        .await
        .unwrap();

    // web-a went quiet before the window; web-c never logged but is kept.
    assert_eq!(names(&found), vec!["web-b", "web-c"]);

    let requests = service.stream_requests();
    assert_eq!(requests.len(), 3);
    assert!(requests.iter().all(|r| r.order == StreamOrder::ByName));
    assert_eq!(requests[2].next_token.as_deref(), Some("p3"));
}

#[tokio::test]
async fn test_recency_order_stops_at_older_page() {
    let service = ScriptedService::with_group("svc")
        .stream_page(
            None,
            streams(
                vec![stream("x", 0, Some(9_000)), stream("y", 0, Some(1_000))],
                Some("p2"),
            ),
        )
        .stream_page(Some("p2"), streams(vec![stream("z", 0, Some(8_000))], None));

    let window = TimeWindow::new(at(5_000), None);
    let found = discover(&service, "svc", None, &window, MAX_STREAMS)
        .await
        .unwrap();

    assert_eq!(names(&found), vec!["x"]);
    let requests = service.stream_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].order, StreamOrder::LastEventDescending);
    assert_eq!(requests[0].prefix, None);
}

#[tokio::test]
async fn test_recency_order_keeps_paging_while_recent() {
    let service = ScriptedService::with_group("svc")
        .stream_page(None, streams(vec![stream("x", 0, Some(9_000))], Some("p2")))
        .stream_page(Some("p2"), streams(vec![stream("z", 0, Some(8_000))], None));

    let window = TimeWindow::new(at(5_000), None);
    let found = discover(&service, "svc", None, &window, MAX_STREAMS)
        .await
        .unwrap();

    assert_eq!(names(&found), vec!["x", "z"]);
    assert_eq!(service.stream_requests().len(), 2);
}

#[tokio::test]
async fn test_result_is_capped() {
    let first: Vec<_> = (0..60)
        .map(|i| stream(&format!("a-{i}"), 0, Some(10_000 + i)))
        .collect();
    let second: Vec<_> = (0..90)
        .map(|i| stream(&format!("b-{i}"), 0, Some(20_000 + i)))
        .collect();
    let service = ScriptedService::with_group("svc")
        .stream_page(None, streams(first, Some("p2")))
        .stream_page(Some("p2"), streams(second, Some("p3")))
        .stream_page(Some("p3"), streams(vec![stream("c", 0, Some(99_000))], None));

    let window = TimeWindow::new(at(0), None);
    let found = discover(&service, "svc", Some("a"), &window, MAX_STREAMS)
        .await
        .unwrap();

    assert_eq!(found.len(), MAX_STREAMS);
    assert_eq!(service.stream_requests().len(), 2);
    // Most recently active first.
    assert_eq!(found[0].name, "b-39");
    assert!(found
        .windows(2)
        .all(|w| w[0].last_event_or_epoch() >= w[1].last_event_or_epoch()));
}

#[tokio::test]
async fn test_streams_created_after_window_are_skipped() {
    let service = ScriptedService::with_group("svc").stream_page(
        None,
        streams(
            vec![
                stream("old", 1_000, Some(6_000)),
                stream("new", 20_000, Some(21_000)),
            ],
            None,
        ),
    );

    let window = TimeWindow::new(at(5_000), Some(at(10_000)));
    let found = discover(&service, "svc", Some("o"), &window, MAX_STREAMS)
        .await
        .unwrap();

    assert_eq!(names(&found), vec!["old"]);
}

#[tokio::test]
async fn test_nothing_found_is_an_error() {
    let service = ScriptedService::with_group("svc")
        .stream_page(None, streams(vec![stream("quiet", 0, Some(1_000))], None));

    let window = TimeWindow::new(at(5_000), None);
    match discover(&service, "svc", None, &window, MAX_STREAMS).await {
        Err(ReaderError::NoMatchingStreams { prefix }) => assert_eq!(prefix, None),
        other => panic!("expected no matching streams, got {:?}", other),
    }
}

#[tokio::test]
async fn test_streams_without_events_sort_last() {
    let service = ScriptedService::with_group("svc").stream_page(
        None,
        streams(
            vec![
                stream("never", 0, None),
                stream("recent", 0, Some(9_000)),
                stream("older", 0, Some(6_000)),
            ],
            None,
        ),
    );

    let window = TimeWindow::new(at(5_000), None);
    let found = discover(&service, "svc", Some("x"), &window, MAX_STREAMS)
        .await
        .unwrap();

    assert_eq!(names(&found), vec!["recent", "older", "never"]);
}

//! End-to-end engine tests: query -> session -> pagination -> caption.
//!
//! Worker endpoints are mocked with wiremock; the engine is wired exactly
//! as production does it, through `PosterEngine::from_config`.

use assert_matches::assert_matches;
use posterforged::config::{Config, PlatformOverride, SessionConfig};
use posterforged::engine::PosterEngine;
use posterforged::pagination::parse_callback;
use posterforged::providers::PlatformQuery;
use posterforged::session::NavAction;
use posterforged_common::{Error, KindFilter, PosterKind, UserId};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PAGE_URL: &str = "https://www.primevideo.com/detail/abc";

/// Config with the amzn platform pointed at the mock server.
fn test_config(server_uri: &str) -> Config {
    Config {
        platforms: vec![PlatformOverride {
            key: "amzn".to_string(),
            endpoint: Some(format!("{server_uri}/amzn?url={{url}}")),
            ..Default::default()
        }],
        ..Default::default()
    }
}

async fn mount_amzn(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/amzn"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn amzn_query(kind: KindFilter) -> PlatformQuery {
    PlatformQuery {
        provider_key: "amzn".to_string(),
        raw: PAGE_URL.to_string(),
        kind,
        language: None,
    }
}

#[tokio::test]
async fn portrait_query_yields_portrait_caption() {
    let server = MockServer::start().await;
    mount_amzn(
        &server,
        json!({
            "title": "Maari",
            "year": 2025,
            "poster": "https://img.example/p.jpg",
            "landscape": "https://img.example/l.jpg",
        }),
    )
    .await;

    let engine = PosterEngine::from_config(&test_config(&server.uri()));
    let page = engine
        .browse(UserId::from(7), amzn_query(KindFilter::Portrait))
        .await
        .unwrap();

    assert_eq!(page.view.total, 1);
    let record = page.view.record.as_ref().unwrap();
    assert_eq!(record.kind, PosterKind::Portrait);
    assert_eq!(record.image_url, "https://img.example/p.jpg");

    let caption = page.caption.as_ref().unwrap();
    assert!(caption.text.contains("Amazon Prime Video"));
    assert!(caption
        .text
        .contains("<b>Amazon Prime Video Portrait: <a href=\"https://img.example/p.jpg\">Click Here</a></b>"));
    assert_eq!(caption.link, record.image_url);
    assert!(page.partial_failures.is_empty());
}

#[tokio::test]
async fn pagination_walks_and_clamps() {
    let server = MockServer::start().await;
    mount_amzn(
        &server,
        json!({
            "title": "Maari",
            "poster": "https://img.example/p.jpg",
            "landscape": "https://img.example/l.jpg",
        }),
    )
    .await;

    let engine = PosterEngine::from_config(&test_config(&server.uri()));
    let page = engine
        .browse(UserId::from(7), amzn_query(KindFilter::Both))
        .await
        .unwrap();
    assert_eq!(page.view.total, 2);
    assert_eq!(page.view.index, 0);
    assert!(!page.view.has_prev);
    assert!(page.view.has_next);

    // Landscape sorts before portrait.
    assert_eq!(
        page.view.record.as_ref().unwrap().kind,
        PosterKind::Landscape
    );

    let page = engine
        .paginate(page.session_id, NavAction::Next)
        .await
        .unwrap();
    assert_eq!(page.view.index, 1);
    assert!(!page.view.has_next);

    // Next at the last index is a no-op, not an error.
    let page = engine
        .paginate(page.session_id, NavAction::Next)
        .await
        .unwrap();
    assert_eq!(page.view.index, 1);

    let page = engine
        .paginate(page.session_id, NavAction::Prev)
        .await
        .unwrap();
    assert_eq!(page.view.index, 0);

    // Prev at index 0 is a no-op too.
    let page = engine
        .paginate(page.session_id, NavAction::Prev)
        .await
        .unwrap();
    assert_eq!(page.view.index, 0);

    // Out-of-range jumps are rejected and leave the session unchanged.
    assert_matches!(
        engine.paginate(page.session_id, NavAction::Jump(9)).await,
        Err(Error::OutOfRange {
            requested: 9,
            total: 2
        })
    );
    let page = engine.peek(page.session_id).await.unwrap();
    assert_eq!(page.view.index, 0);
}

#[tokio::test]
async fn keyboard_callbacks_round_trip_into_actions() {
    let server = MockServer::start().await;
    mount_amzn(
        &server,
        json!({
            "poster": "https://img.example/p.jpg",
            "landscape": "https://img.example/l.jpg",
        }),
    )
    .await;

    let engine = PosterEngine::from_config(&test_config(&server.uri()));
    let page = engine
        .browse(UserId::from(7), amzn_query(KindFilter::Both))
        .await
        .unwrap();

    // Every emitted button parses back to this session.
    for row in &page.keyboard {
        for button in row {
            let (session_id, action) = parse_callback(&button.callback).unwrap();
            assert_eq!(session_id, page.session_id);
            engine.paginate(session_id, action).await.unwrap();
        }
    }
}

#[tokio::test]
async fn rerendering_the_same_index_is_identical() {
    let server = MockServer::start().await;
    mount_amzn(
        &server,
        json!({
            "title": "Maari",
            "poster": "https://img.example/p.jpg",
        }),
    )
    .await;

    let engine = PosterEngine::from_config(&test_config(&server.uri()));
    let page = engine
        .browse(UserId::from(7), amzn_query(KindFilter::Both))
        .await
        .unwrap();

    let first = engine.peek(page.session_id).await.unwrap();
    let second = engine.peek(page.session_id).await.unwrap();
    assert_eq!(first.view, second.view);
    assert_eq!(
        first.caption.as_ref().unwrap().text,
        second.caption.as_ref().unwrap().text
    );
    assert_eq!(first.keyboard, second.keyboard);
}

#[tokio::test]
async fn superseding_query_invalidates_prior_session() {
    let server = MockServer::start().await;
    mount_amzn(
        &server,
        json!({
            "poster": "https://img.example/p.jpg",
        }),
    )
    .await;

    let engine = PosterEngine::from_config(&test_config(&server.uri()));
    let user = UserId::from(7);

    let first = engine
        .browse(user, amzn_query(KindFilter::Both))
        .await
        .unwrap();
    let second = engine
        .browse(user, amzn_query(KindFilter::Both))
        .await
        .unwrap();
    assert_ne!(first.session_id, second.session_id);

    assert_matches!(
        engine.paginate(first.session_id, NavAction::Next).await,
        Err(Error::SessionExpired(_))
    );
    assert!(engine.peek(second.session_id).await.is_ok());
}

#[tokio::test]
async fn filters_that_drop_everything_yield_empty_page_not_error() {
    let server = MockServer::start().await;
    // Only landscape art available, portrait requested.
    mount_amzn(
        &server,
        json!({
            "landscape": "https://img.example/l.jpg",
        }),
    )
    .await;

    let engine = PosterEngine::from_config(&test_config(&server.uri()));
    let page = engine
        .browse(UserId::from(7), amzn_query(KindFilter::Portrait))
        .await
        .unwrap();

    assert_eq!(page.view.total, 0);
    assert!(page.view.record.is_none());
    assert!(page.caption.is_none());
    assert!(!page.view.has_prev);
    assert!(!page.view.has_next);
    assert!(page.keyboard.is_empty());
}

#[tokio::test]
async fn timed_out_source_leaves_partial_results_with_a_note() {
    let server = MockServer::start().await;
    mount_amzn(
        &server,
        json!({
            "title": "Maari",
            "poster": "https://img.example/p.jpg",
        }),
    )
    .await;
    // zee5 never answers inside the timeout.
    Mock::given(method("GET"))
        .and(path("/zee5"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "poster": "https://img.example/z.jpg" }))
                .set_delay(std::time::Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let mut config = test_config(&server.uri());
    config.platforms.push(PlatformOverride {
        key: "zee5".to_string(),
        endpoint: Some(format!("{}/zee5?url={{url}}", server.uri())),
        ..Default::default()
    });
    config.fetch.timeout_secs = 1;
    let engine = PosterEngine::from_config(&config);

    let query = PlatformQuery {
        provider_key: "zee5+amzn".to_string(),
        raw: PAGE_URL.to_string(),
        kind: KindFilter::Both,
        language: None,
    };
    let page = engine.browse(UserId::from(7), query).await.unwrap();

    // Only the healthy source's records, plus a note about the dead one.
    assert_eq!(page.view.total, 1);
    assert_eq!(page.view.record.as_ref().unwrap().source_id, "amzn");
    assert_eq!(page.partial_failures.len(), 1);
    assert!(page.partial_failures[0].contains("ZEE5"));
}

#[tokio::test]
async fn unknown_and_disabled_providers_are_not_found() {
    let server = MockServer::start().await;
    let mut config = test_config(&server.uri());
    config.platforms.push(PlatformOverride {
        key: "zee5".to_string(),
        enabled: Some(false),
        ..Default::default()
    });
    let engine = PosterEngine::from_config(&config);

    assert_matches!(
        engine
            .browse(UserId::from(7), PlatformQuery::new("nope", "x"))
            .await,
        Err(Error::NotFound(_))
    );
    assert_matches!(
        engine
            .browse(UserId::from(7), PlatformQuery::new("zee5", "x"))
            .await,
        Err(Error::NotFound(_))
    );
}

#[tokio::test]
async fn unreachable_session_mirror_degrades_to_local_operation() {
    let server = MockServer::start().await;
    mount_amzn(
        &server,
        json!({
            "poster": "https://img.example/p.jpg",
        }),
    )
    .await;

    let mut config = test_config(&server.uri());
    config.session = SessionConfig {
        remote_url: Some("http://127.0.0.1:1".to_string()),
        ..Default::default()
    };
    let engine = PosterEngine::from_config(&config);

    let page = engine
        .browse(UserId::from(7), amzn_query(KindFilter::Both))
        .await
        .unwrap();
    let page = engine
        .paginate(page.session_id, NavAction::Jump(0))
        .await
        .unwrap();
    assert_eq!(page.view.index, 0);
}

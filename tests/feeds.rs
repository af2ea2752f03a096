mod common;

use common::*;
use reqwest::StatusCode;
use serde_json::{Value, json};
use stanceline::application_impl::*;
use stanceline::application_port::*;
use stanceline::domain_model::*;
use std::sync::Arc;

fn entity(id: i64) -> Value {
    json!({ "id": id, "type": 0, "title": format!("entity {}", id), "images_json": "[]" })
}

fn author() -> Value {
    json!({ "id": 1, "username": "ada" })
}

fn feed_stance(id: i64) -> Value {
    json!({
        "id": id,
        "user": author(),
        "entity": entity(100),
        "headline": format!("stance {}", id),
        "content_json": "{}",
        "num_comments": 0,
        "average_rating": null,
        "num_ratings": 0,
        "my_rating": null,
        "created_at": "2024-01-01T00:00:00Z",
    })
}

fn entity_stance(id: i64, score: f64) -> Value {
    json!({
        "id": id,
        "user": author(),
        "headline": format!("stance {}", id),
        "content_json": "{}",
        "num_comments": 0,
        "average_rating": 4.5,
        "num_ratings": 2,
        "my_rating": null,
        "engagement_score": score,
    })
}

fn query<'a>(request: &'a ApiRequest, key: &str) -> Option<&'a str> {
    request
        .query
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

fn session(transport: Arc<ScriptedTransport>) -> AuthenticatedSession {
    let (_, tokens) = token_store(Some(pair("a1", "r1")));
    AuthenticatedSession::new(transport, tokens)
}

#[tokio::test]
async fn entity_feed_follows_cursor_until_has_more_is_false() {
    let transport = Arc::new(ScriptedTransport::new(|request, _| {
        match query(request, "cursor") {
            None => ok(json!({ "entities": [entity(1), entity(2)], "next_cursor": "c1", "has_more": true })),
            Some("c1") => ok(json!({ "entities": [entity(3)], "next_cursor": "c2", "has_more": false })),
            Some(_) => status(StatusCode::BAD_REQUEST),
        }
    }));
    let feed = EntityFeed::new(session(transport.clone()), PageSize(2));
    let paginator = Paginator::new(feed);

    assert_eq!(paginator.initial_load().await.unwrap(), LoadOutcome::Appended(2));
    assert_eq!(paginator.load_more().await.unwrap(), LoadOutcome::Exhausted(1));

    let ids: Vec<_> = paginator.items().iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![EntityId(1), EntityId(2), EntityId(3)]);
    let calls = transport.calls_to("/entities");
    assert_eq!(calls[0].query("limit"), Some("2"));
    assert_eq!(calls[1].query("cursor"), Some("c1"));
}

#[tokio::test]
async fn stance_feed_counts_pages_until_empty() {
    let transport = Arc::new(ScriptedTransport::new(|request, _| {
        let page = request.body.as_ref().unwrap()["page"].as_u64().unwrap();
        match page {
            0 => ok(json!({ "stances": [feed_stance(1), feed_stance(2)] })),
            1 => ok(json!({ "stances": [feed_stance(3)] })),
            _ => ok(json!({ "stances": [] })),
        }
    }));
    let feed = StanceFeed::new(session(transport.clone()), PageSize(2))
        .with_entities(vec![EntityId(100)])
        .starting_at(StanceId(1));
    let paginator = Paginator::new(feed);

    paginator.initial_load().await.unwrap();
    paginator.load_more().await.unwrap();
    assert_eq!(paginator.load_more().await.unwrap(), LoadOutcome::Exhausted(0));
    assert_eq!(paginator.len(), 3);

    let bodies: Vec<_> = transport
        .calls_to("/stances/feed")
        .into_iter()
        .map(|c| c.body.unwrap())
        .collect();
    assert_eq!(bodies[0]["initial_stance_id"], 1);
    assert_eq!(bodies[0]["entities"], json!([100]));
    assert_eq!(bodies[1]["page"], 1);
    assert_eq!(bodies[1]["initial_stance_id"], Value::Null);
    assert_eq!(bodies[2]["page"], 2);
}

#[tokio::test]
async fn entity_stances_resume_after_the_last_seen_position() {
    let transport = Arc::new(ScriptedTransport::new(|request, _| {
        match query(request, "cursor_id") {
            None => ok(json!({
                "stances": [entity_stance(10, 5.0), entity_stance(20, 5.0)],
                "next_cursor": { "score": 5.0, "id": 20 },
            })),
            // the tie at 5.0 straddles the page boundary and the server repeats id 20
            Some(_) => ok(json!({
                "stances": [entity_stance(20, 5.0), entity_stance(30, 5.0), entity_stance(40, 3.0)],
                "next_cursor": null,
            })),
        }
    }));
    let feed = EntityStancesFeed::new(session(transport.clone()), EntityId(100), PageSize(2));
    let paginator = Paginator::new(feed);

    paginator.initial_load().await.unwrap();
    assert_eq!(paginator.load_more().await.unwrap(), LoadOutcome::Exhausted(2));

    let ids: Vec<_> = paginator.items().iter().map(|s| s.id.0).collect();
    assert_eq!(ids, vec![10, 20, 30, 40]);
    let second = &transport.calls_to("/entities/100/stances")[1];
    assert_eq!(second.query("cursor_score"), Some("5"));
    assert_eq!(second.query("cursor_id"), Some("20"));
}

#[tokio::test]
async fn followers_feed_targets_the_direction() {
    let transport = Arc::new(ScriptedTransport::new(|_, _| {
        ok(json!({ "users": [{ "id": 2, "username": "bob" }], "next_cursor": null }))
    }));
    let feed = FollowersFeed::new(
        session(transport.clone()),
        UserId(1),
        FollowDirection::Following,
        PageSize::default(),
    );
    let paginator = Paginator::new(feed);

    assert_eq!(paginator.initial_load().await.unwrap(), LoadOutcome::Exhausted(1));
    assert_eq!(paginator.items()[0].username, "bob");
    assert_eq!(transport.count("/users/1/following"), 1);
}

#[tokio::test]
async fn feed_survives_an_expired_access_token() {
    let transport = Arc::new(ScriptedTransport::new(|request, bearer| {
        if request.path == REFRESH_PATH {
            return ok(json!({ "access_token": "a2", "refresh_token": "r2" }));
        }
        if !bearer_is(bearer, "a2") {
            return status(StatusCode::UNAUTHORIZED);
        }
        ok(json!({ "stances": [feed_stance(1)], "next_cursor": "n1" }))
    }));
    let paginator = Paginator::new(FollowingStanceFeed::new(
        session(transport.clone()),
        PageSize::default(),
    ));

    assert_eq!(paginator.initial_load().await.unwrap(), LoadOutcome::Appended(1));
    assert_eq!(paginator.cursor(), Some(OpaqueCursor("n1".into())));
    assert_eq!(transport.count(REFRESH_PATH), 1);
}

#[tokio::test]
async fn unauthorized_feed_load_surfaces_as_feed_error() {
    let transport = Arc::new(ScriptedTransport::new(|_, _| {
        status(StatusCode::UNAUTHORIZED)
    }));
    let paginator = Paginator::new(UserStancesFeed::new(
        session(transport.clone()),
        UserId(1),
        PageSize::default(),
    ));

    match paginator.initial_load().await {
        Err(FeedError::Session(e)) => assert!(e.is_unauthorized()),
        other => panic!("expected unauthorized, got {:?}", other),
    }
    assert!(paginator.is_empty());
    assert!(!paginator.is_loaded());
    assert_eq!(transport.count(REFRESH_PATH), 1);
}

//! Playlist synchronization against a mocked Spotify Web API

use pixlist::Error;
use pixlist::management::{Persisted, PlaylistEditor, PlaylistSnapshot, ReorderState, SortKey};
use pixlist::spotify::{Session, Transport, catalog, playlists};
use pixlist::types::{PlaylistItem, Track};
use rand::{SeedableRng, rngs::StdRng};
use serde_json::{Value, json};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const TRACKS_PATH: &str = "/playlists/pl/tracks";

fn track_json(n: usize) -> Value {
    json!({
        "id": format!("t{n}"),
        "uri": format!("spotify:track:t{n}"),
        "name": format!("Track {n}"),
        "duration_ms": 180000,
        "artists": [{ "id": "a1", "name": "Artist" }],
        "album": { "id": "al1", "name": "Album" }
    })
}

/// One page of playlist items numbered from `start`
fn page_json(start: usize, count: usize, has_next: bool) -> Value {
    let items: Vec<Value> = (start..start + count)
        .map(|n| json!({ "added_at": "2024-01-01T00:00:00Z", "track": track_json(n) }))
        .collect();

    json!({
        "items": items,
        "next": if has_next { json!("https://api.spotify.com/v1/next") } else { Value::Null },
        "total": 250,
        "offset": start,
        "limit": 100
    })
}

fn snapshot_ok() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "snapshot_id": "snap" }))
}

fn uris(range: std::ops::Range<usize>) -> Vec<String> {
    range.map(|n| format!("spotify:track:t{n}")).collect()
}

fn item(id: &str) -> PlaylistItem {
    PlaylistItem {
        added_at: None,
        track: Some(Track {
            id: Some(id.to_string()),
            uri: format!("spotify:track:{id}"),
            name: id.to_string(),
            duration_ms: 1000,
            artists: vec![],
            album: None,
        }),
    }
}

fn transport(server: &MockServer) -> Transport {
    Transport::new(server.uri(), Some(Session::new("test-token")))
}

fn editor(server: &MockServer, ids: &[&str]) -> PlaylistEditor {
    let items = ids.iter().map(|id| item(id)).collect();
    PlaylistEditor::from_snapshot(transport(server), PlaylistSnapshot::new("pl", items))
}

async fn requests(server: &MockServer) -> Vec<Request> {
    server.received_requests().await.unwrap_or_default()
}

fn posted_uris(request: &Request) -> Vec<String> {
    let body: Value = serde_json::from_slice(&request.body).unwrap();
    body["uris"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u.as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_fetch_all_follows_pages() {
    let mock_server = MockServer::start().await;

    for (offset, count, has_next) in [(0, 100, true), (100, 100, true), (200, 50, false)] {
        Mock::given(method("GET"))
            .and(path(TRACKS_PATH))
            .and(query_param("offset", offset.to_string()))
            .and(query_param("limit", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_json(offset, count, has_next)))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let items = playlists::fetch_all(&transport(&mock_server), "pl")
        .await
        .unwrap();

    assert_eq!(items.len(), 250);
    assert_eq!(items[0].uri(), Some("spotify:track:t0"));
    assert_eq!(items[100].uri(), Some("spotify:track:t100"));
    assert_eq!(items[249].uri(), Some("spotify:track:t249"));
    assert_eq!(requests(&mock_server).await.len(), 3);
}

#[tokio::test]
async fn test_fetch_all_stops_on_short_page() {
    let mock_server = MockServer::start().await;

    // `next` is set but the page is short: no further request
    Mock::given(method("GET"))
        .and(path(TRACKS_PATH))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(0, 42, true)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let items = playlists::fetch_all(&transport(&mock_server), "pl")
        .await
        .unwrap();

    assert_eq!(items.len(), 42);
}

#[tokio::test]
async fn test_fetch_all_keeps_unavailable_entries() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(TRACKS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                { "added_at": null, "track": track_json(1) },
                { "added_at": null, "track": null }
            ],
            "next": null
        })))
        .mount(&mock_server)
        .await;

    let items = playlists::fetch_all(&transport(&mock_server), "pl")
        .await
        .unwrap();

    assert_eq!(items.len(), 2);
    assert!(items[1].track.is_none());
}

#[tokio::test]
async fn test_add_items_sends_ordered_batches() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TRACKS_PATH))
        .respond_with(snapshot_ok())
        .expect(2)
        .mount(&mock_server)
        .await;

    let to_add = uris(0..137);
    playlists::add_items(&transport(&mock_server), "pl", &to_add)
        .await
        .unwrap();

    let received = requests(&mock_server).await;
    assert_eq!(received.len(), 2);
    assert_eq!(posted_uris(&received[0]), uris(0..100));
    assert_eq!(posted_uris(&received[1]), uris(100..137));
}

#[tokio::test]
async fn test_add_items_reports_partial_batch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TRACKS_PATH))
        .respond_with(snapshot_ok())
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path(TRACKS_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": { "status": 500, "message": "Server error" }
        })))
        .mount(&mock_server)
        .await;

    let err = playlists::add_items(&transport(&mock_server), "pl", &uris(0..250))
        .await
        .unwrap_err();

    match &err {
        Error::PartialBatch {
            applied_chunks,
            total_chunks,
            applied_uris,
            source,
        } => {
            assert_eq!(*applied_chunks, 1);
            assert_eq!(*total_chunks, 3);
            assert_eq!(*applied_uris, 100);
            assert!(matches!(**source, Error::Remote { .. }));
        }
        other => panic!("expected PartialBatch, got {other:?}"),
    }
    assert!(err.leaves_desync());

    // The third batch is never sent and nothing is rolled back
    let received = requests(&mock_server).await;
    assert_eq!(received.len(), 2);
    assert!(received.iter().all(|r| r.method.as_str() == "POST"));
}

#[tokio::test]
async fn test_add_items_first_batch_failure_is_clean() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TRACKS_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let err = playlists::add_items(&transport(&mock_server), "pl", &uris(0..150))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Remote { .. }));
    assert!(!err.leaves_desync());
    assert_eq!(requests(&mock_server).await.len(), 1);
}

#[tokio::test]
async fn test_remove_item_sends_one_delete() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(TRACKS_PATH))
        .and(body_json(json!({ "tracks": [{ "uri": "spotify:track:B" }] })))
        .respond_with(snapshot_ok())
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut editor = editor(&mock_server, &["A", "B", "C", "B"]);
    let removed = editor.remove("spotify:track:B").await.unwrap();

    assert_eq!(removed, 2);
    assert_eq!(
        editor.snapshot().uris(),
        vec!["spotify:track:A", "spotify:track:C"]
    );
}

#[tokio::test]
async fn test_move_to_same_position_sends_nothing() {
    let mock_server = MockServer::start().await;

    let mut editor = editor(&mock_server, &["A", "B", "C"]);
    let applied = editor.move_item(1, 1).unwrap();
    assert!(applied.is_noop());

    let persisted = editor.persist(applied).await;
    assert!(matches!(persisted, Persisted::Unchanged));
    assert_eq!(editor.state(), ReorderState::Idle);
    assert!(requests(&mock_server).await.is_empty());
}

#[tokio::test]
async fn test_move_sends_single_reorder() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(TRACKS_PATH))
        .and(body_json(json!({ "range_start": 0, "insert_before": 3 })))
        .respond_with(snapshot_ok())
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut editor = editor(&mock_server, &["A", "B", "C", "D"]);
    let applied = editor.move_item(0, 2).unwrap();

    // Local order changes before anything is sent
    assert_eq!(editor.state(), ReorderState::OptimisticLocalUpdate);
    assert_eq!(
        editor.snapshot().uris(),
        vec![
            "spotify:track:B",
            "spotify:track:C",
            "spotify:track:A",
            "spotify:track:D"
        ]
    );

    let persisted = editor.persist(applied).await;
    assert!(matches!(persisted, Persisted::Confirmed));
    assert_eq!(editor.state(), ReorderState::Confirmed);
    assert_eq!(requests(&mock_server).await.len(), 1);
}

#[tokio::test]
async fn test_move_out_of_range_is_rejected_locally() {
    let mock_server = MockServer::start().await;

    let mut editor = editor(&mock_server, &["A", "B"]);
    let err = editor.move_item(0, 5).unwrap_err();

    assert!(matches!(err, Error::IndexOutOfRange { index: 5, len: 2 }));
    assert_eq!(editor.state(), ReorderState::Idle);
    assert!(requests(&mock_server).await.is_empty());
}

#[tokio::test]
async fn test_persist_order_deletes_then_appends() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(TRACKS_PATH))
        .respond_with(snapshot_ok())
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path(TRACKS_PATH))
        .respond_with(snapshot_ok())
        .expect(2)
        .mount(&mock_server)
        .await;

    let mut order: Vec<String> = uris(0..120);
    order.reverse();

    playlists::persist_order(&transport(&mock_server), "pl", &order)
        .await
        .unwrap();

    let received = requests(&mock_server).await;
    assert_eq!(received.len(), 3);
    assert_eq!(received[0].method.as_str(), "DELETE");

    let appended: Vec<String> = received[1..].iter().flat_map(posted_uris).collect();
    assert_eq!(appended, order);
}

#[tokio::test]
async fn test_persist_order_deletes_duplicates_once() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(TRACKS_PATH))
        .and(body_json(json!({
            "tracks": [{ "uri": "spotify:track:A" }, { "uri": "spotify:track:B" }]
        })))
        .respond_with(snapshot_ok())
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path(TRACKS_PATH))
        .and(body_json(json!({
            "uris": ["spotify:track:A", "spotify:track:B", "spotify:track:A"]
        })))
        .respond_with(snapshot_ok())
        .expect(1)
        .mount(&mock_server)
        .await;

    let order = vec![
        "spotify:track:A".to_string(),
        "spotify:track:B".to_string(),
        "spotify:track:A".to_string(),
    ];
    playlists::persist_order(&transport(&mock_server), "pl", &order)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_persist_order_empty_sends_nothing() {
    let mock_server = MockServer::start().await;

    playlists::persist_order(&transport(&mock_server), "pl", &[])
        .await
        .unwrap();

    assert!(requests(&mock_server).await.is_empty());
}

#[tokio::test]
async fn test_rewrite_failure_after_delete() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(TRACKS_PATH))
        .respond_with(snapshot_ok())
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path(TRACKS_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let mut editor = editor(&mock_server, &["A", "B", "C"]);
    let applied = editor.set_order(&[2, 1, 0]).unwrap();

    let err = editor.persist(applied).await.into_result().unwrap_err();
    assert!(matches!(
        err,
        Error::RewriteIncomplete {
            removed: 3,
            appended: 0,
            ..
        }
    ));
    assert!(err.leaves_desync());
    assert_eq!(editor.state(), ReorderState::Failed);

    // The optimistic order stays in place
    assert_eq!(
        editor.snapshot().uris(),
        vec!["spotify:track:C", "spotify:track:B", "spotify:track:A"]
    );
}

#[tokio::test]
async fn test_rewrite_failing_delete_leaves_playlist_alone() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(TRACKS_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let err = playlists::persist_order(&transport(&mock_server), "pl", &uris(0..3))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Remote { .. }));
    assert!(!err.leaves_desync());
    assert_eq!(requests(&mock_server).await.len(), 1);
}

#[tokio::test]
async fn test_shuffle_persists_local_order() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(TRACKS_PATH))
        .respond_with(snapshot_ok())
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path(TRACKS_PATH))
        .respond_with(snapshot_ok())
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut editor = editor(&mock_server, &["A", "B", "C", "D", "E", "F"]);
    let applied = editor.shuffle(&mut StdRng::seed_from_u64(3));
    assert!(!applied.is_noop());

    let shuffled = editor.snapshot().uris();
    let mut sorted = shuffled.clone();
    sorted.sort();
    assert_eq!(
        sorted,
        ["A", "B", "C", "D", "E", "F"]
            .iter()
            .map(|id| format!("spotify:track:{id}"))
            .collect::<Vec<_>>()
    );

    assert!(editor.persist(applied).await.is_ok());
    assert_eq!(editor.state(), ReorderState::Confirmed);

    let received = requests(&mock_server).await;
    assert_eq!(posted_uris(&received[1]), shuffled);
}

#[tokio::test]
async fn test_shuffle_single_item_is_noop() {
    let mock_server = MockServer::start().await;

    let mut editor = editor(&mock_server, &["A"]);
    let applied = editor.shuffle(&mut StdRng::seed_from_u64(3));

    assert!(applied.is_noop());
    assert!(matches!(editor.persist(applied).await, Persisted::Unchanged));
    assert!(requests(&mock_server).await.is_empty());
}

#[tokio::test]
async fn test_unauthorized_is_reported() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(TRACKS_PATH))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "status": 401, "message": "The access token expired" }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = playlists::fetch_all(&transport(&mock_server), "pl")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Unauthorized));
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn test_missing_session_sends_no_credential() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let transport = Transport::new(mock_server.uri(), None);
    assert!(!transport.is_authenticated());

    let err = playlists::current_user(&transport).await.unwrap_err();
    assert!(matches!(err, Error::Unauthorized));

    let received = requests(&mock_server).await;
    assert!(received[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_remote_error_message_is_kept() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/playlists/missing/tracks"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": { "status": 404, "message": "Resource not found" }
        })))
        .mount(&mock_server)
        .await;

    let err = playlists::fetch_all(&transport(&mock_server), "missing")
        .await
        .unwrap_err();

    match err {
        Error::Remote { status, message } => {
            assert_eq!(status.as_u16(), 404);
            assert_eq!(message, "Resource not found");
        }
        other => panic!("expected Remote, got {other:?}"),
    }
}

#[tokio::test]
async fn test_album_tracks_follow_pages() {
    let mock_server = MockServer::start().await;

    let tracks = |start: usize, count: usize| -> Vec<Value> {
        (start..start + count).map(track_json).collect()
    };

    Mock::given(method("GET"))
        .and(path("/albums/al1/tracks"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": tracks(0, 50),
            "next": "https://api.spotify.com/v1/next"
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/albums/al1/tracks"))
        .and(query_param("offset", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": tracks(50, 3),
            "next": null
        })))
        .mount(&mock_server)
        .await;

    let album_tracks = catalog::album_tracks(&transport(&mock_server), "al1")
        .await
        .unwrap();

    assert_eq!(album_tracks.len(), 53);
    assert_eq!(album_tracks[52].uri, "spotify:track:t52");
}

#[tokio::test]
async fn test_editor_add_resyncs_snapshot() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TRACKS_PATH))
        .and(body_json(json!({ "uris": ["spotify:track:t0", "spotify:track:t1"] })))
        .respond_with(snapshot_ok())
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(TRACKS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(0, 2, false)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut editor = editor(&mock_server, &[]);
    editor.add(&uris(0..2)).await.unwrap();

    assert_eq!(editor.snapshot().len(), 2);
    assert_eq!(editor.state(), ReorderState::Idle);
}

#[tokio::test]
async fn test_rewrite_keeps_unavailable_entries_first() {
    let mock_server = MockServer::start().await;

    // Only resolvable tracks are deleted and re-added
    Mock::given(method("DELETE"))
        .and(path(TRACKS_PATH))
        .and(body_json(json!({
            "tracks": [
                { "uri": "spotify:track:A" },
                { "uri": "spotify:track:B" },
                { "uri": "spotify:track:C" }
            ]
        })))
        .respond_with(snapshot_ok())
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path(TRACKS_PATH))
        .and(body_json(json!({
            "uris": ["spotify:track:A", "spotify:track:B", "spotify:track:C"]
        })))
        .respond_with(snapshot_ok())
        .expect(1)
        .mount(&mock_server)
        .await;

    let unavailable = PlaylistItem {
        added_at: None,
        track: None,
    };
    let items = vec![item("C"), unavailable, item("B"), item("A")];
    let mut editor =
        PlaylistEditor::from_snapshot(transport(&mock_server), PlaylistSnapshot::new("pl", items));

    let applied = editor.sort_by(SortKey::Name).unwrap();
    assert!(matches!(editor.persist(applied).await, Persisted::Confirmed));

    // The untouched entry now heads the remote playlist, and so the snapshot
    let order: Vec<Option<&str>> = editor.items().iter().map(|i| i.uri()).collect();
    assert_eq!(
        order,
        vec![
            None,
            Some("spotify:track:A"),
            Some("spotify:track:B"),
            Some("spotify:track:C")
        ]
    );
}

#[tokio::test]
async fn test_rewrite_rejected_delete_changes_nothing() {
    let mock_server = MockServer::start().await;

    // Spotify refuses more than 100 tracks in one delete
    Mock::given(method("DELETE"))
        .and(path(TRACKS_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "status": 400, "message": "Too many ids requested" }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = playlists::persist_order(&transport(&mock_server), "pl", &uris(0..150))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Remote { .. }));
    assert!(!err.leaves_desync());

    let received = requests(&mock_server).await;
    assert_eq!(received.len(), 1);
    let body: Value = serde_json::from_slice(&received[0].body).unwrap();
    assert_eq!(body["tracks"].as_array().unwrap().len(), 150);
}

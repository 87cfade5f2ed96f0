#![allow(clippy::unwrap_used)]
// End-to-end: card → Plex lookups → Roku readiness → playMedia, against
// wiremock stand-ins for the Plex server, the Roku and a registered player.

use std::time::Duration;

use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tapcast_api::{CompanionEndpoint, ServerEndpoint};
use tapcast_core::{
    CardId, CardMap, Daemon, DebounceConfig, Debouncer, DeviceConfig, DispatchError, Dispatcher,
    LineReader, PlaybackTarget, ReadinessConfig, ShowMode, TapOutcome, TapcastConfig,
};

// ── Helpers ─────────────────────────────────────────────────────────

struct Mocks {
    plex: MockServer,
    roku: MockServer,
}

impl Mocks {
    async fn start() -> Self {
        let mocks = Self {
            plex: MockServer::start().await,
            roku: MockServer::start().await,
        };
        mocks.mount_library().await;
        mocks.mount_roku().await;
        mocks
    }

    async fn mount_library(&self) {
        Mock::given(method("GET"))
            .and(path("/library/sections"))
            .and(header("X-Plex-Token", "plex-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "MediaContainer": { "Directory": [
                    { "key": "1", "title": "Movies", "type": "movie" },
                    { "key": "2", "title": "TV Shows", "type": "show" }
                ]}
            })))
            .mount(&self.plex)
            .await;

        Mock::given(method("GET"))
            .and(path("/library/sections/2/all"))
            .and(query_param("title", "Example Show"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "MediaContainer": { "Metadata": [{
                    "ratingKey": "100",
                    "key": "/library/metadata/100/children",
                    "title": "Example Show",
                    "type": "show",
                    "leafCount": 20
                }]}
            })))
            .mount(&self.plex)
            .await;

        Mock::given(method("GET"))
            .and(path("/library/metadata/100"))
            .and(query_param("includeOnDeck", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "MediaContainer": { "Metadata": [{
                    "ratingKey": "100",
                    "key": "/library/metadata/100/children",
                    "title": "Example Show",
                    "type": "show",
                    "OnDeck": { "Metadata": [{
                        "ratingKey": "205",
                        "key": "/library/metadata/205",
                        "title": "The Return",
                        "type": "episode",
                        "parentIndex": 2,
                        "index": 5
                    }]}
                }]}
            })))
            .mount(&self.plex)
            .await;
    }

    async fn mount_roku(&self) {
        Mock::given(method("GET"))
            .and(path("/query/active-app"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<active-app><app id="13535">Plex</app></active-app>"#,
            ))
            .mount(&self.roku)
            .await;

        Mock::given(method("POST"))
            .and(path("/launch/13535"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1..)
            .mount(&self.roku)
            .await;
    }

    async fn mount_players(&self, players: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/clients"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "MediaContainer": { "Server": players }
            })))
            .mount(&self.plex)
            .await;
    }

    /// The Roku mock doubles as ECP and companion port.
    fn config(&self) -> TapcastConfig {
        let plex = self.plex.address();
        let roku = self.roku.address();
        TapcastConfig {
            server: ServerEndpoint {
                scheme: "http".into(),
                host: plex.ip().to_string(),
                port: plex.port(),
                token: "plex-token".to_string().into(),
                machine_id: "srv-machine".into(),
            },
            device: DeviceConfig {
                host: roku.ip().to_string(),
                ecp_port: roku.port(),
                app_id: "13535".into(),
                companion: CompanionEndpoint {
                    port: roku.port(),
                    client_id: "tapcast".into(),
                    device_name: "tapcast".into(),
                    target_client_id: "roku-1".into(),
                },
            },
            readiness: ReadinessConfig {
                attempts: 3,
                interval: Duration::from_millis(200),
                wake_settle: Duration::from_millis(10),
                connect_settle: Duration::from_millis(10),
            },
            debounce: DebounceConfig::default(),
            request_timeout: Duration::from_secs(5),
            insecure: false,
            cards: CardMap::from([(
                CardId::parse("04A1B2").unwrap(),
                PlaybackTarget::series("Example Show", ShowMode::Next),
            )]),
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_tap_plays_on_deck_episode_over_companion_port() {
    let mocks = Mocks::start().await;
    mocks.mount_players(json!([])).await;

    Mock::given(method("GET"))
        .and(path("/player/playback/playMedia"))
        .and(query_param("key", "/library/metadata/205"))
        .and(query_param("machineIdentifier", "srv-machine"))
        .and(query_param("token", "plex-token"))
        .and(query_param("X-Plex-Target-Client-Identifier", "roku-1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mocks.roku)
        .await;

    let config = mocks.config();
    let reader = LineReader::new(&b"04A1B2\n"[..]);
    let mut daemon = Daemon::new(
        Debouncer::new(reader, config.debounce),
        config.cards.clone(),
        Dispatcher::from_config(&config).unwrap(),
    );

    let shutdown = CancellationToken::new();
    let stop = shutdown.clone();
    let roku = &mocks.roku;
    let watcher = async move {
        loop {
            let played = roku
                .received_requests()
                .await
                .unwrap_or_default()
                .iter()
                .any(|r| r.url.path() == "/player/playback/playMedia");
            if played {
                stop.cancel();
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    };

    tokio::time::timeout(
        Duration::from_secs(10),
        async { tokio::join!(daemon.run(shutdown), watcher) },
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn test_registered_player_bypasses_companion_port() {
    let mocks = Mocks::start().await;
    let player = MockServer::start().await;
    let addr = player.address();
    mocks
        .mount_players(json!([{
            "name": "Living Room",
            "address": addr.ip().to_string(),
            "port": addr.port(),
            "machineIdentifier": "player-1",
            "protocolCapabilities": "timeline,playback,navigation"
        }]))
        .await;

    Mock::given(method("GET"))
        .and(path("/player/playback/playMedia"))
        .and(header("X-Plex-Target-Client-Identifier", "player-1"))
        .and(query_param("key", "/library/metadata/205"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&player)
        .await;
    Mock::given(method("GET"))
        .and(path("/player/playback/playMedia"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mocks.roku)
        .await;

    let config = mocks.config();
    let dispatcher = Dispatcher::from_config(&config).unwrap();
    let handled = dispatcher
        .dispatch(&PlaybackTarget::series("Example Show", ShowMode::Next))
        .await
        .unwrap();
    assert!(handled);
}

#[tokio::test]
async fn test_shuffle_attaches_play_queue() {
    let mocks = Mocks::start().await;
    mocks.mount_players(json!([])).await;

    Mock::given(method("POST"))
        .and(path("/playQueues"))
        .and(query_param("shuffle", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "MediaContainer": {
                "playQueueID": 991,
                "Metadata": [
                    { "ratingKey": "311", "key": "/library/metadata/311", "title": "C", "type": "episode" },
                    { "ratingKey": "102", "key": "/library/metadata/102", "title": "A", "type": "episode" }
                ]
            }
        })))
        .expect(1)
        .mount(&mocks.plex)
        .await;

    Mock::given(method("GET"))
        .and(path("/player/playback/playMedia"))
        .and(query_param("key", "/library/metadata/311"))
        .and(query_param("containerKey", "/playQueues/991?window=100&own=1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mocks.roku)
        .await;

    let config = mocks.config();
    let dispatcher = Dispatcher::from_config(&config).unwrap();
    dispatcher
        .dispatch(&PlaybackTarget::series("Example Show", ShowMode::Shuffle))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_rejected_companion_command_is_logged_failure() {
    let mocks = Mocks::start().await;
    mocks.mount_players(json!([])).await;

    Mock::given(method("GET"))
        .and(path("/player/playback/playMedia"))
        .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
        .expect(1)
        .mount(&mocks.roku)
        .await;

    let config = mocks.config();
    let daemon = Daemon::new(
        Debouncer::new(LineReader::new(&b""[..]), config.debounce),
        config.cards.clone(),
        Dispatcher::from_config(&config).unwrap(),
    );

    let outcome = daemon.handle_tap(&CardId::parse("04A1B2").unwrap()).await;
    match outcome {
        TapOutcome::Failed(e) => assert_eq!(e.kind(), "command"),
        other => panic!("expected failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unauthorized_companion_command_is_command_failure() {
    let mocks = Mocks::start().await;
    mocks.mount_players(json!([])).await;

    Mock::given(method("GET"))
        .and(path("/player/playback/playMedia"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&mocks.roku)
        .await;

    let config = mocks.config();
    let dispatcher = Dispatcher::from_config(&config).unwrap();
    let err = dispatcher
        .dispatch(&PlaybackTarget::series("Example Show", ShowMode::Next))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "command");
    assert!(matches!(
        err,
        DispatchError::Command {
            status: Some(401),
            ..
        }
    ));
}

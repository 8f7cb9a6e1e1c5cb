//! Integration tests: mock avalanche.org feed through the cache to spoken answers

use std::sync::Arc;

use avalanche_forecast::{
    AvalancheError, AvalancheOrgClient, CacheStore, FjallStore, ForecastService, Intent,
    RequestContext, SkillHandler,
    config::SourceConfig,
    forecast::build_http_client,
    skill::{Slot, speech},
};
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn feature(name: &str, state: &str, danger: &str, level: i32) -> serde_json::Value {
    json!({
        "type": "Feature",
        "properties": {
            "name": name,
            "center": "Northwest Avalanche Center",
            "link": format!("https://nwac.us/avalanche-forecast/#/{}", name.replace(' ', "-")),
            "state": state,
            "travel_advice": format!("{name} travel advice."),
            "danger": danger,
            "danger_level": level
        }
    })
}

fn feed() -> serde_json::Value {
    json!({
        "type": "FeatureCollection",
        "features": [
            feature("Stevens Pass", "WA", "moderate", 2),
            feature("Snoqualmie Pass", "WA", "moderate", 2),
            feature("Olympics", "WA", "no rating", -1),
            feature("Mt Hood", "OR", "considerable", 3),
            feature("Salt Lake", "UT", "low", 1),
            feature("Ogden", "UT", "low", 1),
            feature("Provo", "UT", "low", 1),
            feature("Logan", "UT", "high", 4),
        ]
    })
}

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 14, 7, 30, 0).unwrap()
}

fn source_for(server: &MockServer) -> AvalancheOrgClient {
    let config = SourceConfig {
        url: format!("{}/wp-admin/admin-ajax.php?action=map_layer", server.uri()),
        timeout_seconds: 5,
        max_retries: 0,
    };
    AvalancheOrgClient::with_client(build_http_client(&config).unwrap(), &config.url)
}

fn handler(server: &MockServer, dir: &TempDir) -> SkillHandler {
    let store = FjallStore::open(dir.path()).unwrap();
    let cache = CacheStore::new(Arc::new(source_for(server)), Arc::new(store));
    SkillHandler::new(ForecastService::new(cache), vec!["Sorry about that.".into()]).unwrap()
}

fn slot(id: &str, name: &str) -> Slot {
    Slot {
        id: id.to_string(),
        name: name.to_string(),
    }
}

#[tokio::test]
async fn test_state_summary_from_live_feed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wp-admin/admin-ajax.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(feed()))
        .expect(1)
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let handler = handler(&server, &dir);
    let ctx = RequestContext { now: t0() };

    let utah = handler
        .handle(&Intent::StateForecast { state: slot("UT", "Utah") }, &ctx)
        .await;
    let speech = utah.speech.unwrap();
    assert!(speech.contains("These are: Salt Lake, Ogden and Provo."));
    assert!(speech.contains("Provo travel advice."));

    let washington = handler
        .handle(
            &Intent::StateForecast {
                state: slot("WA", "Washington"),
            },
            &ctx,
        )
        .await;
    assert!(
        washington
            .speech
            .unwrap()
            .contains("regions Stevens Pass and Snoqualmie Pass have an avalanche danger rating of moderate")
    );
}

#[tokio::test]
async fn test_region_lookup_reuses_snapshot_within_ttl() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(feed()))
        .expect(1)
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let handler = handler(&server, &dir);

    for minutes in [0, 30, 599] {
        let ctx = RequestContext {
            now: t0() + TimeDelta::minutes(minutes),
        };
        let response = handler
            .handle(
                &Intent::RegionForecast {
                    region: slot("MtHood", "Mount Hood"),
                },
                &ctx,
            )
            .await;
        assert_eq!(
            response.speech.as_deref(),
            Some("The avalanche danger for Mount Hood is considerable. Mt Hood travel advice.")
        );
    }
}

#[tokio::test]
async fn test_expired_snapshot_is_refetched() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(feed()))
        .expect(2)
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let store = Arc::new(FjallStore::open(dir.path()).unwrap());
    let cache = CacheStore::new(Arc::new(source_for(&server)), store);

    let first = cache.get_or_refresh(t0()).await.unwrap();
    let later = t0() + TimeDelta::hours(10);
    let second = cache.get_or_refresh(later).await.unwrap();

    assert_eq!(first.fetched_at, t0());
    assert_eq!(second.fetched_at, later);
    assert_eq!(cache.snapshot().await.unwrap(), Some(second));
}

#[tokio::test]
async fn test_upstream_outage_with_and_without_snapshot() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(feed()))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let service = ForecastService::new(CacheStore::new(
        Arc::new(source_for(&server)),
        Arc::new(FjallStore::open(dir.path()).unwrap()),
    ));

    service.resolve_region("Olympics", t0()).await.unwrap();

    let stale = service
        .resolve_region("Olympics", t0() + TimeDelta::days(2))
        .await
        .unwrap();
    assert_eq!(stale.danger, "no rating");

    let empty_dir = TempDir::new().unwrap();
    let cold = ForecastService::new(CacheStore::new(
        Arc::new(source_for(&server)),
        Arc::new(FjallStore::open(empty_dir.path()).unwrap()),
    ));
    let err = cold.resolve_state("UT", t0()).await.unwrap_err();
    assert!(matches!(err, AvalancheError::Upstream(_)));
}

#[tokio::test]
async fn test_outage_without_snapshot_speaks_upstream_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let handler = handler(&server, &dir);

    let response = handler
        .handle(
            &Intent::RegionForecast {
                region: slot("StevensPass", "Stevens Pass"),
            },
            &RequestContext { now: t0() },
        )
        .await;

    assert_eq!(response.speech.as_deref(), Some(speech::UPSTREAM_UNAVAILABLE));
}

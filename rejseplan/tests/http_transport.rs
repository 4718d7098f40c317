//! Integration tests for the HTTP transport (wiremock-based)

use chrono::NaiveDate;
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, body_string_contains, header, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

use rejseplan::hafas::{
    HafasClient, HafasConfig, HafasError, HttpTransport, LocationQuery, TripSearchRequest,
};

fn client_for(server: &MockServer) -> HafasClient<HttpTransport> {
    let config = HafasConfig::default()
        .with_base_url(server.uri())
        .with_timeout(5);
    let transport = HttpTransport::new(&config).unwrap();
    HafasClient::new(transport, config)
}

fn envelope(meth: &str, res: Value) -> Value {
    json!({
        "ver": "1.24",
        "lang": "dan",
        "id": "req_1_1",
        "err": "OK",
        "svcResL": [ { "meth": meth, "err": "OK", "res": res } ]
    })
}

fn locations_json() -> Value {
    envelope(
        "LocMatch",
        json!({ "match": { "locL": [
            { "lid": "A=1@O=Valby St.@X=12516000@Y=55662000@", "type": "S",
              "name": "Valby St.", "crd": { "x": 12516000, "y": 55662000 } },
            { "lid": "A=1@O=Roskilde St.@X=12088000@Y=55639000@", "type": "S",
              "name": "Roskilde St.", "crd": { "x": 12088000, "y": 55639000 } }
        ] } }),
    )
}

#[tokio::test]
async fn test_search_location_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(header("origin", "https://rejseplanen.dk"))
        .and(body_partial_json(json!({
            "auth": { "type": "AID" },
            "lang": "dan"
        })))
        .and(body_string_contains("\"meth\":\"LocMatch\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(locations_json()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let locations = client
        .search_location(&LocationQuery::new("valby"))
        .await
        .unwrap();

    assert_eq!(locations.len(), 2);
    assert_eq!(locations[0].name, "Valby St.");
    assert_eq!(locations[1].coordinate.lon, 12.088);
}

#[tokio::test]
async fn test_service_messages_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("\"meth\":\"HimSearch\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
            "HimSearch",
            json!({ "msgL": [
                { "type": "HIM", "hid": "HIM_FREETEXT_1", "head": "Sporarbejde",
                  "txtN": "Færre tog mellem Valby og Roskilde", "prio": 50 }
            ] }),
        )))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let messages = client.service_messages(&[], &[]).await.unwrap();

    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].priority, 50);
}

#[tokio::test]
async fn test_plan_trip_fetches_walking_route_once() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("\"meth\":\"LocMatch\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(locations_json()))
        .mount(&server)
        .await;

    let walk = json!({
        "type": "WALK",
        "dep": { "locX": 0, "dTimeS": "081000" },
        "arr": { "locX": 1, "aTimeS": "081500" },
        "gis": { "dist": 350, "durS": "000500", "ctx": "G|1|walk" }
    });
    Mock::given(method("POST"))
        .and(body_string_contains("\"meth\":\"TripSearch\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
            "TripSearch",
            json!({
                "common": { "locL": [
                    { "lid": "A=1@O=Valby St.@", "type": "S", "name": "Valby St." },
                    { "lid": "A=1@O=Roskilde St.@", "type": "S", "name": "Roskilde St." }
                ] },
                "outConL": [
                    { "cid": "C-0", "date": "20250915", "dur": "000500", "chg": 0,
                      "secL": [ walk.clone() ] },
                    { "cid": "C-1", "date": "20250915", "dur": "000500", "chg": 0,
                      "secL": [ walk ] }
                ]
            }),
        )))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(body_string_contains("\"meth\":\"GisRoute\""))
        .and(body_string_contains("G|1|walk"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
            "GisRoute",
            json!({ "common": { "polyL": [ { "crdEncYX": "kuzrIqyjkAmCzWoD`YqC`^" } ] } }),
        )))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut stops = client
        .search_location(&LocationQuery::new("valby"))
        .await
        .unwrap()
        .into_iter();
    let origin = stops.next().unwrap();
    let destination = stops.next().unwrap();

    let time = NaiveDate::from_ymd_opt(2025, 9, 15)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap();
    let result = client
        .plan_trip(&TripSearchRequest::new(origin, destination, time))
        .await
        .unwrap();

    assert_eq!(result.trips.len(), 2);
    assert_eq!(result.common.walking_routes.len(), 1);
    for trip in &result.trips {
        let gis = trip.sections[0].gis().unwrap();
        assert_eq!(gis.polyline().map(|p| p.len()), Some(4));
    }
}

#[tokio::test]
async fn test_unauthorized() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.service_messages(&[], &[]).await.unwrap_err();

    assert!(matches!(err, HafasError::Unauthorized));
}

#[tokio::test]
async fn test_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "30"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.service_messages(&[], &[]).await.unwrap_err();

    assert!(matches!(err, HafasError::RateLimited));
}

#[tokio::test]
async fn test_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.service_messages(&[], &[]).await.unwrap_err();

    match err {
        HafasError::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "Internal Server Error");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_invalid_json_keeps_body_excerpt() {
    let server = MockServer::start().await;

    let body = format!("<html>{}</html>", "x".repeat(1000));
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.service_messages(&[], &[]).await.unwrap_err();

    match err {
        HafasError::Json { body: Some(excerpt), .. } => {
            assert!(excerpt.starts_with("<html>"));
            assert_eq!(excerpt.chars().count(), 500);
        }
        other => panic!("expected Json error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_service_error_code() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "err": "OK",
            "svcResL": [ { "meth": "HimSearch", "err": "PARSE", "errTxt": "bad request" } ]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.service_messages(&[], &[]).await.unwrap_err();

    assert!(matches!(err, HafasError::Service { ref code, .. } if code == "PARSE"));
}

//! Integration tests for the Open-Meteo client stack using wiremock.

use common::{
    CURRENT_VARIABLES, Coordinate, DAILY_VARIABLES, ForecastHorizon, ForecastQuery,
    HOURLY_VARIABLES, WeatherVariable,
};
use forecast::client::cache::{DEFAULT_CAPACITY, DEFAULT_TTL};
use forecast::table::{build_table, column_values, timestamps};
use forecast::{
    CachePolicy, ClientOptions, ForecastClient, ForecastError, OpenMeteoClient, RetryConfig,
    default_client,
};
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const HOUR: i64 = 3_600;
const DAY: i64 = 86_400;
const START: i64 = 1_717_192_800;

fn block(times: &[i64], variables: &[WeatherVariable]) -> serde_json::Value {
    let mut block = serde_json::Map::new();
    block.insert("time".into(), serde_json::json!(times));
    for (offset, variable) in variables.iter().enumerate() {
        let values: Vec<f64> = (0..times.len()).map(|i| offset as f64 * 10.0 + i as f64).collect();
        block.insert(variable.name.into(), serde_json::json!(values));
    }
    serde_json::Value::Object(block)
}

/// A one day forecast for Siena, shaped like the provider's unixtime output.
fn siena_body() -> serde_json::Value {
    let hours: Vec<i64> = (0..24).map(|i| START + i * HOUR).collect();
    serde_json::json!({
        "latitude": 43.32,
        "longitude": 11.34,
        "generationtime_ms": 0.12,
        "utc_offset_seconds": 7200,
        "timezone": "Europe/Rome",
        "timezone_abbreviation": "CEST",
        "elevation": 322.0,
        "current": {
            "time": START,
            "interval": 900,
            "temperature_2m": 21.3,
            "relative_humidity_2m": 54,
            "apparent_temperature": 20.8,
            "is_day": 1
        },
        "hourly": block(&hours, HOURLY_VARIABLES),
        "daily": block(&[START], DAILY_VARIABLES),
    })
}

fn siena() -> ForecastQuery {
    ForecastQuery::standard(Coordinate::new(43.3182, 11.3306), Some(ForecastHorizon::ONE_DAY))
}

fn options(server: &MockServer, retry: RetryConfig, cache: CachePolicy) -> ClientOptions {
    ClientOptions {
        endpoint: format!("{}/v1/forecast", server.uri()),
        retry,
        cache,
    }
}

fn memory_cache() -> CachePolicy {
    CachePolicy::Memory {
        capacity: DEFAULT_CAPACITY,
        ttl: DEFAULT_TTL,
    }
}

#[tokio::test]
async fn test_fetch_sends_expected_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", "43.3182"))
        .and(query_param("longitude", "11.3306"))
        .and(query_param(
            "current",
            "temperature_2m,relative_humidity_2m,apparent_temperature,is_day",
        ))
        .and(query_param("forecast_days", "1"))
        .and(query_param("timezone", "auto"))
        .and(query_param("timeformat", "unixtime"))
        .respond_with(ResponseTemplate::new(200).set_body_json(siena_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = OpenMeteoClient::new(format!("{}/v1/forecast", mock_server.uri())).unwrap();
    let response = client.fetch(&siena()).await.unwrap();

    assert_eq!(response.timezone.as_deref(), Some("Europe/Rome"));
    assert_eq!(response.elevation, Some(322.0));

    let current = response.current.unwrap();
    assert_eq!(current.values.len(), CURRENT_VARIABLES.len());
    assert_eq!(current.value("temperature_2m"), Some(21.3));

    let hourly = response.hourly.unwrap();
    assert_eq!(hourly.variables.len(), HOURLY_VARIABLES.len());
    assert_eq!(hourly.expected_len(), Some(24));

    let daily = response.daily.unwrap();
    assert_eq!(daily.interval, DAY);
    assert_eq!(daily.end, START + DAY);
}

#[tokio::test]
async fn test_fetched_block_builds_table() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(siena_body()))
        .mount(&mock_server)
        .await;

    let client = OpenMeteoClient::new(format!("{}/v1/forecast", mock_server.uri())).unwrap();
    let hourly = client.fetch(&siena()).await.unwrap().hourly.unwrap();
    let df = build_table(&hourly).unwrap();

    assert_eq!(df.height(), 24);
    assert_eq!(df.width(), HOURLY_VARIABLES.len() + 1);

    let stamps = timestamps(&df).unwrap();
    assert_eq!(stamps.first().unwrap().timestamp(), START);
    assert_eq!(stamps.last().unwrap().timestamp(), START + 23 * HOUR);

    let humidity = column_values(&df, "relative_humidity_2m").unwrap();
    assert_eq!(humidity[0], Some(10.0));
    assert_eq!(humidity[23], Some(33.0));
}

#[tokio::test]
async fn test_identical_queries_reach_provider_once() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(siena_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client =
        default_client(&options(&mock_server, RetryConfig::default(), memory_cache())).unwrap();

    let first = client.fetch(&siena()).await.unwrap();
    let second = client.fetch(&siena()).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_disabled_cache_reaches_provider_every_time() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(siena_body()))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = default_client(&options(
        &mock_server,
        RetryConfig::default(),
        CachePolicy::Disabled,
    ))
    .unwrap();

    client.fetch(&siena()).await.unwrap();
    client.fetch(&siena()).await.unwrap();
}

#[tokio::test]
async fn test_server_errors_are_retried_until_exhausted() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .expect(5)
        .mount(&mock_server)
        .await;

    let client = default_client(&options(
        &mock_server,
        RetryConfig::new(5, Duration::from_millis(10)),
        memory_cache(),
    ))
    .unwrap();

    let err = client.fetch(&siena()).await.unwrap_err();

    assert!(err.is_upstream());
    match err {
        ForecastError::RetriesExhausted { attempts, source } => {
            assert_eq!(attempts, 5);
            assert!(matches!(*source, ForecastError::Provider { status: 500, .. }));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_failed_fetch_is_not_cached() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(siena_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = default_client(&options(
        &mock_server,
        RetryConfig::new(1, Duration::ZERO),
        memory_cache(),
    ))
    .unwrap();

    assert!(client.fetch(&siena()).await.is_err());
    assert!(client.fetch(&siena()).await.is_ok());
    assert!(client.fetch(&siena()).await.is_ok());
}

#[tokio::test]
async fn test_bad_request_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": true,
            "reason": "Latitude must be in range of -90 to 90°. Given: 123.0."
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = default_client(&options(
        &mock_server,
        RetryConfig::new(5, Duration::from_millis(10)),
        memory_cache(),
    ))
    .unwrap();

    let err = client
        .fetch(&ForecastQuery::standard(Coordinate::new(123.0, 11.0), None))
        .await
        .unwrap_err();

    match err {
        ForecastError::Provider { status, message } => {
            assert_eq!(status, 400);
            assert!(message.starts_with("Latitude must be in range"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_provider_is_transport_error() {
    let client = OpenMeteoClient::new("http://127.0.0.1:9/v1/forecast").unwrap();
    let err = client.fetch(&siena()).await.unwrap_err();
    assert!(matches!(err, ForecastError::Transport(_)));
    assert!(err.is_retryable());
}

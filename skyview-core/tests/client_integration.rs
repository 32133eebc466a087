//! Integration tests for OpenWeatherClient using wiremock.
//!
//! These tests verify request shape, status handling and decode failures
//! against a mock HTTP server, then run the results through normalization.

use chrono::Utc;
use skyview_core::{
    Config, FetchError, GeocodeService, OpenWeatherClient, Pollutant, transform_air_quality,
    transform_geocoding, transform_weather,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn weather_body() -> serde_json::Value {
    serde_json::json!({
        "timezone_offset": 19800,
        "current": {
            "temp": 29.6,
            "weather": [{ "icon": "04d", "description": "broken clouds" }],
            "wind_speed": 4.2,
            "wind_gust": 7.9,
            "dt": 1735281000,
            "humidity": 66,
            "visibility": 8000,
            "pressure": 1010
        },
        "daily": [
            {
                "dt": 1735281000,
                "temp": { "min": 24.3, "max": 30.1 },
                "weather": [{ "icon": "10d", "description": "moderate rain" }],
                "wind_deg": 250,
                "humidity": 79,
                "precipitation": 3.4
            },
            {
                "dt": 1735367400,
                "temp": { "min": 23.8, "max": 29.5 },
                "weather": [{ "icon": "11d", "description": "thunderstorm" }],
                "wind_deg": 10,
                "wind_gust": 11.0,
                "humidity": 81
            }
        ],
        "hourly": [
            {
                "dt": 1735279200,
                "temp": 28.2,
                "weather": [{ "icon": "04d", "description": "broken clouds" }],
                "humidity": 70,
                "visibility": 10000,
                "pressure": 1010
            }
        ]
    })
}

fn air_body() -> serde_json::Value {
    serde_json::json!({
        "list": [{
            "main": { "aqi": 2 },
            "components": { "co": 230.31, "no2": 5.1, "o3": 41.2, "so2": 1.3, "pm2_5": 8.2 },
            "dt": 1735281000
        }]
    })
}

#[tokio::test]
async fn test_fetch_weather_sends_expected_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/3.0/onecall"))
        .and(query_param("lat", "6.9271"))
        .and(query_param("lon", "79.8612"))
        .and(query_param("units", "metric"))
        .and(query_param("exclude", "minutely,alerts"))
        .and(query_param("appid", "TEST_KEY"))
        .respond_with(ResponseTemplate::new(200).set_body_json(weather_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = OpenWeatherClient::with_base_url("TEST_KEY".into(), &mock_server.uri());
    let response = client.fetch_weather(6.9271, 79.8612).await.unwrap();

    assert_eq!(response.daily.len(), 2);
    assert_eq!(response.local_offset().local_minus_utc(), 19800);
}

#[tokio::test]
async fn test_configured_client_requests_metric_units() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/3.0/onecall"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(weather_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    // A config written by an older build may still carry a units choice.
    let mut config: Config =
        toml::from_str("api_key = \"KEY\"\nunits = \"imperial\"\n").unwrap();
    config.base_url = Some(mock_server.uri());

    let client = OpenWeatherClient::from_config(&config).unwrap();
    let response = client.fetch_weather(6.9271, 79.8612).await.unwrap();
    let outlook = transform_weather(&response, &Utc).unwrap();

    assert_eq!(outlook.daily[1].wind_gust_kph, Some(11.0));
}

#[tokio::test]
async fn test_fetched_weather_normalizes() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/3.0/onecall"))
        .respond_with(ResponseTemplate::new(200).set_body_json(weather_body()))
        .mount(&mock_server)
        .await;

    let client = OpenWeatherClient::with_base_url("KEY".into(), &mock_server.uri());
    let response = client.fetch_weather(6.9271, 79.8612).await.unwrap();
    let outlook = transform_weather(&response, &Utc).unwrap();

    let today = outlook.today().unwrap();
    assert_eq!(today.time_label, "Fri");
    assert_eq!(today.current_temp, Some(29));
    assert_eq!(today.wind_direction, Some("W"));
    assert_eq!(today.visibility_km, Some(8.0));
    assert_eq!(
        today.long_description.as_deref(),
        Some("Broken Clouds conditions expected around 6:30 AM. Wind gusts are up to 7 km/h.")
    );
    assert_eq!(outlook.daily[1].wind_direction, Some("N"));
    assert_eq!(outlook.daily[1].icon, "cloud.bolt.fill");
    assert_eq!(outlook.hourly.len(), 1);
    assert_eq!(outlook.hourly[0].icon, "smoke.fill");
}

#[tokio::test]
async fn test_fetch_weather_decode_failure_is_distinct() {
    let mock_server = MockServer::start().await;

    let mut body = weather_body();
    body.as_object_mut().unwrap().remove("hourly");

    Mock::given(method("GET"))
        .and(path("/data/3.0/onecall"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&mock_server)
        .await;

    let client = OpenWeatherClient::with_base_url("KEY".into(), &mock_server.uri());
    let err = client.fetch_weather(0.0, 0.0).await.unwrap_err();

    assert!(err.is_decode());
    match err {
        FetchError::Decode(decode) => {
            assert_eq!(decode.path, "hourly");
            assert!(decode.reason.contains("hourly"));
        }
        other => panic!("expected decode error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_weather_status_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/3.0/onecall"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({ "cod": 401, "message": "Invalid API key" })),
        )
        .mount(&mock_server)
        .await;

    let client = OpenWeatherClient::with_base_url("BAD".into(), &mock_server.uri());
    let err = client.fetch_weather(0.0, 0.0).await.unwrap_err();

    match err {
        FetchError::Status { status, body, .. } => {
            assert_eq!(status.as_u16(), 401);
            assert!(body.contains("Invalid API key"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_forecast_results_are_independent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/3.0/onecall"))
        .respond_with(ResponseTemplate::new(200).set_body_json(weather_body()))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/air_pollution"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let client = OpenWeatherClient::with_base_url("KEY".into(), &mock_server.uri());
    let fetched = client.fetch_forecast(6.9271, 79.8612).await;

    assert!(fetched.weather.is_ok());
    assert!(matches!(fetched.air_quality, Err(FetchError::Status { .. })));
}

#[tokio::test]
async fn test_fetch_air_quality() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/air_pollution"))
        .and(query_param("lat", "6.9271"))
        .respond_with(ResponseTemplate::new(200).set_body_json(air_body()))
        .mount(&mock_server)
        .await;

    let client = OpenWeatherClient::with_base_url("KEY".into(), &mock_server.uri());
    let response = client.fetch_air_quality(6.9271, 79.8612).await.unwrap();
    let reading = transform_air_quality(&response).unwrap();

    assert_eq!(reading.index, 2);
    assert_eq!(reading.concentrations.len(), 3);
    assert_eq!(reading.concentration(Pollutant::No2), Some(5.1));
}

#[tokio::test]
async fn test_search_cities_passes_limit() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("q", "Paris"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "name": "Paris", "lat": 48.8589, "lon": 2.32, "country": "FR", "state": "Ile-de-France" },
            { "name": "Paris", "lat": 33.66, "lon": -95.55, "country": "US", "state": "Texas" },
            { "name": "Paris", "lat": 36.30, "lon": -88.33, "country": "US" }
        ])))
        .mount(&mock_server)
        .await;

    let client = OpenWeatherClient::with_base_url("KEY".into(), &mock_server.uri());
    let results = client.search_cities("Paris", 2).await.unwrap();
    let candidates = transform_geocoding(&results, 2);

    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].display_name, "Paris, Ile-de-France, FR");
    assert_eq!(candidates[1].display_name, "Paris, Texas, US");
}

#[tokio::test]
async fn test_reverse_lookup_returns_first_name() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/reverse"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "name": "Colombo", "lat": 6.93, "lon": 79.85, "country": "LK" }
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/reverse"))
        .and(query_param("lat", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .with_priority(1)
        .mount(&mock_server)
        .await;

    let client = OpenWeatherClient::with_base_url("KEY".into(), &mock_server.uri());

    let name = client.reverse_lookup(6.9271, 79.8612).await.unwrap();
    assert_eq!(name.as_deref(), Some("Colombo"));

    let name = client.reverse_lookup(0.0, 0.0).await.unwrap();
    assert_eq!(name, None);
}

//! Integration tests for the poll client against a mocked coordinator

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use smartroom::coordinator::{ClientConfig, ControlMode, PollClient};

fn fast_config(base_url: String) -> ClientConfig {
    let mut config = ClientConfig::new(base_url).with_timeout(Duration::from_secs(2));
    config.retry_delay = Duration::from_millis(10);
    config
}

#[tokio::test]
async fn test_fetch_status_parses_snapshot() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "light_level": 512,
            "distance": 18,
            "temperature": 23.4,
            "humidity": 51.0,
            "led_status": true,
            "fan_speed": 200,
            "buzzer_status": true
        })))
        .mount(&server)
        .await;

    let client = PollClient::new(fast_config(server.uri())).unwrap();
    let snapshot = client.fetch_status().await.unwrap();

    assert_eq!(snapshot.light_level, 512);
    assert_eq!(snapshot.distance, 18);
    assert!(snapshot.led_status);
    assert_eq!(snapshot.fan_speed, 200);
    assert!(snapshot.buzzer_status);
}

#[tokio::test]
async fn test_fetch_status_unreachable_is_network_error() {
    // Nothing listens on this address; the request must fail cleanly rather
    // than panic the caller.
    let client = PollClient::new(
        fast_config("http://127.0.0.1:9".to_string()).with_timeout(Duration::from_millis(500)),
    )
    .unwrap();

    let result = client.fetch_status().await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_set_led_round_trip() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/control_led"))
        .and(body_json(json!({ "status": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "led_status": true
        })))
        .mount(&server)
        .await;

    let client = PollClient::new(fast_config(server.uri())).unwrap();
    assert!(client.set_led(true).await.unwrap());
}

#[tokio::test]
async fn test_set_fan_reports_rejection() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/control_fan"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "rejected",
            "fan_speed": 100,
            "mode": "automatic"
        })))
        .mount(&server)
        .await;

    let client = PollClient::new(fast_config(server.uri())).unwrap();
    let write = client.set_fan(50).await.unwrap();

    assert!(!write.applied);
    assert_eq!(write.fan_speed, 100);
    assert_eq!(write.mode, ControlMode::Automatic);
}

#[tokio::test]
async fn test_set_fan_applied() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/control_fan"))
        .and(body_json(json!({ "speed": 180 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "fan_speed": 180,
            "mode": "manual"
        })))
        .mount(&server)
        .await;

    let client = PollClient::new(fast_config(server.uri())).unwrap();
    let write = client.set_fan(180).await.unwrap();

    assert!(write.applied);
    assert_eq!(write.fan_speed, 180);
}

#[tokio::test]
async fn test_control_retries_after_server_error() {
    let server = MockServer::start().await;

    // First attempt fails with a 500, the retry succeeds.
    Mock::given(method("POST"))
        .and(path("/control_led"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/control_led"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "led_status": false
        })))
        .mount(&server)
        .await;

    let client = PollClient::new(fast_config(server.uri())).unwrap();
    assert!(!client.set_led(false).await.unwrap());
}

#[tokio::test]
async fn test_control_does_not_retry_client_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/control_fan"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad request"))
        .expect(1)
        .mount(&server)
        .await;

    let client = PollClient::new(fast_config(server.uri())).unwrap();
    let result = client.set_fan(10).await;

    assert!(result.is_err());
    server.verify().await;
}

#[tokio::test]
async fn test_toggle_mode() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/control_mode"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "mode": "automatic"
        })))
        .mount(&server)
        .await;

    let client = PollClient::new(fast_config(server.uri())).unwrap();
    assert_eq!(client.toggle_mode().await.unwrap(), ControlMode::Automatic);
}

#[tokio::test]
async fn test_fetch_mode() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/mode"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "mode": "manual" })))
        .mount(&server)
        .await;

    let client = PollClient::new(fast_config(server.uri())).unwrap();
    assert_eq!(client.fetch_mode().await.unwrap(), ControlMode::Manual);
}

use dazl_common::api::{AuthResponse, Endpoint, RoomType};
use dazl_common::forms::Login;
use dazl_rust::client::ApiClient;
use dazl_rust::commands::unwrap_data;
use dazl_rust::config::Config;
use serde_json::Value;

#[tokio::test]
async fn dazl_login_integration() {
    let (email, password) = match (std::env::var("DAZL_TEST_EMAIL"), std::env::var("DAZL_TEST_PASSWORD")) {
        (Ok(email), Ok(password)) if !email.trim().is_empty() => (email, password),
        _ => {
            eprintln!("DAZL_TEST_EMAIL / DAZL_TEST_PASSWORD not set; skipping integration test");
            return;
        }
    };

    let mut config = Config::default();
    if let Ok(url) = std::env::var("DAZL_API_URL") {
        config.base_url = url;
    }

    let client = ApiClient::new(&config).expect("client");
    let response: AuthResponse = client
        .post_json(&Endpoint::Login, &Login { email, password })
        .await
        .expect("login failed");
    assert!(!response.data.token.is_empty());

    let client = client.with_token(Some(response.data.token));
    let rooms: Value = client.get_json(&Endpoint::RoomTypes).await.expect("room list");
    let rooms: Vec<RoomType> = serde_json::from_value(unwrap_data(rooms)).expect("room types");
    assert!(!rooms.is_empty());
}

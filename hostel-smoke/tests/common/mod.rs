#![allow(dead_code)]

use hostel_smoke::{ApiClient, LoginRequest, RunOptions, SmokeRunner};
use mockito::{Matcher, Mock, ServerGuard};
use serde_json::{json, Value};

pub const WARDEN_EMAIL: &str = "admin1@uni.com";
pub const WARDEN_PASSWORD: &str = "admin1";
pub const TOKEN: &str = "eyJhbGciOiJIUzI1NiJ9.test-token";

pub fn warden_runner(base_url: &str, options: RunOptions) -> SmokeRunner {
    let client = ApiClient::new(base_url, None).expect("client should build");
    SmokeRunner::new(
        client,
        "warden",
        LoginRequest::new(WARDEN_EMAIL, WARDEN_PASSWORD),
        options,
    )
}

/// `POST /api/login` for the warden credentials, not yet created
pub fn login_mock(server: &mut ServerGuard, status: usize, body: Value) -> Mock {
    server
        .mock("POST", "/api/login")
        .match_header("accept", "application/json")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({
            "email": WARDEN_EMAIL,
            "password": WARDEN_PASSWORD,
        })))
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
}

/// `GET /api/complaints` carrying the test bearer token, not yet created
pub fn complaints_mock(server: &mut ServerGuard, status: usize, body: Value) -> Mock {
    server
        .mock("GET", "/api/complaints")
        .match_header("authorization", format!("Bearer {TOKEN}").as_str())
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
}

pub fn token_body() -> Value {
    json!({ "token": TOKEN })
}

pub fn listing_body(count: usize) -> Value {
    let data: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "id": format!("00000000-0000-0000-0000-00000000000{i}"),
                "type": "plumbing",
                "description": "Leaking tap",
                "status": "open",
            })
        })
        .collect();
    json!({ "count": count, "data": data })
}

mod common;

use common::*;
use hostel_smoke::checks::Expectation;
use hostel_smoke::{Outcome, RunOptions, SmokeError, Step};
use serde_json::json;

#[tokio::test]
async fn test_warden_login_and_fetch() -> anyhow::Result<()> {
    let mut server = mockito::Server::new_async().await;
    let login = login_mock(&mut server, 200, token_body()).create_async().await;
    let complaints = complaints_mock(&mut server, 200, listing_body(2))
        .create_async()
        .await;

    let runner = warden_runner(&server.url(), RunOptions::default());
    let token = runner.authenticate().await?;
    assert_eq!(token.expose(), TOKEN);

    let listing = runner.fetch_complaints(Some(&token)).await?;
    assert_eq!(listing.count, 2);
    assert_eq!(listing.data.len(), 2);

    login.assert_async().await;
    complaints.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_full_run_reports_two_passing_steps() {
    let mut server = mockito::Server::new_async().await;
    let _login = login_mock(&mut server, 200, token_body()).create_async().await;
    let _complaints = complaints_mock(&mut server, 200, listing_body(0))
        .create_async()
        .await;

    let report = warden_runner(&server.url(), RunOptions::default()).run().await;

    assert!(report.passed(), "{}", report.render_text());
    assert_eq!(report.total(), 2);
    let login = report.find(1, Step::Authenticate).unwrap();
    assert_eq!(login.status, Some(200));
    let fetch = report.find(1, Step::FetchComplaints).unwrap();
    assert_eq!(fetch.status, Some(200));
    assert!(report.into_result().is_ok());
}

#[tokio::test]
async fn test_rejected_login_never_sends_fetch() {
    let mut server = mockito::Server::new_async().await;
    let _login = login_mock(
        &mut server,
        400,
        json!({"error": "Invalid email/password"}),
    )
    .create_async()
    .await;
    let complaints = server
        .mock("GET", "/api/complaints")
        .expect(0)
        .create_async()
        .await;

    let report = warden_runner(&server.url(), RunOptions::default()).run().await;

    let login = report.find(1, Step::Authenticate).unwrap();
    assert_eq!(login.status, Some(400));
    assert!(matches!(login.outcome, Outcome::AssertionFailed { .. }));
    assert!(login
        .outcome
        .message()
        .unwrap()
        .contains("expected status 200, got status 400 (Invalid email/password)"));

    let fetch = report.find(1, Step::FetchComplaints).unwrap();
    assert_eq!(fetch.status, None);
    assert!(matches!(fetch.outcome, Outcome::PreconditionFailed { .. }));

    complaints.assert_async().await;
    assert!(matches!(
        report.into_result(),
        Err(SmokeError::ChecksFailed {
            failed: 2,
            total: 2
        })
    ));
}

#[tokio::test]
async fn test_login_without_token_field() {
    let mut server = mockito::Server::new_async().await;
    let _login = login_mock(&mut server, 200, json!({"message": "ok"})).create_async().await;

    let runner = warden_runner(&server.url(), RunOptions::default());
    let err = runner.authenticate().await.unwrap_err();
    assert!(matches!(
        err,
        SmokeError::Assertion {
            step: Step::Authenticate,
            expectation: Expectation::Field("token"),
            ..
        }
    ));
}

#[tokio::test]
async fn test_blank_token_skips_fetch() {
    let mut server = mockito::Server::new_async().await;
    let _login = login_mock(&mut server, 200, json!({"token": "  "}))
        .create_async()
        .await;
    let complaints = server
        .mock("GET", "/api/complaints")
        .expect(0)
        .create_async()
        .await;

    let report = warden_runner(&server.url(), RunOptions::default()).run().await;

    let login = report.find(1, Step::Authenticate).unwrap();
    assert_eq!(login.status, Some(200));
    assert!(login.outcome.message().unwrap().contains("a blank string"));

    let fetch = report.find(1, Step::FetchComplaints).unwrap();
    assert_eq!(fetch.status, None);
    assert!(matches!(fetch.outcome, Outcome::PreconditionFailed { .. }));

    complaints.assert_async().await;
    assert_eq!(report.failed(), 2);
}

#[tokio::test]
async fn test_fetch_rejected_token() {
    let mut server = mockito::Server::new_async().await;
    let _complaints = complaints_mock(
        &mut server,
        401,
        json!({"error": "Invalid or expired token"}),
    )
    .create_async()
    .await;

    let runner = warden_runner(&server.url(), RunOptions::default());
    let token = hostel_smoke::SessionToken::new(TOKEN).unwrap();
    let err = runner.fetch_complaints(Some(&token)).await.unwrap_err();
    assert!(matches!(
        err,
        SmokeError::Assertion {
            expectation: Expectation::Status(200),
            ..
        }
    ));
    assert!(err.to_string().contains("Invalid or expired token"));
}

#[tokio::test]
async fn test_listing_without_count() {
    let mut server = mockito::Server::new_async().await;
    let _login = login_mock(&mut server, 200, token_body()).create_async().await;
    let _complaints = complaints_mock(
        &mut server,
        200,
        json!({"message": "No complaints found", "data": []}),
    )
    .create_async()
    .await;

    let report = warden_runner(&server.url(), RunOptions::default()).run().await;

    let fetch = report.find(1, Step::FetchComplaints).unwrap();
    assert_eq!(fetch.status, Some(200));
    assert!(fetch
        .outcome
        .message()
        .unwrap()
        .contains("expected field `count` to be a non-negative integer"));
}

#[tokio::test]
async fn test_listing_data_not_an_array() {
    let mut server = mockito::Server::new_async().await;
    let _login = login_mock(&mut server, 200, token_body()).create_async().await;
    let _complaints = complaints_mock(&mut server, 200, json!({"count": 1, "data": {"id": "x"}}))
        .create_async()
        .await;

    let runner = warden_runner(&server.url(), RunOptions::default());
    let token = runner.authenticate().await.unwrap();
    let err = runner.fetch_complaints(Some(&token)).await.unwrap_err();
    assert!(matches!(
        err,
        SmokeError::Assertion {
            expectation: Expectation::ArrayField("data"),
            ..
        }
    ));
}

#[tokio::test]
async fn test_strict_mode_checks_count_against_data() {
    let mut server = mockito::Server::new_async().await;
    let _login = login_mock(&mut server, 200, token_body()).create_async().await;
    let _complaints = complaints_mock(
        &mut server,
        200,
        json!({"count": 3, "data": [{"id": "a"}]}),
    )
    .create_async()
    .await;

    // Loose mode accepts the mismatch
    let loose = warden_runner(&server.url(), RunOptions::default()).run().await;
    assert!(loose.passed(), "{}", loose.render_text());

    let strict = warden_runner(
        &server.url(),
        RunOptions {
            strict: true,
            ..RunOptions::default()
        },
    )
    .run()
    .await;
    let fetch = strict.find(1, Step::FetchComplaints).unwrap();
    assert!(fetch
        .outcome
        .message()
        .unwrap()
        .contains("got count 3 with 1 records"));
}

#[tokio::test]
async fn test_unreachable_server_is_a_transport_error() {
    // Port 9 (discard) is not expected to accept connections
    let runner = warden_runner("http://127.0.0.1:9", RunOptions::default());

    let err = runner.authenticate().await.unwrap_err();
    assert!(matches!(err, SmokeError::Transport { .. }));
    assert_eq!(err.exit_code(), 7);

    let report = runner.run().await;
    let login = report.find(1, Step::Authenticate).unwrap();
    assert!(matches!(login.outcome, Outcome::Errored { .. }));
    assert_eq!(login.status, None);
    let fetch = report.find(1, Step::FetchComplaints).unwrap();
    assert!(matches!(fetch.outcome, Outcome::PreconditionFailed { .. }));
}

#[tokio::test]
async fn test_repeated_runs_are_consistent() {
    let mut server = mockito::Server::new_async().await;
    let login = login_mock(&mut server, 200, token_body())
        .expect(3)
        .create_async()
        .await;
    let complaints = complaints_mock(&mut server, 200, listing_body(1))
        .expect(3)
        .create_async()
        .await;

    let report = warden_runner(
        &server.url(),
        RunOptions {
            iterations: 3,
            ..RunOptions::default()
        },
    )
    .run()
    .await;

    assert!(report.passed(), "{}", report.render_text());
    // Two steps per iteration plus the consistency check
    assert_eq!(report.total(), 7);
    assert!(report.find(3, Step::Consistency).unwrap().outcome.is_passed());
    login.assert_async().await;
    complaints.assert_async().await;
}

#[tokio::test]
async fn test_changing_status_breaks_consistency() {
    let mut server = mockito::Server::new_async().await;
    let _login = login_mock(&mut server, 200, token_body())
        .expect(2)
        .create_async()
        .await;
    // First listing succeeds, the next one hits the failing mock
    let _first = complaints_mock(&mut server, 200, listing_body(1))
        .expect(1)
        .create_async()
        .await;
    let _failing = complaints_mock(
        &mut server,
        500,
        json!({"error": "Failed to fetch complaints"}),
    )
    .create_async()
    .await;

    let report = warden_runner(
        &server.url(),
        RunOptions {
            iterations: 2,
            ..RunOptions::default()
        },
    )
    .run()
    .await;

    let consistency = report.find(2, Step::Consistency).unwrap();
    assert!(matches!(
        consistency.outcome,
        Outcome::AssertionFailed { .. }
    ));
    assert!(consistency
        .outcome
        .message()
        .unwrap()
        .contains("iteration 2 saw [authenticate 200, fetch complaints 500]"));
}

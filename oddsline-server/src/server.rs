//! Axum server setup and router configuration.

use crate::api;
use crate::shutdown::shutdown_signal;
use crate::state::AppState;
use axum::{Json, Router, response::IntoResponse, routing::get};
use serde::Serialize;
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Build the main application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1/admin", api::admin::router())
        .nest("/api/v1", api::user::router())
        .with_state(state)
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Simple health check - returns OK if the server is running.
async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Run the server with graceful shutdown support.
pub async fn run_server(router: Router, addr: SocketAddr) -> Result<(), std::io::Error> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::hash_secret;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use oddsline_core::config::{AdminConfig, ServerConfig, SharedConfig};
    use oddsline_core::entities::{AccountRecord, FixtureRecord, Ledger};
    use oddsline_core::live::{PushChannel, PushConnector};
    use oddsline_sdk::auth::{ADMIN_AUTH_HEADER, bearer};
    use oddsline_sdk::client::LiveOddsClient;
    use oddsline_sdk::objects::{
        AccountResponse, BetReceipt, FixtureId, FixtureResponse, FixtureStatus, LIVE_ODDS_PATH,
        Market, PushMessage, TransactionResponse, TransactionStatus,
    };
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;
    use std::time::Duration;
    use time::OffsetDateTime;
    use tower::ServiceExt;

    const TOKEN: &str = "tok-alice";
    const ADMIN_SECRET: &str = "let-me-in";

    fn fixture(id: &str, status: FixtureStatus) -> FixtureRecord {
        FixtureRecord {
            fixture_id: FixtureId::from(id),
            home: "Arsenal".into(),
            away: "Chelsea".into(),
            league: "Premier League".into(),
            kickoff: OffsetDateTime::from_unix_timestamp(1_792_245_600).unwrap(),
            status,
            odds: BTreeMap::from([
                (Market::Home, dec!(2.0)),
                (Market::Draw, dec!(3.4)),
                (Market::Away, dec!(3.2)),
            ]),
        }
    }

    /// `admin_hash` is empty for tests that never reach the admin API;
    /// an unparseable hash verifies nothing.
    fn app_with_admin(admin_hash: String) -> (Router, AppState) {
        let mut ledger = Ledger::new();
        ledger
            .insert_account(AccountRecord::new(TOKEN, "Alice", dec!(100)))
            .unwrap();
        ledger.insert_fixture(fixture("f1", FixtureStatus::Scheduled)).unwrap();
        ledger.insert_fixture(fixture("f9", FixtureStatus::Finished)).unwrap();

        let config = SharedConfig::new(
            ServerConfig {
                listen: "127.0.0.1:0".parse().unwrap(),
                odds_buffer: 16,
            },
            AdminConfig::new(admin_hash),
        );
        let state = AppState::new(config, ledger, 16);
        (build_router(state.clone()), state)
    }

    fn app() -> Router {
        app_with_admin(String::new()).0
    }

    fn admin_app() -> (Router, AppState) {
        app_with_admin(hash_secret(ADMIN_SECRET).unwrap())
    }

    fn get(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, bearer(token));
        }
        builder.body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, token: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::AUTHORIZATION, bearer(token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn admin_request(method: &str, uri: &str, secret: &str, body: Option<serde_json::Value>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(ADMIN_AUTH_HEADER, secret);
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    fn bet_body(odds: &str, stake: &str, potential_win: &str) -> serde_json::Value {
        serde_json::json!({
            "fixtureId": "f1",
            "market": "home",
            "odds": odds,
            "stake": stake,
            "potentialWin": potential_win,
        })
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    async fn balance(router: &Router) -> rust_decimal::Decimal {
        let (status, body) = send(router, get("/api/v1/account", Some(TOKEN))).await;
        assert_eq!(status, StatusCode::OK);
        serde_json::from_slice::<AccountResponse>(&body).unwrap().balance
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(&app(), get("/health", None)).await;
        assert_eq!(status, StatusCode::OK);
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["status"], "healthy");
    }

    #[tokio::test]
    async fn test_fixtures_are_public() {
        let router = app();

        let (status, body) = send(&router, get("/api/v1/fixtures", None)).await;
        assert_eq!(status, StatusCode::OK);
        let fixtures: Vec<FixtureResponse> = serde_json::from_slice(&body).unwrap();
        assert_eq!(fixtures.len(), 2);
        assert_eq!(fixtures[0].odds.get(&Market::Draw), Some(&dec!(3.4)));

        let (status, _) = send(&router, get("/api/v1/fixtures/f1", None)).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&router, get("/api/v1/fixtures/nope", None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_account_routes_require_token() {
        let router = app();
        let (status, _) = send(&router, get("/api/v1/account", None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let (status, _) = send(&router, get("/api/v1/bets", Some("unknown"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_place_bet_debits_stake() {
        let router = app();

        let (status, body) = send(
            &router,
            post_json("/api/v1/bets", TOKEN, bet_body("2.0", "40", "80.00")),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let receipt: BetReceipt = serde_json::from_slice(&body).unwrap();
        assert_eq!(receipt.potential_win, dec!(80.00));

        assert_eq!(balance(&router).await, dec!(60));

        let (status, body) = send(&router, get("/api/v1/bets", Some(TOKEN))).await;
        assert_eq!(status, StatusCode::OK);
        let history: Vec<BetReceipt> = serde_json::from_slice(&body).unwrap();
        assert_eq!(history, vec![receipt]);
    }

    #[tokio::test]
    async fn test_place_bet_rejections() {
        let router = app();

        let (status, body) = send(
            &router,
            post_json("/api/v1/bets", TOKEN, bet_body("1.9", "10", "19.00")),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(String::from_utf8(body).unwrap().contains("2.0"));

        let (status, body) = send(
            &router,
            post_json("/api/v1/bets", TOKEN, bet_body("2.0", "500", "1000.00")),
        )
        .await;
        assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
        assert_eq!(body, b"insufficient funds");

        let (status, _) = send(
            &router,
            post_json("/api/v1/bets", TOKEN, bet_body("2.0", "10", "25.00")),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        // odds × stake does not fit in a decimal
        let (status, _) = send(
            &router,
            post_json(
                "/api/v1/bets",
                TOKEN,
                bet_body("2.0", &rust_decimal::Decimal::MAX.to_string(), "1.00"),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let mut closed = bet_body("2.0", "10", "20.00");
        closed["fixtureId"] = "f9".into();
        let (status, _) = send(&router, post_json("/api/v1/bets", TOKEN, closed)).await;
        assert_eq!(status, StatusCode::CONFLICT);

        assert_eq!(balance(&router).await, dec!(100));
    }

    #[tokio::test]
    async fn test_admin_requires_valid_secret() {
        let (router, _) = admin_app();
        let body = serde_json::json!({ "market": "home", "odds": "2.5" });

        let (status, _) = send(
            &router,
            admin_request("PUT", "/api/v1/admin/fixtures/f1/odds", "wrong", Some(body.clone())),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let request = Request::builder()
            .method("PUT")
            .uri("/api/v1/admin/fixtures/f1/odds")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let (status, _) = send(&router, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_admin_odds_update_invalidates_old_odds() {
        let (router, state) = admin_app();
        let mut odds_rx = state.ledger.subscribe_odds();

        let (status, body) = send(
            &router,
            admin_request(
                "PUT",
                "/api/v1/admin/fixtures/f1/odds",
                ADMIN_SECRET,
                Some(serde_json::json!({ "market": "home", "odds": "2.5" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let fixture: FixtureResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(fixture.odds.get(&Market::Home), Some(&dec!(2.5)));

        let change = odds_rx.try_recv().unwrap();
        assert_eq!(change.fixture_id, FixtureId::from("f1"));
        assert_eq!(change.odds, dec!(2.5));

        let (status, _) = send(
            &router,
            post_json("/api/v1/bets", TOKEN, bet_body("2.0", "10", "20.00")),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_wallet_settlement_flow() {
        let (router, _) = admin_app();

        // Withdrawal holds funds, rejection refunds them.
        let (status, body) = send(
            &router,
            post_json(
                "/api/v1/wallet/withdrawals",
                TOKEN,
                serde_json::json!({ "amount": "30", "method": "card" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let withdrawal: TransactionResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(withdrawal.status, TransactionStatus::Pending);
        assert_eq!(balance(&router).await, dec!(70));

        let reject_uri = format!(
            "/api/v1/admin/transactions/{}/reject",
            withdrawal.transaction_id
        );
        let (status, _) = send(&router, admin_request("POST", &reject_uri, ADMIN_SECRET, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(balance(&router).await, dec!(100));

        let (status, _) = send(&router, admin_request("POST", &reject_uri, ADMIN_SECRET, None)).await;
        assert_eq!(status, StatusCode::CONFLICT);

        // Deposit credits only on completion.
        let (status, body) = send(
            &router,
            post_json(
                "/api/v1/wallet/deposits",
                TOKEN,
                serde_json::json!({ "amount": "25.50", "method": "crypto" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let deposit: TransactionResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(balance(&router).await, dec!(100));

        let complete_uri = format!(
            "/api/v1/admin/transactions/{}/complete",
            deposit.transaction_id
        );
        let (status, body) =
            send(&router, admin_request("POST", &complete_uri, ADMIN_SECRET, None)).await;
        assert_eq!(status, StatusCode::OK);
        let settled: TransactionResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(settled.status, TransactionStatus::Completed);
        assert!(settled.settled_at.is_some());
        assert_eq!(balance(&router).await, dec!(125.50));

        let (status, body) = send(&router, get("/api/v1/wallet/transactions", Some(TOKEN))).await;
        assert_eq!(status, StatusCode::OK);
        let history: Vec<TransactionResponse> = serde_json::from_slice(&body).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].transaction_id, deposit.transaction_id);
    }

    #[tokio::test]
    async fn test_withdrawal_above_balance_is_refused() {
        let router = app();
        let (status, body) = send(
            &router,
            post_json(
                "/api/v1/wallet/withdrawals",
                TOKEN,
                serde_json::json!({ "amount": "150", "method": "card" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
        assert_eq!(body, b"insufficient funds");
        assert_eq!(balance(&router).await, dec!(100));
    }

    #[tokio::test]
    async fn test_odds_socket_pushes_admin_updates() {
        let (router, state) = admin_app();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let served = router.clone();
        tokio::spawn(async move { axum::serve(listener, served).await });

        let client = LiveOddsClient::from_ws_url(
            format!("ws://{addr}{LIVE_ODDS_PATH}").parse().unwrap(),
        );
        let mut channel = PushConnector::connect(&client).await.unwrap();
        assert_eq!(state.ledger.odds_changed.receiver_count(), 1);

        let (status, _) = send(
            &router,
            admin_request(
                "PUT",
                "/api/v1/admin/fixtures/f1/odds",
                ADMIN_SECRET,
                Some(serde_json::json!({ "market": "away", "odds": "3.5" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let frame = tokio::time::timeout(Duration::from_secs(5), channel.next_frame())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert_eq!(PushMessage::parse(&frame).unwrap(), PushMessage::OddsUpdate);
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(&frame).unwrap(),
            serde_json::json!({ "type": "odds_update" })
        );

        // Closing the client ends the relay and drops its subscription.
        PushChannel::close(&mut channel).await;
        tokio::time::timeout(Duration::from_secs(5), async {
            while state.ledger.odds_changed.receiver_count() > 0 {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap();
    }
}

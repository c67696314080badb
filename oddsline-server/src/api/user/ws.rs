use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use oddsline_core::events::OddsChangedReceiver;
use oddsline_sdk::objects::PushMessage;
use tokio::sync::broadcast::error::RecvError;

use crate::state::AppState;

/// `GET /ws` — odds push stream.
///
/// Upgrades to a WebSocket and sends `{"type":"odds_update"}` for every
/// published odds change. Nothing is sent on connect.
pub(super) async fn odds_ws(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    // Subscribe before the upgrade completes so a change published during
    // the handshake is not lost.
    let odds_rx = state.ledger.subscribe_odds();
    ws.on_upgrade(move |socket| handle_odds_ws(socket, odds_rx))
}

/// Relay odds changes to one socket until either side goes away.
///
/// A receiver that lags behind the broadcast buffer gets a single
/// `odds_update` for everything it missed; clients refetch on every
/// update anyway.
async fn handle_odds_ws(mut socket: WebSocket, mut odds_rx: OddsChangedReceiver) {
    tracing::debug!("WS: odds client connected");

    loop {
        tokio::select! {
            push = next_push(&mut odds_rx) => {
                let Some(push) = push else { break };
                if send_json(&mut socket, &push).await.is_err() {
                    return;
                }
            }

            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None | Some(Err(_)) => {
                        tracing::debug!("WS: odds client disconnected");
                        return;
                    }
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    let _ = socket.send(Message::Close(None)).await;
}

/// Wait for the next frame to push, or `None` once the odds channel is
/// closed.
///
/// After a lag the receiver is moved to the tail of the channel, so a
/// burst that overflowed the buffer yields exactly one update.
async fn next_push(odds_rx: &mut OddsChangedReceiver) -> Option<PushMessage> {
    match odds_rx.recv().await {
        Ok(change) => {
            tracing::trace!(
                fixture_id = %change.fixture_id,
                market = %change.market,
                "WS: pushing odds update"
            );
        }
        Err(RecvError::Lagged(skipped)) => {
            tracing::warn!(skipped, "WS: odds receiver lagged, coalescing");
            *odds_rx = odds_rx.resubscribe();
        }
        Err(RecvError::Closed) => return None,
    }
    Some(PushMessage::OddsUpdate)
}

/// Serialize `value` as JSON and send it as a text WebSocket frame.
///
/// Returns `Err(())` if the send fails (client disconnected).
async fn send_json<T: serde::Serialize>(socket: &mut WebSocket, value: &T) -> Result<(), ()> {
    let json = serde_json::to_string(value).map_err(|_| ())?;
    socket
        .send(Message::Text(json.into()))
        .await
        .map_err(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use oddsline_core::events::{OddsChanged, odds_changed_channel};
    use oddsline_sdk::objects::{FixtureId, Market};
    use rust_decimal_macros::dec;
    use tokio::sync::broadcast::error::TryRecvError;

    fn change(odds: rust_decimal::Decimal) -> OddsChanged {
        OddsChanged {
            fixture_id: FixtureId::from("f1"),
            market: Market::Home,
            odds,
        }
    }

    #[tokio::test]
    async fn test_next_push_one_frame_per_change() {
        let (odds_tx, mut odds_rx) = odds_changed_channel(8);
        odds_tx.send(change(dec!(2.1))).unwrap();
        odds_tx.send(change(dec!(2.2))).unwrap();

        assert_eq!(next_push(&mut odds_rx).await, Some(PushMessage::OddsUpdate));
        assert_eq!(next_push(&mut odds_rx).await, Some(PushMessage::OddsUpdate));
        assert_eq!(odds_rx.try_recv().unwrap_err(), TryRecvError::Empty);
    }

    #[tokio::test]
    async fn test_next_push_coalesces_after_lag() {
        let (odds_tx, mut odds_rx) = odds_changed_channel(1);
        for odds in [dec!(2.1), dec!(2.2), dec!(2.3)] {
            odds_tx.send(change(odds)).unwrap();
        }

        assert_eq!(next_push(&mut odds_rx).await, Some(PushMessage::OddsUpdate));
        // The retained tail of the burst is not pushed a second time.
        assert_eq!(odds_rx.try_recv().unwrap_err(), TryRecvError::Empty);

        odds_tx.send(change(dec!(2.4))).unwrap();
        assert_eq!(next_push(&mut odds_rx).await, Some(PushMessage::OddsUpdate));
    }

    #[tokio::test]
    async fn test_next_push_ends_when_channel_closes() {
        let (odds_tx, mut odds_rx) = odds_changed_channel(1);
        drop(odds_tx);
        assert_eq!(next_push(&mut odds_rx).await, None);
    }
}

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::broadcast::error::RecvError;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;

use crate::auth::verify_token;
use crate::errors::AppError;
use crate::models::BookingEvent;
use crate::state::AppState;

/// Browsers can't set headers on WebSocket/EventSource requests, so the token rides in the query.
#[derive(Deserialize)]
pub struct TokenQuery {
    pub token: Option<String>,
}

fn authenticate(state: &AppState, query: &TokenQuery) -> Result<String, AppError> {
    let token = query.token.as_deref().ok_or(AppError::Unauthorized)?;
    Ok(verify_token(&state.config.jwt_secret, token)?.sub)
}

// GET /ws
// The token is checked before the upgrade so unauthenticated callers always get 401.
pub async fn ws_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TokenQuery>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    let actor_id = match authenticate(&state, &query) {
        Ok(actor_id) => actor_id,
        Err(e) => return e.into_response(),
    };

    match ws {
        Ok(ws) => ws.on_upgrade(move |socket| handle_socket(socket, state, actor_id)),
        Err(rejection) => rejection.into_response(),
    }
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, actor_id: String) {
    let mut rx = state.broadcaster.subscribe();
    tracing::info!(
        actor = %actor_id,
        sessions = state.broadcaster.session_count(),
        "staff session connected"
    );

    let (mut sender, mut receiver) = socket.split();

    let mut send_task = tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    let Ok(text) = serde_json::to_string(&event) else {
                        continue;
                    };
                    if sender.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "staff session lagging, events dropped");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    // Inbound frames carry nothing; drain until the client closes.
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(message)) = receiver.next().await {
            if let Message::Close(_) = message {
                break;
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    tracing::info!(actor = %actor_id, "staff session disconnected");
}

fn sse_event(event: &BookingEvent) -> Event {
    let data = serde_json::to_string(event).unwrap_or_default();
    Event::default().event(event.name()).data(data)
}

// GET /api/bookings/events (SSE)
pub async fn events_stream(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TokenQuery>,
) -> Result<Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>>, AppError> {
    authenticate(&state, &query)?;

    let live = tokio_stream::StreamExt::filter_map(
        BroadcastStream::new(state.broadcaster.subscribe()),
        |result| match result {
            Ok(event) => Some(Ok(sse_event(&event))),
            Err(BroadcastStreamRecvError::Lagged(_)) => None,
        },
    );

    Ok(Sse::new(live).keep_alive(KeepAlive::new().interval(Duration::from_secs(30))))
}

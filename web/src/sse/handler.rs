use crate::AppState;
use async_stream::stream;
use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use log::*;
use sse::connection::ConnectionId;
use sse::message::{Event as SseEvent, Message as SseMessage, MessageScope};
use sse::Manager;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Unregisters its connection when the response stream is dropped, which is what
/// happens when the client goes away.
struct ConnectionGuard {
    manager: Arc<Manager>,
    connection_id: ConnectionId,
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        debug!(
            "SSE connection {} closed, cleaning up",
            self.connection_id.as_str()
        );
        self.manager.unregister_connection(&self.connection_id);
    }
}

/// SSE handler that establishes a long-lived connection to the product hub.
/// Every product event broadcast after registration is streamed to the client.
#[utoipa::path(
    get,
    path = "/product_hub",
    responses(
        (status = 200, description = "text/event-stream of product_added, product_updated and product_deleted events"),
    )
)]
pub(crate) async fn sse_handler(
    State(app_state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (tx, mut rx) = mpsc::unbounded_channel();

    let connection_id = app_state.sse_manager.register_connection(tx);

    // Greet the new connection so the client knows it is registered
    app_state.sse_manager.send_message(SseMessage {
        event: SseEvent::Connected {
            connection_id: connection_id.as_str().to_string(),
        },
        scope: MessageScope::Connection {
            connection_id: connection_id.clone(),
        },
    });

    let guard = ConnectionGuard {
        manager: app_state.sse_manager.clone(),
        connection_id,
    };

    // The channel sends Result<Event, Infallible>, so we just pass them through
    let stream = stream! {
        let _guard = guard;
        while let Some(event) = rx.recv().await {
            yield event;
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}

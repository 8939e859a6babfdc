//! Server-sent events stream
//!
//! GET /api/events — every connected tab receives store events as they
//! happen. The stream opens with a synthetic `connected` event; history is
//! never replayed.

use std::convert::Infallible;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;

use hanmall_shared::events::StoreEvent;

use crate::state::AppState;

pub async fn subscribe(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.events.subscribe();
    tracing::debug!(
        subscribers = state.events.subscriber_count(),
        "sse client connected"
    );

    let hello = futures::stream::once(async { Ok(to_sse(&StoreEvent::connected())) });

    let live = BroadcastStream::new(rx).filter_map(|item| match item {
        Ok(event) => Some(Ok(to_sse(&event))),
        // Lagged receivers skip missed events rather than disconnecting
        Err(_) => None,
    });

    Sse::new(hello.chain(live)).keep_alive(KeepAlive::default())
}

fn to_sse(event: &StoreEvent) -> Event {
    let sse = Event::default().event(event.kind.as_str());
    match serde_json::to_string(event) {
        Ok(body) => sse.data(body),
        Err(_) => sse.data("{}"),
    }
}

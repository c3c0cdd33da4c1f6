use anyhow::Result;
use eventsource_client::{self as es, Client};
use futures_util::stream::StreamExt;
use log::*;
use serde_json::Value;
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Debug, Clone)]
pub struct Event {
    pub event_type: String,
    pub data: Value,
}

/// What the transport reports to the session owning the connection.
#[derive(Debug)]
pub enum Signal {
    Event(Event),
    /// The transport failed and is retrying with backoff.
    TransportError(String),
    /// The stream ended and will not produce anything else.
    Closed,
}

/// A product hub stream running on its own task. Reconnection is left to the
/// eventsource client.
pub struct Connection {
    label: String,
    signal_rx: mpsc::UnboundedReceiver<Signal>,
    handle: tokio::task::JoinHandle<()>,
}

impl Connection {
    pub async fn establish(base_url: &str, label: String) -> Result<Self> {
        let url = format!("{}/product_hub", base_url.trim_end_matches('/'));
        let (tx, rx) = mpsc::unbounded_channel();

        let client = es::ClientBuilder::for_url(&url)?
            .reconnect(
                es::ReconnectOptions::reconnect(true)
                    .retry_initial(true)
                    .delay(Duration::from_secs(1))
                    .backoff_factor(2)
                    .delay_max(Duration::from_secs(30))
                    .build(),
            )
            .build();

        let stream_label = label.clone();
        let handle = tokio::spawn(async move {
            let mut stream = client.stream();

            loop {
                let signal = match stream.next().await {
                    Some(Ok(es::SSE::Event(event))) => match serde_json::from_str(&event.data) {
                        Ok(data) => Signal::Event(Event {
                            event_type: event.event_type,
                            data,
                        }),
                        Err(e) => {
                            debug!(
                                "Skipping non-JSON {} event for {}: {}",
                                event.event_type, stream_label, e
                            );
                            continue;
                        }
                    },
                    Some(Ok(es::SSE::Comment(_))) => {
                        // Keep-alive
                        continue;
                    }
                    Some(Err(e)) => {
                        warn!("SSE error for {}: {}", stream_label, e);
                        Signal::TransportError(e.to_string())
                    }
                    None => {
                        debug!("SSE stream ended for {}", stream_label);
                        let _ = tx.send(Signal::Closed);
                        break;
                    }
                };

                if tx.send(signal).is_err() {
                    debug!("SSE receiver dropped for {}", stream_label);
                    break;
                }
            }
        });

        Ok(Self {
            label,
            signal_rx: rx,
            handle,
        })
    }

    /// Next signal from the transport. A dropped transport task reads as `Closed`.
    pub async fn next_signal(&mut self) -> Signal {
        self.signal_rx.recv().await.unwrap_or(Signal::Closed)
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        debug!("Closing SSE connection for {}", self.label);
        self.handle.abort();
    }
}

//! Viewer connection handler: attach, then pump frames until the socket ends.

use axum::extract::ws::{Message, WebSocket};
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use ink_common::{RelayError, Token};

use crate::protocol::Payload;
use crate::relay::Relay;

/// Drive one viewer WebSocket for its whole lifetime.
///
/// Frames queued by peer submissions are written to the socket; frames the
/// viewer sends are echoed back verbatim. When either side ends, the
/// session is closed and its token stops working.
pub async fn handle_viewer(socket: WebSocket, token: Option<String>, relay: Relay) {
    let (mut sink, mut stream) = socket.split();

    let token = match token.filter(|t| !t.is_empty()) {
        Some(t) => Token::from(t),
        None => {
            reject(&mut sink, "token is required!").await;
            return;
        }
    };

    let mut attachment = match relay.attach(&token).await {
        Ok(attachment) => attachment,
        Err(e) => {
            tracing::info!(token = %token, error = %e, "Viewer attach rejected");
            let notice = match e {
                RelayError::TokenExpired => "token is expired!".to_string(),
                other => other.to_string(),
            };
            reject(&mut sink, &notice).await;
            return;
        }
    };

    loop {
        tokio::select! {
            queued = attachment.outbound.recv() => {
                match queued {
                    Some(frame) => {
                        if let Err(e) = sink.send(Message::Text(frame.into())).await {
                            tracing::debug!(token = %token, error = %e, "Viewer write failed");
                            break;
                        }
                    }
                    // Session closed from elsewhere (evicted).
                    None => break,
                }
            }

            frame = stream.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        tracing::debug!(token = %token, len = text.as_str().len(), "Echoing viewer frame");
                        if sink.send(Message::Text(text)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Binary(data))) => {
                        if sink.send(Message::Binary(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::debug!(token = %token, error = %e, "Viewer socket error");
                        break;
                    }
                    // Pings are answered by the WebSocket layer.
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    relay.close(&token).await;
    tracing::info!(token = %token, "Viewer disconnected");
}

/// Tell the client why it was turned away, then close.
async fn reject(sink: &mut SplitSink<WebSocket, Message>, notice: &str) {
    let frame = Payload::message(notice).encode();
    let _ = sink.send(Message::Text(frame.into())).await;
    let _ = sink.close().await;
}

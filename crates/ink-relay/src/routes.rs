//! HTTP handlers. Each one converts relay results into a response; nothing
//! here can take the listener down.

use axum::body::Bytes;
use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{OriginalUri, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use ink_common::{RelayError, Token};
use serde::Deserialize;

use crate::connection::handle_viewer;
use crate::pages;
use crate::protocol::Payload;
use crate::qr;
use crate::server::AppState;

/// Side length requested for pairing QR images.
const QR_SIZE: u32 = 256;

#[derive(Debug, Deserialize)]
pub struct IndexQuery {
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TokenQuery {
    pub token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct QrQuery {
    pub token: Option<String>,
    pub scheme: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Map a relay failure to a status code and a short body.
pub(crate) fn relay_error_response(err: &RelayError) -> Response {
    let status = match err {
        RelayError::TokenExpired => StatusCode::NOT_FOUND,
        RelayError::NotAttached | RelayError::AlreadyAttached => StatusCode::CONFLICT,
        RelayError::DeliveryFailed(_) => StatusCode::SERVICE_UNAVAILABLE,
        RelayError::Fatal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, err.to_string()).into_response()
}

/// `GET /index?id=<owner>`: issue a token and serve the pairing page.
pub async fn index(State(state): State<AppState>, Query(query): Query<IndexQuery>) -> Response {
    let Some(owner_id) = non_empty(query.id) else {
        return (StatusCode::BAD_REQUEST, "'id' is required!").into_response();
    };

    match state.relay.create(&owner_id).await {
        Ok(token) => Html(pages::pairing_page(&token)).into_response(),
        Err(e) => {
            tracing::error!(owner = %owner_id, error = %e, "Failed to create session");
            relay_error_response(&e)
        }
    }
}

/// `GET /qrcode?token=&scheme=`: PNG pointing the peer at the ink page.
pub async fn qrcode(
    State(state): State<AppState>,
    Query(query): Query<QrQuery>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
) -> Response {
    let Some(token) = non_empty(query.token) else {
        return StatusCode::BAD_REQUEST.into_response();
    };

    let scheme = non_empty(query.scheme).unwrap_or_else(|| state.public_scheme.to_string());
    if scheme != "http" && scheme != "https" {
        return (StatusCode::BAD_REQUEST, "'scheme' must be http or https").into_response();
    }

    let host = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost");
    let prefix = uri.path().replacen("/qrcode", "", 1);
    let uri = qr::pairing_uri(&scheme, host, &prefix, &token);

    match qr::render_png(&uri, QR_SIZE) {
        Ok(png) => ([(header::CONTENT_TYPE, "image/png")], png).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "QR render failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// `GET /watch?token=`: viewer WebSocket.
///
/// The upgrade always succeeds so that token problems can be reported as
/// envelopes on the socket itself.
pub async fn watch(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(query): Query<TokenQuery>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_viewer(socket, query.token, state.relay))
}

/// `GET /ink?token=`: peer drawing page. Also tells the viewer the peer arrived.
pub async fn ink(State(state): State<AppState>, Query(query): Query<TokenQuery>) -> Response {
    let Some(token) = non_empty(query.token) else {
        return (StatusCode::BAD_REQUEST, "'token' is required!").into_response();
    };
    let token = Token::from(token);

    match state
        .relay
        .submit(&token, Payload::message("Please draw on mobile."))
        .await
    {
        Ok(()) => {}
        Err(e @ RelayError::TokenExpired) => return relay_error_response(&e),
        Err(e) => {
            // The page is still useful; the viewer may attach later.
            tracing::warn!(token = %token, error = %e, "Could not notify viewer");
        }
    }

    Html(pages::ink_page()).into_response()
}

/// `POST /ink-submit?token=`: relay the request body to the viewer as an image.
pub async fn ink_submit(
    State(state): State<AppState>,
    Query(query): Query<TokenQuery>,
    body: Bytes,
) -> Response {
    let Some(token) = non_empty(query.token) else {
        return (StatusCode::BAD_REQUEST, "'token' is required!").into_response();
    };
    let token = Token::from(token);

    match state
        .relay
        .submit(&token, Payload::Image(body.to_vec()))
        .await
    {
        Ok(()) => (StatusCode::OK, "ok").into_response(),
        Err(e) => relay_error_response(&e),
    }
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let sessions = state.relay.session_count().await;
    Json(serde_json::json!({ "status": "ok", "sessions": sessions }))
}

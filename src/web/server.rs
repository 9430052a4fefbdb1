//! TCP listener serving the JSON API.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info, warn};
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use uuid::Uuid;

use super::http::{read_request, Request, Response};
use super::routes::{handle, AppState};
use crate::constants::{READ_TIMEOUT_SECS, SESSION_COOKIE};

/// Accept connections forever, one task per connection.
pub async fn start_web_server(addr: SocketAddr, state: Arc<AppState>) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                let state = Arc::clone(&state);
                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, peer, state).await {
                        warn!("Connection error from {peer}: {e}");
                    }
                });
            }
            Err(e) => {
                error!("Accept error: {e}");
            }
        }
    }
}

async fn handle_connection(
    mut stream: TcpStream,
    peer: SocketAddr,
    state: Arc<AppState>,
) -> std::io::Result<()> {
    let read = timeout(
        Duration::from_secs(READ_TIMEOUT_SECS),
        read_request(&mut stream),
    )
    .await;

    let response = match read {
        Err(_) => {
            warn!("Read timeout from {peer}");
            Response::error(408, "Request timeout")
        }
        Ok(Err(e)) => {
            debug!("Bad request from {peer}: {e}");
            Response::error(e.status(), &e.to_string())
        }
        Ok(Ok(request)) => {
            let response = dispatch(&state, &request);
            info!(
                "{peer} {} {} -> {}",
                request.method, request.path, response.status
            );
            response
        }
    };

    stream.write_all(&response.to_bytes()).await?;
    stream.shutdown().await
}

/// Resolve the player's session id, route the request, and issue a cookie
/// to first-time visitors.
pub fn dispatch(state: &AppState, request: &Request) -> Response {
    let known = request
        .cookie(SESSION_COOKIE)
        .filter(|sid| Uuid::parse_str(sid).is_ok())
        .map(str::to_string);
    let (player, issued) = match known {
        Some(sid) => (sid, false),
        None => (Uuid::new_v4().to_string(), true),
    };

    let response = handle(state, request, &player, &mut rand::thread_rng());
    if issued {
        response.with_header(
            "Set-Cookie",
            format!("{SESSION_COOKIE}={player}; Path=/; HttpOnly; SameSite=Lax"),
        )
    } else {
        response
    }
}

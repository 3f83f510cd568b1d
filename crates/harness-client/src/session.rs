//! Session acquisition
//!
//! Logging in takes two steps: the realtime endpoint pushes a one-time
//! session identifier over a WebSocket, then `POST /api/auth/login` exchanges
//! credentials plus that identifier for an access token. The socket stays
//! open for the lifetime of the [`SessionContext`].

use std::fmt;
use std::time::Duration;

use futures_util::{Stream, StreamExt};
use harness_common::Endpoints;
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::time::{timeout_at, Instant};
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, trace, warn};

use crate::dto::LoginResponse;
use crate::error::{ClientError, ClientResult};
use crate::request::RequestHelper;

/// WebSocket connection to the realtime endpoint
pub type RealtimeSocket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Credentials and open socket for one scenario call
pub struct SessionContext {
    pub access_token: String,
    pub session: String,
    /// Every `Set-Cookie` value of the login response joined with `"; "`
    pub cookie: Option<String>,
    pub login: LoginResponse,
    socket: RealtimeSocket,
}

impl SessionContext {
    /// Value of a cookie set at login, e.g. `access_token`
    #[must_use]
    pub fn cookie_value(&self, name: &str) -> Option<&str> {
        self.cookie.as_deref()?.split(';').find_map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            (key == name).then_some(value)
        })
    }

    /// Close the realtime socket. Failures are logged, never returned.
    pub async fn close(mut self) {
        close_quietly(&mut self.socket, &self.session).await;
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("session", &self.session)
            .field("cookie", &self.cookie.is_some())
            .finish_non_exhaustive()
    }
}

/// Opens realtime sessions and logs in
#[derive(Debug, Clone)]
pub struct SessionAcquirer {
    endpoints: Endpoints,
    requests: RequestHelper,
    timeout: Duration,
}

impl SessionAcquirer {
    /// `timeout` bounds the WebSocket connect plus the wait for the session frame
    #[must_use]
    pub fn new(endpoints: Endpoints, requests: RequestHelper, timeout: Duration) -> Self {
        Self {
            endpoints,
            requests,
            timeout,
        }
    }

    /// Obtain a session identifier over the realtime channel and log in with it
    pub async fn acquire(&self, email: &str, password: &str) -> ClientResult<SessionContext> {
        let deadline = Instant::now() + self.timeout;

        let (mut socket, _) = timeout_at(deadline, connect_async(self.endpoints.ws_url.as_str()))
            .await
            .map_err(|_| ClientError::SessionTimeout(self.timeout))??;

        debug!(email, "Connected to the realtime endpoint");

        let session = match timeout_at(deadline, wait_for_session(&mut socket)).await {
            Ok(Ok(session)) => session,
            Ok(Err(e)) => {
                close_quietly(&mut socket, "").await;
                return Err(e);
            }
            Err(_) => {
                close_quietly(&mut socket, "").await;
                return Err(ClientError::SessionTimeout(self.timeout));
            }
        };

        debug!(email, session = %session, "Session identifier received");

        let login = self
            .requests
            .login(&self.endpoints.login_url(), email, password, &session)
            .await
            .and_then(|(login, cookie)| {
                let token = login.token()?.to_string();
                Ok((login, cookie, token))
            });

        match login {
            Ok((login, cookie, access_token)) => {
                info!(email, session = %session, "Logged in");
                Ok(SessionContext {
                    access_token,
                    session,
                    cookie,
                    login,
                    socket,
                })
            }
            Err(e) => {
                warn!(email, error = %e, "Login failed, closing realtime socket");
                close_quietly(&mut socket, &session).await;
                Err(e)
            }
        }
    }
}

/// Wait for the first text or binary frame carrying a `session` field
///
/// Frames that are valid JSON without a session are skipped; a payload that
/// is not JSON at all is an error.
pub(crate) async fn wait_for_session<S>(socket: &mut S) -> ClientResult<String>
where
    S: Stream<Item = Result<Message, tungstenite::Error>> + Unpin,
{
    while let Some(frame) = socket.next().await {
        let payload = match frame? {
            Message::Text(text) => text.into_bytes(),
            Message::Binary(bytes) => bytes,
            Message::Close(_) => return Err(ClientError::SocketClosed),
            _ => continue,
        };

        if let Some(session) = session_of(&payload)? {
            return Ok(session);
        }
    }

    Err(ClientError::SocketClosed)
}

fn session_of(payload: &[u8]) -> ClientResult<Option<String>> {
    let frame: Value = serde_json::from_slice(payload).map_err(ClientError::MalformedFrame)?;
    match frame.get("session").and_then(Value::as_str) {
        Some(session) if !session.is_empty() => Ok(Some(session.to_string())),
        _ => {
            trace!(%frame, "Skipping realtime frame without session");
            Ok(None)
        }
    }
}

async fn close_quietly(socket: &mut RealtimeSocket, session: &str) {
    match socket.close(None).await {
        Ok(()) => debug!(session, "Realtime socket closed"),
        Err(e) => debug!(session, error = %e, "Realtime socket already closed"),
    }
}

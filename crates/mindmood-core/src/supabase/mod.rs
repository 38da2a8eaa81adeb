//! Client for the hosted backend (auth service + data API).
//!
//! One `SupabaseClient` is built per process from an explicit
//! [`SupabaseConfig`]. Clones share the HTTP pool and the session slot.

mod auth;
mod error;
mod postgrest;
mod session;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

pub use auth::{AuthMode, AuthOutcome, SignUpOutcome};
pub use error::{AuthError, ClientError};
pub use postgrest::TableQuery;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
pub use session::{EXPIRY_MARGIN_SECS, Session, SessionStore, User, mask_token};
use tokio::sync::RwLock;
use url::Url;

use crate::schema::Table;

/// Behavior switches for the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    /// Refresh an expired session transparently when it is read.
    pub auto_refresh_token: bool,
    /// Keep the session on disk between runs.
    pub persist_session: bool,
    /// Allow building a session from an auth redirect URL.
    pub detect_session_in_url: bool,
    /// Where the session is persisted. Ignored unless `persist_session`.
    pub session_path: Option<PathBuf>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            auto_refresh_token: true,
            persist_session: true,
            detect_session_in_url: false,
            session_path: None,
        }
    }
}

/// Everything needed to construct a client.
#[derive(Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
    pub options: ClientOptions,
}

impl fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("url", &self.url)
            .field("anon_key", &mask_token(&self.anon_key))
            .field("options", &self.options)
            .finish()
    }
}

/// Handle to the backend.
#[derive(Clone)]
pub struct SupabaseClient {
    inner: Arc<Inner>,
}

struct Inner {
    http: reqwest::Client,
    base_url: Url,
    anon_key: String,
    options: ClientOptions,
    store: Option<SessionStore>,
    session: RwLock<SessionSlot>,
}

/// In-memory session, plus whether the on-disk store was consulted yet.
#[derive(Default)]
struct SessionSlot {
    session: Option<Session>,
    loaded: bool,
}

impl fmt::Debug for SupabaseClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupabaseClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("options", &self.inner.options)
            .finish_non_exhaustive()
    }
}

impl SupabaseClient {
    /// Builds a client.
    ///
    /// # Errors
    /// Fails when the URL or anon key is blank, or the URL does not parse.
    pub fn new(config: &SupabaseConfig) -> Result<Self, ClientError> {
        let url = config.url.trim();
        if url.is_empty() {
            return Err(ClientError::MissingSetting("SUPABASE_URL"));
        }
        let anon_key = config.anon_key.trim();
        if anon_key.is_empty() {
            return Err(ClientError::MissingSetting("SUPABASE_ANON_KEY"));
        }

        let base_url = parse_base_url(url)?;

        let http = reqwest::Client::builder()
            .user_agent(concat!("mindmood/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let store = if config.options.persist_session {
            config.options.session_path.clone().map(SessionStore::new)
        } else {
            None
        };

        tracing::debug!(
            base_url = %base_url,
            persist = store.is_some(),
            auto_refresh = config.options.auto_refresh_token,
            "backend client configured"
        );

        Ok(Self {
            inner: Arc::new(Inner {
                http,
                base_url,
                anon_key: anon_key.to_string(),
                options: config.options.clone(),
                store,
                session: RwLock::new(SessionSlot::default()),
            }),
        })
    }

    pub fn options(&self) -> &ClientOptions {
        &self.inner.options
    }

    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Starts a typed query against a declared table.
    pub fn from<T: Table>(&self) -> TableQuery<'_, T> {
        TableQuery::new(self)
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.inner
            .base_url
            .join(path)
            .map_err(|source| ClientError::InvalidUrl {
                url: format!("{}{path}", self.inner.base_url),
                source,
            })
    }

    /// Request with the public key attached and the given bearer token.
    fn request(&self, method: reqwest::Method, url: Url, bearer: &str) -> RequestBuilder {
        self.inner
            .http
            .request(method, url)
            .header("apikey", &self.inner.anon_key)
            .bearer_auth(bearer)
    }

    fn anon_request(&self, method: reqwest::Method, url: Url) -> RequestBuilder {
        self.request(method, url, &self.inner.anon_key)
    }

    /// Bearer for data requests: the session's access token, else the anon key.
    async fn bearer_token(&self) -> Result<String, ClientError> {
        Ok(self
            .current_session()
            .await?
            .map_or_else(|| self.inner.anon_key.clone(), |s| s.access_token))
    }

    async fn set_session(&self, session: Session) -> Result<(), ClientError> {
        if let Some(store) = &self.inner.store {
            store.save(&session)?;
        }
        let mut slot = self.inner.session.write().await;
        slot.session = Some(session);
        slot.loaded = true;
        Ok(())
    }

    async fn clear_session(&self) -> Result<(), ClientError> {
        {
            let mut slot = self.inner.session.write().await;
            slot.session = None;
            slot.loaded = true;
        }
        if let Some(store) = &self.inner.store {
            store.clear()?;
        }
        Ok(())
    }

    /// Returns the in-memory session, reading the store on first use.
    ///
    /// An unreadable store is discarded and reported as signed out.
    async fn stored_session(&self) -> Option<Session> {
        {
            let slot = self.inner.session.read().await;
            if slot.loaded {
                return slot.session.clone();
            }
        }

        let mut slot = self.inner.session.write().await;
        if !slot.loaded {
            slot.session = self.inner.store.as_ref().and_then(load_or_discard);
            slot.loaded = true;
        }
        slot.session.clone()
    }
}

fn load_or_discard(store: &SessionStore) -> Option<Session> {
    match store.load() {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!(error = %e, "discarding unreadable saved session");
            if let Err(clear_err) = store.clear() {
                tracing::warn!(error = %clear_err, "failed to remove unreadable session");
            }
            None
        }
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ClientError> {
    let mut url = Url::parse(raw).map_err(|source| ClientError::InvalidUrl {
        url: raw.to_string(),
        source,
    })?;
    if url.cannot_be_a_base() {
        return Err(ClientError::InvalidUrl {
            url: raw.to_string(),
            source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
        });
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Sends a request and decodes a JSON body.
async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ClientError> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ClientError::from_response(status, &body));
    }
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
}

/// Sends a request whose success body is ignored.
async fn send_empty(request: RequestBuilder) -> Result<(), ClientError> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ClientError::from_response(status, &body));
    }
    Ok(())
}

//! Auth service calls: password sign-in, registration, refresh, sign-out,
//! password recovery and redirect-URL sessions.

use std::collections::HashMap;

use chrono::Utc;
use reqwest::Method;
use serde::Deserialize;
use serde_json::{Value, json};
use url::Url;

use super::{ClientError, Session, SupabaseClient, User, send_empty, send_json};

/// Which credential flow the form is in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthMode {
    #[default]
    SignIn,
    SignUp,
}

impl AuthMode {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::SignIn => Self::SignUp,
            Self::SignUp => Self::SignIn,
        }
    }
}

/// Result of a registration request.
#[derive(Debug, Clone, PartialEq)]
pub enum SignUpOutcome {
    /// The account is active and signed in.
    Session(Session),
    /// The account exists but must be confirmed by email before sign-in.
    ConfirmationRequired { email: String },
}

/// Result of the form's authenticate-or-register hand-off.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthOutcome {
    SignedIn(Session),
    ConfirmationRequired { email: String },
}

impl AuthOutcome {
    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::SignedIn(session) => Some(session),
            Self::ConfirmationRequired { .. } => None,
        }
    }
}

impl SupabaseClient {
    /// Signs in with email and password and stores the session.
    ///
    /// # Errors
    /// Returns an error if the credentials are refused or the request fails.
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, ClientError> {
        let url = self.endpoint("auth/v1/token")?;
        let request = self
            .anon_request(Method::POST, url)
            .query(&[("grant_type", "password")])
            .json(&json!({ "email": email, "password": password }));

        let session: Session = send_json(request).await?;
        let session = session.stamped(Utc::now());
        self.set_session(session.clone()).await?;

        tracing::info!(user_id = %session.user.id, "signed in");
        Ok(session)
    }

    /// Registers a new account.
    ///
    /// When the project requires email confirmation the service answers with
    /// the bare user and no tokens; that is reported as `ConfirmationRequired`.
    ///
    /// # Errors
    /// Returns an error if registration is refused or the request fails.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, ClientError> {
        let url = self.endpoint("auth/v1/signup")?;
        let request = self
            .anon_request(Method::POST, url)
            .json(&json!({ "email": email, "password": password }));

        let body: Value = send_json(request).await?;

        if body.get("access_token").is_some() {
            let session: Session =
                serde_json::from_value(body).map_err(|e| ClientError::Decode(e.to_string()))?;
            let session = session.stamped(Utc::now());
            self.set_session(session.clone()).await?;
            tracing::info!(user_id = %session.user.id, "registered and signed in");
            return Ok(SignUpOutcome::Session(session));
        }

        let email = body
            .get("email")
            .and_then(Value::as_str)
            .unwrap_or(email)
            .to_string();
        tracing::info!("registered, email confirmation pending");
        Ok(SignUpOutcome::ConfirmationRequired { email })
    }

    /// Signs in or registers depending on `mode`.
    ///
    /// # Errors
    /// Propagates the underlying sign-in or sign-up error.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
        mode: AuthMode,
    ) -> Result<AuthOutcome, ClientError> {
        match mode {
            AuthMode::SignIn => self
                .sign_in_with_password(email, password)
                .await
                .map(AuthOutcome::SignedIn),
            AuthMode::SignUp => Ok(match self.sign_up(email, password).await? {
                SignUpOutcome::Session(session) => AuthOutcome::SignedIn(session),
                SignUpOutcome::ConfirmationRequired { email } => {
                    AuthOutcome::ConfirmationRequired { email }
                }
            }),
        }
    }

    /// Revokes the session server-side and forgets it locally.
    ///
    /// A rejected revoke (token already invalid) still clears the local
    /// session. Transport and server failures leave it in place.
    ///
    /// Returns whether there was a session to sign out of.
    ///
    /// # Errors
    /// Returns an error if the service is unreachable or the store fails.
    pub async fn sign_out(&self) -> Result<bool, ClientError> {
        let Some(session) = self.stored_session().await else {
            self.clear_session().await?;
            return Ok(false);
        };

        let url = self.endpoint("auth/v1/logout")?;
        let request = self.request(Method::POST, url, &session.access_token);
        match send_empty(request).await {
            Ok(()) => {}
            Err(e) if e.is_rejection() => {
                tracing::debug!(error = %e, "server refused logout; clearing local session");
            }
            Err(e) => return Err(e),
        }

        self.clear_session().await?;
        tracing::info!(user_id = %session.user.id, "signed out");
        Ok(true)
    }

    /// Returns the current session, refreshing it first if it has expired
    /// and auto-refresh is on. An expired session is reported as `None`
    /// when auto-refresh is off.
    ///
    /// # Errors
    /// Returns an error if a refresh fails for reasons other than a
    /// rejected refresh token.
    pub async fn current_session(&self) -> Result<Option<Session>, ClientError> {
        let Some(session) = self.stored_session().await else {
            return Ok(None);
        };
        if !session.is_expired() {
            return Ok(Some(session));
        }
        if !self.inner.options.auto_refresh_token {
            tracing::debug!("session expired and auto-refresh is off");
            return Ok(None);
        }

        match self.refresh_with(&session.refresh_token).await {
            Ok(session) => Ok(Some(session)),
            Err(e) if e.is_rejection() => {
                tracing::warn!(error = %e, "session refresh rejected; signed out");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Exchanges the stored refresh token for a new session.
    ///
    /// # Errors
    /// Returns `NoSession` when nothing is stored, or the refresh error.
    pub async fn refresh_session(&self) -> Result<Session, ClientError> {
        let session = self.stored_session().await.ok_or(ClientError::NoSession)?;
        self.refresh_with(&session.refresh_token).await
    }

    async fn refresh_with(&self, refresh_token: &str) -> Result<Session, ClientError> {
        let url = self.endpoint("auth/v1/token")?;
        let request = self
            .anon_request(Method::POST, url)
            .query(&[("grant_type", "refresh_token")])
            .json(&json!({ "refresh_token": refresh_token }));

        match send_json::<Session>(request).await {
            Ok(session) => {
                let session = session.stamped(Utc::now());
                self.set_session(session.clone()).await?;
                tracing::debug!(user_id = %session.user.id, "session refreshed");
                Ok(session)
            }
            Err(e) => {
                if e.is_rejection() {
                    if let Err(clear_err) = self.clear_session().await {
                        tracing::warn!(error = %clear_err, "failed to clear rejected session");
                    }
                }
                Err(e)
            }
        }
    }

    /// Fetches the signed-in user from the service.
    ///
    /// # Errors
    /// Returns `NoSession` when signed out, or the request error.
    pub async fn user(&self) -> Result<User, ClientError> {
        let session = self.current_session().await?.ok_or(ClientError::NoSession)?;
        self.fetch_user(&session.access_token).await
    }

    async fn fetch_user(&self, access_token: &str) -> Result<User, ClientError> {
        let url = self.endpoint("auth/v1/user")?;
        send_json(self.request(Method::GET, url, access_token)).await
    }

    /// Asks the service to email a password recovery link.
    ///
    /// # Errors
    /// Returns an error if the request is refused or fails.
    pub async fn reset_password_for_email(&self, email: &str) -> Result<(), ClientError> {
        let url = self.endpoint("auth/v1/recover")?;
        let request = self
            .anon_request(Method::POST, url)
            .json(&json!({ "email": email }));
        send_empty(request).await?;
        tracing::info!("password recovery requested");
        Ok(())
    }

    /// Builds and stores a session from an auth redirect URL
    /// (`...#access_token=...&refresh_token=...`).
    ///
    /// # Errors
    /// Returns `UrlSessionDetectionDisabled` unless enabled in the options,
    /// `Api` when the redirect carries an auth error, and `Decode` when it
    /// carries no tokens.
    pub async fn session_from_url(&self, redirect: &str) -> Result<Session, ClientError> {
        if !self.inner.options.detect_session_in_url {
            return Err(ClientError::UrlSessionDetectionDisabled);
        }

        let params = redirect_params(redirect)?;

        if let Some(message) = params
            .get("error_description")
            .or_else(|| params.get("error"))
        {
            return Err(ClientError::Api {
                status: 403,
                message: message.clone(),
            });
        }

        let fragment: RedirectTokens = serde_json::to_value(&params)
            .and_then(serde_json::from_value)
            .map_err(|e| ClientError::Decode(format!("redirect URL carries no session: {e}")))?;

        let user = self.fetch_user(&fragment.access_token).await?;
        let session = Session {
            access_token: fragment.access_token,
            token_type: fragment.token_type.unwrap_or_else(|| "bearer".to_string()),
            refresh_token: fragment.refresh_token,
            expires_in: parse_or(fragment.expires_in.as_deref(), 3600),
            expires_at: fragment.expires_at.as_deref().and_then(|v| v.parse().ok()),
            user,
        }
        .stamped(Utc::now());

        self.set_session(session.clone()).await?;
        tracing::info!(user_id = %session.user.id, "session restored from redirect");
        Ok(session)
    }
}

#[derive(Debug, Deserialize)]
struct RedirectTokens {
    access_token: String,
    refresh_token: String,
    token_type: Option<String>,
    expires_in: Option<String>,
    expires_at: Option<String>,
}

/// Collects query and fragment parameters; fragment values win.
fn redirect_params(redirect: &str) -> Result<HashMap<String, String>, ClientError> {
    let url = Url::parse(redirect).map_err(|source| ClientError::InvalidUrl {
        url: redirect.to_string(),
        source,
    })?;

    let mut params: HashMap<String, String> = url.query_pairs().into_owned().collect();
    if let Some(fragment) = url.fragment() {
        params.extend(url::form_urlencoded::parse(fragment.as_bytes()).into_owned());
    }
    Ok(params)
}

fn parse_or(value: Option<&str>, default: i64) -> i64 {
    value.and_then(|v| v.parse().ok()).unwrap_or(default)
}

//! Typed queries against the data API (`/rest/v1/<table>`).

use std::fmt::Display;
use std::marker::PhantomData;

use reqwest::{Method, RequestBuilder};

use super::{ClientError, SupabaseClient, send_empty, send_json};
use crate::schema::Table;

/// Builder for a single request against table `T`.
///
/// Filters compose with AND. `update` and `delete` refuse to run without
/// at least one filter.
#[derive(Debug)]
pub struct TableQuery<'a, T: Table> {
    client: &'a SupabaseClient,
    filters: Vec<(String, String)>,
    order: Option<String>,
    limit: Option<usize>,
    table: PhantomData<T>,
}

impl<'a, T: Table> TableQuery<'a, T> {
    pub(super) fn new(client: &'a SupabaseClient) -> Self {
        Self {
            client,
            filters: Vec::new(),
            order: None,
            limit: None,
            table: PhantomData,
        }
    }

    /// Keeps rows where `column` equals `value`.
    #[must_use]
    pub fn eq(mut self, column: &str, value: impl Display) -> Self {
        self.filters.push((column.to_string(), format!("eq.{value}")));
        self
    }

    #[must_use]
    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        let direction = if ascending { "asc" } else { "desc" };
        self.order = Some(format!("{column}.{direction}"));
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Fetches matching rows.
    ///
    /// # Errors
    /// Returns an error if the request fails or rows do not decode.
    pub async fn select(self) -> Result<Vec<T::Row>, ClientError> {
        let mut request = self.request(Method::GET).await?.query(&[("select", "*")]);
        if let Some(order) = &self.order {
            request = request.query(&[("order", order)]);
        }
        if let Some(limit) = self.limit {
            request = request.query(&[("limit", limit)]);
        }
        send_json(request).await
    }

    /// Inserts one row and returns it as stored.
    ///
    /// # Errors
    /// Returns an error if the insert is refused or returns nothing.
    pub async fn insert(self, row: &T::Insert) -> Result<T::Row, ClientError> {
        let request = self
            .request(Method::POST)
            .await?
            .header("Prefer", "return=representation")
            .json(&[row]);
        let mut rows: Vec<T::Row> = send_json(request).await?;
        if rows.is_empty() {
            return Err(ClientError::Decode(format!(
                "insert into {} returned no rows",
                T::NAME
            )));
        }
        Ok(rows.swap_remove(0))
    }

    /// Applies a partial update to matching rows and returns them.
    ///
    /// # Errors
    /// Returns `UnfilteredWrite` without filters, or the request error.
    pub async fn update(self, patch: &T::Update) -> Result<Vec<T::Row>, ClientError> {
        if self.filters.is_empty() {
            return Err(ClientError::UnfilteredWrite("update"));
        }
        let request = self
            .request(Method::PATCH)
            .await?
            .header("Prefer", "return=representation")
            .json(patch);
        send_json(request).await
    }

    /// Deletes matching rows.
    ///
    /// # Errors
    /// Returns `UnfilteredWrite` without filters, or the request error.
    pub async fn delete(self) -> Result<(), ClientError> {
        if self.filters.is_empty() {
            return Err(ClientError::UnfilteredWrite("delete"));
        }
        send_empty(self.request(Method::DELETE).await?).await
    }

    async fn request(&self, method: Method) -> Result<RequestBuilder, ClientError> {
        let url = self.client.endpoint(&format!("rest/v1/{}", T::NAME))?;
        let bearer = self.client.bearer_token().await?;
        tracing::debug!(
            table = T::NAME,
            method = method.as_str(),
            filters = self.filters.len(),
            "data request"
        );
        Ok(self
            .client
            .request(method, url, &bearer)
            .query(&self.filters))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};
    use serde_json::json;
    use tempfile::TempDir;
    use uuid::Uuid;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::schema::{MoodEntries, MoodEntryInsert, MoodEntryUpdate, UserProfiles};
    use crate::supabase::{ClientOptions, Session, SessionStore, SupabaseConfig};

    const ANON: &str = "anon-key";

    fn client(server: &MockServer, home: &TempDir) -> SupabaseClient {
        SupabaseClient::new(&SupabaseConfig {
            url: server.uri(),
            anon_key: ANON.to_string(),
            options: ClientOptions {
                session_path: Some(home.path().join("session.json")),
                ..ClientOptions::default()
            },
        })
        .unwrap()
    }

    fn signed_in(home: &TempDir, user: Uuid) {
        let session: Session = serde_json::from_value(json!({
            "access_token": "user-token",
            "refresh_token": "r",
            "expires_in": 3600,
            "user": { "id": user }
        }))
        .unwrap();
        SessionStore::new(home.path().join("session.json"))
            .save(&session.stamped(Utc::now()))
            .unwrap();
    }

    fn mood_row(id: Uuid, user: Uuid, mood: i32) -> serde_json::Value {
        json!({
            "id": id,
            "user_id": user,
            "mood_value": mood,
            "energy_value": 3,
            "notes": null,
            "date": "2024-06-01",
            "created_at": "2024-06-01T08:00:00+00:00",
            "updated_at": null
        })
    }

    #[tokio::test]
    async fn test_select_applies_filters_and_uses_anon_key_when_signed_out() {
        let server = MockServer::start().await;
        let home = TempDir::new().unwrap();
        let user = Uuid::new_v4();

        Mock::given(method("GET"))
            .and(path("/rest/v1/mood_entries"))
            .and(query_param("select", "*"))
            .and(query_param("user_id", format!("eq.{user}")))
            .and(query_param("order", "date.desc"))
            .and(query_param("limit", "7"))
            .and(header("apikey", ANON))
            .and(header("authorization", "Bearer anon-key"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([mood_row(Uuid::new_v4(), user, 4)])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let rows = client(&server, &home)
            .from::<MoodEntries>()
            .eq("user_id", user)
            .order("date", false)
            .limit(7)
            .select()
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].mood_value, 4);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    }

    #[tokio::test]
    async fn test_insert_sends_session_token_and_returns_row() {
        let server = MockServer::start().await;
        let home = TempDir::new().unwrap();
        let user = Uuid::new_v4();
        let id = Uuid::new_v4();
        signed_in(&home, user);

        Mock::given(method("POST"))
            .and(path("/rest/v1/mood_entries"))
            .and(header("authorization", "Bearer user-token"))
            .and(header("prefer", "return=representation"))
            .and(body_json(json!([{
                "user_id": user,
                "mood_value": 5,
                "energy_value": 4
            }])))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!([mood_row(id, user, 5)])))
            .expect(1)
            .mount(&server)
            .await;

        let row = client(&server, &home)
            .from::<MoodEntries>()
            .insert(&MoodEntryInsert::new(user, 5, 4))
            .await
            .unwrap();

        assert_eq!(row.id, id);
    }

    #[tokio::test]
    async fn test_update_sends_only_set_fields() {
        let server = MockServer::start().await;
        let home = TempDir::new().unwrap();
        let user = Uuid::new_v4();
        let id = Uuid::new_v4();

        Mock::given(method("PATCH"))
            .and(path("/rest/v1/mood_entries"))
            .and(query_param("id", format!("eq.{id}")))
            .and(body_json(json!({"mood_value": 2, "notes": null})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([mood_row(id, user, 2)])))
            .expect(1)
            .mount(&server)
            .await;

        let patch = MoodEntryUpdate {
            mood_value: Some(2),
            notes: Some(None),
            ..Default::default()
        };
        let rows = client(&server, &home)
            .from::<MoodEntries>()
            .eq("id", id)
            .update(&patch)
            .await
            .unwrap();

        assert_eq!(rows[0].mood_value, 2);
    }

    #[tokio::test]
    async fn test_unfiltered_writes_are_refused() {
        let server = MockServer::start().await;
        let home = TempDir::new().unwrap();
        let client = client(&server, &home);

        let err = client.from::<UserProfiles>().delete().await.unwrap_err();
        assert!(matches!(err, ClientError::UnfilteredWrite("delete")));

        let err = client
            .from::<MoodEntries>()
            .update(&MoodEntryUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::UnfilteredWrite("update")));

        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_data_api_error_message_is_surfaced() {
        let server = MockServer::start().await;
        let home = TempDir::new().unwrap();

        Mock::given(method("DELETE"))
            .and(path("/rest/v1/user_profiles"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "code": "42501",
                "message": "permission denied for table user_profiles"
            })))
            .mount(&server)
            .await;

        let err = client(&server, &home)
            .from::<UserProfiles>()
            .eq("id", Uuid::nil())
            .delete()
            .await
            .unwrap_err();

        match err {
            ClientError::Api { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "permission denied for table user_profiles");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}

use crate::config::{BackendSettings, TableSettings};
use crate::models::{BlockRecord, Message, Profile, Report, SwipeAction, SwipeRecord};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with the managed backend
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: invalid service key")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// REST client for the managed backend
///
/// Talks to the backend's PostgREST interface for:
/// - Fetching profiles and candidate pools
/// - Reading and recording swipes
/// - Blocks and reports
/// - Mutual matches and messages
pub struct BackendClient {
    base_url: String,
    service_key: String,
    client: Client,
    tables: TableSettings,
}

impl BackendClient {
    /// Create a new backend client
    pub fn new(
        base_url: String,
        service_key: String,
        tables: TableSettings,
        timeout: Duration,
    ) -> Result<Self, BackendError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            service_key,
            client,
            tables,
        })
    }

    pub fn from_settings(
        settings: &BackendSettings,
        tables: TableSettings,
    ) -> Result<Self, BackendError> {
        Self::new(
            settings.url.clone(),
            settings.service_key.clone(),
            tables,
            Duration::from_secs(settings.timeout_secs.unwrap_or(30)),
        )
    }

    /// Build a table URL with PostgREST filters
    ///
    /// Filter values are percent-encoded; keys are used as given.
    fn table_url(&self, table: &str, filters: &[(&str, String)]) -> String {
        let mut url = format!("{}/rest/v1/{}", self.base_url.trim_end_matches('/'), table);

        if !filters.is_empty() {
            let query = filters
                .iter()
                .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
                .collect::<Vec<_>>()
                .join("&");
            url.push('?');
            url.push_str(&query);
        }

        url
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.service_key)
            .header("Authorization", format!("Bearer {}", self.service_key))
    }

    /// Map non-success statuses to errors
    async fn check(response: Response, context: &str) -> Result<Response, BackendError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(BackendError::Unauthorized);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read body".to_string());
        tracing::error!("{} failed: {} - {}", context, status, body);

        Err(BackendError::ApiError(format!("{}: {}", context, status)))
    }

    async fn get_rows<T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[(&str, String)],
        context: &str,
    ) -> Result<Vec<T>, BackendError> {
        let url = self.table_url(table, filters);
        tracing::debug!("GET {}", url);

        let response = self.authorized(self.client.get(&url)).send().await?;
        let response = Self::check(response, context).await?;

        response
            .json::<Vec<T>>()
            .await
            .map_err(|e| BackendError::InvalidResponse(format!("{}: {}", context, e)))
    }

    /// Check that the backend answers
    pub async fn health_check(&self) -> Result<bool, BackendError> {
        let url = self.table_url(
            &self.tables.profiles,
            &[("select", "id".to_string()), ("limit", "1".to_string())],
        );

        let response = self.authorized(self.client.get(&url)).send().await?;
        Ok(response.status().is_success())
    }

    /// Get a single profile by id
    pub async fn get_profile(&self, user_id: &str) -> Result<Profile, BackendError> {
        tracing::debug!("Fetching profile for user: {}", user_id);

        let mut rows: Vec<Profile> = self
            .get_rows(
                &self.tables.profiles,
                &[("select", "*".to_string()), ("id", format!("eq.{}", user_id))],
                "Failed to fetch profile",
            )
            .await?;

        if rows.is_empty() {
            return Err(BackendError::NotFound(format!("Profile not found for user {}", user_id)));
        }

        Ok(rows.swap_remove(0))
    }

    /// Query candidate profiles for `user_id`, skipping `exclude_ids`
    ///
    /// Rows that do not parse as profiles are skipped.
    pub async fn query_candidates(
        &self,
        user_id: &str,
        exclude_ids: &[String],
        limit: usize,
    ) -> Result<Vec<Profile>, BackendError> {
        let mut filters = vec![
            ("select", "*".to_string()),
            ("id", format!("neq.{}", user_id)),
        ];

        if !exclude_ids.is_empty() {
            let quoted = exclude_ids
                .iter()
                .map(|id| format!("\"{}\"", id))
                .collect::<Vec<_>>()
                .join(",");
            filters.push(("id", format!("not.in.({})", quoted)));
        }

        filters.push(("limit", limit.to_string()));

        let rows: Vec<Value> = self
            .get_rows(&self.tables.profiles, &filters, "Failed to query candidates")
            .await?;
        let total = rows.len();

        let profiles: Vec<Profile> = rows
            .into_iter()
            .filter_map(|row| match serde_json::from_value::<Profile>(row) {
                Ok(profile) => Some(profile),
                Err(e) => {
                    tracing::warn!("Skipping malformed profile row: {}", e);
                    None
                }
            })
            .filter(|p| p.id != user_id && !exclude_ids.contains(&p.id))
            .collect();

        tracing::debug!("Queried {} candidates (rows: {})", profiles.len(), total);

        Ok(profiles)
    }

    /// Ids of every profile `user_id` has already swiped on
    pub async fn get_swiped_ids(&self, user_id: &str) -> Result<Vec<String>, BackendError> {
        let rows: Vec<Value> = self
            .get_rows(
                &self.tables.swipes,
                &[
                    ("select", "target_user_id".to_string()),
                    ("user_id", format!("eq.{}", user_id)),
                ],
                "Failed to fetch swipes",
            )
            .await?;

        Ok(column(&rows, "target_user_id"))
    }

    /// Ids of users blocked by, or blocking, `user_id`
    pub async fn get_blocked_ids(&self, user_id: &str) -> Result<Vec<String>, BackendError> {
        let rows: Vec<BlockRecord> = self
            .get_rows(
                &self.tables.blocked_users,
                &[
                    ("select", "blocker_id,blocked_id".to_string()),
                    ("or", format!("(blocker_id.eq.{0},blocked_id.eq.{0})", user_id)),
                ],
                "Failed to fetch blocks",
            )
            .await?;

        Ok(rows
            .into_iter()
            .map(|block| {
                if block.blocker_id == user_id {
                    block.blocked_id
                } else {
                    block.blocker_id
                }
            })
            .collect())
    }

    /// Whether `user_id` has liked `target_user_id`
    pub async fn has_liked(&self, user_id: &str, target_user_id: &str) -> Result<bool, BackendError> {
        let rows: Vec<Value> = self
            .get_rows(
                &self.tables.swipes,
                &[
                    ("select", "user_id".to_string()),
                    ("user_id", format!("eq.{}", user_id)),
                    ("target_user_id", format!("eq.{}", target_user_id)),
                    ("action", format!("eq.{}", SwipeAction::Like.as_str())),
                    ("limit", "1".to_string()),
                ],
                "Failed to check like",
            )
            .await?;

        Ok(!rows.is_empty())
    }

    /// Record a swipe
    pub async fn record_swipe(&self, swipe: &SwipeRecord) -> Result<(), BackendError> {
        let url = self.table_url(&self.tables.swipes, &[]);

        let response = self
            .authorized(self.client.post(&url))
            .json(swipe)
            .send()
            .await?;
        Self::check(response, "Failed to record swipe").await?;

        tracing::debug!(
            "Recorded swipe: {} -> {} ({})",
            swipe.user_id,
            swipe.target_user_id,
            swipe.action.as_str()
        );

        Ok(())
    }

    /// Record a block
    pub async fn block_user(&self, block: &BlockRecord) -> Result<(), BackendError> {
        let url = self.table_url(&self.tables.blocked_users, &[]);

        let response = self
            .authorized(self.client.post(&url))
            .json(block)
            .send()
            .await?;
        Self::check(response, "Failed to block user").await?;

        Ok(())
    }

    /// Delete swipes between two users, in both directions
    pub async fn delete_swipes_between(&self, user_a: &str, user_b: &str) -> Result<(), BackendError> {
        let url = self.table_url(
            &self.tables.swipes,
            &[(
                "or",
                format!(
                    "(and(user_id.eq.{0},target_user_id.eq.{1}),and(user_id.eq.{1},target_user_id.eq.{0}))",
                    user_a, user_b
                ),
            )],
        );

        let response = self.authorized(self.client.delete(&url)).send().await?;
        Self::check(response, "Failed to remove swipes").await?;

        Ok(())
    }

    /// Store a report and return the stored row
    pub async fn create_report(&self, report: &Report) -> Result<Report, BackendError> {
        let url = self.table_url(&self.tables.reports, &[]);

        let response = self
            .authorized(self.client.post(&url))
            .header("Prefer", "return=representation")
            .json(report)
            .send()
            .await?;
        let response = Self::check(response, "Failed to submit report").await?;

        let mut rows: Vec<Report> = response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(format!("Failed to parse report: {}", e)))?;

        if rows.is_empty() {
            return Err(BackendError::InvalidResponse("Report insert returned no rows".into()));
        }

        Ok(rows.swap_remove(0))
    }
    /// Ids `user_id` has liked
    async fn get_liked_ids(&self, user_id: &str) -> Result<Vec<String>, BackendError> {
        let rows: Vec<Value> = self
            .get_rows(
                &self.tables.swipes,
                &[
                    ("select", "target_user_id".to_string()),
                    ("user_id", format!("eq.{}", user_id)),
                    ("action", format!("eq.{}", SwipeAction::Like.as_str())),
                ],
                "Failed to fetch likes",
            )
            .await?;

        Ok(column(&rows, "target_user_id"))
    }

    /// Ids that liked `user_id`, most recent first
    async fn get_liked_by_ids(&self, user_id: &str) -> Result<Vec<String>, BackendError> {
        let rows: Vec<Value> = self
            .get_rows(
                &self.tables.swipes,
                &[
                    ("select", "user_id".to_string()),
                    ("target_user_id", format!("eq.{}", user_id)),
                    ("action", format!("eq.{}", SwipeAction::Like.as_str())),
                    ("order", "created_at.desc".to_string()),
                ],
                "Failed to fetch received likes",
            )
            .await?;

        Ok(column(&rows, "user_id"))
    }

    /// Ids of users who share a mutual like with `user_id`
    ///
    /// Ordered by when the other user liked `user_id`, most recent first.
    pub async fn get_mutual_match_ids(&self, user_id: &str) -> Result<Vec<String>, BackendError> {
        let liked = self.get_liked_ids(user_id).await?;
        if liked.is_empty() {
            return Ok(vec![]);
        }

        let mut mutual = self.get_liked_by_ids(user_id).await?;
        mutual.retain(|id| liked.contains(id));
        mutual.dedup();

        Ok(mutual)
    }

    /// Whether `user_a` and `user_b` have liked each other
    pub async fn is_mutual_match(&self, user_a: &str, user_b: &str) -> Result<bool, BackendError> {
        Ok(self.has_liked(user_a, user_b).await? && self.has_liked(user_b, user_a).await?)
    }

    /// Fetch the profiles for `ids`, in the order of `ids`
    ///
    /// Missing and malformed rows are skipped.
    pub async fn get_profiles(&self, ids: &[String]) -> Result<Vec<Profile>, BackendError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let quoted = ids
            .iter()
            .map(|id| format!("\"{}\"", id))
            .collect::<Vec<_>>()
            .join(",");

        let rows: Vec<Value> = self
            .get_rows(
                &self.tables.profiles,
                &[("select", "*".to_string()), ("id", format!("in.({})", quoted))],
                "Failed to fetch profiles",
            )
            .await?;

        let mut profiles: Vec<Profile> = rows
            .into_iter()
            .filter_map(|row| serde_json::from_value::<Profile>(row).ok())
            .collect();
        profiles.sort_by_key(|p| ids.iter().position(|id| *id == p.id));

        Ok(profiles)
    }

    /// Store a message and return the stored row
    pub async fn send_message(&self, message: &Message) -> Result<Message, BackendError> {
        let url = self.table_url(&self.tables.messages, &[]);

        let response = self
            .authorized(self.client.post(&url))
            .header("Prefer", "return=representation")
            .json(message)
            .send()
            .await?;
        let response = Self::check(response, "Failed to send message").await?;

        let mut rows: Vec<Message> = response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(format!("Failed to parse message: {}", e)))?;

        if rows.is_empty() {
            return Err(BackendError::InvalidResponse("Message insert returned no rows".into()));
        }

        Ok(rows.swap_remove(0))
    }

    /// Messages exchanged between two users, oldest first
    pub async fn list_messages(&self, user_a: &str, user_b: &str) -> Result<Vec<Message>, BackendError> {
        self.get_rows(
            &self.tables.messages,
            &[
                ("select", "*".to_string()),
                (
                    "or",
                    format!(
                        "(and(sender_id.eq.{0},receiver_id.eq.{1}),and(sender_id.eq.{1},receiver_id.eq.{0}))",
                        user_a, user_b
                    ),
                ),
                ("order", "created_at.asc".to_string()),
            ],
            "Failed to fetch messages",
        )
        .await
    }
}

/// String values of `key` across `rows`
fn column(rows: &[Value], key: &str) -> Vec<String> {
    rows.iter()
        .filter_map(|row| row.get(key).and_then(|v| v.as_str()))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReportReason;
    use mockito::Matcher;
    use serde_json::json;

    fn client_for(server: &mockito::Server) -> BackendClient {
        BackendClient::new(
            server.url(),
            "test_key".to_string(),
            TableSettings::default(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    fn profile_json(id: &str) -> Value {
        json!({
            "id": id,
            "first_name": "Test",
            "last_name": "User",
            "bio": "",
            "major": "Physics",
            "graduation_year": 2026,
            "interests": ["Music"],
            "university": "State University"
        })
    }

    #[test]
    fn test_table_url_encodes_filters() {
        let client = BackendClient::new(
            "https://backend.test/".to_string(),
            "key".to_string(),
            TableSettings::default(),
            Duration::from_secs(5),
        )
        .unwrap();

        let url = client.table_url("profiles", &[("id", "not.in.(\"a\",\"b\")".to_string())]);

        assert_eq!(
            url,
            "https://backend.test/rest/v1/profiles?id=not.in.%28%22a%22%2C%22b%22%29"
        );
    }

    #[tokio::test]
    async fn test_get_profile() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/v1/profiles")
            .match_query(Matcher::UrlEncoded("id".into(), "eq.u1".into()))
            .match_header("apikey", "test_key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!([profile_json("u1")]).to_string())
            .create_async()
            .await;

        let profile = client_for(&server).get_profile("u1").await.unwrap();

        assert_eq!(profile.id, "u1");
        assert_eq!(profile.interests, vec!["Music"]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_profile_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/rest/v1/profiles")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let result = client_for(&server).get_profile("missing").await;

        assert!(matches!(result, Err(BackendError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_unauthorized_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/rest/v1/profiles")
            .match_query(Matcher::Any)
            .with_status(401)
            .create_async()
            .await;

        let result = client_for(&server).get_profile("u1").await;

        assert!(matches!(result, Err(BackendError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_query_candidates_skips_malformed_and_excluded() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/rest/v1/profiles")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("id".into(), "neq.viewer".into()),
                Matcher::UrlEncoded("limit".into(), "50".into()),
            ]))
            .with_status(200)
            .with_body(
                json!([
                    profile_json("c1"),
                    {"id": "broken"},
                    profile_json("seen"),
                    profile_json("viewer")
                ])
                .to_string(),
            )
            .create_async()
            .await;

        let candidates = client_for(&server)
            .query_candidates("viewer", &["seen".to_string()], 50)
            .await
            .unwrap();

        let ids: Vec<&str> = candidates.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["c1"]);
    }

    #[tokio::test]
    async fn test_get_blocked_ids_returns_other_side() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/rest/v1/blocked_users")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                json!([
                    {"blocker_id": "me", "blocked_id": "a"},
                    {"blocker_id": "b", "blocked_id": "me"}
                ])
                .to_string(),
            )
            .create_async()
            .await;

        let ids = client_for(&server).get_blocked_ids("me").await.unwrap();

        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_record_swipe_posts_row() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/rest/v1/matches")
            .match_body(Matcher::PartialJson(json!({
                "user_id": "u1",
                "target_user_id": "u2",
                "action": "like"
            })))
            .with_status(201)
            .create_async()
            .await;

        let swipe = SwipeRecord {
            user_id: "u1".to_string(),
            target_user_id: "u2".to_string(),
            action: SwipeAction::Like,
            created_at: None,
        };
        client_for(&server).record_swipe(&swipe).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_has_liked() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/rest/v1/matches")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("user_id".into(), "eq.u2".into()),
                Matcher::UrlEncoded("action".into(), "eq.like".into()),
            ]))
            .with_status(200)
            .with_body(r#"[{"user_id": "u2"}]"#)
            .create_async()
            .await;

        assert!(client_for(&server).has_liked("u2", "u1").await.unwrap());
    }

    #[tokio::test]
    async fn test_create_report_returns_row() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/rest/v1/reports")
            .match_header("Prefer", "return=representation")
            .with_status(201)
            .with_body(
                json!([{
                    "id": "r1",
                    "reporter_id": "u1",
                    "reported_user_id": "u2",
                    "reason": "spam",
                    "description": null
                }])
                .to_string(),
            )
            .create_async()
            .await;

        let report = Report {
            id: None,
            reporter_id: "u1".to_string(),
            reported_user_id: "u2".to_string(),
            reason: ReportReason::Spam,
            description: None,
            created_at: None,
        };
        let stored = client_for(&server).create_report(&report).await.unwrap();

        assert_eq!(stored.id.as_deref(), Some("r1"));
        assert_eq!(stored.reason, ReportReason::Spam);
    }

    #[tokio::test]
    async fn test_api_error_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("DELETE", "/rest/v1/matches")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let result = client_for(&server).delete_swipes_between("a", "b").await;

        assert!(matches!(result, Err(BackendError::ApiError(_))));
    }

    #[tokio::test]
    async fn test_query_candidates_keeps_null_columns() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/rest/v1/profiles")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                json!([{
                    "id": "c1",
                    "first_name": "Null",
                    "last_name": "Columns",
                    "bio": null,
                    "major": null,
                    "graduation_year": 2027,
                    "interests": null,
                    "university": null
                }])
                .to_string(),
            )
            .create_async()
            .await;

        let candidates = client_for(&server).query_candidates("viewer", &[], 50).await.unwrap();

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].bio, "");
        assert!(candidates[0].interests.is_empty());
    }

    #[tokio::test]
    async fn test_mutual_match_ids_keep_reciprocal_likes_only() {
        let mut server = mockito::Server::new_async().await;
        let _given = server
            .mock("GET", "/rest/v1/matches")
            .match_query(Matcher::UrlEncoded("user_id".into(), "eq.me".into()))
            .with_status(200)
            .with_body(json!([{ "target_user_id": "u1" }, { "target_user_id": "u3" }]).to_string())
            .create_async()
            .await;
        let _received = server
            .mock("GET", "/rest/v1/matches")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("target_user_id".into(), "eq.me".into()),
                Matcher::UrlEncoded("order".into(), "created_at.desc".into()),
            ]))
            .with_status(200)
            .with_body(json!([{ "user_id": "u3" }, { "user_id": "u2" }, { "user_id": "u1" }]).to_string())
            .create_async()
            .await;

        let ids = client_for(&server).get_mutual_match_ids("me").await.unwrap();

        assert_eq!(ids, vec!["u3", "u1"]);
    }

    #[tokio::test]
    async fn test_get_profiles_follows_requested_order() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/rest/v1/profiles")
            .match_query(Matcher::UrlEncoded("id".into(), "in.(\"b\",\"a\")".into()))
            .with_status(200)
            .with_body(json!([profile_json("a"), profile_json("b")]).to_string())
            .create_async()
            .await;

        let profiles = client_for(&server)
            .get_profiles(&["b".to_string(), "a".to_string()])
            .await
            .unwrap();

        let ids: Vec<&str> = profiles.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn test_list_messages_filters_conversation() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/v1/messages")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded(
                    "or".into(),
                    "(and(sender_id.eq.a,receiver_id.eq.b),and(sender_id.eq.b,receiver_id.eq.a))".into(),
                ),
                Matcher::UrlEncoded("order".into(), "created_at.asc".into()),
            ]))
            .with_status(200)
            .with_body(
                json!([{ "id": "m1", "sender_id": "a", "receiver_id": "b", "content": "hi" }]).to_string(),
            )
            .create_async()
            .await;

        let messages = client_for(&server).list_messages("a", "b").await.unwrap();

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].content, "hi");
        mock.assert_async().await;
    }
}

//! PostgREST-backed profile store.

use std::sync::Arc;

use async_trait::async_trait;
use el_core::ids::UserId;
use el_core::ports::{IdentityPort, ProfileStoreError, ProfileStorePort};
use el_core::profile::ProfileRecord;
use el_core::security::BearerToken;
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::SupabaseRestClient;

pub const PROFILES_TABLE: &str = "profiles";

/// PostgreSQL `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";
/// PostgREST code for a JWT it refuses to accept.
const JWT_REJECTED: &str = "PGRST301";

/// Row as stored in the `profiles` table. Blank form fields are sent as null.
#[derive(Debug, Serialize, Deserialize)]
struct ProfileRow {
    id: String,
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    department: Option<String>,
    #[serde(default)]
    academic_year: Option<String>,
    #[serde(default)]
    date_of_birth: Option<String>,
    #[serde(default)]
    mobile_number: Option<String>,
}

impl From<&ProfileRecord> for ProfileRow {
    fn from(record: &ProfileRecord) -> Self {
        let non_blank = |value: &str| (!value.is_empty()).then(|| value.to_string());
        Self {
            id: record.id.to_string(),
            full_name: non_blank(&record.full_name),
            department: non_blank(&record.department),
            academic_year: non_blank(&record.academic_year),
            date_of_birth: non_blank(&record.date_of_birth),
            mobile_number: non_blank(&record.mobile_number),
        }
    }
}

impl From<ProfileRow> for ProfileRecord {
    fn from(row: ProfileRow) -> Self {
        Self {
            id: UserId::new(row.id),
            full_name: row.full_name.unwrap_or_default(),
            department: row.department.unwrap_or_default(),
            academic_year: row.academic_year.unwrap_or_default(),
            date_of_birth: row.date_of_birth.unwrap_or_default(),
            mobile_number: row.mobile_number.unwrap_or_default(),
        }
    }
}

/// PostgREST error body.
#[derive(Debug, Default, Deserialize)]
struct PostgrestError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

pub struct SupabaseProfileStore {
    client: SupabaseRestClient,
    identity: Arc<dyn IdentityPort>,
}

impl SupabaseProfileStore {
    pub fn new(client: SupabaseRestClient, identity: Arc<dyn IdentityPort>) -> Self {
        Self { client, identity }
    }

    /// Caller's token for row-level security; signed-out requests go out with the anon key.
    async fn bearer(&self) -> Option<BearerToken> {
        match self.identity.current_session().await {
            Ok(session) => session.map(|session| session.access_token),
            Err(err) => {
                warn!(error = %err, "session unreadable, querying profiles anonymously");
                None
            }
        }
    }
}

#[async_trait]
impl ProfileStorePort for SupabaseProfileStore {
    async fn get_profile(&self, user_id: &UserId) -> Result<Option<ProfileRecord>, ProfileStoreError> {
        let url = self.client.table_url(PROFILES_TABLE);
        let bearer = self.bearer().await;
        let response = self
            .client
            .request(Method::GET, &url, bearer.as_ref())
            .query(&[("id", format!("eq.{user_id}")), ("select", "*".to_string())])
            .send()
            .await
            .map_err(|e| ProfileStoreError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(error_from_response(status, response).await);
        }

        let rows: Vec<ProfileRow> = response
            .json()
            .await
            .map_err(|e| ProfileStoreError::Unavailable(format!("invalid profiles payload: {e}")))?;
        debug!(user_id = %user_id, rows = rows.len(), "profile lookup finished");
        Ok(rows.into_iter().next().map(ProfileRecord::from))
    }

    async fn insert_profile(&self, record: &ProfileRecord) -> Result<(), ProfileStoreError> {
        let url = self.client.table_url(PROFILES_TABLE);
        let bearer = self.bearer().await;
        let response = self
            .client
            .request(Method::POST, &url, bearer.as_ref())
            .header("Prefer", "return=minimal")
            .json(&ProfileRow::from(record))
            .send()
            .await
            .map_err(|e| ProfileStoreError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(error_from_response(status, response).await);
        }
        debug!(user_id = %record.id, "profile inserted");
        Ok(())
    }
}

async fn error_from_response(status: StatusCode, response: reqwest::Response) -> ProfileStoreError {
    let body = response.text().await.unwrap_or_default();
    let parsed: PostgrestError = serde_json::from_str(&body).unwrap_or_default();
    let message = parsed
        .message
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                format!("HTTP {}", status.as_u16())
            } else {
                body.clone()
            }
        });

    if status == StatusCode::CONFLICT || parsed.code.as_deref() == Some(UNIQUE_VIOLATION) {
        ProfileStoreError::Duplicate { message }
    } else if status == StatusCode::UNAUTHORIZED || parsed.code.as_deref() == Some(JWT_REJECTED) {
        ProfileStoreError::Unauthorized { message }
    } else {
        ProfileStoreError::Rejected { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::supabase::SupabaseConfig;
    use el_core::ports::IdentityError;
    use el_core::session::Session;
    use mockito::Matcher;

    struct StaticIdentity {
        token: Option<&'static str>,
    }

    #[async_trait]
    impl IdentityPort for StaticIdentity {
        async fn current_session(&self) -> Result<Option<Session>, IdentityError> {
            Ok(self
                .token
                .map(|token| Session::new(UserId::new("user-1"), BearerToken::new(token))))
        }

        fn sign_in_url(&self, _redirect_path: &str) -> Result<String, IdentityError> {
            Err(IdentityError::SignInUrl("unused".into()))
        }
    }

    fn store(server: &mockito::ServerGuard, token: Option<&'static str>) -> SupabaseProfileStore {
        let client = SupabaseRestClient::new(SupabaseConfig::new(server.url(), "anon-key")).unwrap();
        SupabaseProfileStore::new(client, Arc::new(StaticIdentity { token }))
    }

    fn record() -> ProfileRecord {
        ProfileRecord {
            id: UserId::new("user-1"),
            full_name: "Ada Lovelace".into(),
            department: "CSE".into(),
            academic_year: "2023-2027".into(),
            date_of_birth: String::new(),
            mobile_number: "+919876543210".into(),
        }
    }

    #[tokio::test]
    async fn lookup_returns_first_row_and_sends_user_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/v1/profiles")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("id".into(), "eq.user-1".into()),
                Matcher::UrlEncoded("select".into(), "*".into()),
            ]))
            .match_header("apikey", "anon-key")
            .match_header("authorization", "Bearer user-token")
            .with_status(200)
            .with_body(
                r#"[{"id":"user-1","full_name":"Ada Lovelace","department":"CSE","academic_year":null,"date_of_birth":null,"mobile_number":"+919876543210","created_at":"2024-01-01T00:00:00Z"}]"#,
            )
            .create_async()
            .await;

        let found = store(&server, Some("user-token"))
            .get_profile(&UserId::new("user-1"))
            .await
            .unwrap()
            .unwrap();

        mock.assert_async().await;
        assert_eq!(found.department, "CSE");
        assert_eq!(found.academic_year, "");
    }

    #[tokio::test]
    async fn empty_array_means_no_profile() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/v1/profiles")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let found = store(&server, Some("user-token"))
            .get_profile(&UserId::new("user-1"))
            .await
            .unwrap();

        assert!(found.is_none());
    }

    #[tokio::test]
    async fn signed_out_lookup_uses_anon_key_as_bearer() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/v1/profiles")
            .match_query(Matcher::Any)
            .match_header("authorization", "Bearer anon-key")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        store(&server, None)
            .get_profile(&UserId::new("user-1"))
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn insert_posts_minimal_row() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/rest/v1/profiles")
            .match_header("prefer", "return=minimal")
            .match_body(Matcher::Json(serde_json::json!({
                "id": "user-1",
                "full_name": "Ada Lovelace",
                "department": "CSE",
                "academic_year": "2023-2027",
                "date_of_birth": null,
                "mobile_number": "+919876543210"
            })))
            .with_status(201)
            .create_async()
            .await;

        store(&server, Some("user-token"))
            .insert_profile(&record())
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn conflict_is_reported_as_duplicate_with_server_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/rest/v1/profiles")
            .with_status(409)
            .with_body(
                r#"{"code":"23505","details":"Key (id)=(user-1) already exists.","hint":null,"message":"duplicate key value violates unique constraint \"profiles_pkey\""}"#,
            )
            .create_async()
            .await;

        let err = store(&server, Some("user-token"))
            .insert_profile(&record())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ProfileStoreError::Duplicate {
                message: "duplicate key value violates unique constraint \"profiles_pkey\"".into()
            }
        );
    }

    #[tokio::test]
    async fn unique_violation_code_is_duplicate_even_without_409() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/rest/v1/profiles")
            .with_status(400)
            .with_body(r#"{"code":"23505","message":"already registered"}"#)
            .create_async()
            .await;

        let err = store(&server, Some("user-token"))
            .insert_profile(&record())
            .await
            .unwrap_err();

        assert!(matches!(err, ProfileStoreError::Duplicate { .. }));
    }

    #[tokio::test]
    async fn expired_jwt_is_unauthorized() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/rest/v1/profiles")
            .with_status(401)
            .with_body(r#"{"code":"PGRST301","message":"JWT expired"}"#)
            .create_async()
            .await;

        let err = store(&server, Some("user-token"))
            .insert_profile(&record())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ProfileStoreError::Unauthorized {
                message: "JWT expired".into()
            }
        );
    }

    #[tokio::test]
    async fn lookup_with_refused_token_is_unauthorized() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/v1/profiles")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"code":"PGRST301","message":"JWT expired"}"#)
            .create_async()
            .await;

        let err = store(&server, Some("user-token"))
            .get_profile(&UserId::new("user-1"))
            .await
            .unwrap_err();

        assert!(matches!(err, ProfileStoreError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn other_failures_are_rejections() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/rest/v1/profiles")
            .with_status(400)
            .with_body(r#"{"code":"23502","message":"null value in column \"name\""}"#)
            .create_async()
            .await;

        let err = store(&server, Some("user-token"))
            .insert_profile(&record())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ProfileStoreError::Rejected {
                message: "null value in column \"name\"".into()
            }
        );
        assert_eq!(err.user_message(), "null value in column \"name\"");
    }
}

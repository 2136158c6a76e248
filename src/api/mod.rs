//! Remote user API client.
//!
//! This is the only place the console performs network I/O. It defines:
//! - The wire types (`UserRecord`, `UserUpdate`)
//! - The `UserApi` seam the controllers are written against
//! - `ReqresClient`, a blocking reqwest implementation for reqres-style services
//! - `ApiRequest`/`ApiOutcome`, the messages exchanged with the UI loop
//!
//! Every call is single-shot: no retry, no backoff and no client timeout.
pub mod dispatch;

use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ApiError, simple_error};

/// Public demo endpoint used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://reqres.in/api";

/// A server-managed user record. Identity is `id`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub avatar: String,
}

impl UserRecord {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Copy of this record with the editable fields taken from `update`.
    pub fn with_update(&self, update: &UserUpdate) -> Self {
        Self {
            first_name: update.first_name.clone(),
            last_name: update.last_name.clone(),
            email: update.email.clone(),
            ..self.clone()
        }
    }
}

/// Editable fields of a user. All three are always sent together.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUpdate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl From<&UserRecord> for UserUpdate {
    fn from(user: &UserRecord) -> Self {
        Self {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
}

#[derive(Deserialize)]
struct UsersPage {
    data: Vec<UserRecord>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Operations offered by the remote user-record service.
pub trait UserApi: Send + Sync {
    /// Exchange credentials for an opaque session token.
    fn authenticate(&self, email: &str, password: &str) -> Result<String, ApiError>;
    /// Fetch one page of users. Pages past the end come back empty.
    fn list_users(&self, page: u32) -> Result<Vec<UserRecord>, ApiError>;
    fn update_user(&self, id: u64, update: &UserUpdate) -> Result<(), ApiError>;
    fn delete_user(&self, id: u64) -> Result<(), ApiError>;
}

/// Blocking HTTP client for `POST /login`, `GET /users`, `PUT/DELETE /users/:id`.
pub struct ReqresClient {
    http: Client,
    base_url: String,
}

impl ReqresClient {
    /// Build a client for `base_url`. When `api_key` is set it is sent as `x-api-key`.
    pub fn new(base_url: &str, api_key: Option<&str>) -> crate::error::Result<Self> {
        let base_url = normalize_base_url(base_url)?;

        let mut headers = HeaderMap::new();
        if let Some(key) = api_key.filter(|k| !k.is_empty()) {
            headers.insert("x-api-key", HeaderValue::from_str(key)?);
        }

        let http = Client::builder()
            .timeout(None)
            .user_agent(format!("user-console/{}", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Validate the scheme and strip trailing slashes.
pub fn normalize_base_url(raw: &str) -> crate::error::Result<String> {
    let url = raw.trim().trim_end_matches('/').to_string();
    if url.is_empty() {
        return Err(simple_error("base URL cannot be empty"));
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(simple_error(format!(
            "base URL must start with http:// or https://: {url}"
        )));
    }
    Ok(url)
}

/// Describe a non-2xx response using the `{"error": ...}` body when present.
fn failure_detail(resp: Response) -> String {
    let status = resp.status().as_u16();
    let body = resp.text().unwrap_or_default();
    match serde_json::from_str::<ErrorBody>(&body) {
        Ok(e) => format!("HTTP {status}: {}", e.error),
        Err(_) if body.trim().is_empty() => format!("HTTP {status}"),
        Err(_) => format!("HTTP {status}: {}", body.trim()),
    }
}

impl UserApi for ReqresClient {
    fn authenticate(&self, email: &str, password: &str) -> Result<String, ApiError> {
        let url = self.url("/login");
        debug!(url = %url, email = %email, "Attempting login");

        let resp = self
            .http
            .post(&url)
            .json(&LoginRequest { email, password })
            .send()
            .map_err(|e| ApiError::Auth(e.to_string()))?;
        if !resp.status().is_success() {
            let detail = failure_detail(resp);
            warn!(email = %email, detail = %detail, "Login rejected");
            return Err(ApiError::Auth(detail));
        }
        let body: LoginResponse = resp
            .json()
            .map_err(|e| ApiError::Auth(format!("invalid login response: {e}")))?;
        info!(email = %email, "Login accepted");
        Ok(body.token)
    }

    fn list_users(&self, page: u32) -> Result<Vec<UserRecord>, ApiError> {
        let url = self.url("/users");
        debug!(url = %url, page, "Fetching users");

        let resp = self
            .http
            .get(&url)
            .query(&[("page", page)])
            .send()
            .map_err(|e| ApiError::Fetch(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(ApiError::Fetch(failure_detail(resp)));
        }
        let body: UsersPage = resp
            .json()
            .map_err(|e| ApiError::Fetch(format!("invalid users response: {e}")))?;
        Ok(body.data)
    }

    fn update_user(&self, id: u64, update: &UserUpdate) -> Result<(), ApiError> {
        let url = self.url(&format!("/users/{id}"));
        debug!(url = %url, "Updating user");

        let resp = self
            .http
            .put(&url)
            .json(update)
            .send()
            .map_err(|e| ApiError::Update(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(ApiError::Update(failure_detail(resp)));
        }
        Ok(())
    }

    fn delete_user(&self, id: u64) -> Result<(), ApiError> {
        let url = self.url(&format!("/users/{id}"));
        debug!(url = %url, "Deleting user");

        let resp = self
            .http
            .delete(&url)
            .send()
            .map_err(|e| ApiError::Delete(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(ApiError::Delete(failure_detail(resp)));
        }
        Ok(())
    }
}

/// A call the UI wants performed against the remote API.
#[derive(Clone, PartialEq, Eq)]
pub enum ApiRequest {
    Authenticate { email: String, password: String },
    ListUsers { page: u32 },
    UpdateUser { id: u64, update: UserUpdate },
    DeleteUser { id: u64 },
}

// Keeps passwords out of logs and test failure output.
impl std::fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiRequest::Authenticate { email, .. } => f
                .debug_struct("Authenticate")
                .field("email", email)
                .field("password", &"***")
                .finish(),
            ApiRequest::ListUsers { page } => {
                f.debug_struct("ListUsers").field("page", page).finish()
            }
            ApiRequest::UpdateUser { id, update } => f
                .debug_struct("UpdateUser")
                .field("id", id)
                .field("update", update)
                .finish(),
            ApiRequest::DeleteUser { id } => f.debug_struct("DeleteUser").field("id", id).finish(),
        }
    }
}

/// Result of an `ApiRequest`, carrying enough context to reconcile by id.
#[derive(Debug)]
pub enum ApiOutcome {
    Authenticated(Result<String, ApiError>),
    UsersListed {
        page: u32,
        result: Result<Vec<UserRecord>, ApiError>,
    },
    UserUpdated {
        id: u64,
        update: UserUpdate,
        result: Result<(), ApiError>,
    },
    UserDeleted {
        id: u64,
        result: Result<(), ApiError>,
    },
}

/// Perform `request` synchronously against `api`.
pub fn execute(api: &dyn UserApi, request: ApiRequest) -> ApiOutcome {
    match request {
        ApiRequest::Authenticate { email, password } => {
            ApiOutcome::Authenticated(api.authenticate(&email, &password))
        }
        ApiRequest::ListUsers { page } => ApiOutcome::UsersListed {
            page,
            result: api.list_users(page),
        },
        ApiRequest::UpdateUser { id, update } => {
            let result = api.update_user(id, &update);
            ApiOutcome::UserUpdated { id, update, result }
        }
        ApiRequest::DeleteUser { id } => ApiOutcome::UserDeleted {
            id,
            result: api.delete_user(id),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client_for(server: &MockServer) -> ReqresClient {
        ReqresClient::new(&server.base_url(), None).expect("valid base url")
    }

    #[test]
    fn base_url_validation_and_normalization() {
        assert_eq!(
            normalize_base_url("https://reqres.in/api/").unwrap(),
            "https://reqres.in/api"
        );
        assert!(normalize_base_url("").is_err());
        assert!(normalize_base_url("ftp://example.com").is_err());
        assert!(ReqresClient::new("not-a-url", None).is_err());
    }

    #[test]
    fn authenticate_returns_token_on_success() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(POST).path("/login").json_body(json!({
                "email": "eve.holt@reqres.in",
                "password": "cityslicka"
            }));
            then.status(200).json_body(json!({ "token": "QpwL5tke4Pnpja7X4" }));
        });

        let token = client_for(&server)
            .authenticate("eve.holt@reqres.in", "cityslicka")
            .unwrap();
        assert_eq!(token, "QpwL5tke4Pnpja7X4");
        m.assert();
    }

    #[test]
    fn authenticate_maps_rejection_to_auth_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/login");
            then.status(400).json_body(json!({ "error": "user not found" }));
        });

        let err = client_for(&server).authenticate("x@y.z", "nope").unwrap_err();
        assert_eq!(err, ApiError::Auth("HTTP 400: user not found".into()));
    }

    #[test]
    fn list_users_sends_page_and_reads_data() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(GET).path("/users").query_param("page", "2");
            then.status(200).json_body(json!({
                "page": 2,
                "per_page": 6,
                "total": 12,
                "total_pages": 2,
                "data": [{
                    "id": 7,
                    "email": "michael.lawson@reqres.in",
                    "first_name": "Michael",
                    "last_name": "Lawson",
                    "avatar": "https://reqres.in/img/faces/7-image.jpg"
                }]
            }));
        });

        let users = client_for(&server).list_users(2).unwrap();
        m.assert();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id, 7);
        assert_eq!(users[0].full_name(), "Michael Lawson");
    }

    #[test]
    fn list_users_failure_is_fetch_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/users");
            then.status(503);
        });

        let err = client_for(&server).list_users(1).unwrap_err();
        assert_eq!(err, ApiError::Fetch("HTTP 503".into()));
    }

    #[test]
    fn update_sends_all_three_fields() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(PUT).path("/users/2").json_body(json!({
                "first_name": "Janet",
                "last_name": "Weaver",
                "email": "janet@example.com"
            }));
            then.status(200).json_body(json!({ "updatedAt": "2024-01-01T00:00:00Z" }));
        });

        let update = UserUpdate {
            first_name: "Janet".into(),
            last_name: "Weaver".into(),
            email: "janet@example.com".into(),
        };
        client_for(&server).update_user(2, &update).unwrap();
        m.assert();
    }

    #[test]
    fn update_rejection_maps_to_update_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(PUT).path("/users/2");
            then.status(422).json_body(json!({ "error": "invalid email" }));
        });

        let update = UserUpdate {
            first_name: "Janet".into(),
            last_name: "Weaver".into(),
            email: "not-an-email".into(),
        };
        assert_eq!(
            client_for(&server).update_user(2, &update).unwrap_err(),
            ApiError::Update("HTTP 422: invalid email".into())
        );
    }

    #[test]
    fn delete_accepts_no_content_and_reports_failures() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(DELETE).path("/users/2");
            then.status(204);
        });
        server.mock(|when, then| {
            when.method(DELETE).path("/users/3");
            then.status(500).body("boom");
        });

        let client = client_for(&server);
        assert!(client.delete_user(2).is_ok());
        assert_eq!(
            client.delete_user(3).unwrap_err(),
            ApiError::Delete("HTTP 500: boom".into())
        );
    }

    #[test]
    fn api_key_is_sent_as_header() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(DELETE).path("/users/9").header("x-api-key", "reqres-free-v1");
            then.status(204);
        });

        let client = ReqresClient::new(&server.base_url(), Some("reqres-free-v1")).unwrap();
        client.delete_user(9).unwrap();
        m.assert();
    }

    #[test]
    fn request_debug_hides_password() {
        let req = ApiRequest::Authenticate {
            email: "a@b.c".into(),
            password: "hunter2".into(),
        };
        let dbg = format!("{req:?}");
        assert!(dbg.contains("a@b.c"));
        assert!(!dbg.contains("hunter2"));
    }

    #[test]
    fn with_update_keeps_identity_and_avatar() {
        let user = UserRecord {
            id: 4,
            first_name: "Eve".into(),
            last_name: "Holt".into(),
            email: "eve.holt@reqres.in".into(),
            avatar: "https://reqres.in/img/faces/4-image.jpg".into(),
        };
        let mut update = UserUpdate::from(&user);
        update.last_name = "Stone".into();
        let updated = user.with_update(&update);
        assert_eq!(updated.id, 4);
        assert_eq!(updated.avatar, user.avatar);
        assert_eq!(updated.last_name, "Stone");
    }
}

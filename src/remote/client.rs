use super::{RemoteRow, RemoteSessions};
use crate::config::RemoteConfig;
use crate::errors::{AppError, AppResult};
use crate::models::user::AuthUser;
use crate::utils::date::{first_of_month, last_of_month};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::Deserialize;

const SESSION_COLUMNS: &str = "user_id,work_date,start_at,end_at,state";

/// Access token and user returned by a successful password login.
#[derive(Debug, Clone)]
pub struct LoginGrant {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
    pub user: AuthUser,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    user: TokenUser,
}

#[derive(Deserialize)]
struct TokenUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Clone)]
pub struct RemoteClient {
    http: Client,
    base_url: String,
    anon_key: String,
    access_token: Option<String>,
}

impl RemoteClient {
    pub fn new(cfg: &RemoteConfig, access_token: Option<String>) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(cfg.timeout_secs.max(1)))
            .build()?;
        Ok(Self {
            http,
            base_url: cfg.url.trim_end_matches('/').to_string(),
            anon_key: cfg.anon_key.clone(),
            access_token,
        })
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/sessions", self.base_url)
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        let bearer = self.access_token.as_deref().unwrap_or(&self.anon_key);
        req.header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", bearer))
    }

    fn check(resp: Response) -> AppResult<Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().unwrap_or_default();
        Err(AppError::RemoteStatus {
            status: status.as_u16(),
            body,
        })
    }

    fn select(&self, filters: &[(&str, String)]) -> AppResult<Vec<RemoteRow>> {
        let mut query: Vec<(&str, String)> = vec![("select", SESSION_COLUMNS.to_string())];
        query.extend(filters.iter().cloned());

        let resp = self
            .authorize(self.http.get(self.table_url()))
            .query(&query)
            .send()?;

        Ok(Self::check(resp)?.json::<Vec<RemoteRow>>()?)
    }

    /// Password grant against the auth endpoint.
    pub fn password_login(&self, email: &str, password: &str) -> AppResult<LoginGrant> {
        let url = format!("{}/auth/v1/token", self.base_url);
        let resp = self
            .http
            .post(url)
            .query(&[("grant_type", "password")])
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()?;

        let resp = match Self::check(resp) {
            Ok(r) => r,
            Err(AppError::RemoteStatus { status, body }) if (400..500).contains(&status) => {
                return Err(AppError::Login(login_error_message(&body)));
            }
            Err(e) => return Err(e),
        };

        let token: TokenResponse = resp.json()?;
        let expires_in = token.expires_in.unwrap_or(3600);

        Ok(LoginGrant {
            access_token: token.access_token,
            expires_at: Utc::now() + Duration::seconds(expires_in),
            user: AuthUser {
                id: token.user.id,
                email: token.user.email,
            },
        })
    }
}

/// Best human-readable message from an auth error body.
fn login_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            ["error_description", "msg", "message", "error"]
                .iter()
                .find_map(|k| v.get(*k).and_then(|m| m.as_str()).map(str::to_string))
        })
        .unwrap_or_else(|| "invalid credentials".to_string())
}

impl RemoteSessions for RemoteClient {
    fn working_session(&self, user_id: &str) -> AppResult<Option<RemoteRow>> {
        let rows = self.select(&[
            ("user_id", format!("eq.{}", user_id)),
            ("state", "eq.WORKING".to_string()),
            ("limit", "1".to_string()),
        ])?;
        Ok(rows.into_iter().next())
    }

    fn session_by_date(&self, user_id: &str, date: NaiveDate) -> AppResult<Option<RemoteRow>> {
        let rows = self.select(&[
            ("user_id", format!("eq.{}", user_id)),
            ("work_date", format!("eq.{}", date.format("%Y-%m-%d"))),
            ("limit", "1".to_string()),
        ])?;
        Ok(rows.into_iter().next())
    }

    fn sessions_in_month(&self, user_id: &str, year: i32, month: u32) -> AppResult<Vec<RemoteRow>> {
        let start = first_of_month(year, month)?;
        let end = last_of_month(year, month)?;
        self.select(&[
            ("user_id", format!("eq.{}", user_id)),
            ("work_date", format!("gte.{}", start.format("%Y-%m-%d"))),
            ("work_date", format!("lte.{}", end.format("%Y-%m-%d"))),
            ("order", "work_date.asc".to_string()),
        ])
    }

    fn upsert(&self, row: &RemoteRow) -> AppResult<()> {
        let resp = self
            .authorize(self.http.post(self.table_url()))
            .query(&[("on_conflict", "user_id,work_date")])
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(row)
            .send()?;
        Self::check(resp)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_error_prefers_description() {
        let body = r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#;
        assert_eq!(login_error_message(body), "Invalid login credentials");
        assert_eq!(login_error_message("not json"), "invalid credentials");
    }

    #[test]
    fn base_url_is_normalized() {
        let cfg = RemoteConfig {
            url: "https://x.supabase.co/".into(),
            anon_key: "k".into(),
            timeout_secs: 3,
        };
        let c = RemoteClient::new(&cfg, None).unwrap();
        assert_eq!(c.table_url(), "https://x.supabase.co/rest/v1/sessions");
    }
}

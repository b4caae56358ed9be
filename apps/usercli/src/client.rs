use reqwest::{Client, RequestBuilder};
use serde_json::{json, Value};
use std::time::Duration;

/// Status code and decoded JSON body of a single API call.
#[derive(Debug)]
pub struct Reply {
    pub status: u16,
    pub body: Value,
}

impl Reply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn id(&self) -> Option<u64> {
        self.body.get("id").and_then(Value::as_u64)
    }
}

#[derive(Debug, Clone)]
pub enum Auth {
    None,
    Bearer(String),
    Basic { username: String, password: String },
}

pub struct ApiClient {
    base_url: String,
    http: Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, String> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| format!("Failed to create HTTP client: {e}"))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: RequestBuilder, auth: &Auth) -> Result<Reply, String> {
        let request = match auth {
            Auth::None => request,
            Auth::Bearer(token) => request.bearer_auth(token),
            Auth::Basic { username, password } => request.basic_auth(username, Some(password)),
        };

        let response = request
            .send()
            .await
            .map_err(|e| format!("Request to {} failed: {e}", self.base_url))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| format!("Failed to read response body: {e}"))?;
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);

        tracing::debug!(status, body = %body, "api reply");
        Ok(Reply { status, body })
    }

    pub async fn root(&self) -> Result<Reply, String> {
        self.send(self.http.get(self.url("/")), &Auth::None).await
    }

    pub async fn health(&self) -> Result<Reply, String> {
        self.send(self.http.get(self.url("/health")), &Auth::None).await
    }

    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
        age: u32,
    ) -> Result<Reply, String> {
        let payload = json!({
            "username": username,
            "email": email,
            "password": password,
            "age": age,
        });
        self.send(self.http.post(self.url("/users")).json(&payload), &Auth::None)
            .await
    }

    pub async fn get_user(&self, id: u64) -> Result<Reply, String> {
        self.send(self.http.get(self.url(&format!("/users/{id}"))), &Auth::None)
            .await
    }

    pub async fn list_users(&self, limit: usize, offset: usize) -> Result<Reply, String> {
        let request = self
            .http
            .get(self.url("/users"))
            .query(&[("limit", limit), ("offset", offset)]);
        self.send(request, &Auth::None).await
    }

    pub async fn update_user(&self, id: u64, changes: &Value, auth: &Auth) -> Result<Reply, String> {
        let request = self
            .http
            .put(self.url(&format!("/users/{id}")))
            .json(changes);
        self.send(request, auth).await
    }

    pub async fn delete_user(&self, id: u64, auth: &Auth) -> Result<Reply, String> {
        self.send(self.http.delete(self.url(&format!("/users/{id}"))), auth)
            .await
    }

    pub async fn search_users(&self, query: &str, field: &str) -> Result<Reply, String> {
        let request = self
            .http
            .get(self.url("/users/search"))
            .query(&[("q", query), ("field", field)]);
        self.send(request, &Auth::None).await
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<Reply, String> {
        let payload = json!({ "username": username, "password": password });
        self.send(self.http.post(self.url("/login")).json(&payload), &Auth::None)
            .await
    }

    pub async fn stats(&self, include_details: bool) -> Result<Reply, String> {
        let request = self
            .http
            .get(self.url("/stats"))
            .query(&[("include_details", include_details)]);
        self.send(request, &Auth::None).await
    }
}

//! Typed HTTP client for the fintrack API.
//!
//! Every response is unwrapped from the `{success, data | message}` envelope;
//! a failure envelope becomes [`ClientError::Api`] carrying the server's
//! message verbatim.

pub mod resource;

pub use resource::{ListState, Prompt, Resource, ResourceList};

use reqwest::{Method, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::database::models::User;
use crate::error::FieldErrors;
use crate::handlers::public::auth::LoginResponse;
use crate::messages::Message;
use crate::middleware::Identity;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Failure envelope returned by the server
    #[error("{message}")]
    Api {
        status: u16,
        message: String,
        errors: Option<FieldErrors>,
    },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid server url: {0}")]
    Url(#[from] url::ParseError),

    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Option<FieldErrors>,
}

/// Body of `POST /api/auth/register`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub accept_terms: bool,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let mut base = Url::parse(base_url)?;
        // Url::join replaces the last segment unless the path ends in '/'
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self {
            http: reqwest::Client::new(),
            base,
            token: None,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.send(self.request(Method::GET, path)?).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(self.request(Method::POST, path)?.json(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.send(self.request(Method::DELETE, path)?).await
    }

    pub async fn register(&self, registration: &Registration) -> Result<User, ClientError> {
        self.post("api/auth/register", registration).await
    }

    /// Log in and keep the issued token for later requests
    pub async fn login(&mut self, email: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let body = serde_json::json!({ "email": email, "password": password });
        let response: LoginResponse = self.post("api/auth/login", &body).await?;
        self.token = Some(response.token.clone());
        Ok(response)
    }

    pub async fn logout(&mut self) -> Result<(), ClientError> {
        let _: Value = self.post("api/auth/logout", &serde_json::json!({})).await?;
        self.token = None;
        Ok(())
    }

    pub async fn me(&self) -> Result<Identity, ClientError> {
        self.get("api/auth/me").await
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let url = self.base.join(path.trim_start_matches('/'))?;
        let builder = self.http.request(method, url);
        Ok(match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        let envelope: Envelope = serde_json::from_slice(&bytes).map_err(|e| {
            tracing::debug!("Non-envelope response ({}): {}", status, e);
            if status.is_success() {
                ClientError::Decode(e.to_string())
            } else {
                ClientError::Api {
                    status: status.as_u16(),
                    message: Message::RequestFailed.text().to_string(),
                    errors: None,
                }
            }
        })?;

        if !envelope.success || !status.is_success() {
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: envelope
                    .message
                    .unwrap_or_else(|| Message::RequestFailed.text().to_string()),
                errors: envelope.errors,
            });
        }

        let data = envelope.data.unwrap_or(Value::Null);
        serde_json::from_value(data).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

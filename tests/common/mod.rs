#![allow(dead_code)]

use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use async_trait::async_trait;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use fintrack_api::auth::{generate_jwt, hash_password, Claims};
use fintrack_api::database::models::{
    Expense, ExpenseCategory, NewExpense, NewExpenseCategory, NewUser, User,
};
use fintrack_api::database::{DatabaseError, MemoryStore, Store};
use fintrack_api::{app, AppState};

pub const PASSWORD: &str = "s3cret!";

/// Text every [`FailingStore`] error carries; must never reach a response
pub const STORE_FAILURE: &str = "relation \"expenses\" does not exist: SELECT e.id FROM expenses e";

/// Router over a store, plus a handle to that store
pub struct TestApp<S = MemoryStore> {
    pub router: Router,
    pub store: S,
}

pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestApp {
    pub fn new() -> Self {
        let store = MemoryStore::new();
        let router = app(AppState::new(store.clone()));
        Self { router, store }
    }

    /// Insert a user directly and mint a token for them
    pub async fn seed_user(&self, name: &str, email: &str) -> Result<(User, String)> {
        let user = User::from_new(NewUser {
            nome: name.to_string(),
            email: email.to_string(),
            senha: hash_password(PASSWORD)?,
        });
        self.store.insert_user(user.clone()).await;

        let token = generate_jwt(&Claims::new(user.id, &user.email))?;
        Ok((user, token))
    }
}

impl TestApp<FailingStore> {
    /// Router whose store fails every call
    pub fn failing() -> Self {
        Self::over_failing(FailingStore::default())
    }

    /// Router whose store knows `user` by id and fails everything else
    pub fn failing_except_user(user: User) -> Self {
        Self::over_failing(FailingStore { user: Some(user) })
    }

    fn over_failing(store: FailingStore) -> Self {
        let router = app(AppState::new(store.clone()));
        Self { router, store }
    }
}

impl<S> TestApp<S> {
    pub async fn send(&self, request: Request<Body>) -> Result<Response> {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .context("router call failed")?;

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        Ok(Response { status, headers, body })
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Result<Response> {
        self.send(request(Method::GET, uri, token, None)?).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> Result<Response> {
        self.send(request(Method::POST, uri, token, Some(body.to_string()))?).await
    }

    pub async fn post_raw(&self, uri: &str, token: Option<&str>, body: &str) -> Result<Response> {
        self.send(request(Method::POST, uri, token, Some(body.to_string()))?).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> Result<Response> {
        self.send(request(Method::DELETE, uri, token, None)?).await
    }
}

pub fn request(method: Method, uri: &str, token: Option<&str>, body: Option<String>) -> Result<Request<Body>> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))?,
        None => builder.body(Body::empty())?,
    };
    Ok(request)
}

/// Store that fails every call the way a lost database connection would
#[derive(Debug, Clone, Default)]
pub struct FailingStore {
    user: Option<User>,
}

impl FailingStore {
    fn fail<T>() -> Result<T, DatabaseError> {
        Err(DatabaseError::QueryError(STORE_FAILURE.to_string()))
    }
}

#[async_trait]
impl Store for FailingStore {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        Self::fail()
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        match &self.user {
            Some(user) if user.id == id => Ok(Some(user.clone())),
            _ => Self::fail(),
        }
    }

    async fn find_user_by_email(&self, _email: &str) -> Result<Option<User>, DatabaseError> {
        Self::fail()
    }

    async fn create_user(&self, _new: NewUser) -> Result<User, DatabaseError> {
        Self::fail()
    }

    async fn list_categories(&self, _user_id: Uuid) -> Result<Vec<ExpenseCategory>, DatabaseError> {
        Self::fail()
    }

    async fn find_category(&self, _id: Uuid, _user_id: Uuid) -> Result<Option<ExpenseCategory>, DatabaseError> {
        Self::fail()
    }

    async fn create_category(
        &self,
        _user_id: Uuid,
        _new: &NewExpenseCategory,
    ) -> Result<ExpenseCategory, DatabaseError> {
        Self::fail()
    }

    async fn delete_category(&self, _id: Uuid, _user_id: Uuid) -> Result<u64, DatabaseError> {
        Self::fail()
    }

    async fn list_expenses(&self, _user_id: Uuid) -> Result<Vec<Expense>, DatabaseError> {
        Self::fail()
    }

    async fn find_expense(&self, _id: Uuid, _user_id: Uuid) -> Result<Option<Expense>, DatabaseError> {
        Self::fail()
    }

    async fn create_expense(
        &self,
        _user_id: Uuid,
        _new: &NewExpense,
        _category: ExpenseCategory,
    ) -> Result<Expense, DatabaseError> {
        Self::fail()
    }

    async fn delete_expense(&self, _id: Uuid, _user_id: Uuid) -> Result<u64, DatabaseError> {
        Self::fail()
    }
}

/// Failure envelopes carry exactly `success`, `message` and optionally `errors`
pub fn assert_failure(response: &Response, status: StatusCode, message: &str) {
    assert_eq!(response.status, status, "body: {}", response.body);
    assert_eq!(response.body["success"], false);
    assert_eq!(response.body["message"], message);
    assert!(response.body.get("data").is_none());
}

pub fn assert_success(response: &Response, status: StatusCode) -> &Value {
    assert_eq!(response.status, status, "body: {}", response.body);
    assert_eq!(response.body["success"], true);
    assert!(response.body.get("message").is_none());
    &response.body["data"]
}

/// Create a category through the API and return its id
pub async fn create_category(app: &TestApp, token: &str, nome: &str) -> Result<String> {
    let response = app
        .post("/api/expense-categories", Some(token), serde_json::json!({ "nome": nome }))
        .await?;
    assert_eq!(response.status, StatusCode::CREATED, "body: {}", response.body);
    response.body["data"]["id"]
        .as_str()
        .map(str::to_string)
        .context("category id missing")
}

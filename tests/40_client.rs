mod common;

use std::collections::VecDeque;

use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;

use common::{TestApp, PASSWORD};
use fintrack_api::client::{ApiClient, ClientError, ListState, Prompt, Registration, ResourceList};
use fintrack_api::database::models::{Expense, ExpenseCategory, Natureza, NewExpense, NewExpenseCategory};

/// Prompt with queued answers that records everything shown to the user
#[derive(Default)]
struct ScriptedPrompt {
    answers: VecDeque<bool>,
    questions: Vec<String>,
    notices: Vec<String>,
}

impl ScriptedPrompt {
    fn answering(answers: &[bool]) -> Self {
        Self {
            answers: answers.iter().copied().collect(),
            ..Self::default()
        }
    }
}

impl Prompt for ScriptedPrompt {
    fn notify(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }

    fn confirm(&mut self, question: &str) -> bool {
        self.questions.push(question.to_string());
        self.answers.pop_front().unwrap_or(false)
    }
}

/// Serve a fresh app on a free port and return its base URL
async fn serve() -> Result<String> {
    let app = TestApp::new();
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app.router).await {
            eprintln!("test server stopped: {}", e);
        }
    });

    Ok(format!("http://127.0.0.1:{}", port))
}

async fn logged_in_client(base_url: &str, email: &str) -> Result<ApiClient> {
    let mut client = ApiClient::new(base_url)?;
    client
        .register(&Registration {
            name: "Ana Souza".into(),
            email: email.into(),
            password: PASSWORD.into(),
            confirm_password: PASSWORD.into(),
            accept_terms: true,
        })
        .await?;
    client.login(email, PASSWORD).await?;
    Ok(client)
}

fn category(nome: &str) -> NewExpenseCategory {
    NewExpenseCategory {
        nome: nome.into(),
        descricao: None,
    }
}

#[tokio::test]
async fn login_round_trip_through_client() -> Result<()> {
    let base_url = serve().await?;
    let mut client = logged_in_client(&base_url, "ana@example.com").await?;

    let me = client.me().await?;
    assert_eq!(me.email, "ana@example.com");
    assert_eq!(me.display_name, "Ana Souza");

    client.logout().await?;
    assert!(client.token().is_none());

    let err = client.me().await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.to_string(), "access token not provided");
    Ok(())
}

#[tokio::test]
async fn duplicate_registration_surfaces_server_message() -> Result<()> {
    let base_url = serve().await?;
    let client = logged_in_client(&base_url, "ana@example.com").await?;

    let err = client
        .register(&Registration {
            name: "Ana Again".into(),
            email: "ana@example.com".into(),
            password: PASSWORD.into(),
            confirm_password: PASSWORD.into(),
            accept_terms: true,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Api { status: 409, .. }));
    assert_eq!(err.to_string(), "email already in use");
    Ok(())
}

#[tokio::test]
async fn mount_fetches_and_create_prepends() -> Result<()> {
    let base_url = serve().await?;
    let client = logged_in_client(&base_url, "ana@example.com").await?;

    let mut list: ResourceList<ExpenseCategory, _> =
        ResourceList::mount(client, ScriptedPrompt::default()).await;
    assert_eq!(list.state(), &ListState::Ready);
    assert!(list.items().is_empty());

    let first = list.create(&category("Food")).await.context("create Food")?;
    let second = list.create(&category("Rent")).await.context("create Rent")?;

    let ids: Vec<_> = list.items().iter().map(|c| c.id).collect();
    assert_eq!(ids, [second.id, first.id]);

    // Server order replaces local order on refresh
    list.refresh().await;
    let names: Vec<_> = list.items().iter().map(|c| c.nome.as_str()).collect();
    assert_eq!(names, ["Food", "Rent"]);
    assert!(!list.loading());
    Ok(())
}

#[tokio::test]
async fn failed_create_notifies_and_leaves_items() -> Result<()> {
    let base_url = serve().await?;
    let client = logged_in_client(&base_url, "ana@example.com").await?;

    let mut list: ResourceList<ExpenseCategory, _> =
        ResourceList::mount(client, ScriptedPrompt::default()).await;
    list.create(&category("Food")).await.context("create Food")?;

    assert!(list.create(&category("Food")).await.is_none());
    assert_eq!(list.items().len(), 1);

    let notice = list.prompt().notices.last().cloned().unwrap_or_default();
    assert!(notice.contains("a category with this name already exists"), "{}", notice);
    Ok(())
}

#[tokio::test]
async fn delete_asks_first_and_respects_the_answer() -> Result<()> {
    let base_url = serve().await?;
    let client = logged_in_client(&base_url, "ana@example.com").await?;

    let mut list: ResourceList<ExpenseCategory, _> =
        ResourceList::mount(client, ScriptedPrompt::answering(&[false, true])).await;
    let food = list.create(&category("Food")).await.context("create Food")?;

    assert!(!list.delete(food.id).await);
    assert_eq!(list.items().len(), 1);

    assert!(list.delete(food.id).await);
    assert!(list.items().is_empty());
    assert_eq!(list.prompt().questions.len(), 2);

    // Already gone on the server: confirmed again, then rejected
    list.prompt_mut().answers.push_back(true);
    assert!(!list.delete(food.id).await);
    assert_eq!(list.prompt().notices.len(), 1);
    Ok(())
}

#[tokio::test]
async fn refresh_failure_keeps_items_and_reports_message() -> Result<()> {
    let base_url = serve().await?;
    let client = logged_in_client(&base_url, "ana@example.com").await?;

    let mut list: ResourceList<ExpenseCategory, _> =
        ResourceList::mount(client.clone(), ScriptedPrompt::default()).await;
    list.create(&category("Food")).await.context("create Food")?;

    let mut anonymous = client;
    anonymous.set_token(None);
    let mut stale: ResourceList<ExpenseCategory, _> =
        ResourceList::mount(anonymous, ScriptedPrompt::default()).await;

    assert_eq!(
        stale.state(),
        &ListState::Failed("access token not provided".to_string())
    );
    assert!(stale.items().is_empty());
    assert_eq!(stale.prompt().notices.len(), 1);

    stale.refresh().await;
    assert!(!stale.loading());
    assert_eq!(list.items().len(), 1);
    Ok(())
}

#[tokio::test]
async fn failed_refresh_of_a_populated_list_keeps_its_items() -> Result<()> {
    let base_url = serve().await?;
    let client = logged_in_client(&base_url, "ana@example.com").await?;

    let mut list: ResourceList<ExpenseCategory, _> =
        ResourceList::mount(client, ScriptedPrompt::default()).await;
    let food = list.create(&category("Food")).await.context("create Food")?;
    assert_eq!(list.state(), &ListState::Ready);

    list.client_mut().set_token(None);
    list.refresh().await;

    assert_eq!(list.items().len(), 1);
    assert_eq!(list.items()[0].id, food.id);
    assert_eq!(
        list.state(),
        &ListState::Failed("access token not provided".to_string())
    );
    assert_eq!(list.prompt().notices.len(), 1);
    Ok(())
}

#[tokio::test]
async fn expenses_come_back_with_their_category() -> Result<()> {
    let base_url = serve().await?;
    let client = logged_in_client(&base_url, "ana@example.com").await?;

    let mut categories: ResourceList<ExpenseCategory, _> =
        ResourceList::mount(client.clone(), ScriptedPrompt::default()).await;
    let food = categories.create(&category("Food")).await.context("create Food")?;

    let mut expenses: ResourceList<Expense, _> =
        ResourceList::mount(client, ScriptedPrompt::default()).await;
    let created = expenses
        .create(&NewExpense {
            valor: Decimal::new(4250, 2),
            data: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).single().context("date")?,
            natureza: Natureza::Superfluo,
            category_id: food.id,
        })
        .await
        .context("create expense")?;

    assert_eq!(created.category.id, food.id);
    assert_eq!(created.valor, Decimal::new(4250, 2));

    expenses.refresh().await;
    assert_eq!(expenses.items(), &[created]);
    Ok(())
}

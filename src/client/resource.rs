//! Client-side collection state for one API resource.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::ApiClient;
use crate::database::models::{Expense, ExpenseCategory, NewExpense, NewExpenseCategory};
use crate::messages::Message;

/// A collection item the API can list, create and delete.
pub trait Resource: DeserializeOwned + Clone {
    /// Body accepted by the create endpoint
    type Input: Serialize + Sync;

    /// Collection path relative to the server root
    const PATH: &'static str;

    fn id(&self) -> Uuid;
}

impl Resource for ExpenseCategory {
    type Input = NewExpenseCategory;
    const PATH: &'static str = "api/expense-categories";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Resource for Expense {
    type Input = NewExpense;
    const PATH: &'static str = "api/expenses";

    fn id(&self) -> Uuid {
        self.id
    }
}

/// User interaction the list needs: a blocking notice and a yes/no guard
/// before destructive actions.
pub trait Prompt {
    fn notify(&mut self, message: &str);
    fn confirm(&mut self, question: &str) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListState {
    Idle,
    Loading,
    Ready,
    Failed(String),
}

/// Cached collection with explicit fetch state.
///
/// Operations take `&mut self`, so one list never has two requests in flight.
/// Failures never touch `items`; the server's message is passed to the
/// [`Prompt`].
pub struct ResourceList<T: Resource, P: Prompt> {
    client: ApiClient,
    prompt: P,
    items: Vec<T>,
    state: ListState,
}

impl<T: Resource, P: Prompt> ResourceList<T, P> {
    pub fn new(client: ApiClient, prompt: P) -> Self {
        Self {
            client,
            prompt,
            items: Vec::new(),
            state: ListState::Idle,
        }
    }

    /// Build the list and run the initial fetch
    pub async fn mount(client: ApiClient, prompt: P) -> Self {
        let mut list = Self::new(client, prompt);
        list.refresh().await;
        list
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn loading(&self) -> bool {
        self.state == ListState::Loading
    }

    pub fn prompt(&self) -> &P {
        &self.prompt
    }

    pub fn prompt_mut(&mut self) -> &mut P {
        &mut self.prompt
    }

    /// The underlying client, e.g. to swap or drop its token
    pub fn client_mut(&mut self) -> &mut ApiClient {
        &mut self.client
    }

    /// Replace `items` with the server's list, in server order
    pub async fn refresh(&mut self) {
        self.state = ListState::Loading;

        match self.client.get::<Vec<T>>(T::PATH).await {
            Ok(items) => {
                self.items = items;
                self.state = ListState::Ready;
            }
            Err(e) => {
                tracing::debug!("Fetching {} failed: {}", T::PATH, e);
                let message = e.to_string();
                self.prompt
                    .notify(&format!("{}: {}", Message::FetchItemsFailed.text(), message));
                self.state = ListState::Failed(message);
            }
        }
    }

    /// Create on the server and prepend the stored item
    pub async fn create(&mut self, input: &T::Input) -> Option<T> {
        match self.client.post::<_, T>(T::PATH, input).await {
            Ok(item) => {
                self.items.insert(0, item.clone());
                Some(item)
            }
            Err(e) => {
                self.prompt
                    .notify(&format!("{}: {}", Message::CreateItemFailed.text(), e));
                None
            }
        }
    }

    /// Delete after confirmation; `false` when declined or rejected
    pub async fn delete(&mut self, id: Uuid) -> bool {
        if !self.prompt.confirm(Message::ConfirmDeleteItem.text()) {
            return false;
        }

        let path = format!("{}/{}", T::PATH, id);
        match self.client.delete::<Value>(&path).await {
            Ok(_) => {
                self.items.retain(|item| item.id() != id);
                true
            }
            Err(e) => {
                self.prompt
                    .notify(&format!("{}: {}", Message::DeleteItemFailed.text(), e));
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Silent;

    impl Prompt for Silent {
        fn notify(&mut self, _message: &str) {}
        fn confirm(&mut self, _question: &str) -> bool {
            false
        }
    }

    #[tokio::test]
    async fn declined_delete_sends_nothing() {
        // Nothing listens on this port; a request would surface as an error
        let client = ApiClient::new("http://127.0.0.1:9").unwrap();
        let mut list: ResourceList<ExpenseCategory, Silent> = ResourceList::new(client, Silent);

        assert!(!list.delete(Uuid::new_v4()).await);
        assert_eq!(list.state(), &ListState::Idle);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_items_and_records_message() {
        let client = ApiClient::new("http://127.0.0.1:9").unwrap();
        let mut list: ResourceList<Expense, Silent> = ResourceList::new(client, Silent);

        list.refresh().await;
        assert!(list.items().is_empty());
        assert!(matches!(list.state(), ListState::Failed(_)));
        assert!(!list.loading());
    }
}

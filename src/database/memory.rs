use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{Expense, ExpenseCategory, NewExpense, NewExpenseCategory, NewUser, User};
use super::store::Store;

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    categories: HashMap<Uuid, ExpenseCategory>,
    expenses: HashMap<Uuid, Expense>,
}

/// In-process `Store` used when no database is configured, and by tests.
///
/// Constraint checks run under the write lock, so they hold under
/// concurrent requests the same way the PostgreSQL indexes do.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a ready-made user, bypassing registration
    pub async fn insert_user(&self, user: User) {
        self.tables.write().await.users.insert(user.id, user);
    }

    /// Remove a user and everything they own
    pub async fn remove_user(&self, id: Uuid) {
        let mut tables = self.tables.write().await;
        tables.users.remove(&id);
        tables.categories.retain(|_, c| c.user_id != id);
        tables.expenses.retain(|_, e| e.user_id != id);
    }

    pub async fn expense_count(&self) -> usize {
        self.tables.read().await.expenses.len()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn create_user(&self, new: NewUser) -> Result<User, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == new.email) {
            return Err(DatabaseError::UniqueViolation(format!("users.email = {}", new.email)));
        }

        let user = User::from_new(new);
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn list_categories(&self, user_id: Uuid) -> Result<Vec<ExpenseCategory>, DatabaseError> {
        let tables = self.tables.read().await;
        let mut categories: Vec<ExpenseCategory> = tables
            .categories
            .values()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        categories.sort_by(|a, b| {
            a.nome
                .to_lowercase()
                .cmp(&b.nome.to_lowercase())
                .then_with(|| a.nome.cmp(&b.nome))
        });
        Ok(categories)
    }

    async fn find_category(&self, id: Uuid, user_id: Uuid) -> Result<Option<ExpenseCategory>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .categories
            .get(&id)
            .filter(|c| c.user_id == user_id)
            .cloned())
    }

    async fn create_category(
        &self,
        user_id: Uuid,
        new: &NewExpenseCategory,
    ) -> Result<ExpenseCategory, DatabaseError> {
        let mut tables = self.tables.write().await;
        let taken = tables
            .categories
            .values()
            .any(|c| c.user_id == user_id && c.nome == new.nome);
        if taken {
            return Err(DatabaseError::UniqueViolation(format!(
                "expense_categories (user_id, nome) = ({}, {})",
                user_id, new.nome
            )));
        }

        let category = ExpenseCategory::from_new(user_id, new);
        tables.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn delete_category(&self, id: Uuid, user_id: Uuid) -> Result<u64, DatabaseError> {
        let mut tables = self.tables.write().await;
        let owned = tables.categories.get(&id).is_some_and(|c| c.user_id == user_id);
        if !owned {
            return Ok(0);
        }
        if tables.expenses.values().any(|e| e.category_id == id) {
            return Err(DatabaseError::ForeignKeyViolation(format!(
                "expenses.category_id references {}",
                id
            )));
        }

        tables.categories.remove(&id);
        Ok(1)
    }

    async fn list_expenses(&self, user_id: Uuid) -> Result<Vec<Expense>, DatabaseError> {
        let tables = self.tables.read().await;
        let mut expenses: Vec<Expense> = tables
            .expenses
            .values()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        expenses.sort_by(|a, b| b.data.cmp(&a.data).then(b.created_at.cmp(&a.created_at)));
        Ok(expenses)
    }

    async fn find_expense(&self, id: Uuid, user_id: Uuid) -> Result<Option<Expense>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.expenses.get(&id).filter(|e| e.user_id == user_id).cloned())
    }

    async fn create_expense(
        &self,
        user_id: Uuid,
        new: &NewExpense,
        category: ExpenseCategory,
    ) -> Result<Expense, DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.categories.contains_key(&category.id) {
            return Err(DatabaseError::ForeignKeyViolation(format!(
                "expense_categories.id = {}",
                category.id
            )));
        }

        let expense = Expense::from_new(user_id, new, category);
        tables.expenses.insert(expense.id, expense.clone());
        Ok(expense)
    }

    async fn delete_expense(&self, id: Uuid, user_id: Uuid) -> Result<u64, DatabaseError> {
        let mut tables = self.tables.write().await;
        let owned = tables.expenses.get(&id).is_some_and(|e| e.user_id == user_id);
        if owned {
            tables.expenses.remove(&id);
            Ok(1)
        } else {
            Ok(0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use rust_decimal::Decimal;

    use crate::database::models::Natureza;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            nome: "Test".into(),
            email: email.into(),
            senha: "hash".into(),
        }
    }

    fn new_category(nome: &str) -> NewExpenseCategory {
        NewExpenseCategory {
            nome: nome.into(),
            descricao: None,
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_unique_violation() {
        let store = MemoryStore::new();
        store.create_user(new_user("a@example.com")).await.unwrap();

        let err = store.create_user(new_user("a@example.com")).await.unwrap_err();
        assert!(err.is_unique_violation());
    }

    #[tokio::test]
    async fn category_names_are_unique_per_user() {
        let store = MemoryStore::new();
        let alice = store.create_user(new_user("a@example.com")).await.unwrap();
        let bob = store.create_user(new_user("b@example.com")).await.unwrap();

        store.create_category(alice.id, &new_category("Food")).await.unwrap();
        let err = store.create_category(alice.id, &new_category("Food")).await.unwrap_err();
        assert!(err.is_unique_violation());

        store.create_category(bob.id, &new_category("Food")).await.unwrap();
    }

    #[tokio::test]
    async fn categories_sorted_and_scoped() {
        let store = MemoryStore::new();
        let alice = store.create_user(new_user("a@example.com")).await.unwrap();
        let bob = store.create_user(new_user("b@example.com")).await.unwrap();

        for nome in ["Transport", "Food", "Health"] {
            store.create_category(alice.id, &new_category(nome)).await.unwrap();
        }
        store.create_category(bob.id, &new_category("Books")).await.unwrap();

        let names: Vec<String> = store
            .list_categories(alice.id)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.nome)
            .collect();
        assert_eq!(names, vec!["Food", "Health", "Transport"]);
    }

    #[tokio::test]
    async fn expenses_newest_first_and_delete_scoped() {
        let store = MemoryStore::new();
        let alice = store.create_user(new_user("a@example.com")).await.unwrap();
        let bob = store.create_user(new_user("b@example.com")).await.unwrap();
        let food = store.create_category(alice.id, &new_category("Food")).await.unwrap();

        let now = Utc::now();
        let mut ids = Vec::new();
        for days in [3, 1, 2] {
            let new = NewExpense {
                valor: Decimal::new(1000, 2),
                data: now - Duration::days(days),
                natureza: Natureza::Necessario,
                category_id: food.id,
            };
            ids.push(store.create_expense(alice.id, &new, food.clone()).await.unwrap().id);
        }

        let listed: Vec<Uuid> = store
            .list_expenses(alice.id)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(listed, vec![ids[1], ids[2], ids[0]]);

        assert_eq!(store.delete_expense(ids[0], bob.id).await.unwrap(), 0);
        assert_eq!(store.delete_expense(ids[0], alice.id).await.unwrap(), 1);
        assert_eq!(store.delete_expense(ids[0], alice.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn category_with_expenses_cannot_be_deleted() {
        let store = MemoryStore::new();
        let alice = store.create_user(new_user("a@example.com")).await.unwrap();
        let food = store.create_category(alice.id, &new_category("Food")).await.unwrap();
        let new = NewExpense {
            valor: Decimal::ONE,
            data: Utc::now(),
            natureza: Natureza::Superfluo,
            category_id: food.id,
        };
        store.create_expense(alice.id, &new, food.clone()).await.unwrap();

        let err = store.delete_category(food.id, alice.id).await.unwrap_err();
        assert!(matches!(err, DatabaseError::ForeignKeyViolation(_)));
    }
}

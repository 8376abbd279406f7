use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{Expense, ExpenseCategory, Natureza, NewExpense, NewExpenseCategory, NewUser, User};
use super::store::Store;

const USER_COLUMNS: &str = "id, nome, email, senha, tipo, created_at, updated_at";
const CATEGORY_COLUMNS: &str = "id, nome, descricao, user_id, created_at";

/// Expense columns plus the joined category, prefixed `c_`
const EXPENSE_SELECT: &str = r#"
    SELECT
        e.id, e.valor, e.data, e.natureza, e.category_id, e.user_id,
        e.created_at, e.updated_at,
        c.id AS c_id, c.nome AS c_nome, c.descricao AS c_descricao,
        c.user_id AS c_user_id, c.created_at AS c_created_at
    FROM expenses e
    JOIN expense_categories c ON c.id = e.category_id
"#;

#[derive(Debug, FromRow)]
struct ExpenseRow {
    id: Uuid,
    valor: Decimal,
    data: DateTime<Utc>,
    #[sqlx(try_from = "String")]
    natureza: Natureza,
    category_id: Uuid,
    user_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    c_id: Uuid,
    c_nome: String,
    c_descricao: Option<String>,
    c_user_id: Uuid,
    c_created_at: DateTime<Utc>,
}

impl From<ExpenseRow> for Expense {
    fn from(row: ExpenseRow) -> Self {
        Expense {
            id: row.id,
            valor: row.valor,
            data: row.data,
            natureza: row.natureza,
            category_id: row.category_id,
            user_id: row.user_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
            category: ExpenseCategory {
                id: row.c_id,
                nome: row.c_nome,
                descricao: row.c_descricao,
                user_id: row.c_user_id,
                created_at: row.c_created_at,
            },
        }
    }
}

/// `Store` backed by PostgreSQL
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn create_user(&self, new: NewUser) -> Result<User, DatabaseError> {
        let user = User::from_new(new);
        let sql = format!(
            "INSERT INTO users ({cols}) VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {cols}",
            cols = USER_COLUMNS
        );
        let created = sqlx::query_as::<_, User>(&sql)
            .bind(user.id)
            .bind(&user.nome)
            .bind(&user.email)
            .bind(&user.senha)
            .bind(user.tipo.as_str())
            .bind(user.created_at)
            .bind(user.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn list_categories(&self, user_id: Uuid) -> Result<Vec<ExpenseCategory>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM expense_categories WHERE user_id = $1 ORDER BY lower(nome) ASC, nome ASC",
            CATEGORY_COLUMNS
        );
        let categories = sqlx::query_as::<_, ExpenseCategory>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(categories)
    }

    async fn find_category(&self, id: Uuid, user_id: Uuid) -> Result<Option<ExpenseCategory>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM expense_categories WHERE id = $1 AND user_id = $2",
            CATEGORY_COLUMNS
        );
        let category = sqlx::query_as::<_, ExpenseCategory>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(category)
    }

    async fn create_category(
        &self,
        user_id: Uuid,
        new: &NewExpenseCategory,
    ) -> Result<ExpenseCategory, DatabaseError> {
        let category = ExpenseCategory::from_new(user_id, new);
        let sql = format!(
            "INSERT INTO expense_categories ({cols}) VALUES ($1, $2, $3, $4, $5) RETURNING {cols}",
            cols = CATEGORY_COLUMNS
        );
        let created = sqlx::query_as::<_, ExpenseCategory>(&sql)
            .bind(category.id)
            .bind(&category.nome)
            .bind(&category.descricao)
            .bind(category.user_id)
            .bind(category.created_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn delete_category(&self, id: Uuid, user_id: Uuid) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM expense_categories WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn list_expenses(&self, user_id: Uuid) -> Result<Vec<Expense>, DatabaseError> {
        let sql = format!(
            "{} WHERE e.user_id = $1 ORDER BY e.data DESC, e.created_at DESC",
            EXPENSE_SELECT
        );
        let rows = sqlx::query_as::<_, ExpenseRow>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Expense::from).collect())
    }

    async fn find_expense(&self, id: Uuid, user_id: Uuid) -> Result<Option<Expense>, DatabaseError> {
        let sql = format!("{} WHERE e.id = $1 AND e.user_id = $2", EXPENSE_SELECT);
        let row = sqlx::query_as::<_, ExpenseRow>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Expense::from))
    }

    async fn create_expense(
        &self,
        user_id: Uuid,
        new: &NewExpense,
        category: ExpenseCategory,
    ) -> Result<Expense, DatabaseError> {
        let expense = Expense::from_new(user_id, new, category);
        sqlx::query(
            "INSERT INTO expenses (id, valor, data, natureza, category_id, user_id, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(expense.id)
        .bind(expense.valor)
        .bind(expense.data)
        .bind(expense.natureza.as_str())
        .bind(expense.category_id)
        .bind(expense.user_id)
        .bind(expense.created_at)
        .bind(expense.updated_at)
        .execute(&self.pool)
        .await?;

        // Re-read so the response reflects stored precision and the joined row
        self.find_expense(expense.id, user_id)
            .await?
            .ok_or_else(|| DatabaseError::QueryError(format!("expense {} vanished after insert", expense.id)))
    }

    async fn delete_expense(&self, id: Uuid, user_id: Uuid) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

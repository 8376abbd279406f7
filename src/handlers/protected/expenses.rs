// handlers/protected/expenses.rs - /api/expenses handlers

use axum::{
    body::Bytes,
    extract::{Path, State},
    Extension,
};
use serde_json::{json, Value};

use super::parse_id;
use crate::app::AppState;
use crate::database::manager::DatabaseError;
use crate::database::models::{Expense, NewExpense};
use crate::error::ApiError;
use crate::messages::Message;
use crate::middleware::{ApiResponse, ApiResult, Identity};
use crate::validation::{parse_body, schemas};

/// GET /api/expenses - The caller's expenses, newest `data` first, each with
/// its category embedded
pub async fn list(
    Extension(identity): Extension<Identity>,
    State(state): State<AppState>,
) -> ApiResult<Vec<Expense>> {
    let expenses = state
        .store
        .list_expenses(identity.id)
        .await
        .map_err(|e| e.into_internal(Message::ExpenseListFailed))?;

    Ok(ApiResponse::success(expenses))
}

/**
 * POST /api/expenses - Record an expense
 *
 * Expected Input:
 * ```json
 * {
 *   "valor": 42.5,
 *   "data": "2024-03-01",
 *   "natureza": "NECESSARIO",
 *   "categoryId": "category_uuid"
 * }
 * ```
 *
 * `categoryId` must name one of the caller's own categories; anything else is
 * reported as a field error on `categoryId`.
 */
pub async fn create(
    Extension(identity): Extension<Identity>,
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Expense> {
    let new: NewExpense = parse_body(&body, &schemas::CREATE_EXPENSE)?;

    let category = state
        .store
        .find_category(new.category_id, identity.id)
        .await
        .map_err(|e| e.into_internal(Message::ExpenseCreateFailed))?
        .ok_or_else(|| ApiError::invalid_field("categoryId", Message::UnknownCategory))?;

    match state.store.create_expense(identity.id, &new, category).await {
        Ok(expense) => {
            tracing::info!("User {} recorded expense {}", identity.id, expense.id);
            Ok(ApiResponse::created(expense))
        }
        // Category removed between lookup and insert
        Err(DatabaseError::ForeignKeyViolation(_)) => {
            Err(ApiError::invalid_field("categoryId", Message::UnknownCategory))
        }
        Err(e) => Err(e.into_internal(Message::ExpenseCreateFailed)),
    }
}

/// DELETE /api/expenses/:id - Remove one of the caller's expenses
pub async fn remove(
    Extension(identity): Extension<Identity>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let id = parse_id(&id, Message::ExpenseNotFound)?;

    let existing = state
        .store
        .find_expense(id, identity.id)
        .await
        .map_err(|e| e.into_internal(Message::ExpenseDeleteFailed))?;
    if existing.is_none() {
        return Err(ApiError::not_found(Message::ExpenseNotFound.text()));
    }

    let deleted = state
        .store
        .delete_expense(id, identity.id)
        .await
        .map_err(|e| e.into_internal(Message::ExpenseDeleteFailed))?;
    if deleted == 0 {
        return Err(ApiError::not_found(Message::ExpenseNotFound.text()));
    }

    tracing::info!("User {} deleted expense {}", identity.id, id);
    Ok(ApiResponse::success(json!({ "message": Message::ExpenseDeleted.text() })))
}

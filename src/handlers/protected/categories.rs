// handlers/protected/categories.rs - /api/expense-categories handlers

use axum::{
    body::Bytes,
    extract::{Path, State},
    Extension,
};
use serde_json::{json, Value};

use super::parse_id;
use crate::app::AppState;
use crate::database::manager::DatabaseError;
use crate::database::models::{ExpenseCategory, NewExpenseCategory};
use crate::error::ApiError;
use crate::messages::Message;
use crate::middleware::{ApiResponse, ApiResult, Identity};
use crate::validation::{parse_body, schemas};

/// GET /api/expense-categories - The caller's categories by name
pub async fn list(
    Extension(identity): Extension<Identity>,
    State(state): State<AppState>,
) -> ApiResult<Vec<ExpenseCategory>> {
    let categories = state
        .store
        .list_categories(identity.id)
        .await
        .map_err(|e| e.into_internal(Message::CategoryListFailed))?;

    Ok(ApiResponse::success(categories))
}

/// POST /api/expense-categories - Create a category
///
/// ```json
/// { "nome": "Mercado", "descricao": "Compras do mês" }
/// ```
///
/// Names are unique per user; a repeat answers 409.
pub async fn create(
    Extension(identity): Extension<Identity>,
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<ExpenseCategory> {
    let new: NewExpenseCategory = parse_body(&body, &schemas::CREATE_EXPENSE_CATEGORY)?;

    match state.store.create_category(identity.id, &new).await {
        Ok(category) => {
            tracing::info!("User {} created category {}", identity.id, category.id);
            Ok(ApiResponse::created(category))
        }
        Err(e) if e.is_unique_violation() => Err(ApiError::conflict(Message::CategoryNameTaken.text())),
        Err(e) => Err(e.into_internal(Message::CategoryCreateFailed)),
    }
}

/// DELETE /api/expense-categories/:id - Remove an unused category
///
/// Categories still referenced by expenses answer 409 and stay in place.
pub async fn remove(
    Extension(identity): Extension<Identity>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let id = parse_id(&id, Message::CategoryNotFound)?;

    let existing = state
        .store
        .find_category(id, identity.id)
        .await
        .map_err(|e| e.into_internal(Message::CategoryDeleteFailed))?;
    if existing.is_none() {
        return Err(ApiError::not_found(Message::CategoryNotFound.text()));
    }

    let deleted = match state.store.delete_category(id, identity.id).await {
        Ok(deleted) => deleted,
        Err(DatabaseError::ForeignKeyViolation(_)) => {
            return Err(ApiError::conflict(Message::CategoryInUse.text()))
        }
        Err(e) => return Err(e.into_internal(Message::CategoryDeleteFailed)),
    };
    if deleted == 0 {
        return Err(ApiError::not_found(Message::CategoryNotFound.text()));
    }

    tracing::info!("User {} deleted category {}", identity.id, id);
    Ok(ApiResponse::success(json!({ "message": Message::CategoryDeleted.text() })))
}

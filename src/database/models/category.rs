use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseCategory {
    pub id: Uuid,
    pub nome: String,
    pub descricao: Option<String>,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Validated body of `POST /api/expense-categories`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewExpenseCategory {
    pub nome: String,
    #[serde(default)]
    pub descricao: Option<String>,
}

impl NewExpenseCategory {
    /// Blank descriptions are stored as null
    pub fn normalized_descricao(&self) -> Option<String> {
        self.descricao
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string)
    }
}

impl ExpenseCategory {
    pub fn from_new(user_id: Uuid, new: &NewExpenseCategory) -> Self {
        Self {
            id: Uuid::new_v4(),
            nome: new.nome.clone(),
            descricao: new.normalized_descricao(),
            user_id,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_descricao_becomes_none() {
        let new = NewExpenseCategory {
            nome: "Food".into(),
            descricao: Some("   ".into()),
        };
        assert_eq!(new.normalized_descricao(), None);

        let new = NewExpenseCategory {
            nome: "Food".into(),
            descricao: Some("groceries".into()),
        };
        assert_eq!(new.normalized_descricao().as_deref(), Some("groceries"));
    }

    #[test]
    fn serializes_camel_case() {
        let category = ExpenseCategory::from_new(
            Uuid::new_v4(),
            &NewExpenseCategory { nome: "Food".into(), descricao: None },
        );
        let value = serde_json::to_value(&category).unwrap();
        assert!(value.get("userId").is_some());
        assert!(value["descricao"].is_null());
    }
}

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::category::ExpenseCategory;

/// Nature of an expense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Natureza {
    #[serde(rename = "NECESSARIO")]
    Necessario,
    #[serde(rename = "SUPERFLUO")]
    Superfluo,
    #[serde(rename = "EMERGENCIAL")]
    Emergencial,
}

impl Natureza {
    pub const VALUES: &'static [&'static str] = &["NECESSARIO", "SUPERFLUO", "EMERGENCIAL"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Natureza::Necessario => "NECESSARIO",
            Natureza::Superfluo => "SUPERFLUO",
            Natureza::Emergencial => "EMERGENCIAL",
        }
    }
}

impl TryFrom<String> for Natureza {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "NECESSARIO" => Ok(Natureza::Necessario),
            "SUPERFLUO" => Ok(Natureza::Superfluo),
            "EMERGENCIAL" => Ok(Natureza::Emergencial),
            other => Err(format!("unknown natureza: {}", other)),
        }
    }
}

impl std::fmt::Display for Natureza {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An expense with its owning category joined in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: Uuid,
    #[serde(with = "rust_decimal::serde::float")]
    pub valor: Decimal,
    pub data: DateTime<Utc>,
    pub natureza: Natureza,
    pub category_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub category: ExpenseCategory,
}

/// Validated body of `POST /api/expenses`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub valor: Decimal,
    pub data: DateTime<Utc>,
    pub natureza: Natureza,
    pub category_id: Uuid,
}

impl Expense {
    pub fn from_new(user_id: Uuid, new: &NewExpense, category: ExpenseCategory) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            valor: new.valor,
            data: new.data,
            natureza: new.natureza,
            category_id: new.category_id,
            user_id,
            created_at: now,
            updated_at: now,
            category,
        }
    }
}

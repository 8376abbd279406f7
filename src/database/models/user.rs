use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TipoUsuario {
    PessoaFisica,
    PessoaJuridica,
}

impl TipoUsuario {
    pub fn as_str(&self) -> &'static str {
        match self {
            TipoUsuario::PessoaFisica => "PESSOA_FISICA",
            TipoUsuario::PessoaJuridica => "PESSOA_JURIDICA",
        }
    }
}

impl TryFrom<String> for TipoUsuario {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "PESSOA_FISICA" => Ok(TipoUsuario::PessoaFisica),
            "PESSOA_JURIDICA" => Ok(TipoUsuario::PessoaJuridica),
            other => Err(format!("unknown user type: {}", other)),
        }
    }
}

impl Default for TipoUsuario {
    fn default() -> Self {
        TipoUsuario::PessoaFisica
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub nome: String,
    pub email: String,
    #[serde(default, skip_serializing)]
    pub senha: String,
    #[sqlx(try_from = "String")]
    pub tipo: TipoUsuario,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields needed to insert a user; `senha` is already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub nome: String,
    pub email: String,
    pub senha: String,
}

impl User {
    pub fn from_new(new: NewUser) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            nome: new.nome,
            email: new.email,
            senha: new.senha,
            tipo: TipoUsuario::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

//! Client-facing message catalog.
//!
//! Handlers pick a [`Message`] for the error kind they report; the text is
//! rendered in the configured [`Locale`]. Status codes never depend on the
//! locale.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Locale {
    #[serde(rename = "en")]
    En,
    #[serde(rename = "pt-BR")]
    PtBr,
}

impl Locale {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "en" | "en-us" | "en_us" => Some(Locale::En),
            "pt" | "pt-br" | "pt_br" => Some(Locale::PtBr),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    // Request validation
    InvalidRequestFormat,
    InvalidData,

    // Authentication
    AccessTokenMissing,
    InvalidToken,
    TokenExpired,
    UserNotFound,
    InvalidCredentials,
    AuthenticationFailed,

    // Accounts
    EmailInUse,
    RegistrationFailed,
    LoggedOut,

    // Expenses
    ExpenseListFailed,
    ExpenseCreateFailed,
    ExpenseNotFound,
    ExpenseDeleteFailed,
    ExpenseDeleted,

    // Categories
    CategoryListFailed,
    CategoryCreateFailed,
    CategoryNameTaken,
    CategoryNotFound,
    CategoryInUse,
    CategoryDeleteFailed,
    CategoryDeleted,

    // Field-level
    Required,
    ExpectedString,
    ExpectedNumber,
    ExpectedBoolean,
    MustBePositive,
    NumberTooLarge,
    InvalidDate,
    InvalidEmail,
    InvalidId,
    InvalidOption,
    TermsNotAccepted,
    PasswordsDoNotMatch,
    UnknownCategory,

    Internal,
    NotFound,
    MethodNotAllowed,
    PayloadTooLarge,
    DatabaseUnavailable,

    // Client and terminal views
    RequestFailed,
    FetchItemsFailed,
    CreateItemFailed,
    DeleteItemFailed,
    ConfirmDeleteItem,
    CategoriesTitle,
    CategoryNoun,
    CategoriesNoun,
    NoCategoriesTitle,
    NoCategoriesHint,
    ExpensesTitle,
    ExpenseNoun,
    ExpensesNoun,
    NoExpensesTitle,
    NoExpensesHint,
}

impl Message {
    /// Text in the locale from the global config.
    pub fn text(self) -> &'static str {
        self.text_in(crate::config::config().locale)
    }

    pub fn text_in(self, locale: Locale) -> &'static str {
        match locale {
            Locale::En => self.en(),
            Locale::PtBr => self.pt_br(),
        }
    }

    fn en(self) -> &'static str {
        match self {
            Message::InvalidRequestFormat => "invalid request format",
            Message::InvalidData => "invalid data",
            Message::AccessTokenMissing => "access token not provided",
            Message::InvalidToken => "invalid token",
            Message::TokenExpired => "token expired",
            Message::UserNotFound => "user not found",
            Message::InvalidCredentials => "invalid credentials",
            Message::AuthenticationFailed => "failed to authenticate",
            Message::EmailInUse => "email already in use",
            Message::RegistrationFailed => "failed to register user",
            Message::LoggedOut => "logged out",
            Message::ExpenseListFailed => "failed to fetch expenses",
            Message::ExpenseCreateFailed => "failed to create expense",
            Message::ExpenseNotFound => "expense not found or does not belong to user",
            Message::ExpenseDeleteFailed => "failed to delete expense",
            Message::ExpenseDeleted => "deleted",
            Message::CategoryListFailed => "failed to fetch categories",
            Message::CategoryCreateFailed => "failed to create category",
            Message::CategoryNameTaken => "a category with this name already exists",
            Message::CategoryNotFound => "category not found or does not belong to user",
            Message::CategoryInUse => "category still has expenses",
            Message::CategoryDeleteFailed => "failed to delete category",
            Message::CategoryDeleted => "deleted",
            Message::Required => "required",
            Message::ExpectedString => "expected a string",
            Message::ExpectedNumber => "expected a number",
            Message::ExpectedBoolean => "expected a boolean",
            Message::MustBePositive => "must be positive",
            Message::NumberTooLarge => "number is too large",
            Message::InvalidDate => "invalid date",
            Message::InvalidEmail => "invalid email",
            Message::InvalidId => "invalid id",
            Message::InvalidOption => "invalid option",
            Message::TermsNotAccepted => "terms must be accepted",
            Message::PasswordsDoNotMatch => "passwords do not match",
            Message::UnknownCategory => "category not found",
            Message::Internal => "internal server error",
            Message::NotFound => "not found",
            Message::MethodNotAllowed => "method not allowed",
            Message::PayloadTooLarge => "request body too large",
            Message::DatabaseUnavailable => "database unavailable",
            Message::RequestFailed => "the request failed",
            Message::FetchItemsFailed => "Failed to fetch data",
            Message::CreateItemFailed => "Failed to create item",
            Message::DeleteItemFailed => "Failed to delete item",
            Message::ConfirmDeleteItem => "Are you sure you want to delete this item?",
            Message::CategoriesTitle => "Existing categories",
            Message::CategoryNoun => "category",
            Message::CategoriesNoun => "categories",
            Message::NoCategoriesTitle => "No categories found",
            Message::NoCategoriesHint => "Start by creating your first expense category.",
            Message::ExpensesTitle => "Recorded expenses",
            Message::ExpenseNoun => "expense",
            Message::ExpensesNoun => "expenses",
            Message::NoExpensesTitle => "No expenses found",
            Message::NoExpensesHint => "Record an expense to see it here.",
        }
    }

    fn pt_br(self) -> &'static str {
        match self {
            Message::InvalidRequestFormat => "Formato de requisição inválido.",
            Message::InvalidData => "Dados inválidos.",
            Message::AccessTokenMissing => "Token de acesso não fornecido",
            Message::InvalidToken => "Token inválido",
            Message::TokenExpired => "Token expirado",
            Message::UserNotFound => "Usuário não encontrado",
            Message::InvalidCredentials => "Credenciais inválidas",
            Message::AuthenticationFailed => "Erro ao autenticar.",
            Message::EmailInUse => "Email já está em uso",
            Message::RegistrationFailed => "Erro ao registrar usuário.",
            Message::LoggedOut => "Sessão encerrada.",
            Message::ExpenseListFailed => "Erro ao buscar despesas.",
            Message::ExpenseCreateFailed => "Erro ao criar despesa.",
            Message::ExpenseNotFound => "Despesa não encontrada ou não pertence ao usuário.",
            Message::ExpenseDeleteFailed => "Erro ao deletar despesa.",
            Message::ExpenseDeleted => "Despesa deletada com sucesso.",
            Message::CategoryListFailed => "Erro ao buscar categorias.",
            Message::CategoryCreateFailed => "Erro ao criar categoria.",
            Message::CategoryNameTaken => "Já existe uma categoria com este nome.",
            Message::CategoryNotFound => "Categoria não encontrada ou não pertence ao usuário.",
            Message::CategoryInUse => "Categoria possui despesas.",
            Message::CategoryDeleteFailed => "Erro ao deletar categoria.",
            Message::CategoryDeleted => "Categoria deletada com sucesso.",
            Message::Required => "Campo obrigatório",
            Message::ExpectedString => "Deve ser um texto",
            Message::ExpectedNumber => "Deve ser um número",
            Message::ExpectedBoolean => "Deve ser verdadeiro ou falso",
            Message::MustBePositive => "Deve ser positivo",
            Message::NumberTooLarge => "Número muito grande",
            Message::InvalidDate => "Data inválida",
            Message::InvalidEmail => "Email inválido",
            Message::InvalidId => "Identificador inválido",
            Message::InvalidOption => "Opção inválida",
            Message::TermsNotAccepted => "Você deve aceitar os termos",
            Message::PasswordsDoNotMatch => "Senhas não coincidem",
            Message::UnknownCategory => "Categoria não encontrada",
            Message::Internal => "Erro interno do servidor.",
            Message::NotFound => "Recurso não encontrado.",
            Message::MethodNotAllowed => "Método não permitido.",
            Message::PayloadTooLarge => "Corpo da requisição muito grande.",
            Message::DatabaseUnavailable => "Banco de dados indisponível.",
            Message::RequestFailed => "Ocorreu um erro na requisição.",
            Message::FetchItemsFailed => "Erro ao buscar dados",
            Message::CreateItemFailed => "Erro ao criar item",
            Message::DeleteItemFailed => "Erro ao deletar item",
            Message::ConfirmDeleteItem => "Tem certeza que deseja deletar este item?",
            Message::CategoriesTitle => "Categorias Existentes",
            Message::CategoryNoun => "categoria",
            Message::CategoriesNoun => "categorias",
            Message::NoCategoriesTitle => "Nenhuma categoria encontrada",
            Message::NoCategoriesHint => "Comece criando sua primeira categoria de despesa.",
            Message::ExpensesTitle => "Despesas Registradas",
            Message::ExpenseNoun => "despesa",
            Message::ExpensesNoun => "despesas",
            Message::NoExpensesTitle => "Nenhuma despesa encontrada",
            Message::NoExpensesHint => "Registre uma despesa para vê-la aqui.",
        }
    }
}

/// Minimum-length violation, which needs the bound in its text.
pub fn too_short(min: usize, locale: Locale) -> String {
    match (locale, min) {
        (Locale::En, 1) => "must not be empty".to_string(),
        (Locale::PtBr, 1) => "Não pode ser vazio".to_string(),
        (Locale::En, n) => format!("must be at least {} characters", n),
        (Locale::PtBr, n) => format!("Deve ter pelo menos {} caracteres", n),
    }
}

/// Scale violation for fixed-point amounts.
pub fn too_many_decimals(scale: u32, locale: Locale) -> String {
    match locale {
        Locale::En => format!("must have at most {} decimal places", scale),
        Locale::PtBr => format!("Deve ter no máximo {} casas decimais", scale),
    }
}

use once_cell::sync::Lazy;

use super::{FieldRule, Refinement, Schema};
use crate::database::models::Natureza;
use crate::messages::Message;

pub static REGISTER: Lazy<Schema> = Lazy::new(|| {
    Schema::new()
        .field(FieldRule::string("name").trimmed().min_len(2))
        .field(FieldRule::string("email").email())
        .field(FieldRule::string("password").min_len(6))
        .field(FieldRule::string("confirmPassword"))
        .field(FieldRule::boolean("acceptTerms").must_be_true())
        .refine(Refinement::FieldsEqual {
            field: "confirmPassword",
            other: "password",
            message: Message::PasswordsDoNotMatch,
        })
});

pub static LOGIN: Lazy<Schema> = Lazy::new(|| {
    Schema::new()
        .field(FieldRule::string("email").email())
        .field(FieldRule::string("password").min_len(1))
});

pub static CREATE_EXPENSE: Lazy<Schema> = Lazy::new(|| {
    Schema::new()
        .field(FieldRule::number("valor").positive().numeric(14, 2))
        .field(FieldRule::date("data"))
        .field(FieldRule::one_of("natureza", Natureza::VALUES))
        .field(FieldRule::uuid("categoryId"))
});

pub static CREATE_EXPENSE_CATEGORY: Lazy<Schema> = Lazy::new(|| {
    Schema::new()
        .field(FieldRule::string("nome").trimmed().min_len(1))
        .field(FieldRule::string("descricao").optional())
});

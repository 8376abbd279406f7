//! Declarative request body validation.
//!
//! A [`Schema`] lists field rules and cross-field refinements. Validation
//! visits every rule and collects every violation into one
//! [`FieldErrors`] map, so a client sees all problems at once. On success
//! the body is returned with values coerced to their canonical form (dates
//! become RFC 3339 UTC, trimmed strings are trimmed, unknown keys dropped)
//! and can be deserialized into a typed struct.

pub mod schemas;

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::config;
use crate::error::{ApiError, FieldErrors};
use crate::messages::{self, Message};

#[derive(Debug, Clone)]
pub enum FieldKind {
    String { min_len: usize, email: bool, trim: bool },
    /// `numeric` is `(precision, scale)` of the column the value lands in
    Number { positive: bool, numeric: Option<(u32, u32)> },
    Boolean { must_be_true: bool },
    /// `YYYY-MM-DD` or RFC 3339
    Date,
    Uuid,
    Enum(&'static [&'static str]),
}

#[derive(Debug, Clone)]
pub struct FieldRule {
    name: &'static str,
    kind: FieldKind,
    required: bool,
}

impl FieldRule {
    fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind, required: true }
    }

    pub fn string(name: &'static str) -> Self {
        Self::new(name, FieldKind::String { min_len: 0, email: false, trim: false })
    }

    pub fn number(name: &'static str) -> Self {
        Self::new(name, FieldKind::Number { positive: false, numeric: None })
    }

    pub fn boolean(name: &'static str) -> Self {
        Self::new(name, FieldKind::Boolean { must_be_true: false })
    }

    pub fn date(name: &'static str) -> Self {
        Self::new(name, FieldKind::Date)
    }

    pub fn uuid(name: &'static str) -> Self {
        Self::new(name, FieldKind::Uuid)
    }

    pub fn one_of(name: &'static str, values: &'static [&'static str]) -> Self {
        Self::new(name, FieldKind::Enum(values))
    }

    /// Absent or null values are accepted and left unset
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn min_len(mut self, n: usize) -> Self {
        if let FieldKind::String { min_len, .. } = &mut self.kind {
            *min_len = n;
        }
        self
    }

    pub fn email(mut self) -> Self {
        if let FieldKind::String { email, trim, .. } = &mut self.kind {
            *email = true;
            *trim = true;
        }
        self
    }

    pub fn trimmed(mut self) -> Self {
        if let FieldKind::String { trim, .. } = &mut self.kind {
            *trim = true;
        }
        self
    }

    pub fn positive(mut self) -> Self {
        if let FieldKind::Number { positive, .. } = &mut self.kind {
            *positive = true;
        }
        self
    }

    /// Bound the value to what a `NUMERIC(precision, scale)` column stores
    /// without rounding or overflow
    pub fn numeric(mut self, precision: u32, scale: u32) -> Self {
        if let FieldKind::Number { numeric, .. } = &mut self.kind {
            *numeric = Some((precision, scale));
        }
        self
    }

    pub fn must_be_true(mut self) -> Self {
        if let FieldKind::Boolean { must_be_true } = &mut self.kind {
            *must_be_true = true;
        }
        self
    }

    /// Check one value, returning its coerced form or the violated messages
    fn check(&self, value: &Value) -> Result<Value, Vec<String>> {
        let locale = config::config().locale;
        let fail = |m: Message| Err(vec![m.text_in(locale).to_string()]);

        match &self.kind {
            FieldKind::String { min_len, email, trim } => {
                let Some(raw) = value.as_str() else {
                    return fail(Message::ExpectedString);
                };
                let s = if *trim { raw.trim() } else { raw };

                let mut errors = Vec::new();
                if s.chars().count() < *min_len {
                    errors.push(messages::too_short(*min_len, locale));
                }
                if *email && !looks_like_email(s) {
                    errors.push(Message::InvalidEmail.text_in(locale).to_string());
                }

                if errors.is_empty() {
                    Ok(Value::String(s.to_string()))
                } else {
                    Err(errors)
                }
            }
            FieldKind::Number { positive, numeric } => {
                let Some(n) = value.as_f64() else {
                    return fail(Message::ExpectedNumber);
                };

                let mut errors = Vec::new();
                if *positive && n <= 0.0 {
                    errors.push(Message::MustBePositive.text_in(locale).to_string());
                }
                if let Some((precision, scale)) = numeric {
                    match to_decimal(value) {
                        Some(d) => {
                            if d.normalize().scale() > *scale {
                                errors.push(messages::too_many_decimals(*scale, locale));
                            }
                            if !fits_integer_digits(d, precision.saturating_sub(*scale)) {
                                errors.push(Message::NumberTooLarge.text_in(locale).to_string());
                            }
                        }
                        None => errors.push(Message::NumberTooLarge.text_in(locale).to_string()),
                    }
                }

                if errors.is_empty() {
                    Ok(value.clone())
                } else {
                    Err(errors)
                }
            }
            FieldKind::Boolean { must_be_true } => match value.as_bool() {
                Some(false) if *must_be_true => fail(Message::TermsNotAccepted),
                Some(_) => Ok(value.clone()),
                None => fail(Message::ExpectedBoolean),
            },
            FieldKind::Date => match value.as_str().and_then(parse_date) {
                Some(date) => Ok(Value::String(date.to_rfc3339_opts(SecondsFormat::Millis, true))),
                None => fail(Message::InvalidDate),
            },
            FieldKind::Uuid => match value.as_str().map(|s| Uuid::parse_str(s.trim())) {
                Some(Ok(id)) => Ok(Value::String(id.to_string())),
                _ => fail(Message::InvalidId),
            },
            FieldKind::Enum(values) => match value.as_str() {
                Some(s) if values.contains(&s) => Ok(value.clone()),
                _ => fail(Message::InvalidOption),
            },
        }
    }
}

/// Rules that relate two fields
#[derive(Debug, Clone)]
pub enum Refinement {
    /// `field` must equal `other`; the error is reported on `field`
    FieldsEqual {
        field: &'static str,
        other: &'static str,
        message: Message,
    },
}

impl Refinement {
    fn check(&self, input: &Map<String, Value>, errors: &mut FieldErrors) {
        match self {
            Refinement::FieldsEqual { field, other, message } => {
                // Raw inputs, compared even when either side failed its own rule
                if let (Some(a), Some(b)) = (present(input, field), present(input, other)) {
                    if a != b {
                        push_error(errors, field, message.text().to_string());
                    }
                }
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<FieldRule>,
    refinements: Vec<Refinement>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, rule: FieldRule) -> Self {
        self.fields.push(rule);
        self
    }

    pub fn refine(mut self, refinement: Refinement) -> Self {
        self.refinements.push(refinement);
        self
    }

    /// Validate a parsed body, returning the coerced object or every violation
    pub fn validate(&self, body: &Value) -> Result<Map<String, Value>, FieldErrors> {
        let empty = Map::new();
        let input = body.as_object().unwrap_or(&empty);

        let mut data = Map::new();
        let mut errors = FieldErrors::new();

        for rule in &self.fields {
            match input.get(rule.name) {
                None | Some(Value::Null) => {
                    if rule.required {
                        push_error(&mut errors, rule.name, Message::Required.text().to_string());
                    }
                }
                Some(value) => match rule.check(value) {
                    Ok(coerced) => {
                        data.insert(rule.name.to_string(), coerced);
                    }
                    Err(messages) => {
                        for message in messages {
                            push_error(&mut errors, rule.name, message);
                        }
                    }
                },
            }
        }

        for refinement in &self.refinements {
            refinement.check(input, &mut errors);
        }

        if errors.is_empty() {
            Ok(data)
        } else {
            Err(errors)
        }
    }
}

/// Parse a raw request body and validate it into `T`.
///
/// Malformed JSON (or a non-object body) is a 400 "invalid request format";
/// schema violations are a 400 "invalid data" carrying every field error.
pub fn parse_body<T: DeserializeOwned>(body: &[u8], schema: &Schema) -> Result<T, ApiError> {
    let value: Value = serde_json::from_slice(body)
        .ok()
        .filter(Value::is_object)
        .ok_or_else(|| ApiError::bad_request(Message::InvalidRequestFormat.text()))?;

    let data = schema
        .validate(&value)
        .map_err(|field_errors| ApiError::validation_error(Message::InvalidData.text(), field_errors))?;

    serde_json::from_value(Value::Object(data.clone())).map_err(|e| {
        tracing::debug!("Validated body did not match target type: {}", e);

        // Coerced strings, dates, ids and enums are canonical; only a number
        // can still miss its target type
        let mut field_errors = FieldErrors::new();
        for (name, value) in &data {
            if value.is_number() {
                push_error(&mut field_errors, name, Message::NumberTooLarge.text().to_string());
            }
        }

        if field_errors.is_empty() {
            tracing::error!("Schema and target type disagree: {}", e);
            ApiError::internal_server_error(Message::Internal.text())
        } else {
            ApiError::validation_error(Message::InvalidData.text(), field_errors)
        }
    })
}

fn present<'a>(input: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    input.get(name).filter(|v| !v.is_null())
}

fn push_error(errors: &mut FieldErrors, field: &str, message: String) {
    errors.entry(field.to_string()).or_default().push(message);
}

/// JSON numbers render as plain or scientific notation
fn to_decimal(value: &Value) -> Option<Decimal> {
    let text = value.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

fn fits_integer_digits(d: Decimal, digits: u32) -> bool {
    match 10i64.checked_pow(digits) {
        Some(bound) => d.abs() < Decimal::from(bound),
        None => true,
    }
}

fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn looks_like_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !s.chars().any(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    fn sample_schema() -> Schema {
        Schema::new()
            .field(FieldRule::number("amount").positive())
            .field(FieldRule::string("label").min_len(1).trimmed())
            .field(FieldRule::string("note").optional())
            .field(FieldRule::one_of("kind", &["A", "B"]))
    }

    #[test]
    fn collects_every_violation() {
        let errors = sample_schema()
            .validate(&json!({"amount": 0, "label": "  ", "kind": "C"}))
            .unwrap_err();

        assert_eq!(errors.len(), 3);
        assert!(errors.contains_key("amount"));
        assert!(errors.contains_key("label"));
        assert!(errors.contains_key("kind"));
    }

    #[test]
    fn negative_and_zero_are_not_positive() {
        let schema = Schema::new().field(FieldRule::number("n").positive());
        assert!(schema.validate(&json!({"n": -5})).is_err());
        assert!(schema.validate(&json!({"n": 0})).is_err());
        assert!(schema.validate(&json!({"n": 0.01})).is_ok());
        assert!(schema.validate(&json!({"n": "10"})).is_err());
    }

    #[test]
    fn numeric_bounds_match_the_column() {
        let schema = Schema::new().field(FieldRule::number("n").positive().numeric(14, 2));

        assert!(schema.validate(&json!({"n": 12.34})).is_ok());
        assert!(schema.validate(&json!({"n": 999999999999.99})).is_ok());

        let errors = schema.validate(&json!({"n": 0.001})).unwrap_err();
        assert_eq!(errors["n"], vec![messages::too_many_decimals(2, config::config().locale)]);

        for too_large in [json!(1e12), json!(1e13), json!(1e300), json!(u64::MAX)] {
            let errors = schema.validate(&json!({ "n": too_large })).unwrap_err();
            assert_eq!(errors["n"], vec![Message::NumberTooLarge.text().to_string()], "{}", too_large);
        }
    }

    #[test]
    fn decimal_from_json_number_notation() {
        assert_eq!(to_decimal(&json!(12.5)), Decimal::from_str("12.5").ok());
        assert_eq!(to_decimal(&json!(7)), Some(Decimal::from(7)));
        assert_eq!(to_decimal(&json!(1e-7)), Decimal::from_str("0.0000001").ok());
        assert!(to_decimal(&json!(1e300)).is_none());
    }

    #[test]
    fn optional_absent_or_null_is_unset() {
        let data = sample_schema()
            .validate(&json!({"amount": 1, "label": "x", "kind": "A", "note": null}))
            .unwrap();
        assert!(!data.contains_key("note"));
    }

    #[test]
    fn missing_required_field_is_reported() {
        let errors = sample_schema().validate(&json!({"label": "x", "kind": "A"})).unwrap_err();
        assert_eq!(errors["amount"], vec![Message::Required.text().to_string()]);
    }

    #[test]
    fn unknown_keys_are_dropped_and_strings_trimmed() {
        let data = sample_schema()
            .validate(&json!({"amount": 2, "label": " food ", "kind": "B", "userId": "evil"}))
            .unwrap();
        assert_eq!(data["label"], "food");
        assert!(!data.contains_key("userId"));
    }

    #[test]
    fn dates_are_coerced_to_rfc3339() {
        let schema = Schema::new().field(FieldRule::date("d"));
        let data = schema.validate(&json!({"d": "2024-01-01"})).unwrap();
        assert_eq!(data["d"], "2024-01-01T00:00:00.000Z");

        let data = schema.validate(&json!({"d": "2024-01-01T12:30:00-03:00"})).unwrap();
        assert_eq!(data["d"], "2024-01-01T15:30:00.000Z");

        assert!(schema.validate(&json!({"d": "01/01/2024"})).is_err());
    }

    #[test]
    fn fields_equal_refinement_joins_the_accumulator() {
        let schema = Schema::new()
            .field(FieldRule::string("password").min_len(6))
            .field(FieldRule::string("confirm"))
            .field(FieldRule::boolean("terms").must_be_true())
            .refine(Refinement::FieldsEqual {
                field: "confirm",
                other: "password",
                message: Message::PasswordsDoNotMatch,
            });

        let errors = schema
            .validate(&json!({"password": "abcdef", "confirm": "abcdeg", "terms": false}))
            .unwrap_err();
        assert_eq!(errors["confirm"], vec![Message::PasswordsDoNotMatch.text().to_string()]);
        assert!(errors.contains_key("terms"));

        // A password that fails its own rule is still compared
        let errors = schema
            .validate(&json!({"password": "abc", "confirm": "abd", "terms": true}))
            .unwrap_err();
        assert!(errors.contains_key("password"));
        assert_eq!(errors["confirm"], vec![Message::PasswordsDoNotMatch.text().to_string()]);

        let errors = schema
            .validate(&json!({"password": "abc", "confirm": "abc", "terms": true}))
            .unwrap_err();
        assert!(!errors.contains_key("confirm"));
    }

    #[test]
    fn email_shape() {
        assert!(looks_like_email("ana@example.com"));
        assert!(!looks_like_email("ana@example"));
        assert!(!looks_like_email("ana example@x.com"));
        assert!(!looks_like_email("@example.com"));
    }

    #[derive(Debug, Deserialize)]
    struct Sample {
        amount: f64,
        label: String,
    }

    #[test]
    fn parse_body_distinguishes_malformed_from_invalid() {
        let schema = sample_schema();

        let err = parse_body::<Sample>(b"{not json", &schema).unwrap_err();
        assert_eq!(err.message(), Message::InvalidRequestFormat.text());
        assert!(err.field_errors().is_none());

        let err = parse_body::<Sample>(b"[1, 2]", &schema).unwrap_err();
        assert_eq!(err.message(), Message::InvalidRequestFormat.text());

        let err = parse_body::<Sample>(br#"{"amount": -1, "label": "x", "kind": "A"}"#, &schema).unwrap_err();
        assert_eq!(err.message(), Message::InvalidData.text());
        assert!(err.field_errors().unwrap().contains_key("amount"));

        let ok = parse_body::<Sample>(br#"{"amount": 3.5, "label": "x", "kind": "A"}"#, &schema).unwrap();
        assert_eq!(ok.amount, 3.5);
        assert_eq!(ok.label, "x");
    }
}

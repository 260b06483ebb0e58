//! Form values collected from the user and the rules checked before submit.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

pub const CARDS_MIN_COUNT: i64 = 10;
pub const CARDS_MAX_COUNT: i64 = 5000;

pub const REQUISITES_EMPTY_MESSAGE: &str = "Реквизиты не могут быть пустыми";
pub const EMAIL_INVALID_MESSAGE: &str = "Введите корректный email адрес";

// Deliberately lax: accepts things like `a@b..c`.
const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormState {
    pub requisites: String,
    pub cards_count: i64,
    pub email: String,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            requisites: String::new(),
            cards_count: CARDS_MIN_COUNT,
            email: String::new(),
        }
    }
}

impl FormState {
    pub fn new(
        requisites: impl Into<String>,
        cards_count: i64,
        email: impl Into<String>,
    ) -> Self {
        Self {
            requisites: requisites.into(),
            cards_count,
            email: email.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Requisites,
    CardsCount,
    Email,
}

impl FormField {
    pub const ALL: [FormField; 3] = [
        FormField::Requisites,
        FormField::CardsCount,
        FormField::Email,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Requisites => "Реквизиты",
            FormField::CardsCount => "Количество карт",
            FormField::Email => "Email",
        }
    }
}

/// Per-field validation messages. No messages means the form is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrors {
    pub requisites: Option<String>,
    pub cards_count: Option<String>,
    pub email: Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.requisites.is_none() && self.cards_count.is_none() && self.email.is_none()
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        match field {
            FormField::Requisites => self.requisites.as_deref(),
            FormField::CardsCount => self.cards_count.as_deref(),
            FormField::Email => self.email.as_deref(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> + '_ {
        FormField::ALL
            .into_iter()
            .filter_map(move |field| self.get(field).map(|message| (field, message)))
    }
}

pub fn cards_count_message() -> String {
    format!("Количество карт должно быть от {CARDS_MIN_COUNT} до {CARDS_MAX_COUNT}")
}

fn email_regex() -> &'static Regex {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("valid email regex"))
}

pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

pub fn validate(state: &FormState) -> FieldErrors {
    let mut errors = FieldErrors::default();

    if state.requisites.trim().is_empty() {
        errors.requisites = Some(REQUISITES_EMPTY_MESSAGE.to_string());
    }

    if !(CARDS_MIN_COUNT..=CARDS_MAX_COUNT).contains(&state.cards_count) {
        errors.cards_count = Some(cards_count_message());
    }

    if !is_valid_email(&state.email) {
        errors.email = Some(EMAIL_INVALID_MESSAGE.to_string());
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> FormState {
        FormState::new("ООО Ромашка, ИНН 7700000000", 100, "a@b.co")
    }

    #[test]
    fn valid_form_has_no_errors() {
        let errors = validate(&valid_form());
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
        assert_eq!(errors.iter().count(), 0);
    }

    #[test]
    fn blank_requisites_are_rejected() {
        for requisites in ["", " ", "\t\n", "   \r\n  "] {
            let form = FormState {
                requisites: requisites.to_string(),
                ..valid_form()
            };
            let errors = validate(&form);
            assert_eq!(
                errors.requisites.as_deref(),
                Some(REQUISITES_EMPTY_MESSAGE),
                "requisites {requisites:?}"
            );
            assert!(errors.cards_count.is_none());
            assert!(errors.email.is_none());
        }
    }

    #[test]
    fn cards_count_bounds_are_inclusive() {
        for (count, valid) in [
            (i64::MIN, false),
            (-1, false),
            (0, false),
            (9, false),
            (10, true),
            (11, true),
            (4999, true),
            (5000, true),
            (5001, false),
            (i64::MAX, false),
        ] {
            let form = FormState {
                cards_count: count,
                ..valid_form()
            };
            let errors = validate(&form);
            assert_eq!(errors.cards_count.is_none(), valid, "count {count}");
        }
    }

    #[test]
    fn cards_count_message_cites_bounds() {
        let form = FormState {
            cards_count: 1,
            ..valid_form()
        };
        let message = validate(&form).cards_count.expect("cards error");
        assert!(message.contains("10"));
        assert!(message.contains("5000"));
    }

    #[test]
    fn email_pattern_matches_simple_addresses() {
        for email in ["a@b.co", "user.name@example.ru", "x@y.z.w", "a@b..c"] {
            assert!(is_valid_email(email), "{email} should pass");
        }
        for email in [
            "",
            "plain",
            "a@b",
            "a.b@c",
            "@b.co",
            "a@.co",
            "a@b.",
            "a b@c.de",
            "a@@b.co",
        ] {
            assert!(!is_valid_email(email), "{email} should fail");
        }
    }

    #[test]
    fn invalid_email_reports_message() {
        let form = FormState {
            email: "not-an-email".to_string(),
            ..valid_form()
        };
        let errors = validate(&form);
        assert_eq!(errors.get(FormField::Email), Some(EMAIL_INVALID_MESSAGE));
    }

    #[test]
    fn default_form_reports_all_but_cards_count() {
        let errors = validate(&FormState::default());
        let fields: Vec<FormField> = errors.iter().map(|(field, _)| field).collect();
        assert_eq!(fields, vec![FormField::Requisites, FormField::Email]);
    }
}

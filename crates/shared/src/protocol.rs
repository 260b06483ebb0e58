use serde::{Deserialize, Serialize};

use crate::form::FormState;

pub const INVOICE_PATH: &str = "/invoice";
pub const DEFAULT_INVOICE_FILENAME: &str = "invoice.pdf";

/// JSON body of `POST {api_base_url}/invoice`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRequest {
    pub details: String,
    pub cards_count: i64,
    pub email: String,
}

impl From<&FormState> for InvoiceRequest {
    fn from(form: &FormState) -> Self {
        Self {
            details: form.requisites.clone(),
            cards_count: form.cards_count,
            email: form.email.clone(),
        }
    }
}

/// A document returned by a successful invoice request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceDocument {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_uses_wire_field_names() {
        let form = FormState::new("bank details", 42, "a@b.co");
        let body = serde_json::to_value(InvoiceRequest::from(&form)).expect("serialize");
        assert_eq!(
            body,
            serde_json::json!({
                "details": "bank details",
                "cardsCount": 42,
                "email": "a@b.co",
            })
        );
    }

    #[test]
    fn requisites_are_sent_untrimmed() {
        let form = FormState::new("  line one\nline two  ", 10, "a@b.co");
        let request = InvoiceRequest::from(&form);
        assert_eq!(request.details, "  line one\nline two  ");
    }
}

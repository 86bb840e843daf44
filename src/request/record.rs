//! Request record model

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::date::format_date;
use super::status::RequestStatus;

/// Placeholder shown for any absent field
pub const PLACEHOLDER: &str = "N/A";

const KEY_NUMBER: &str = "Request Number";
const KEY_STATUS: &str = "Status";
const KEY_NAME: &str = "Name";
const KEY_COLLEGE: &str = "College";
const KEY_DEPARTMENT: &str = "Department";
const KEY_LOCATION: &str = "Location";
const KEY_MOBILE: &str = "Mobile Number";
const KEY_DESCRIPTION: &str = "Description";
const KEY_REQUEST_DATE: &str = "Request Date";
const KEY_DATE: &str = "Date";
const KEY_AMOUNT: &str = "Amount";

/// One maintenance request as submitted for rendering.
///
/// The record keeps the raw JSON object so unknown keys and odd value
/// shapes never cause a rejection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestRecord {
    fields: Map<String, Value>,
}

impl RequestRecord {
    /// Set a field, returning the record (handy in tests and fixtures)
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    /// Scalar field as text. Null, empty strings, arrays and objects count as absent.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.fields.get(key)? {
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    fn text_or_placeholder(&self, key: &str) -> String {
        self.text(key).unwrap_or_else(|| PLACEHOLDER.to_string())
    }

    pub fn id(&self) -> Option<String> {
        self.text(KEY_NUMBER)
    }

    pub fn id_display(&self) -> String {
        self.text_or_placeholder(KEY_NUMBER)
    }

    /// Status label as submitted, `"Waiting"` when absent
    pub fn status_label(&self) -> String {
        self.text(KEY_STATUS)
            .unwrap_or_else(|| RequestStatus::Waiting.label().to_string())
    }

    pub fn status(&self) -> RequestStatus {
        self.text(KEY_STATUS)
            .map(|s| RequestStatus::parse(&s))
            .unwrap_or(RequestStatus::Waiting)
    }

    pub fn submitter(&self) -> String {
        self.text_or_placeholder(KEY_NAME)
    }

    pub fn college(&self) -> String {
        self.text_or_placeholder(KEY_COLLEGE)
    }

    pub fn department(&self) -> String {
        self.text_or_placeholder(KEY_DEPARTMENT)
    }

    pub fn location(&self) -> String {
        self.text_or_placeholder(KEY_LOCATION)
    }

    pub fn mobile(&self) -> String {
        self.text_or_placeholder(KEY_MOBILE)
    }

    pub fn description(&self) -> String {
        self.text_or_placeholder(KEY_DESCRIPTION)
    }

    /// Amount, if any was submitted
    pub fn amount(&self) -> Option<String> {
        self.text(KEY_AMOUNT)
    }

    /// Submission date for the detail sheet (`Request Date`, then `Date`)
    pub fn submitted_on(&self) -> String {
        let value = self
            .present(KEY_REQUEST_DATE)
            .or_else(|| self.present(KEY_DATE));
        format_date(value)
    }

    /// Submission date for the table report (`Request Date` only)
    pub fn request_date(&self) -> String {
        format_date(self.present(KEY_REQUEST_DATE))
    }

    fn present(&self, key: &str) -> Option<&Value> {
        match self.fields.get(key)? {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            v => Some(v),
        }
    }
}

use crate::model::{lenient, Amount};
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One recorded spending transaction.
///
/// Older documents name the payment method by its display name in `paymentMethod`; newer ones
/// reference it by id in `paymentMethodId`. Whichever is present is kept as-is.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    /// Zero when the stored value is missing or unreadable.
    #[serde(default, deserialize_with = "lenient::amount")]
    pub amount: Amount,
    #[serde(default, deserialize_with = "lenient::string")]
    pub category_id: String,
    #[serde(
        default,
        deserialize_with = "lenient::optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub payment_method_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub payment_method: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(
        default,
        deserialize_with = "lenient::optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub location: Option<String>,
    /// ISO-8601, either a full timestamp or a plain `YYYY-MM-DD` date.
    #[serde(default, deserialize_with = "lenient::string")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub created_at: String,
    #[serde(flatten)]
    pub other_fields: BTreeMap<String, Value>,
}

impl Expense {
    /// The payment method reference: the id when present, otherwise the legacy name.
    pub fn payment_method_key(&self) -> Option<&str> {
        self.payment_method_id
            .as_deref()
            .or(self.payment_method.as_deref())
    }

    /// The calendar date of the expense, if `date` can be understood.
    pub fn naive_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }
}

/// The fields a caller supplies when adding an expense. The id and `createdAt` are filled in by
/// the store.
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct NewExpense {
    pub amount: Amount,
    pub category_id: String,
    pub payment_method_id: Option<String>,
    pub payment_method: Option<String>,
    pub description: String,
    pub location: Option<String>,
    pub date: String,
}

impl NewExpense {
    pub(crate) fn into_expense(self, id: String, created_at: String) -> Expense {
        Expense {
            id,
            amount: self.amount,
            category_id: self.category_id,
            payment_method_id: self.payment_method_id,
            payment_method: self.payment_method,
            description: self.description,
            location: self.location,
            date: self.date,
            created_at,
            other_fields: BTreeMap::new(),
        }
    }
}

/// Parses an RFC 3339 timestamp or a `YYYY-MM-DD` date.
pub(crate) fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.date_naive());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

//! Types that represent the persisted document, such as `Expense` and `Category`.
mod amount;
mod category;
mod expense;
mod lenient;
mod payment_method;

pub use amount::{Amount, AmountError};
pub use category::{Category, NewCategory, OTHERS_ICON, OTHERS_ID, OTHERS_NAME};
pub use expense::{Expense, NewExpense};
pub use payment_method::{
    NewPaymentMethod, PaymentMethod, PaymentMethodType, UnknownPaymentMethodType,
};

pub(crate) use category::{default_categories, next_category_id};
pub(crate) use expense::parse_date;
pub(crate) use payment_method::default_payment_methods;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// The informational version written into new documents. It is never validated.
pub const DOCUMENT_VERSION: &str = "1.0";
/// The currency symbol new documents start with.
pub const DEFAULT_CURRENCY: &str = "₹";

/// All application data, persisted as one JSON object.
///
/// Every field defaults when absent or unreadable so that any JSON object can be read as a
/// `Document`; one malformed record never hides the rest. Keys that are not modeled here are
/// kept in `other_fields` and written back out.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default, deserialize_with = "lenient::string")]
    pub version: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub last_updated: String,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub settings: Settings,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub payment_methods: Vec<PaymentMethod>,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub categories: Vec<Category>,
    /// Newest first.
    #[serde(default, deserialize_with = "lenient::vec")]
    pub expenses: Vec<Expense>,
    #[serde(flatten)]
    pub other_fields: BTreeMap<String, Value>,
}

/// User settings stored inside the document.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_currency", deserialize_with = "currency")]
    pub currency: String,
    #[serde(flatten)]
    pub other_fields: BTreeMap<String, Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            other_fields: BTreeMap::new(),
        }
    }
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn currency<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(lenient::optional_string(deserializer)?
        .filter(|s| !s.is_empty())
        .unwrap_or_else(default_currency))
}

impl Document {
    /// The document a fresh installation starts with, stamped with `last_updated`.
    pub fn new_default(last_updated: impl Into<String>) -> Self {
        Self {
            version: DOCUMENT_VERSION.to_string(),
            last_updated: last_updated.into(),
            settings: Settings::default(),
            payment_methods: default_payment_methods(),
            categories: default_categories(),
            expenses: Vec::new(),
            other_fields: BTreeMap::new(),
        }
    }

    /// True when the document has no category named "others" (ignoring case).
    pub fn is_missing_others(&self) -> bool {
        !self.categories.iter().any(Category::is_others)
    }

    /// Appends the "Others" fallback category if it is missing. Returns true if the document was
    /// changed. The fallback normally gets id `"8"`; if that id is already used by another
    /// category a fresh id is minted instead.
    pub fn migrate(&mut self) -> bool {
        if !self.is_missing_others() {
            return false;
        }
        let id = if self.category(OTHERS_ID).is_some() {
            next_category_id(&self.categories)
        } else {
            OTHERS_ID.to_string()
        };
        self.categories
            .push(Category::new(id, OTHERS_NAME, OTHERS_ICON));
        true
    }

    /// Looks up a category by id.
    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// The fallback category, if the document has one.
    pub fn others(&self) -> Option<&Category> {
        self.categories.iter().find(|c| c.is_others())
    }

    /// The category an expense should be shown under. A `categoryId` that references no
    /// category resolves to the fallback.
    pub fn category_for(&self, expense: &Expense) -> Option<&Category> {
        self.category(&expense.category_id).or_else(|| self.others())
    }

    /// Looks up a payment method by id, or by name for expenses that stored the name.
    pub fn payment_method_for(&self, expense: &Expense) -> Option<&PaymentMethod> {
        let key = expense.payment_method_key()?;
        self.payment_methods
            .iter()
            .find(|p| p.id == key)
            .or_else(|| self.payment_methods.iter().find(|p| p.name == key))
    }

    /// Expenses whose `categoryId` references no category. These are tolerated, not repaired.
    pub fn dangling_expenses(&self) -> impl Iterator<Item = &Expense> {
        self.expenses
            .iter()
            .filter(|e| self.category(&e.category_id).is_none())
    }
}

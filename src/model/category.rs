use crate::model::lenient;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// The name of the fallback category that every document must contain.
pub const OTHERS_NAME: &str = "Others";
/// The id given to the fallback category when migration adds it.
pub const OTHERS_ID: &str = "8";
/// The icon of the fallback category.
pub const OTHERS_ICON: &str = "📦";

/// A user-facing expense tag with an icon.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub icon: String,
    /// Keys this version does not know about, such as `color`, kept so they survive a save.
    #[serde(flatten)]
    pub other_fields: BTreeMap<String, Value>,
}

impl Category {
    pub fn new(id: impl Into<String>, name: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            icon: icon.into(),
            other_fields: BTreeMap::new(),
        }
    }

    /// True when this is the "Others" fallback category. The comparison ignores case.
    pub fn is_others(&self) -> bool {
        self.name.to_lowercase() == OTHERS_NAME.to_lowercase()
    }
}

/// The fields a caller supplies when adding a category. The id is minted by the store.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct NewCategory {
    pub name: String,
    pub icon: String,
}

/// The categories every new document starts with.
pub(crate) fn default_categories() -> Vec<Category> {
    vec![
        Category::new("1", "Healthcare", "🏥"),
        Category::new("2", "Food", "🍕"),
        Category::new("3", "Grocery", "🛒"),
        Category::new("4", "Shopping", "🛍️"),
        Category::new("5", "Transport", "🚗"),
        Category::new("6", "Bills", "💡"),
        Category::new("7", "Entertainment", "🎬"),
        Category::new(OTHERS_ID, OTHERS_NAME, OTHERS_ICON),
    ]
}

/// Returns an id that no category in `categories` uses: one more than the largest numeric id.
pub(crate) fn next_category_id(categories: &[Category]) -> String {
    let max = categories
        .iter()
        .filter_map(|c| c.id.parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    (max + 1).to_string()
}

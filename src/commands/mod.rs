//! Command handlers for the expense CLI.
//!
//! This module contains implementations for all CLI subcommands. Each handler opens the store
//! through `Config::store` and returns an `Out` describing what happened.

mod add;
mod backup;
mod init;
mod list;
mod report;
mod show;

use crate::model::{Category, Document, PaymentMethod};
use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info, warn};

pub use add::{add_category, add_expense, add_payment_method};
pub use backup::{export, import};
pub use init::init;
pub use list::{list_categories, list_expenses, list_payment_methods};
pub use report::{report, Report};
pub use show::{currency, show, ShowOutput};

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to `info!` and the structured data (if it exists) as JSON to `debug!`.
    pub fn print(&self) {
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

/// Finds a category by id, or failing that by name ignoring case. An unknown reference is
/// returned as-is so the expense is still recorded; it will be shown under "Others".
fn resolve_category(document: &Document, reference: &str) -> String {
    if let Some(c) = document.category(reference) {
        return c.id.clone();
    }
    let lower = reference.to_lowercase();
    match document
        .categories
        .iter()
        .find(|c: &&Category| c.name.to_lowercase() == lower)
    {
        Some(c) => c.id.clone(),
        None => {
            warn!("There is no category '{reference}', the expense will be shown under Others");
            reference.to_string()
        }
    }
}

/// Finds a payment method by id, or failing that by name ignoring case.
fn resolve_payment_method(document: &Document, reference: &str) -> String {
    let lower = reference.to_lowercase();
    let found = document
        .payment_methods
        .iter()
        .find(|p| p.id == reference)
        .or_else(|| {
            document
                .payment_methods
                .iter()
                .find(|p: &&PaymentMethod| p.name.to_lowercase() == lower)
        });
    match found {
        Some(p) => p.id.clone(),
        None => {
            warn!("There is no payment method '{reference}'");
            reference.to_string()
        }
    }
}

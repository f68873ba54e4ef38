use crate::args::{AddCategoryArgs, AddExpenseArgs, AddPaymentMethodArgs};
use crate::commands::{resolve_category, resolve_payment_method, Out};
use crate::model::{
    parse_date, Category, Expense, NewCategory, NewExpense, NewPaymentMethod, PaymentMethod,
};
use crate::{Config, Result};
use anyhow::{bail, Context};
use chrono::NaiveDate;

/// Records a new expense. The category and payment method may be given by id or by name. When
/// no date is given the expense is dated `today`.
pub async fn add_expense(
    config: &Config,
    args: &AddExpenseArgs,
    today: NaiveDate,
) -> Result<Out<Expense>> {
    if args.amount.is_negative() {
        bail!("The amount cannot be negative: {}", args.amount);
    }
    let date = match &args.date {
        Some(d) => {
            if parse_date(d).is_none() {
                bail!("Unable to understand the date '{d}', use YYYY-MM-DD");
            }
            d.clone()
        }
        None => today.format("%Y-%m-%d").to_string(),
    };

    let store = config.store();
    let loaded = store.load_strict().await?;
    let document = loaded.document;

    let new = NewExpense {
        amount: args.amount,
        category_id: resolve_category(&document, &args.category),
        payment_method_id: Some(resolve_payment_method(&document, &args.payment_method)),
        payment_method: None,
        description: args.description.clone(),
        location: args.location.clone(),
        date,
    };

    let expense = store
        .add_expense(new)
        .await
        .context("Unable to add the expense")?;

    let category = document
        .category_for(&expense)
        .map(|c| format!("{} {}", c.icon, c.name))
        .unwrap_or_default();
    let message = format!(
        "Added {} {} for '{}' ({})",
        expense.amount.display_with(&document.settings.currency),
        category,
        expense.description,
        expense.id
    );
    Ok(Out::new(message, expense))
}

/// Adds a payment method.
pub async fn add_payment_method(
    config: &Config,
    args: &AddPaymentMethodArgs,
) -> Result<Out<PaymentMethod>> {
    let name = args.name.trim();
    if name.is_empty() {
        bail!("The payment method name cannot be empty");
    }
    let payment_method = config
        .store()
        .add_payment_method(NewPaymentMethod {
            name: name.to_string(),
            icon: args.icon.clone(),
            r#type: args.r#type.clone(),
        })
        .await
        .context("Unable to add the payment method")?;

    let message = format!(
        "Added payment method {} {} ({})",
        payment_method.icon, payment_method.name, payment_method.id
    );
    Ok(Out::new(message, payment_method))
}

/// Adds a category. Names must be unique ignoring case.
pub async fn add_category(config: &Config, args: &AddCategoryArgs) -> Result<Out<Category>> {
    let name = args.name.trim();
    if name.is_empty() {
        bail!("The category name cannot be empty");
    }
    let store = config.store();
    let document = store.load_strict().await?.document;
    let lower = name.to_lowercase();
    if let Some(existing) = document
        .categories
        .iter()
        .find(|c| c.name.to_lowercase() == lower)
    {
        bail!(
            "There is already a category named '{}' with id {}",
            existing.name,
            existing.id
        );
    }

    let category = store
        .add_category(NewCategory {
            name: name.to_string(),
            icon: args.icon.clone(),
        })
        .await
        .context("Unable to add the category")?;

    let message = format!(
        "Added category {} {} ({})",
        category.icon, category.name, category.id
    );
    Ok(Out::new(message, category))
}

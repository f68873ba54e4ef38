//! These structs provide the CLI interface for the expense CLI.

use crate::model::{Amount, PaymentMethodType};
use crate::views::Period;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// expense: record expenses and see where your money goes.
///
/// All data lives in a single JSON document inside the expense home directory. Run
/// `expense init` once to create the directory, then add expenses, list them and export
/// backups that can be imported again later.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the expense home directory, its configuration and the initial data document.
    Init(InitArgs),
    /// Show an overview of the data document and whether it loaded cleanly.
    Show,
    /// Add an expense, a payment method or a category.
    Add(AddArgs),
    /// List expenses, payment methods or categories.
    List(ListArgs),
    /// Show spending totals per category and per month.
    Report(ReportArgs),
    /// Change the currency symbol used for display.
    Currency(CurrencyArgs),
    /// Write a pretty-printed copy of the data document to the backups directory.
    Export,
    /// Replace the data document with the contents of a backup file.
    ///
    /// Everything currently stored is replaced; nothing is merged.
    Import(ImportArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where expense data and configuration is held. Defaults to ~/expenses
    #[arg(long, env = "EXPENSE_HOME", default_value_t = default_expense_home())]
    expense_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, expense_home: PathBuf) -> Self {
        Self {
            log_level,
            expense_home: expense_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn expense_home(&self) -> &DisplayPath {
        &self.expense_home
    }
}

/// Args for the `expense init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// Where exported backups are written. Defaults to your downloads directory, or
    /// $EXPENSE_HOME/backups if there is none.
    #[arg(long)]
    backups_dir: Option<PathBuf>,
}

impl InitArgs {
    pub fn new(backups_dir: Option<PathBuf>) -> Self {
        Self { backups_dir }
    }

    pub fn backups_dir(&self) -> Option<&Path> {
        self.backups_dir.as_deref()
    }
}

/// Args for the `expense add` command.
#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    #[command(subcommand)]
    entity: AddSubcommand,
}

impl AddArgs {
    pub fn entity(&self) -> &AddSubcommand {
        &self.entity
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum AddSubcommand {
    /// Record a new expense.
    Expense(AddExpenseArgs),
    /// Add a payment method such as a card or a bank account.
    PaymentMethod(AddPaymentMethodArgs),
    /// Add a category.
    Category(AddCategoryArgs),
}

/// Args for `expense add expense`.
#[derive(Debug, Parser, Clone)]
pub struct AddExpenseArgs {
    /// The amount spent, e.g. 250.00
    #[arg(long)]
    pub amount: Amount,

    /// The category, by id or by name.
    #[arg(long)]
    pub category: String,

    /// The payment method, by id or by name.
    #[arg(long, default_value = "cash")]
    pub payment_method: String,

    /// What the money was spent on.
    #[arg(long)]
    pub description: String,

    /// Where the money was spent.
    #[arg(long)]
    pub location: Option<String>,

    /// The date of the expense as YYYY-MM-DD or an RFC 3339 timestamp. Defaults to today.
    #[arg(long)]
    pub date: Option<String>,
}

/// Args for `expense add payment-method`.
#[derive(Debug, Parser, Clone)]
pub struct AddPaymentMethodArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long, default_value = "💳")]
    pub icon: String,

    /// One of: cash, card, bank
    #[arg(long = "type", default_value = "card")]
    pub r#type: PaymentMethodType,
}

/// Args for `expense add category`.
#[derive(Debug, Parser, Clone)]
pub struct AddCategoryArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long, default_value = "🏷️")]
    pub icon: String,
}

/// Args for the `expense list` command.
#[derive(Debug, Parser, Clone)]
pub struct ListArgs {
    #[command(subcommand)]
    entity: ListSubcommand,
}

impl ListArgs {
    pub fn entity(&self) -> &ListSubcommand {
        &self.entity
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum ListSubcommand {
    /// List expenses, newest first.
    Expenses(ListExpensesArgs),
    PaymentMethods,
    Categories,
}

/// Args for `expense list expenses`.
#[derive(Debug, Default, Parser, Clone)]
pub struct ListExpensesArgs {
    #[arg(long, value_enum, default_value_t = Period::All)]
    pub period: Period,

    /// Only show expenses in these categories (by id or name). May be repeated.
    #[arg(long)]
    pub category: Vec<String>,

    /// Only show expenses whose description or category name contains this text.
    #[arg(long)]
    pub search: Option<String>,
}

/// Args for the `expense report` command.
#[derive(Debug, Default, Parser, Clone)]
pub struct ReportArgs {
    /// Restrict the report to this period.
    #[arg(long, value_enum, default_value_t = Period::All)]
    pub period: Period,
}

/// Args for the `expense currency` command.
#[derive(Debug, Parser, Clone)]
pub struct CurrencyArgs {
    /// The new currency symbol, e.g. ₹ or $
    symbol: String,
}

impl CurrencyArgs {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }
}

/// Args for the `expense import` command.
#[derive(Debug, Parser, Clone)]
pub struct ImportArgs {
    /// The backup file to import. Defaults to the newest backup in the backups directory.
    path: Option<PathBuf>,
}

impl ImportArgs {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

fn default_expense_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("expenses"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --expense-home or EXPENSE_HOME instead of relying on the \
                default expense home directory. If you continue using the program right now, \
                you may have problems!",
            );
            PathBuf::from("expenses")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

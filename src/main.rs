use chrono::Local;
use clap::Parser;
use expense_store::args::{AddSubcommand, Args, Command, ListSubcommand};
use expense_store::{commands, Config, Result};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().expense_home().path();

    // Periods such as "this month" are relative to the local calendar day
    let today = Local::now().date_naive();

    // Route to appropriate command handler
    let _: () = match args.command() {
        Command::Init(init_args) => commands::init(home, init_args.backups_dir())
            .await?
            .print(),

        Command::Show => commands::show(&Config::load(home).await?).await?.print(),

        Command::Add(add_args) => {
            let config = Config::load(home).await?;
            match add_args.entity() {
                AddSubcommand::Expense(args) => commands::add_expense(&config, args, today)
                    .await?
                    .print(),
                AddSubcommand::PaymentMethod(args) => commands::add_payment_method(&config, args)
                    .await?
                    .print(),
                AddSubcommand::Category(args) => {
                    commands::add_category(&config, args).await?.print()
                }
            }
        }

        Command::List(list_args) => {
            let config = Config::load(home).await?;
            match list_args.entity() {
                ListSubcommand::Expenses(args) => commands::list_expenses(&config, args, today)
                    .await?
                    .print(),
                ListSubcommand::PaymentMethods => {
                    commands::list_payment_methods(&config).await?.print()
                }
                ListSubcommand::Categories => commands::list_categories(&config).await?.print(),
            }
        }

        Command::Report(report_args) => {
            let config = Config::load(home).await?;
            commands::report(&config, report_args, today).await?.print()
        }

        Command::Currency(currency_args) => {
            let config = Config::load(home).await?;
            commands::currency(&config, currency_args).await?.print()
        }

        Command::Export => commands::export(&Config::load(home).await?).await?.print(),

        Command::Import(import_args) => {
            let config = Config::load(home).await?;
            commands::import(&config, import_args).await?.print()
        }
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for the library and this binary.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                level,
                env!("CARGO_CRATE_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

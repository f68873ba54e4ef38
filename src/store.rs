//! The local expense store: the sole owner of the JSON document on disk.
//!
//! Every operation reads and writes the whole document. Operations on a `Store` (and on its
//! clones) are serialized through one async mutex, so a read-modify-write such as
//! `add_expense` can never be clobbered by another one running at the same time.

use crate::backup::Backup;
use crate::clock::{Clock, SystemClock};
use crate::error::StoreError;
use crate::events::{Events, StoreEvent, Subscription};
use crate::model::{
    next_category_id, Category, Document, Expense, NewCategory, NewExpense, NewPaymentMethod,
    PaymentMethod,
};
use crate::utils::{iso_timestamp, mint_id};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

const EXPENSE_ID_PREFIX: &str = "exp";
const PAYMENT_METHOD_ID_PREFIX: &str = "pm";

/// How `load` arrived at the document it returned.
#[derive(Debug)]
pub enum LoadOutcome {
    /// The document was read from disk unchanged.
    Existing,
    /// There was no document yet, so the default document was written and returned.
    Created,
    /// The document lacked the "Others" category; it was added and the document rewritten.
    Migrated,
    /// The document could not be read or parsed (or the first-run default could not be
    /// written). A default document was returned in its place and nothing on disk was changed.
    Recovered(StoreError),
}

/// The result of `Store::load`.
#[derive(Debug)]
pub struct Loaded {
    pub document: Document,
    pub outcome: LoadOutcome,
}

impl Loaded {
    /// True when the returned document is a stand-in for one that could not be read.
    pub fn is_recovered(&self) -> bool {
        matches!(self.outcome, LoadOutcome::Recovered(_))
    }
}

/// Reads and writes the expense document at a single path.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
    backup: Backup,
    clock: Arc<dyn Clock>,
    events: Events,
    lock: Arc<Mutex<()>>,
}

impl Store {
    /// Creates a store over the document at `path`, exporting backups through `backup`. Nothing
    /// is read or written until the first operation.
    pub fn new(path: impl Into<PathBuf>, backup: Backup) -> Self {
        Self {
            path: path.into(),
            backup,
            clock: Arc::new(SystemClock),
            events: Events::new(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// Replaces the time source used for timestamps and ids.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backup(&self) -> &Backup {
        &self.backup
    }

    /// Registers for change notifications. Drop the `Subscription` to unsubscribe.
    pub fn subscribe(&self) -> Subscription {
        self.events.subscribe()
    }

    /// Loads the document, creating or migrating it as needed.
    ///
    /// This never fails: when the document cannot be read or parsed, a fresh default document
    /// is returned and `outcome` is `LoadOutcome::Recovered` carrying the error. Use
    /// `load_strict` to have such failures returned instead.
    pub async fn load(&self) -> Loaded {
        let _guard = self.lock.lock().await;
        match self.load_locked().await {
            Ok(loaded) => loaded,
            Err(e) => {
                warn!("Using default data because the document could not be loaded: {e}");
                Loaded {
                    document: self.default_document(),
                    outcome: LoadOutcome::Recovered(e),
                }
            }
        }
    }

    /// Loads the document like `load`, but returns read and parse failures instead of masking
    /// them. The outcome is never `LoadOutcome::Recovered`.
    pub async fn load_strict(&self) -> Result<Loaded, StoreError> {
        let _guard = self.lock.lock().await;
        self.load_locked().await
    }

    /// Stamps `lastUpdated` and overwrites the document on disk with `document`. Returns the
    /// document as written.
    pub async fn save(&self, document: Document) -> Result<Document, StoreError> {
        let _guard = self.lock.lock().await;
        self.save_locked(document).await
    }

    /// Prepends a new expense with a minted `exp_<ms>` id and `createdAt` timestamp.
    ///
    /// Two expenses added within the same millisecond get the same id.
    pub async fn add_expense(&self, new: NewExpense) -> Result<Expense, StoreError> {
        let _guard = self.lock.lock().await;
        let mut document = self.load_locked().await?.document;

        let now = self.clock.now();
        let expense = new.into_expense(mint_id(EXPENSE_ID_PREFIX, now), iso_timestamp(now));
        document.expenses.insert(0, expense.clone());
        self.save_locked(document).await?;

        debug!("Added expense {}", expense.id);
        self.events.publish(StoreEvent::ExpenseAdded {
            id: expense.id.clone(),
        });
        Ok(expense)
    }

    /// Appends a new payment method with a minted `pm_<ms>` id.
    pub async fn add_payment_method(
        &self,
        new: NewPaymentMethod,
    ) -> Result<PaymentMethod, StoreError> {
        let _guard = self.lock.lock().await;
        let mut document = self.load_locked().await?.document;

        let method = PaymentMethod {
            id: mint_id(PAYMENT_METHOD_ID_PREFIX, self.clock.now()),
            name: new.name,
            icon: new.icon,
            r#type: new.r#type,
            other_fields: Default::default(),
        };
        document.payment_methods.push(method.clone());
        self.save_locked(document).await?;

        debug!("Added payment method {}", method.id);
        self.events.publish(StoreEvent::PaymentMethodAdded {
            id: method.id.clone(),
        });
        Ok(method)
    }

    /// Appends a new category with an id no existing category uses.
    pub async fn add_category(&self, new: NewCategory) -> Result<Category, StoreError> {
        let _guard = self.lock.lock().await;
        let mut document = self.load_locked().await?.document;

        let category = Category::new(next_category_id(&document.categories), new.name, new.icon);
        document.categories.push(category.clone());
        self.save_locked(document).await?;

        debug!("Added category {}", category.id);
        self.events.publish(StoreEvent::CategoryAdded {
            id: category.id.clone(),
        });
        Ok(category)
    }

    /// Changes the currency symbol in the document settings.
    pub async fn set_currency(&self, currency: impl Into<String>) -> Result<Document, StoreError> {
        let _guard = self.lock.lock().await;
        let mut document = self.load_locked().await?.document;
        document.settings.currency = currency.into();
        self.save_locked(document).await
    }

    /// All expenses, newest first. Falls back to the default (empty) list like `load`.
    pub async fn expenses(&self) -> Vec<Expense> {
        self.load().await.document.expenses
    }

    /// All payment methods. Falls back to the default list like `load`.
    pub async fn payment_methods(&self) -> Vec<PaymentMethod> {
        self.load().await.document.payment_methods
    }

    /// Writes a pretty-printed copy of the current on-disk document to the backups directory
    /// and returns its path.
    pub async fn export_backup(&self) -> Result<PathBuf, StoreError> {
        let _guard = self.lock.lock().await;
        let document = self.load_locked().await?.document;
        let millis = self.clock.now().timestamp_millis();
        let path = self.backup.save_json(millis, &document).await?;

        info!("Exported backup to {}", path.display());
        self.events
            .publish(StoreEvent::Exported { path: path.clone() });
        Ok(path)
    }

    /// Replaces the whole document with the contents of the backup file at `path`.
    ///
    /// There is no merge and no validation beyond the file being a JSON object: missing fields
    /// take their defaults. If the file cannot be read or parsed, nothing is changed.
    pub async fn import_backup(&self, path: impl AsRef<Path>) -> Result<Document, StoreError> {
        let path = path.as_ref();
        let document = read_document(path).await?;

        let _guard = self.lock.lock().await;
        let document = self.save_locked(document).await?;

        info!("Imported backup from {}", path.display());
        self.events.publish(StoreEvent::Imported {
            path: path.to_path_buf(),
        });
        Ok(document)
    }

    fn default_document(&self) -> Document {
        Document::new_default(iso_timestamp(self.clock.now()))
    }

    /// Must be called while holding `self.lock`.
    async fn load_locked(&self) -> Result<Loaded, StoreError> {
        let mut document = match read_document(&self.path).await {
            Ok(document) => document,
            Err(StoreError::Read { source, .. }) if source.kind() == ErrorKind::NotFound => {
                info!("No document at {}, creating one", self.path.display());
                let document = self.default_document();
                self.write_document(&document).await?;
                self.events.publish(StoreEvent::Created);
                return Ok(Loaded {
                    document,
                    outcome: LoadOutcome::Created,
                });
            }
            Err(e) => return Err(e),
        };

        if document.migrate() {
            info!("Added the missing Others category to {}", self.path.display());
            self.write_document(&document).await?;
            self.events.publish(StoreEvent::Migrated);
            return Ok(Loaded {
                document,
                outcome: LoadOutcome::Migrated,
            });
        }

        Ok(Loaded {
            document,
            outcome: LoadOutcome::Existing,
        })
    }

    /// Must be called while holding `self.lock`.
    async fn save_locked(&self, mut document: Document) -> Result<Document, StoreError> {
        document.last_updated = iso_timestamp(self.clock.now());
        self.write_document(&document).await?;
        self.events.publish(StoreEvent::Saved {
            last_updated: document.last_updated.clone(),
        });
        Ok(document)
    }

    /// Serializes `document` and replaces the file with it. The bytes go to a sibling temporary
    /// file first, which is then renamed over the document.
    async fn write_document(&self, document: &Document) -> Result<(), StoreError> {
        let write_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source: std::io::Error| StoreError::Write { path, source }
        };

        let json = serde_json::to_string(document).map_err(|source| StoreError::Serialize {
            path: self.path.clone(),
            source,
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(write_err(parent))?;
        }

        let tmp = temp_path(&self.path);
        tokio::fs::write(&tmp, json)
            .await
            .map_err(write_err(&tmp))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(write_err(&self.path))?;
        Ok(())
    }
}

/// Reads and parses a document file.
async fn read_document(path: &Path) -> Result<Document, StoreError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| StoreError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    serde_json::from_str(&text).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Amount, PaymentMethodType, OTHERS_ICON, OTHERS_ID};
    use crate::test::TestEnv;
    use chrono::{DateTime, Utc};
    use std::str::FromStr;

    fn groceries() -> NewExpense {
        NewExpense {
            amount: Amount::from_str("250.00").unwrap(),
            category_id: "2".to_string(),
            payment_method_id: Some("cash".to_string()),
            description: "Groceries".to_string(),
            date: "2024-01-15".to_string(),
            ..NewExpense::default()
        }
    }

    fn expense(description: &str) -> NewExpense {
        NewExpense {
            amount: Amount::from_str("10").unwrap(),
            category_id: "1".to_string(),
            payment_method_id: Some("cash".to_string()),
            description: description.to_string(),
            date: "2024-02-01".to_string(),
            ..NewExpense::default()
        }
    }

    /// Compares documents while ignoring `lastUpdated`.
    fn assert_same_data(a: &Document, b: &Document) {
        let mut a = a.clone();
        let mut b = b.clone();
        a.last_updated.clear();
        b.last_updated.clear();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_first_run_creates_default() {
        let env = TestEnv::new().await;
        let store = env.store();
        assert!(!store.path().exists());

        let first = store.load().await;
        assert!(matches!(first.outcome, LoadOutcome::Created));
        let doc = &first.document;
        assert_eq!(doc.categories.len(), 8);
        assert_eq!(doc.payment_methods.len(), 1);
        assert_eq!(doc.payment_methods[0].id, "cash");
        assert_eq!(doc.payment_methods[0].r#type, PaymentMethodType::Cash);
        assert!(doc.expenses.is_empty());
        assert_eq!(doc.settings.currency, "₹");

        let bytes_before = tokio::fs::read(store.path()).await.unwrap();
        let second = store.load().await;
        let bytes_after = tokio::fs::read(store.path()).await.unwrap();
        assert!(matches!(second.outcome, LoadOutcome::Existing));
        assert_eq!(bytes_before, bytes_after);
        assert_eq!(first.document, second.document);
    }

    #[tokio::test]
    async fn test_migration_is_idempotent() {
        let env = TestEnv::new().await;
        let store = env.store();
        let mut doc = Document::new_default("2024-01-01T00:00:00.000Z");
        doc.categories.retain(|c| !c.is_others());
        tokio::fs::write(store.path(), serde_json::to_string(&doc).unwrap())
            .await
            .unwrap();

        let first = store.load().await;
        assert!(matches!(first.outcome, LoadOutcome::Migrated));
        let others: Vec<&Category> = first
            .document
            .categories
            .iter()
            .filter(|c| c.is_others())
            .collect();
        assert_eq!(others.len(), 1);
        assert_eq!(others[0].id, OTHERS_ID);
        assert_eq!(others[0].icon, OTHERS_ICON);

        let second = store.load().await;
        assert!(matches!(second.outcome, LoadOutcome::Existing));
        assert_eq!(
            second
                .document
                .categories
                .iter()
                .filter(|c| c.is_others())
                .count(),
            1
        );
    }

    #[tokio::test]
    async fn test_lowercase_others_is_not_duplicated() {
        let env = TestEnv::new().await;
        let store = env.store();
        let json = r#"{"categories":[{"id":"1","name":"others","icon":"x"}],"expenses":[]}"#;
        tokio::fs::write(store.path(), json).await.unwrap();

        let loaded = store.load().await;
        assert!(matches!(loaded.outcome, LoadOutcome::Existing));
        assert_eq!(loaded.document.categories.len(), 1);
    }

    #[tokio::test]
    async fn test_add_expense_newest_first() {
        let env = TestEnv::new().await;
        let store = env.store();

        let mut ids = Vec::new();
        for description in ["first", "second", "third"] {
            ids.push(store.add_expense(expense(description)).await.unwrap().id);
        }

        let doc = store.load().await.document;
        let descriptions: Vec<&str> = doc.expenses.iter().map(|e| e.description.as_str()).collect();
        assert_eq!(descriptions, vec!["third", "second", "first"]);
        ids.reverse();
        let stored_ids: Vec<String> = doc.expenses.iter().map(|e| e.id.clone()).collect();
        assert_eq!(stored_ids, ids);
        assert!(stored_ids.iter().all(|id| id.starts_with("exp_")));
    }

    #[tokio::test]
    async fn test_save_then_load_round_trip() {
        let env = TestEnv::new().await;
        // The real clock, so lastUpdated can be compared to the time of the call
        let store = Store::new(env.config().data_path(), env.config().backup());
        let mut doc = store.load().await.document;
        doc.expenses.push(Expense {
            id: "exp_1".to_string(),
            amount: Amount::from_str("123.45").unwrap(),
            category_id: "2".to_string(),
            description: "Lunch".to_string(),
            date: "2024-01-15T12:00:00.000Z".to_string(),
            created_at: "2024-01-15T12:00:01.000Z".to_string(),
            ..Expense::default()
        });
        doc.settings.currency = "$".to_string();

        let before = Utc::now().timestamp_millis();
        store.save(doc.clone()).await.unwrap();
        let loaded = store.load().await.document;

        assert_same_data(&doc, &loaded);
        let stamped = DateTime::parse_from_rfc3339(&loaded.last_updated).unwrap();
        assert!(stamped.timestamp_millis() >= before);
    }

    #[tokio::test]
    async fn test_export_import_round_trip() {
        let env = TestEnv::new().await;
        let store = env.store();
        store.add_expense(groceries()).await.unwrap();
        let at_export = store.load().await.document;

        let path = store.export_backup().await.unwrap();
        assert!(path.starts_with(env.config().backups()));
        assert!(path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("expense_backup_"));

        // Change the live document so the import has something to undo
        store.add_expense(expense("after export")).await.unwrap();
        store.import_backup(&path).await.unwrap();

        assert_same_data(&store.load().await.document, &at_export);
    }

    #[tokio::test]
    async fn test_corrupt_document_is_masked_by_load() {
        let env = TestEnv::new().await;
        let store = env.store();
        tokio::fs::write(store.path(), "this is not json").await.unwrap();

        let loaded = store.load().await;

        assert!(loaded.is_recovered());
        assert!(matches!(
            loaded.outcome,
            LoadOutcome::Recovered(StoreError::Parse { .. })
        ));
        assert_eq!(loaded.document.categories.len(), 8);
        assert!(loaded.document.expenses.is_empty());
        // The unreadable file is left for the user to recover
        let on_disk = tokio::fs::read_to_string(store.path()).await.unwrap();
        assert_eq!(on_disk, "this is not json");
    }

    #[tokio::test]
    async fn test_corrupt_document_is_reported_by_strict_operations() {
        let env = TestEnv::new().await;
        let store = env.store();
        tokio::fs::write(store.path(), "{ broken").await.unwrap();

        assert!(matches!(
            store.load_strict().await,
            Err(StoreError::Parse { .. })
        ));
        assert!(matches!(
            store.add_expense(groceries()).await,
            Err(StoreError::Parse { .. })
        ));
        assert!(store.export_backup().await.is_err());
        let on_disk = tokio::fs::read_to_string(store.path()).await.unwrap();
        assert_eq!(on_disk, "{ broken");
    }

    #[tokio::test]
    async fn test_groceries_scenario() {
        let env = TestEnv::new().await;
        let store = env.store();

        let added = store.add_expense(groceries()).await.unwrap();
        assert!(added.id.starts_with("exp_"));
        assert!(!added.created_at.is_empty());

        let doc = store.load().await.document;
        assert_eq!(doc.expenses[0].description, "Groceries");
        assert_eq!(doc.expenses[0].amount.to_string(), "250.00");

        let raw: serde_json::Value =
            serde_json::from_str(&tokio::fs::read_to_string(store.path()).await.unwrap())
                .unwrap();
        assert_eq!(raw["expenses"][0]["amount"], "250.00");
        assert_eq!(raw["expenses"][0]["categoryId"], "2");
        assert_eq!(raw["expenses"][0]["paymentMethodId"], "cash");
    }

    #[tokio::test]
    async fn test_add_payment_method_appends() {
        let env = TestEnv::new().await;
        let store = env.store();

        let card = store
            .add_payment_method(NewPaymentMethod {
                name: "HDFC Card".to_string(),
                icon: "💳".to_string(),
                r#type: PaymentMethodType::Card,
            })
            .await
            .unwrap();

        assert!(card.id.starts_with("pm_"));
        let methods = store.payment_methods().await;
        assert_eq!(methods.len(), 2);
        assert_eq!(methods[0].id, "cash");
        assert_eq!(methods[1], card);
    }

    #[tokio::test]
    async fn test_add_category_mints_unique_id() {
        let env = TestEnv::new().await;
        let store = env.store();

        let pets = store
            .add_category(NewCategory {
                name: "Pets".to_string(),
                icon: "🐶".to_string(),
            })
            .await
            .unwrap();
        let gifts = store
            .add_category(NewCategory {
                name: "Gifts".to_string(),
                icon: "🎁".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(pets.id, "9");
        assert_eq!(gifts.id, "10");
        assert_eq!(store.load().await.document.categories.len(), 10);
    }

    #[tokio::test]
    async fn test_concurrent_adds_are_not_lost() {
        let env = TestEnv::new().await;
        let store = env.store();

        let mut handles = Vec::new();
        for i in 0..20 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.add_expense(expense(&format!("tap {i}"))).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.expenses().await.len(), 20);
    }

    #[tokio::test]
    async fn test_import_rejects_non_json() {
        let env = TestEnv::new().await;
        let store = env.store();
        store.add_expense(groceries()).await.unwrap();
        let bad = env.root().join("bad_backup.json");
        tokio::fs::write(&bad, "<html>").await.unwrap();

        assert!(matches!(
            store.import_backup(&bad).await,
            Err(StoreError::Parse { .. })
        ));
        assert!(matches!(
            store.import_backup(env.root().join("missing.json")).await,
            Err(StoreError::Read { .. })
        ));
        assert_eq!(store.expenses().await.len(), 1);
    }

    #[tokio::test]
    async fn test_import_replaces_without_merge() {
        let env = TestEnv::new().await;
        let store = env.store();
        store.add_expense(groceries()).await.unwrap();
        let sparse = env.root().join("sparse.json");
        tokio::fs::write(&sparse, r#"{"version": "0.9", "expenses": []}"#)
            .await
            .unwrap();

        let imported = store.import_backup(&sparse).await.unwrap();

        assert_eq!(imported.version, "0.9");
        assert!(imported.categories.is_empty());
        // The next load repairs the missing fallback category
        let loaded = store.load().await;
        assert!(matches!(loaded.outcome, LoadOutcome::Migrated));
        assert_eq!(loaded.document.categories.len(), 1);
        assert!(loaded.document.expenses.is_empty());
    }

    #[tokio::test]
    async fn test_set_currency() {
        let env = TestEnv::new().await;
        let store = env.store();
        store.set_currency("€").await.unwrap();
        assert_eq!(store.load().await.document.settings.currency, "€");
    }

    #[tokio::test]
    async fn test_events_follow_operations() {
        let env = TestEnv::new().await;
        let store = env.store();
        let mut sub = store.subscribe();

        let added = store.add_expense(groceries()).await.unwrap();

        assert_eq!(sub.next().await, Some(StoreEvent::Created));
        assert!(matches!(sub.next().await, Some(StoreEvent::Saved { .. })));
        assert_eq!(
            sub.next().await,
            Some(StoreEvent::ExpenseAdded { id: added.id })
        );
        assert_eq!(sub.try_next(), None);
    }

    #[tokio::test]
    async fn test_unknown_fields_survive_save() {
        let env = TestEnv::new().await;
        let store = env.store();
        let json = r##"{
            "version": "1.0",
            "lastUpdated": "2024-01-01T00:00:00.000Z",
            "settings": {"currency": "₹", "budget": 5000},
            "paymentMethods": [],
            "categories": [{"id": "8", "name": "Others", "icon": "📦", "color": "#6B7280"}],
            "expenses": [],
            "profile": {"name": "Asha"}
        }"##;
        tokio::fs::write(store.path(), json).await.unwrap();

        store.add_expense(groceries()).await.unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&tokio::fs::read_to_string(store.path()).await.unwrap())
                .unwrap();
        assert_eq!(raw["settings"]["budget"], 5000);
        assert_eq!(raw["categories"][0]["color"], "#6B7280");
        assert_eq!(raw["profile"]["name"], "Asha");
    }

    /// A document as the mobile app writes it, including an expense whose amount was not a
    /// number (`NaN` is written to JSON as `null`).
    const MOBILE_DOCUMENT: &str = r#"{
        "version": "1.0",
        "lastUpdated": "2024-01-16T09:00:00.000Z",
        "settings": {"currency": "₹"},
        "paymentMethods": [{"id": "cash", "name": "Cash", "icon": "💵", "type": "cash"}],
        "categories": [{"id": "2", "name": "Food", "icon": "🍕"},
                       {"id": "8", "name": "Others", "icon": "📦"}],
        "expenses": [
            {"id": "exp_2", "amount": null, "categoryId": "2", "paymentMethod": "Cash",
             "description": "Snacks", "location": null, "date": "2024-01-16T08:00:00.000Z",
             "createdAt": "2024-01-16T08:00:00.000Z"},
            {"id": "exp_1", "amount": 250, "categoryId": "2", "paymentMethod": "Cash",
             "description": "Groceries", "location": "", "date": "2024-01-15T08:00:00.000Z",
             "createdAt": "2024-01-15T08:00:00.000Z"}
        ]
    }"#;

    #[tokio::test]
    async fn test_malformed_expense_does_not_hide_history() {
        let env = TestEnv::new().await;
        let store = env.store();
        tokio::fs::write(store.path(), MOBILE_DOCUMENT).await.unwrap();

        let loaded = store.load().await;
        assert!(matches!(loaded.outcome, LoadOutcome::Existing));
        assert_eq!(loaded.document.expenses.len(), 2);
        assert_eq!(loaded.document.expenses[0].amount, Amount::ZERO);
        assert_eq!(loaded.document.expenses[1].description, "Groceries");

        store.add_expense(groceries()).await.unwrap();
        assert_eq!(store.expenses().await.len(), 3);
        store.export_backup().await.unwrap();
    }

    #[tokio::test]
    async fn test_import_malformed_expense() {
        let env = TestEnv::new().await;
        let store = env.store();
        let path = env.root().join("mobile_backup.json");
        tokio::fs::write(&path, MOBILE_DOCUMENT).await.unwrap();

        let imported = store.import_backup(&path).await.unwrap();

        assert_eq!(imported.expenses.len(), 2);
        assert_eq!(store.expenses().await.len(), 2);
    }

    #[test]
    fn test_temp_path() {
        assert_eq!(
            temp_path(Path::new("/a/expense_data.json")),
            PathBuf::from("/a/expense_data.json.tmp")
        );
    }
}

//! CRUD addressed by [`EntityKind`] with JSON payloads, for callers that
//! pick the kind at runtime.

use serde_json::{Map, Value as Json};

use super::Store;
use crate::error::{BrainError, Result};
use crate::model::{
    Account, Category, Contact, Employee, FinanceCategory, FinancialGoal, Idea, KnowledgeNote,
    Project, Review, Task, Transaction, WidgetPlacement,
};
use crate::schema::{EntityKind, SETTINGS};

/// Run `$body` with `$R` bound to the record type of `$kind`.
macro_rules! with_kind {
    ($kind:expr, |$R:ident| $body:expr) => {
        match $kind {
            EntityKind::Task => { type $R = Task; $body }
            EntityKind::Project => { type $R = Project; $body }
            EntityKind::Category => { type $R = Category; $body }
            EntityKind::Employee => { type $R = Employee; $body }
            EntityKind::Idea => { type $R = Idea; $body }
            EntityKind::Review => { type $R = Review; $body }
            EntityKind::KnowledgeNote => { type $R = KnowledgeNote; $body }
            EntityKind::Account => { type $R = Account; $body }
            EntityKind::Transaction => { type $R = Transaction; $body }
            EntityKind::FinanceCategory => { type $R = FinanceCategory; $body }
            EntityKind::Contact => { type $R = Contact; $body }
            EntityKind::FinancialGoal => { type $R = FinancialGoal; $body }
            EntityKind::WidgetPlacement => { type $R = WidgetPlacement; $body }
        }
    };
}

impl Store {
    /// All records of `kind` as JSON objects.
    pub fn get_all_json(&self, kind: EntityKind) -> Result<Vec<Json>> {
        with_kind!(kind, |R| {
            self.get_all::<R>()
                .iter()
                .map(|record| serde_json::to_value(record).map_err(BrainError::from))
                .collect()
        })
    }

    pub fn get_json(&self, kind: EntityKind, id: &str) -> Result<Option<Json>> {
        with_kind!(kind, |R| {
            self.get::<R>(id)
                .map(|record| serde_json::to_value(record).map_err(BrainError::from))
                .transpose()
        })
    }

    /// Decode `value` as a record of `kind` and upsert it.
    ///
    /// A payload that does not describe a valid record is an error; storage
    /// failures degrade like [`Store::upsert`].
    pub async fn upsert_json(&self, kind: EntityKind, value: Json) -> Result<bool> {
        with_kind!(kind, |R| {
            let record: R = serde_json::from_value(value)
                .map_err(|e| BrainError::InvalidInput(format!("Invalid {} record: {}", kind, e)))?;
            Ok(self.upsert(&record).await)
        })
    }

    pub async fn delete_kind(&self, kind: EntityKind, id: &str) -> bool {
        with_kind!(kind, |R| self.delete::<R>(id).await)
    }

    /// Every record and setting as one JSON document, keyed by table name.
    pub fn export_json(&self) -> Result<Json> {
        if !self.is_ready() {
            return Err(BrainError::NotReady);
        }
        let mut document = Map::new();
        for kind in EntityKind::ALL {
            document.insert(
                kind.table().name.to_string(),
                Json::Array(self.get_all_json(kind)?),
            );
        }
        let settings = self
            .settings()
            .all()
            .into_iter()
            .map(|setting| {
                let value = setting.value_or(Json::Null);
                (setting.key, value)
            })
            .collect::<Map<_, _>>();
        document.insert(SETTINGS.name.to_string(), Json::Object(settings));
        Ok(Json::Object(document))
    }
}

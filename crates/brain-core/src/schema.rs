//! Schema registry: the single source of truth for table layouts.
//!
//! Every persisted kind has one [`TableDef`] listing typed column
//! descriptors in storage order. The primary key is always the first
//! column. Insert statements, row decoding and `CREATE TABLE` are all
//! derived from these definitions; nothing else hand-codes column lists.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::{BrainError, Result};
use crate::value::ColumnType;

/// A typed column descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: &'static str,
    pub ty: ColumnType,
    pub nullable: bool,
}

const fn required(name: &'static str, ty: ColumnType) -> ColumnDef {
    ColumnDef {
        name,
        ty,
        nullable: false,
    }
}

const fn optional(name: &'static str, ty: ColumnType) -> ColumnDef {
    ColumnDef {
        name,
        ty,
        nullable: true,
    }
}

/// Layout of one table.
#[derive(Debug, PartialEq, Eq)]
pub struct TableDef {
    pub name: &'static str,
    pub columns: &'static [ColumnDef],
}

impl TableDef {
    pub fn primary_key(&self) -> &'static ColumnDef {
        &self.columns[0]
    }

    pub fn position(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == column)
    }

    pub fn column(&self, column: &str) -> Result<(usize, &'static ColumnDef)> {
        let columns: &'static [ColumnDef] = self.columns;
        columns
            .iter()
            .enumerate()
            .find(|(_, c)| c.name == column)
            .ok_or_else(|| {
                BrainError::Schema(format!("Table '{}' has no column '{}'", self.name, column))
            })
    }

    /// Comma-separated column list in registry order.
    pub fn column_list(&self) -> String {
        self.columns
            .iter()
            .map(|c| c.name)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Reject layouts that could scramble reads or writes.
    pub fn validate(&self) -> Result<()> {
        if !is_identifier(self.name) {
            return Err(BrainError::Schema(format!(
                "Invalid table name '{}'",
                self.name
            )));
        }
        let Some(pk) = self.columns.first() else {
            return Err(BrainError::Schema(format!(
                "Table '{}' has no columns",
                self.name
            )));
        };
        if pk.nullable || pk.ty != ColumnType::Text {
            return Err(BrainError::Schema(format!(
                "Primary key '{}.{}' must be non-null text",
                self.name, pk.name
            )));
        }

        let mut seen = HashSet::new();
        for column in self.columns {
            if !is_identifier(column.name) {
                return Err(BrainError::Schema(format!(
                    "Invalid column name '{}.{}'",
                    self.name, column.name
                )));
            }
            if !seen.insert(column.name) {
                return Err(BrainError::Schema(format!(
                    "Duplicate column '{}.{}'",
                    self.name, column.name
                )));
            }
        }
        Ok(())
    }

    /// Idempotent `CREATE TABLE` statement for this layout.
    pub fn create_statement(&self) -> String {
        let pk = self.primary_key().name;
        let columns = self
            .columns
            .iter()
            .map(|c| {
                let mut def = format!("{} {}", c.name, c.ty.sql_type());
                if c.name == pk {
                    def.push_str(" PRIMARY KEY NOT NULL");
                } else if !c.nullable {
                    def.push_str(" NOT NULL");
                }
                def
            })
            .collect::<Vec<_>>()
            .join(",\n    ");
        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n    {}\n)",
            self.name, columns
        )
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// Clearing a reference on dependent rows when the referenced row is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CascadeRule {
    /// Table whose row is being deleted
    pub source: &'static str,
    /// Table holding the reference
    pub dependent: &'static str,
    /// Reference column set to NULL
    pub column: &'static str,
}

pub const CASCADE_RULES: &[CascadeRule] = &[
    CascadeRule {
        source: "projects",
        dependent: "tasks",
        column: "project_id",
    },
    CascadeRule {
        source: "categories",
        dependent: "tasks",
        column: "category_id",
    },
];

pub fn cascades_for(table: &str) -> impl Iterator<Item = &'static CascadeRule> + '_ {
    CASCADE_RULES.iter().filter(move |rule| rule.source == table)
}

use ColumnType::{Boolean, Integer, Json, Real, Text, Timestamp};

pub static TASKS: TableDef = TableDef {
    name: "tasks",
    columns: &[
        required("id", Text),
        required("title", Text),
        required("is_done", Boolean),
        required("priority", Text),
        optional("deadline", Timestamp),
        optional("completed_at", Timestamp),
        optional("project_id", Text),
        optional("category_id", Text),
        optional("recurrence", Text),
        optional("time_of_day", Text),
        optional("assigned_to", Text),
        optional("original_text", Text),
        optional("duration_minutes", Integer),
    ],
};

pub static PROJECTS: TableDef = TableDef {
    name: "projects",
    columns: &[
        required("id", Text),
        required("name", Text),
        optional("icon", Text),
        optional("color", Text),
    ],
};

pub static CATEGORIES: TableDef = TableDef {
    name: "categories",
    columns: &[
        required("id", Text),
        required("name", Text),
        required("icon", Text),
        optional("color", Text),
    ],
};

pub static EMPLOYEES: TableDef = TableDef {
    name: "employees",
    columns: &[
        required("id", Text),
        required("name", Text),
        optional("avatar", Text),
        optional("color", Text),
    ],
};

pub static IDEAS: TableDef = TableDef {
    name: "ideas",
    columns: &[
        required("id", Text),
        required("text", Text),
        required("created_at", Timestamp),
    ],
};

pub static REVIEWS: TableDef = TableDef {
    name: "reviews",
    columns: &[
        required("id", Text),
        required("date", Timestamp),
        required("ai_summary", Text),
        required("user_notes", Text),
        optional("mood", Text),
    ],
};

pub static KNOWLEDGE_NOTES: TableDef = TableDef {
    name: "knowledge_notes",
    columns: &[
        required("id", Text),
        required("title", Text),
        required("content", Text),
        required("created_at", Timestamp),
        required("updated_at", Timestamp),
    ],
};

pub static ACCOUNTS: TableDef = TableDef {
    name: "accounts",
    columns: &[
        required("id", Text),
        required("name", Text),
        required("account_type", Text),
        required("balance", Real),
    ],
};

pub static TRANSACTIONS: TableDef = TableDef {
    name: "transactions",
    columns: &[
        required("id", Text),
        required("amount", Real),
        required("kind", Text),
        required("category_id", Text),
        required("account_id", Text),
        required("date", Timestamp),
        optional("description", Text),
    ],
};

pub static FINANCE_CATEGORIES: TableDef = TableDef {
    name: "finance_categories",
    columns: &[
        required("id", Text),
        required("name", Text),
        required("kind", Text),
        optional("icon", Text),
        optional("color", Text),
    ],
};

pub static CONTACTS: TableDef = TableDef {
    name: "contacts",
    columns: &[
        required("id", Text),
        required("name", Text),
        optional("email", Text),
        optional("phone", Text),
        optional("company", Text),
        optional("notes", Text),
    ],
};

pub static FINANCIAL_GOALS: TableDef = TableDef {
    name: "financial_goals",
    columns: &[
        required("id", Text),
        required("name", Text),
        required("target_amount", Real),
        required("current_amount", Real),
        optional("deadline", Timestamp),
        required("created_at", Timestamp),
    ],
};

pub static WIDGETS: TableDef = TableDef {
    name: "widgets",
    columns: &[
        required("id", Text),
        required("widget_type", Text),
        required("x", Real),
        required("y", Real),
        required("width", Real),
        required("height", Real),
        optional("config", Json),
    ],
};

pub static SETTINGS: TableDef = TableDef {
    name: "settings",
    columns: &[required("key", Text), optional("value", Text)],
};

/// Every registered table, entity tables first, settings last.
pub static ALL_TABLES: [&TableDef; 14] = [
    &TASKS,
    &PROJECTS,
    &CATEGORIES,
    &EMPLOYEES,
    &IDEAS,
    &REVIEWS,
    &KNOWLEDGE_NOTES,
    &ACCOUNTS,
    &TRANSACTIONS,
    &FINANCE_CATEGORIES,
    &CONTACTS,
    &FINANCIAL_GOALS,
    &WIDGETS,
    &SETTINGS,
];

/// The fixed set of entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Task,
    Project,
    Category,
    Employee,
    Idea,
    Review,
    KnowledgeNote,
    Account,
    Transaction,
    FinanceCategory,
    Contact,
    FinancialGoal,
    WidgetPlacement,
}

impl EntityKind {
    pub const ALL: [EntityKind; 13] = [
        EntityKind::Task,
        EntityKind::Project,
        EntityKind::Category,
        EntityKind::Employee,
        EntityKind::Idea,
        EntityKind::Review,
        EntityKind::KnowledgeNote,
        EntityKind::Account,
        EntityKind::Transaction,
        EntityKind::FinanceCategory,
        EntityKind::Contact,
        EntityKind::FinancialGoal,
        EntityKind::WidgetPlacement,
    ];

    pub fn table(self) -> &'static TableDef {
        match self {
            EntityKind::Task => &TASKS,
            EntityKind::Project => &PROJECTS,
            EntityKind::Category => &CATEGORIES,
            EntityKind::Employee => &EMPLOYEES,
            EntityKind::Idea => &IDEAS,
            EntityKind::Review => &REVIEWS,
            EntityKind::KnowledgeNote => &KNOWLEDGE_NOTES,
            EntityKind::Account => &ACCOUNTS,
            EntityKind::Transaction => &TRANSACTIONS,
            EntityKind::FinanceCategory => &FINANCE_CATEGORIES,
            EntityKind::Contact => &CONTACTS,
            EntityKind::FinancialGoal => &FINANCIAL_GOALS,
            EntityKind::WidgetPlacement => &WIDGETS,
        }
    }

    fn singular(self) -> &'static str {
        match self {
            EntityKind::Task => "task",
            EntityKind::Project => "project",
            EntityKind::Category => "category",
            EntityKind::Employee => "employee",
            EntityKind::Idea => "idea",
            EntityKind::Review => "review",
            EntityKind::KnowledgeNote => "knowledge_note",
            EntityKind::Account => "account",
            EntityKind::Transaction => "transaction",
            EntityKind::FinanceCategory => "finance_category",
            EntityKind::Contact => "contact",
            EntityKind::FinancialGoal => "financial_goal",
            EntityKind::WidgetPlacement => "widget",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table().name)
    }
}

impl FromStr for EntityKind {
    type Err = BrainError;

    /// Accepts table names (`tasks`) and singular names (`task`), with `-` or `_`.
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.table().name == normalized || kind.singular() == normalized)
            .ok_or_else(|| BrainError::InvalidInput(format!("Unknown entity kind: {}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_registered_tables_validate() {
        for table in ALL_TABLES {
            table.validate().unwrap();
        }
    }

    #[test]
    fn test_table_names_are_unique() {
        let names: HashSet<_> = ALL_TABLES.iter().map(|t| t.name).collect();
        assert_eq!(names.len(), ALL_TABLES.len());
    }

    #[test]
    fn test_every_kind_maps_to_a_registered_table() {
        for kind in EntityKind::ALL {
            assert!(ALL_TABLES.iter().any(|t| std::ptr::eq(*t, kind.table())));
        }
    }

    #[test]
    fn test_validate_rejects_nullable_primary_key() {
        static BAD: TableDef = TableDef {
            name: "bad",
            columns: &[optional("id", ColumnType::Text)],
        };
        assert!(matches!(BAD.validate(), Err(BrainError::Schema(_))));
    }

    #[test]
    fn test_validate_rejects_duplicate_columns() {
        static DUP: TableDef = TableDef {
            name: "dup",
            columns: &[
                required("id", ColumnType::Text),
                optional("name", ColumnType::Text),
                optional("name", ColumnType::Integer),
            ],
        };
        assert!(matches!(DUP.validate(), Err(BrainError::Schema(_))));
    }

    #[test]
    fn test_validate_rejects_unsafe_identifiers() {
        static INJECT: TableDef = TableDef {
            name: "tasks; DROP TABLE tasks",
            columns: &[required("id", ColumnType::Text)],
        };
        assert!(INJECT.validate().is_err());
    }

    #[test]
    fn test_create_statement_is_idempotent_form() {
        let sql = PROJECTS.create_statement();
        assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS projects"));
        assert!(sql.contains("id TEXT PRIMARY KEY NOT NULL"));
        assert!(sql.contains("name TEXT NOT NULL"));
        assert!(sql.contains("icon TEXT,"));
    }

    #[test]
    fn test_cascade_rules_reference_registered_columns() {
        for rule in CASCADE_RULES {
            let dependent = ALL_TABLES
                .iter()
                .find(|t| t.name == rule.dependent)
                .unwrap();
            let (_, column) = dependent.column(rule.column).unwrap();
            assert!(column.nullable);
        }
        assert_eq!(cascades_for("projects").count(), 1);
        assert_eq!(cascades_for("tasks").count(), 0);
    }

    #[test]
    fn test_entity_kind_parsing() {
        assert_eq!("tasks".parse::<EntityKind>().unwrap(), EntityKind::Task);
        assert_eq!("task".parse::<EntityKind>().unwrap(), EntityKind::Task);
        assert_eq!(
            "finance-category".parse::<EntityKind>().unwrap(),
            EntityKind::FinanceCategory
        );
        assert_eq!("widgets".parse::<EntityKind>().unwrap(), EntityKind::WidgetPlacement);
        assert!("settings".parse::<EntityKind>().is_err());
    }
}

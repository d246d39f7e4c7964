//! Finance records: accounts, money movements, their categories and goals.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{text_enum, Record};
use crate::error::Result;
use crate::schema::{self, TableDef};
use crate::storage::row::{RowBuilder, RowValues};

text_enum! {
    pub enum AccountType {
        Personal => "personal",
        Business => "business",
    }
}

text_enum! {
    /// Direction of a transaction, also used to partition finance categories.
    pub enum FlowKind {
        Income => "income",
        Expense => "expense",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub account_type: AccountType,
    pub balance: f64,
}

impl Record for Account {
    fn table() -> &'static TableDef {
        &schema::ACCOUNTS
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn encode(&self, row: RowBuilder) -> RowBuilder {
        row.text("id", &self.id)
            .text("name", &self.name)
            .text("account_type", self.account_type.as_str())
            .real("balance", self.balance)
    }

    fn decode(row: &RowValues) -> Result<Self> {
        Ok(Self {
            id: row.text("id")?,
            name: row.text("name")?,
            account_type: row.text("account_type")?.parse()?,
            balance: row.real("balance")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub amount: f64,
    pub kind: FlowKind,
    /// Reference to a [`FinanceCategory`]
    pub category_id: String,
    /// Reference to an [`Account`]
    pub account_id: String,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Record for Transaction {
    fn table() -> &'static TableDef {
        &schema::TRANSACTIONS
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn encode(&self, row: RowBuilder) -> RowBuilder {
        row.text("id", &self.id)
            .real("amount", self.amount)
            .text("kind", self.kind.as_str())
            .text("category_id", &self.category_id)
            .text("account_id", &self.account_id)
            .timestamp("date", &self.date)
            .opt_text("description", self.description.as_deref())
    }

    fn decode(row: &RowValues) -> Result<Self> {
        Ok(Self {
            id: row.text("id")?,
            amount: row.real("amount")?,
            kind: row.text("kind")?.parse()?,
            category_id: row.text("category_id")?,
            account_id: row.text("account_id")?,
            date: row.timestamp("date")?,
            description: row.opt_text("description")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinanceCategory {
    pub id: String,
    pub name: String,
    pub kind: FlowKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Record for FinanceCategory {
    fn table() -> &'static TableDef {
        &schema::FINANCE_CATEGORIES
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn encode(&self, row: RowBuilder) -> RowBuilder {
        row.text("id", &self.id)
            .text("name", &self.name)
            .text("kind", self.kind.as_str())
            .opt_text("icon", self.icon.as_deref())
            .opt_text("color", self.color.as_deref())
    }

    fn decode(row: &RowValues) -> Result<Self> {
        Ok(Self {
            id: row.text("id")?,
            name: row.text("name")?,
            kind: row.text("kind")?.parse()?,
            icon: row.opt_text("icon")?,
            color: row.opt_text("color")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialGoal {
    pub id: String,
    pub name: String,
    pub target_amount: f64,
    pub current_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl FinancialGoal {
    /// Fraction of the target reached, clamped to `0.0..=1.0`.
    pub fn progress(&self) -> f64 {
        if self.target_amount <= 0.0 {
            return 1.0;
        }
        (self.current_amount / self.target_amount).clamp(0.0, 1.0)
    }
}

impl Record for FinancialGoal {
    fn table() -> &'static TableDef {
        &schema::FINANCIAL_GOALS
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn encode(&self, row: RowBuilder) -> RowBuilder {
        row.text("id", &self.id)
            .text("name", &self.name)
            .real("target_amount", self.target_amount)
            .real("current_amount", self.current_amount)
            .opt_timestamp("deadline", self.deadline.as_ref())
            .timestamp("created_at", &self.created_at)
    }

    fn decode(row: &RowValues) -> Result<Self> {
        Ok(Self {
            id: row.text("id")?,
            name: row.text("name")?,
            target_amount: row.real("target_amount")?,
            current_amount: row.real("current_amount")?,
            deadline: row.opt_timestamp("deadline")?,
            created_at: row.timestamp("created_at")?,
        })
    }
}

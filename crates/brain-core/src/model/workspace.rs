//! Planning records: tasks and the things tasks point at, plus notes,
//! ideas, reviews and contacts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{text_enum, Record};
use crate::error::Result;
use crate::schema::{self, TableDef};
use crate::storage::row::{RowBuilder, RowValues};

text_enum! {
    pub enum TaskPriority {
        Low => "LOW",
        Medium => "MEDIUM",
        High => "HIGH",
    }
}

text_enum! {
    pub enum Recurrence {
        Daily => "daily",
        Weekly => "weekly",
        Monthly => "monthly",
        Yearly => "yearly",
    }
}

text_enum! {
    pub enum TimeOfDay {
        Morning => "morning",
        Afternoon => "afternoon",
        Evening => "evening",
    }
}

text_enum! {
    pub enum Mood {
        Great => "great",
        Good => "good",
        Okay => "okay",
        Bad => "bad",
        Terrible => "terrible",
    }
}

/// A to-do item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub is_done: bool,
    pub priority: TaskPriority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Reference to a [`Project`]; cleared when that project is deleted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    /// Reference to a [`Category`]; cleared when that category is deleted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Recurrence>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_of_day: Option<TimeOfDay>,
    /// Reference to an [`Employee`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    /// Free text the task was parsed from, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<i64>,
}

impl Task {
    /// A minimal open task with every optional field absent.
    pub fn new(id: impl Into<String>, title: impl Into<String>, priority: TaskPriority) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            is_done: false,
            priority,
            deadline: None,
            completed_at: None,
            project_id: None,
            category_id: None,
            recurrence: None,
            time_of_day: None,
            assigned_to: None,
            original_text: None,
            duration_minutes: None,
        }
    }
}

impl Record for Task {
    fn table() -> &'static TableDef {
        &schema::TASKS
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn encode(&self, row: RowBuilder) -> RowBuilder {
        row.text("id", &self.id)
            .text("title", &self.title)
            .bool("is_done", self.is_done)
            .text("priority", self.priority.as_str())
            .opt_timestamp("deadline", self.deadline.as_ref())
            .opt_timestamp("completed_at", self.completed_at.as_ref())
            .opt_text("project_id", self.project_id.as_deref())
            .opt_text("category_id", self.category_id.as_deref())
            .opt_text("recurrence", self.recurrence.map(Recurrence::as_str))
            .opt_text("time_of_day", self.time_of_day.map(TimeOfDay::as_str))
            .opt_text("assigned_to", self.assigned_to.as_deref())
            .opt_text("original_text", self.original_text.as_deref())
            .opt_integer("duration_minutes", self.duration_minutes)
    }

    fn decode(row: &RowValues) -> Result<Self> {
        Ok(Self {
            id: row.text("id")?,
            title: row.text("title")?,
            is_done: row.bool("is_done")?,
            priority: row.text("priority")?.parse()?,
            deadline: row.opt_timestamp("deadline")?,
            completed_at: row.opt_timestamp("completed_at")?,
            project_id: row.opt_text("project_id")?,
            category_id: row.opt_text("category_id")?,
            recurrence: row.opt_text("recurrence")?.map(|v| v.parse()).transpose()?,
            time_of_day: row.opt_text("time_of_day")?.map(|v| v.parse()).transpose()?,
            assigned_to: row.opt_text("assigned_to")?,
            original_text: row.opt_text("original_text")?,
            duration_minutes: row.opt_integer("duration_minutes")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Record for Project {
    fn table() -> &'static TableDef {
        &schema::PROJECTS
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn encode(&self, row: RowBuilder) -> RowBuilder {
        row.text("id", &self.id)
            .text("name", &self.name)
            .opt_text("icon", self.icon.as_deref())
            .opt_text("color", self.color.as_deref())
    }

    fn decode(row: &RowValues) -> Result<Self> {
        Ok(Self {
            id: row.text("id")?,
            name: row.text("name")?,
            icon: row.opt_text("icon")?,
            color: row.opt_text("color")?,
        })
    }
}

/// Where a task happens (computer, home, outside, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Record for Category {
    fn table() -> &'static TableDef {
        &schema::CATEGORIES
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn encode(&self, row: RowBuilder) -> RowBuilder {
        row.text("id", &self.id)
            .text("name", &self.name)
            .text("icon", &self.icon)
            .opt_text("color", self.color.as_deref())
    }

    fn decode(row: &RowValues) -> Result<Self> {
        Ok(Self {
            id: row.text("id")?,
            name: row.text("name")?,
            icon: row.text("icon")?,
            color: row.opt_text("color")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Record for Employee {
    fn table() -> &'static TableDef {
        &schema::EMPLOYEES
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn encode(&self, row: RowBuilder) -> RowBuilder {
        row.text("id", &self.id)
            .text("name", &self.name)
            .opt_text("avatar", self.avatar.as_deref())
            .opt_text("color", self.color.as_deref())
    }

    fn decode(row: &RowValues) -> Result<Self> {
        Ok(Self {
            id: row.text("id")?,
            name: row.text("name")?,
            avatar: row.opt_text("avatar")?,
            color: row.opt_text("color")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Idea {
    pub id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Record for Idea {
    fn table() -> &'static TableDef {
        &schema::IDEAS
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn encode(&self, row: RowBuilder) -> RowBuilder {
        row.text("id", &self.id)
            .text("text", &self.text)
            .timestamp("created_at", &self.created_at)
    }

    fn decode(row: &RowValues) -> Result<Self> {
        Ok(Self {
            id: row.text("id")?,
            text: row.text("text")?,
            created_at: row.timestamp("created_at")?,
        })
    }
}

/// End-of-day review entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub date: DateTime<Utc>,
    pub ai_summary: String,
    pub user_notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<Mood>,
}

impl Record for Review {
    fn table() -> &'static TableDef {
        &schema::REVIEWS
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn encode(&self, row: RowBuilder) -> RowBuilder {
        row.text("id", &self.id)
            .timestamp("date", &self.date)
            .text("ai_summary", &self.ai_summary)
            .text("user_notes", &self.user_notes)
            .opt_text("mood", self.mood.map(Mood::as_str))
    }

    fn decode(row: &RowValues) -> Result<Self> {
        Ok(Self {
            id: row.text("id")?,
            date: row.timestamp("date")?,
            ai_summary: row.text("ai_summary")?,
            user_notes: row.text("user_notes")?,
            mood: row.opt_text("mood")?.map(|v| v.parse()).transpose()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeNote {
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for KnowledgeNote {
    fn table() -> &'static TableDef {
        &schema::KNOWLEDGE_NOTES
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn encode(&self, row: RowBuilder) -> RowBuilder {
        row.text("id", &self.id)
            .text("title", &self.title)
            .text("content", &self.content)
            .timestamp("created_at", &self.created_at)
            .timestamp("updated_at", &self.updated_at)
    }

    fn decode(row: &RowValues) -> Result<Self> {
        Ok(Self {
            id: row.text("id")?,
            title: row.text("title")?,
            content: row.text("content")?,
            created_at: row.timestamp("created_at")?,
            updated_at: row.timestamp("updated_at")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Record for Contact {
    fn table() -> &'static TableDef {
        &schema::CONTACTS
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn encode(&self, row: RowBuilder) -> RowBuilder {
        row.text("id", &self.id)
            .text("name", &self.name)
            .opt_text("email", self.email.as_deref())
            .opt_text("phone", self.phone.as_deref())
            .opt_text("company", self.company.as_deref())
            .opt_text("notes", self.notes.as_deref())
    }

    fn decode(row: &RowValues) -> Result<Self> {
        Ok(Self {
            id: row.text("id")?,
            name: row.text("name")?,
            email: row.opt_text("email")?,
            phone: row.opt_text("phone")?,
            company: row.opt_text("company")?,
            notes: row.opt_text("notes")?,
        })
    }
}

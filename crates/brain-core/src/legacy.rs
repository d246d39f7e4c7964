//! Import of the pre-database whole-application JSON document.
//!
//! Older builds kept everything in one JSON blob under [`LEGACY_STATE_KEY`].
//! On a cold start that blob, when present, replaces the default seed.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::Value as Json;

use crate::error::Result;
use crate::model::{Category, Idea, Project, Review, Task, TaskPriority};
use crate::seed;
use crate::settings::{self, Setting};
use crate::storage::blob::BlobStore;
use crate::storage::database::upsert_record;

/// Blob key of the legacy document.
pub const LEGACY_STATE_KEY: &str = "appState";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyState {
    #[serde(default)]
    tasks: Vec<LegacyTask>,
    #[serde(default)]
    projects: Vec<Project>,
    #[serde(default)]
    categories: Vec<LegacyCategory>,
    #[serde(default)]
    ideas: Vec<LegacyIdea>,
    #[serde(default)]
    reviews: Vec<LegacyReview>,
    #[serde(default)]
    theme: Option<Json>,
    #[serde(default)]
    weekend_days: Option<Json>,
    #[serde(default)]
    streak_data: Option<Json>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyTask {
    id: String,
    title: String,
    #[serde(default)]
    is_done: bool,
    #[serde(default)]
    priority: Option<String>,
    #[serde(default)]
    deadline: Option<Json>,
    #[serde(default)]
    completed_at: Option<Json>,
    #[serde(default)]
    project_id: Option<String>,
    #[serde(default)]
    category_id: Option<String>,
    #[serde(default)]
    recurrence: Option<String>,
    #[serde(default)]
    time_of_day: Option<String>,
    #[serde(default)]
    assigned_to: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LegacyCategory {
    id: String,
    name: String,
    #[serde(default)]
    icon: Option<String>,
    #[serde(default)]
    color: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyIdea {
    id: String,
    text: String,
    #[serde(default)]
    created_at: Option<Json>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyReview {
    id: String,
    #[serde(default)]
    date: Option<Json>,
    #[serde(default)]
    ai_summary: String,
    #[serde(default)]
    user_notes: String,
    #[serde(default)]
    mood: Option<String>,
}

/// Counts of what an import wrote.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub tasks: usize,
    pub projects: usize,
    pub categories: usize,
    pub ideas: usize,
    pub reviews: usize,
    pub skipped_reviews: usize,
}

/// Fetch and parse the legacy document.
///
/// Returns `None` when there is none or it cannot be used; both cases mean
/// the caller seeds defaults instead.
pub async fn read(blob: &dyn BlobStore) -> Option<LegacyState> {
    let bytes = match blob.get(LEGACY_STATE_KEY).await {
        Ok(Some(bytes)) if !bytes.is_empty() => bytes,
        Ok(_) => return None,
        Err(err) => {
            tracing::warn!(error = %err, "could not read legacy state");
            return None;
        }
    };
    match serde_json::from_slice(&bytes) {
        Ok(state) => {
            tracing::info!("legacy state found, importing");
            Some(state)
        }
        Err(err) => {
            tracing::warn!(error = %err, "legacy state is malformed, seeding defaults instead");
            None
        }
    }
}

impl LegacyState {
    /// Write the imported records plus default employees and settings.
    ///
    /// Callers run this inside a transaction so a failure leaves nothing behind.
    pub(crate) fn insert(&self, conn: &Connection, now: DateTime<Utc>) -> Result<ImportSummary> {
        let mut summary = ImportSummary::default();

        for legacy in &self.tasks {
            upsert_record(conn, &legacy.to_task())?;
            summary.tasks += 1;
        }
        for project in &self.projects {
            upsert_record(conn, project)?;
            summary.projects += 1;
        }
        for legacy in &self.categories {
            let category = Category {
                id: legacy.id.clone(),
                name: legacy.name.clone(),
                icon: legacy.icon.clone().unwrap_or_default(),
                color: legacy.color.clone(),
            };
            upsert_record(conn, &category)?;
            summary.categories += 1;
        }
        for legacy in &self.ideas {
            let idea = Idea {
                id: legacy.id.clone(),
                text: legacy.text.clone(),
                created_at: parse_loose(legacy.created_at.as_ref()).unwrap_or(now),
            };
            upsert_record(conn, &idea)?;
            summary.ideas += 1;
        }
        for legacy in &self.reviews {
            let Some(date) = parse_loose(legacy.date.as_ref()) else {
                tracing::warn!(id = %legacy.id, "skipping legacy review without a usable date");
                summary.skipped_reviews += 1;
                continue;
            };
            let review = Review {
                id: legacy.id.clone(),
                date,
                ai_summary: legacy.ai_summary.clone(),
                user_notes: legacy.user_notes.clone(),
                mood: lenient(legacy.mood.as_deref()),
            };
            upsert_record(conn, &review)?;
            summary.reviews += 1;
        }

        // The legacy format had no team members.
        for employee in seed::default_employees() {
            upsert_record(conn, &employee)?;
        }

        let carried = [
            (settings::THEME, &self.theme),
            (settings::WEEKEND_DAYS, &self.weekend_days),
            (settings::STREAK, &self.streak_data),
        ];
        for (key, value) in carried {
            if let Some(value) = value.as_ref().filter(|v| is_truthy(v)) {
                upsert_record(conn, &Setting::encode(key, value)?)?;
            }
        }

        Ok(summary)
    }
}

impl LegacyTask {
    fn to_task(&self) -> Task {
        let priority = match self.priority.as_deref() {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(id = %self.id, priority = raw, "unknown legacy priority, using MEDIUM");
                TaskPriority::Medium
            }),
            None => TaskPriority::Medium,
        };
        let mut task = Task::new(self.id.clone(), self.title.clone(), priority);
        task.is_done = self.is_done;
        task.deadline = parse_loose(self.deadline.as_ref());
        task.completed_at = parse_loose(self.completed_at.as_ref());
        task.project_id = self.project_id.clone();
        task.category_id = self.category_id.clone();
        task.recurrence = lenient(self.recurrence.as_deref());
        task.time_of_day = lenient(self.time_of_day.as_deref());
        task.assigned_to = self.assigned_to.clone();
        task
    }
}

/// Parse an optional enumerated value, dropping anything unrecognized.
fn lenient<T: std::str::FromStr>(raw: Option<&str>) -> Option<T> {
    raw.and_then(|raw| raw.parse().ok())
}

fn is_truthy(value: &Json) -> bool {
    match value {
        Json::Null | Json::Bool(false) => false,
        Json::String(s) => !s.is_empty(),
        Json::Number(n) => n.as_f64() != Some(0.0),
        _ => true,
    }
}

/// Best-effort date parsing for loosely formatted legacy values.
///
/// Accepts RFC 3339, naive date-times (read as UTC), bare dates and epoch
/// milliseconds. Anything else is absent.
pub fn parse_loose(value: Option<&Json>) -> Option<DateTime<Utc>> {
    match value? {
        Json::String(text) => parse_loose_str(text.trim()),
        Json::Number(millis) => millis
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
        _ => None,
    }
}

fn parse_loose_str(text: &str) -> Option<DateTime<Utc>> {
    if text.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Mood, Recurrence};
    use crate::settings::StreakData;
    use crate::storage::database::Database;
    use serde_json::json;

    #[test]
    fn test_parse_loose_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_loose(Some(&json!("2024-05-01T00:00:00.000Z"))), Some(expected));
        assert_eq!(parse_loose(Some(&json!("2024-05-01"))), Some(expected));
        assert_eq!(parse_loose(Some(&json!("2024-05-01T00:00:00"))), Some(expected));
        assert_eq!(
            parse_loose(Some(&json!(expected.timestamp_millis()))),
            Some(expected)
        );
        assert_eq!(parse_loose(Some(&json!("next tuesday"))), None);
        assert_eq!(parse_loose(Some(&json!(""))), None);
        assert_eq!(parse_loose(Some(&Json::Null)), None);
        assert_eq!(parse_loose(None), None);
    }

    #[test]
    fn test_insert_imports_records_and_settings() {
        let state: LegacyState = serde_json::from_value(json!({
            "tasks": [
                {"id": "t1", "title": "Buy milk", "isDone": true, "priority": "HIGH",
                 "deadline": "2024-05-01", "completedAt": "garbage", "recurrence": "weekly"},
                {"id": "t2", "title": "Odd", "priority": "URGENT", "timeOfDay": "midnight"}
            ],
            "projects": [{"id": "p9", "name": "Legacy"}],
            "categories": [{"id": "c9", "name": "Errands"}],
            "ideas": [{"id": "i9", "text": "Idea", "createdAt": "2024-01-02T03:04:05Z"}],
            "reviews": [
                {"id": "r1", "date": "2024-05-01", "aiSummary": "ok", "userNotes": "", "mood": "good"},
                {"id": "r2", "date": "not a date", "aiSummary": "", "userNotes": ""}
            ],
            "theme": "dark",
            "weekendDays": [5, 6],
            "streakData": {"currentStreak": 3, "longestStreak": 9, "lastCompletedDate": "2024-05-01"}
        }))
        .unwrap();

        let mut db = Database::create().unwrap();
        db.apply_schema().unwrap();
        let summary = db.transaction(|conn| state.insert(conn, Utc::now())).unwrap();
        assert_eq!(summary.tasks, 2);
        assert_eq!(summary.reviews, 1);
        assert_eq!(summary.skipped_reviews, 1);

        let t1 = db.select_one::<Task>("t1").unwrap().unwrap();
        assert!(t1.is_done);
        assert_eq!(t1.priority, TaskPriority::High);
        assert_eq!(t1.completed_at, None);
        assert_eq!(t1.recurrence, Some(Recurrence::Weekly));
        let t2 = db.select_one::<Task>("t2").unwrap().unwrap();
        assert_eq!(t2.priority, TaskPriority::Medium);
        assert_eq!(t2.time_of_day, None);

        let r1 = db.select_one::<Review>("r1").unwrap().unwrap();
        assert_eq!(r1.mood, Some(Mood::Good));
        assert!(db.select_one::<Review>("r2").unwrap().is_none());
        assert_eq!(db.select_one::<Category>("c9").unwrap().unwrap().icon, "");
        assert_eq!(db.select_all::<crate::model::Employee>().unwrap().len(), 2);

        let streak = db.select_one::<Setting>(settings::STREAK).unwrap().unwrap();
        assert_eq!(streak.value_or(StreakData::default()).longest_streak, 9);
        let theme = db.select_one::<Setting>(settings::THEME).unwrap().unwrap();
        assert_eq!(theme.value_or(String::new()), "dark");
    }

    #[test]
    fn test_missing_settings_are_not_written() {
        let state: LegacyState = serde_json::from_value(json!({"theme": ""})).unwrap();
        let mut db = Database::create().unwrap();
        db.apply_schema().unwrap();
        db.transaction(|conn| state.insert(conn, Utc::now())).unwrap();
        assert!(db.select_all::<Setting>().unwrap().is_empty());
    }
}

//! Fixed starting data for first run and reset.

use chrono::{DateTime, Datelike, Duration, Utc};
use rusqlite::Connection;

use crate::error::Result;
use crate::model::{
    Account, AccountType, Category, Employee, FinanceCategory, FlowKind, Idea, Project, Recurrence,
    Task, TaskPriority,
};
use crate::settings::{self, Setting, StreakData};
use crate::storage::database::upsert_record;

/// Finance category used for the incoming half of a transfer between accounts.
pub const TRANSFER_INCOME_CATEGORY: &str = "fc-inc-transfer";
/// Finance category used for the outgoing half of a transfer between accounts.
pub const TRANSFER_EXPENSE_CATEGORY: &str = "fc-exp-transfer";

#[derive(Debug, Clone, PartialEq)]
pub struct SeedData {
    pub categories: Vec<Category>,
    pub projects: Vec<Project>,
    pub employees: Vec<Employee>,
    pub tasks: Vec<Task>,
    pub ideas: Vec<Idea>,
    pub accounts: Vec<Account>,
    pub finance_categories: Vec<FinanceCategory>,
    pub settings: Vec<Setting>,
}

impl SeedData {
    /// The default record set, with deadlines placed relative to `now`.
    pub fn defaults(now: DateTime<Utc>) -> Result<Self> {
        Ok(Self {
            categories: default_categories(),
            projects: default_projects(),
            employees: default_employees(),
            tasks: default_tasks(now),
            ideas: vec![
                Idea {
                    id: "i1".to_string(),
                    text: "Concept for a summer pop-up store".to_string(),
                    created_at: now,
                },
                Idea {
                    id: "i2".to_string(),
                    text: "Collaboration with a local artist".to_string(),
                    created_at: now,
                },
            ],
            accounts: vec![
                account("acc-personal", "Personal", AccountType::Personal),
                account("acc-business", "Business", AccountType::Business),
            ],
            finance_categories: default_finance_categories(),
            settings: vec![
                Setting::encode(settings::THEME, "system")?,
                Setting::encode(settings::WEEKEND_DAYS, &[0, 6])?,
                Setting::encode(settings::STREAK, &StreakData::default())?,
            ],
        })
    }

    /// Insert every record. Callers run this inside a transaction.
    pub(crate) fn insert(&self, conn: &Connection) -> Result<()> {
        for record in &self.categories {
            upsert_record(conn, record)?;
        }
        for record in &self.projects {
            upsert_record(conn, record)?;
        }
        for record in &self.employees {
            upsert_record(conn, record)?;
        }
        for record in &self.tasks {
            upsert_record(conn, record)?;
        }
        for record in &self.ideas {
            upsert_record(conn, record)?;
        }
        for record in &self.accounts {
            upsert_record(conn, record)?;
        }
        for record in &self.finance_categories {
            upsert_record(conn, record)?;
        }
        for record in &self.settings {
            upsert_record(conn, record)?;
        }
        Ok(())
    }
}

const BLUE: &str = "#3b82f6";
const GREEN: &str = "#22c55e";
const LIME: &str = "#84cc16";
const FUCHSIA: &str = "#d946ef";
const VIOLET: &str = "#8b5cf6";
const ROSE: &str = "#f43f5e";
const ORANGE: &str = "#f97316";
const PINK: &str = "#ec4899";

fn category(id: &str, name: &str, icon: &str, color: &str) -> Category {
    Category {
        id: id.to_string(),
        name: name.to_string(),
        icon: icon.to_string(),
        color: Some(color.to_string()),
    }
}

fn default_categories() -> Vec<Category> {
    vec![
        category("c1", "Computer", "fa-solid fa-laptop", BLUE),
        category("c2", "Home", "fa-solid fa-house", GREEN),
        category("c3", "Outside", "fa-solid fa-tree", LIME),
        category("c4", "Phone", "fa-solid fa-phone", FUCHSIA),
    ]
}

fn project(id: &str, name: &str, icon: &str, color: &str) -> Project {
    Project {
        id: id.to_string(),
        name: name.to_string(),
        icon: Some(icon.to_string()),
        color: Some(color.to_string()),
    }
}

fn default_projects() -> Vec<Project> {
    vec![
        project("p1", "Brand: WASE WORM", "fa-solid fa-gem", VIOLET),
        project("p2", "Marketing", "fa-solid fa-bullhorn", ROSE),
        project("p3", "Production", "fa-solid fa-industry", ORANGE),
    ]
}

/// Team members present in every fresh store.
pub fn default_employees() -> Vec<Employee> {
    let employee = |id: &str, name: &str, avatar: &str, color: &str| Employee {
        id: id.to_string(),
        name: name.to_string(),
        avatar: Some(avatar.to_string()),
        color: Some(color.to_string()),
    };
    vec![
        employee("e1", "Alexey", "fa-solid fa-user-tie", BLUE),
        employee("e2", "Maria", "fa-solid fa-user-pen", PINK),
    ]
}

fn default_tasks(now: DateTime<Utc>) -> Vec<Task> {
    let days = Duration::days;
    let linked = |id: &str, title: &str, priority, project: Option<&str>, category: &str| {
        let mut task = Task::new(id, title, priority);
        task.project_id = project.map(str::to_string);
        task.category_id = Some(category.to_string());
        task
    };

    let mut t1 = linked("t1", "Finish mockups for the new WASE WORM collection", TaskPriority::High, Some("p1"), "c1");
    t1.deadline = Some(now + days(1));
    t1.assigned_to = Some("e1".to_string());

    let mut t2 = linked("t2", "Draft the product launch email", TaskPriority::Medium, Some("p2"), "c1");
    t2.deadline = Some(now + days(2));
    t2.assigned_to = Some("e2".to_string());

    let mut t3 = linked("t3", "Call suppliers about wallet materials", TaskPriority::High, Some("p3"), "c4");
    t3.deadline = Some(now);
    t3.assigned_to = Some("e1".to_string());

    let mut t4 = linked("t4", "Review the content plan", TaskPriority::Medium, Some("p2"), "c1");
    t4.assigned_to = Some("e2".to_string());

    let t5 = Task::new("t5", "Schedule next week's team sync", TaskPriority::Low);

    let mut t6 = linked("t6", "Pay monthly software subscriptions", TaskPriority::Medium, None, "c1");
    t6.is_done = true;
    t6.completed_at = Some(now - days(1));
    t6.deadline = Some(now - days(1));
    t6.assigned_to = Some("e1".to_string());

    let t7 = linked("t7", "Take a walk to clear your head", TaskPriority::Low, None, "c3");

    let mut t8 = linked("t8", "Pay the loan", TaskPriority::High, None, "c1");
    t8.deadline = Some(now.with_day(25).unwrap_or(now));
    t8.recurrence = Some(Recurrence::Monthly);

    vec![t1, t2, t3, t4, t5, t6, t7, t8]
}

fn account(id: &str, name: &str, account_type: AccountType) -> Account {
    Account {
        id: id.to_string(),
        name: name.to_string(),
        account_type,
        balance: 0.0,
    }
}

fn default_finance_categories() -> Vec<FinanceCategory> {
    let entry = |id: &str, name: &str, kind, icon: &str, color: &str| FinanceCategory {
        id: id.to_string(),
        name: name.to_string(),
        kind,
        icon: Some(icon.to_string()),
        color: Some(color.to_string()),
    };
    vec![
        entry("fc-inc-salary", "Salary", FlowKind::Income, "fa-solid fa-money-bill-wave", GREEN),
        entry("fc-inc-sales", "Sales", FlowKind::Income, "fa-solid fa-shopping-cart", LIME),
        entry(TRANSFER_INCOME_CATEGORY, "Transfer", FlowKind::Income, "fa-solid fa-right-left", BLUE),
        entry("fc-exp-food", "Food", FlowKind::Expense, "fa-solid fa-utensils", ORANGE),
        entry("fc-exp-transport", "Transport", FlowKind::Expense, "fa-solid fa-car", VIOLET),
        entry("fc-exp-subscriptions", "Subscriptions", FlowKind::Expense, "fa-solid fa-credit-card", ROSE),
        entry(TRANSFER_EXPENSE_CATEGORY, "Transfer", FlowKind::Expense, "fa-solid fa-right-left", BLUE),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_seed_ids_are_stable_and_unique() {
        let seed = SeedData::defaults(Utc::now()).unwrap();
        let ids: Vec<_> = seed.tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t1", "t2", "t3", "t4", "t5", "t6", "t7", "t8"]);

        let categories: HashSet<_> = seed.finance_categories.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(categories.len(), seed.finance_categories.len());
        assert!(categories.contains(TRANSFER_INCOME_CATEGORY));
        assert!(categories.contains(TRANSFER_EXPENSE_CATEGORY));
    }

    #[test]
    fn test_task_references_point_at_seeded_rows() {
        let seed = SeedData::defaults(Utc::now()).unwrap();
        let projects: HashSet<_> = seed.projects.iter().map(|p| p.id.clone()).collect();
        let categories: HashSet<_> = seed.categories.iter().map(|c| c.id.clone()).collect();
        let employees: HashSet<_> = seed.employees.iter().map(|e| e.id.clone()).collect();
        for task in &seed.tasks {
            assert!(task.project_id.iter().all(|id| projects.contains(id)));
            assert!(task.category_id.iter().all(|id| categories.contains(id)));
            assert!(task.assigned_to.iter().all(|id| employees.contains(id)));
        }
    }

    #[test]
    fn test_deadlines_follow_seeding_time() {
        let now = Utc::now();
        let seed = SeedData::defaults(now).unwrap();
        assert_eq!(seed.tasks[0].deadline, Some(now + Duration::days(1)));
        assert_eq!(seed.tasks[7].deadline.map(|d| d.day()), Some(25));
    }
}

//! Persisted record types.
//!
//! Each record type implements [`Record`], pairing it with its registered
//! [`TableDef`] and encoding/decoding it by column name.

use crate::error::Result;
use crate::schema::TableDef;
use crate::storage::row::{EncodedRow, RowBuilder, RowValues};

/// A value stored as one row of a registered table.
pub trait Record: Sized + Send + Sync + 'static {
    /// Table this record lives in.
    fn table() -> &'static TableDef;

    /// Primary key value, assigned by the caller.
    fn id(&self) -> &str;

    /// Write every present field into the builder.
    fn encode(&self, row: RowBuilder) -> RowBuilder;

    /// Rebuild the record from a stored row.
    fn decode(row: &RowValues) -> Result<Self>;

    fn to_row(&self) -> Result<EncodedRow> {
        self.encode(RowBuilder::new(Self::table())).finish()
    }
}

/// Defines a closed set of string values stored in a text column.
macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident { $($variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::error::BrainError;

            fn from_str(s: &str) -> $crate::error::Result<Self> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err($crate::error::BrainError::Decode(format!(
                        "Unknown {} value: {}",
                        stringify!($name),
                        other
                    ))),
                }
            }
        }
    };
}

pub(crate) use text_enum;

mod finance;
mod widget;
mod workspace;

pub use finance::{Account, AccountType, FinanceCategory, FinancialGoal, FlowKind, Transaction};
pub use widget::WidgetPlacement;
pub use workspace::{
    Category, Contact, Employee, Idea, KnowledgeNote, Mood, Project, Recurrence, Review, Task,
    TaskPriority, TimeOfDay,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_enum_round_trip() {
        assert_eq!("HIGH".parse::<TaskPriority>().unwrap(), TaskPriority::High);
        assert_eq!(TaskPriority::High.as_str(), "HIGH");
        assert!("urgent".parse::<TaskPriority>().is_err());
        assert_eq!(
            serde_json::to_string(&Recurrence::Monthly).unwrap(),
            "\"monthly\""
        );
    }
}

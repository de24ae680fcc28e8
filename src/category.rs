//! The closed sets of categories for income, expenses and goals.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

/// A category name that is not part of the category set it was checked against.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("\"{0}\" is not a valid category")]
pub struct UnknownCategory(pub String);

/// Declare a category enum whose variants are stored and sent as their display text.
macro_rules! category_set {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[allow(missing_docs)]
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            /// The text used for the category in JSON and in the database.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownCategory;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(UnknownCategory(other.to_owned())),
                }
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.as_str()))
            }
        }

        impl FromSql for $name {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                value
                    .as_str()?
                    .parse()
                    .map_err(|error| FromSqlError::Other(Box::new(error)))
            }
        }
    };
}

category_set! {
    /// Where income came from.
    IncomeCategory {
        Salary => "Salary",
        Freelance => "Freelance",
        Business => "Business",
        Investment => "Investment",
        Gift => "Gift",
        Other => "Other",
    }
}

category_set! {
    /// What money was spent on.
    ///
    /// [ExpenseCategory::GoalContribution] marks the expenses created when
    /// money is moved into a goal.
    ExpenseCategory {
        Food => "Food",
        Transport => "Transport",
        Housing => "Housing",
        Healthcare => "Healthcare",
        Education => "Education",
        Entertainment => "Entertainment",
        Shopping => "Shopping",
        Bills => "Bills",
        GoalContribution => "Goal Contribution",
        Other => "Other",
    }
}

category_set! {
    /// What a personal goal is saving for.
    GoalCategory {
        EmergencyFund => "Emergency Fund",
        Vacation => "Vacation",
        Car => "Car",
        House => "House",
        Education => "Education",
        Investment => "Investment",
        Other => "Other",
    }
}

category_set! {
    /// The cause a community goal supports.
    CommunityCategory {
        Charity => "Charity",
        Environment => "Environment",
        Education => "Education",
        Healthcare => "Healthcare",
        Community => "Community",
        Other => "Other",
    }
}

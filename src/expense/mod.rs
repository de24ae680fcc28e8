//! Expenses: money the user spent.
//!
//! Expenses take from the user's balance. Contributions to goals are also
//! recorded as expenses so the balance can be traced back to its entries.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod list_endpoint;

pub use core::{NewExpense, create_expense_table};
pub use create_endpoint::{create_expense, create_expense_endpoint};
pub use delete_endpoint::delete_expense_endpoint;
pub use edit_endpoint::edit_expense_endpoint;
pub use list_endpoint::list_expense_endpoint;

#[cfg(test)]
pub use core::{Expense, get_expense};
#[cfg(test)]
pub use delete_endpoint::delete_expense;
#[cfg(test)]
pub use edit_endpoint::update_expense;
#[cfg(test)]
pub use list_endpoint::get_expenses_for_user;

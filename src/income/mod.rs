//! Income: money the user earned.
//!
//! Creating, editing and deleting income moves the user's balance by the
//! same amount.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod list_endpoint;

pub use core::create_income_table;
pub use create_endpoint::create_income_endpoint;
pub use delete_endpoint::delete_income_endpoint;
pub use edit_endpoint::edit_income_endpoint;
pub use list_endpoint::list_income_endpoint;

#[cfg(test)]
pub use core::{Income, NewIncome, get_income};
#[cfg(test)]
pub use create_endpoint::create_income;
#[cfg(test)]
pub use delete_endpoint::delete_income;
#[cfg(test)]
pub use edit_endpoint::update_income;
#[cfg(test)]
pub use list_endpoint::get_incomes_for_user;

//! Personal savings goals.
//!
//! Editing or deleting a goal does not move money. Contributing to a goal
//! moves money from the owner's balance into the goal and records the
//! contribution as an expense.

mod contribute_endpoint;
mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod list_endpoint;

pub use contribute_endpoint::contribute_to_goal_endpoint;
pub use core::{GoalId, create_goal_table};
pub use create_endpoint::create_goal_endpoint;
pub use delete_endpoint::delete_goal_endpoint;
pub use edit_endpoint::edit_goal_endpoint;
pub use list_endpoint::list_goal_endpoint;

#[cfg(test)]
pub use contribute_endpoint::contribute_to_goal;
#[cfg(test)]
pub use core::{Goal, NewGoal, get_goal};
#[cfg(test)]
pub use create_endpoint::create_goal;
#[cfg(test)]
pub use delete_endpoint::delete_goal;
#[cfg(test)]
pub use edit_endpoint::update_goal;
#[cfg(test)]
pub use list_endpoint::get_goals_for_user;

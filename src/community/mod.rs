//! Community goals: savings targets that any user can contribute to.

mod contribute_endpoint;
mod core;
mod create_endpoint;
mod list_endpoint;

pub use contribute_endpoint::contribute_to_community_goal_endpoint;
pub use core::create_community_goal_tables;
pub use create_endpoint::create_community_goal_endpoint;
pub use list_endpoint::list_community_goal_endpoint;

#[cfg(test)]
pub use contribute_endpoint::contribute_to_community_goal;
#[cfg(test)]
pub use core::{CommunityGoal, NewCommunityGoal, get_community_goal};
#[cfg(test)]
pub use create_endpoint::create_community_goal;
#[cfg(test)]
pub use list_endpoint::get_active_community_goals;

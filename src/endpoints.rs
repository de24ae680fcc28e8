//! The API endpoint URIs.
//!
//! For endpoints that take an ID, e.g. '/api/goals/{goal_id}', use [format_endpoint].

/// The route for listing and recording income.
pub const INCOME: &str = "/api/income";
/// The route for updating or deleting an income entry.
pub const INCOME_ENTRY: &str = "/api/income/{income_id}";
/// The route for listing and recording expenses.
pub const EXPENSES: &str = "/api/expenses";
/// The route for updating or deleting an expense.
pub const EXPENSE: &str = "/api/expenses/{expense_id}";
/// The route for listing and creating personal goals.
pub const GOALS: &str = "/api/goals";
/// The route for updating or deleting a personal goal.
pub const GOAL: &str = "/api/goals/{goal_id}";
/// The route for contributing to a personal goal.
pub const GOAL_CONTRIBUTION: &str = "/api/goals/{goal_id}/contribute";
/// The route for listing and creating community goals.
pub const COMMUNITY_GOALS: &str = "/api/community";
/// The route for contributing to a community goal.
pub const COMMUNITY_GOAL_CONTRIBUTION: &str = "/api/community/{community_goal_id}/contribute";
/// The route for the current user's account summary.
pub const ACCOUNT: &str = "/api/account";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter starts with '{' and ends with the next '}', e.g. '{goal_id}'
/// in '/api/goals/{goal_id}'. Only the first parameter is replaced.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let end = endpoint_path[start..]
        .find('}')
        .map_or(endpoint_path.len(), |offset| start + offset + 1);

    format!("{}{id}{}", &endpoint_path[..start], &endpoint_path[end..])
}

#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    #[track_caller]
    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok(), "{uri} is not a valid URI");
    }

    #[test]
    fn endpoints_are_valid_uris() {
        for endpoint in [
            endpoints::INCOME,
            endpoints::INCOME_ENTRY,
            endpoints::EXPENSES,
            endpoints::EXPENSE,
            endpoints::GOALS,
            endpoints::GOAL,
            endpoints::GOAL_CONTRIBUTION,
            endpoints::COMMUNITY_GOALS,
            endpoints::COMMUNITY_GOAL_CONTRIBUTION,
            endpoints::ACCOUNT,
        ] {
            assert_endpoint_is_valid_uri(endpoint);
            assert_endpoint_is_valid_uri(&format_endpoint(endpoint, 1));
        }
    }

    #[test]
    fn replaces_parameter_at_end() {
        assert_eq!(format_endpoint(endpoints::GOAL, 12), "/api/goals/12");
    }

    #[test]
    fn replaces_parameter_in_middle() {
        assert_eq!(
            format_endpoint(endpoints::COMMUNITY_GOAL_CONTRIBUTION, 3),
            "/api/community/3/contribute"
        );
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        assert_eq!(format_endpoint(endpoints::ACCOUNT, 1), "/api/account");
    }
}

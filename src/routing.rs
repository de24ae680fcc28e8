//! Application router configuration. Every API route requires a bearer token.

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde_json::json;

use crate::{
    AppState,
    auth::auth_guard,
    community::{
        contribute_to_community_goal_endpoint, create_community_goal_endpoint,
        list_community_goal_endpoint,
    },
    endpoints,
    expense::{
        create_expense_endpoint, delete_expense_endpoint, edit_expense_endpoint,
        list_expense_endpoint,
    },
    goal::{
        contribute_to_goal_endpoint, create_goal_endpoint, delete_goal_endpoint,
        edit_goal_endpoint, list_goal_endpoint,
    },
    income::{
        create_income_endpoint, delete_income_endpoint, edit_income_endpoint,
        list_income_endpoint,
    },
    profile::get_account_endpoint,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            endpoints::INCOME,
            get(list_income_endpoint).post(create_income_endpoint),
        )
        .route(
            endpoints::INCOME_ENTRY,
            put(edit_income_endpoint).delete(delete_income_endpoint),
        )
        .route(
            endpoints::EXPENSES,
            get(list_expense_endpoint).post(create_expense_endpoint),
        )
        .route(
            endpoints::EXPENSE,
            put(edit_expense_endpoint).delete(delete_expense_endpoint),
        )
        .route(
            endpoints::GOALS,
            get(list_goal_endpoint).post(create_goal_endpoint),
        )
        .route(
            endpoints::GOAL,
            put(edit_goal_endpoint).delete(delete_goal_endpoint),
        )
        .route(
            endpoints::GOAL_CONTRIBUTION,
            post(contribute_to_goal_endpoint),
        )
        .route(
            endpoints::COMMUNITY_GOALS,
            get(list_community_goal_endpoint).post(create_community_goal_endpoint),
        )
        .route(
            endpoints::COMMUNITY_GOAL_CONTRIBUTION,
            post(contribute_to_community_goal_endpoint),
        )
        .route(endpoints::ACCOUNT, get(get_account_endpoint))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard))
        .fallback(get_404_not_found)
        .with_state(state)
}

async fn get_404_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": "Route not found" })),
    )
        .into_response()
}

#[cfg(test)]
mod routing_tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::{
        endpoints::{self, format_endpoint},
        test_utils::{TestApp, must_create_test_app},
    };

    async fn account(app: &TestApp) -> Value {
        app.server
            .get(endpoints::ACCOUNT)
            .authorization_bearer(&app.token)
            .await
            .json::<Value>()
    }

    #[tokio::test]
    async fn unknown_route_is_json_not_found() {
        let app = must_create_test_app(0.0);

        let response = app.server.get("/api/nope").await;

        response.assert_status_not_found();
        response.assert_json(&json!({ "message": "Route not found" }));
    }

    #[tokio::test]
    async fn every_route_requires_token() {
        let app = must_create_test_app(0.0);

        for path in [
            endpoints::INCOME,
            endpoints::EXPENSES,
            endpoints::GOALS,
            endpoints::COMMUNITY_GOALS,
            endpoints::ACCOUNT,
        ] {
            let response = app.server.get(path).await;

            response.assert_status_unauthorized();
            response.assert_json(&json!({ "message": "Not authorized" }));
        }

        app.server
            .post(&format_endpoint(endpoints::GOAL_CONTRIBUTION, 1))
            .json(&json!({ "amount": 5 }))
            .await
            .assert_status_unauthorized();
    }

    #[tokio::test]
    async fn income_and_expenses_move_balance() {
        let app = must_create_test_app(100.0);

        let response = app
            .server
            .post(endpoints::INCOME)
            .authorization_bearer(&app.token)
            .json(&json!({ "title": "Salary", "amount": 1000, "category": "Salary" }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let income_id = response.json::<Value>()["id"].as_i64().unwrap();

        let response = app
            .server
            .post(endpoints::EXPENSES)
            .authorization_bearer(&app.token)
            .json(&json!({ "title": "Rent", "amount": 400, "category": "Housing" }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let expense: Value = response.json();
        assert_eq!(expense["isGoalContribution"], false);
        assert_eq!(expense["goalId"], Value::Null);
        assert_eq!(account(&app).await["balance"], 700.0);

        app.server
            .put(&format_endpoint(endpoints::INCOME_ENTRY, income_id))
            .authorization_bearer(&app.token)
            .json(&json!({ "title": "Salary", "amount": 1200, "category": "Salary" }))
            .await
            .assert_status_ok();
        assert_eq!(account(&app).await["balance"], 900.0);

        let response = app
            .server
            .delete(&format_endpoint(endpoints::INCOME_ENTRY, income_id))
            .authorization_bearer(&app.token)
            .await;
        response.assert_status_ok();
        response.assert_json(&json!({ "message": "Income removed" }));
        assert_eq!(account(&app).await["balance"], -300.0);

        let response = app
            .server
            .delete(&format_endpoint(endpoints::EXPENSE, expense["id"].as_i64().unwrap()))
            .authorization_bearer(&app.token)
            .await;
        response.assert_json(&json!({ "message": "Expense removed" }));
        assert_eq!(account(&app).await["balance"], 100.0);
    }

    #[tokio::test]
    async fn invalid_body_lists_field_errors() {
        let app = must_create_test_app(0.0);

        let response = app
            .server
            .post(endpoints::INCOME)
            .authorization_bearer(&app.token)
            .json(&json!({ "title": "  ", "amount": -1, "category": "Lottery" }))
            .await;

        response.assert_status_bad_request();
        response.assert_json(&json!({
            "message": "Validation failed",
            "errors": [
                { "field": "title", "message": "Title is required" },
                { "field": "amount", "message": "Amount must be a positive number" },
                { "field": "category", "message": "\"Lottery\" is not a valid category" },
            ],
        }));
        assert_eq!(account(&app).await["balance"], 0.0);
    }

    #[tokio::test]
    async fn expense_with_unknown_goal_is_rejected() {
        let app = must_create_test_app(50.0);

        let response = app
            .server
            .post(endpoints::EXPENSES)
            .authorization_bearer(&app.token)
            .json(&json!({ "title": "Saving", "amount": 5, "category": "Other", "goalId": 99 }))
            .await;

        response.assert_status_bad_request();
        response.assert_json(&json!({ "message": "Goal 99 does not exist" }));
    }

    #[tokio::test]
    async fn cannot_edit_other_users_income() {
        let app = must_create_test_app(0.0);
        let (_, other_token) = app.must_add_user(0.0);
        let income_id = app
            .server
            .post(endpoints::INCOME)
            .authorization_bearer(&app.token)
            .json(&json!({ "title": "Gig", "amount": 10, "category": "Freelance" }))
            .await
            .json::<Value>()["id"]
            .as_i64()
            .unwrap();

        let response = app
            .server
            .put(&format_endpoint(endpoints::INCOME_ENTRY, income_id))
            .authorization_bearer(&other_token)
            .json(&json!({ "title": "Mine", "amount": 10, "category": "Freelance" }))
            .await;

        response.assert_status_unauthorized();
        response.assert_json(&json!({ "message": "User not authorized" }));

        app.server
            .delete(&format_endpoint(endpoints::INCOME_ENTRY, 999))
            .authorization_bearer(&app.token)
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn goal_contribution_completes_goal() {
        let app = must_create_test_app(100.0);
        let response = app
            .server
            .post(endpoints::GOALS)
            .authorization_bearer(&app.token)
            .json(&json!({ "title": "Bike", "targetAmount": 100, "category": "Other" }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let goal_id = response.json::<Value>()["id"].as_i64().unwrap();
        app.state
            .db_connection
            .lock()
            .unwrap()
            .execute("UPDATE goal SET current_amount = 80 WHERE id = ?1", [goal_id])
            .unwrap();

        let response = app
            .server
            .post(&format_endpoint(endpoints::GOAL_CONTRIBUTION, goal_id))
            .authorization_bearer(&app.token)
            .json(&json!({ "amount": 30 }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["message"], "Contribution successful");
        assert_eq!(body["goal"]["currentAmount"], 110.0);
        assert_eq!(body["goal"]["isCompleted"], true);
        assert!(body["goal"]["completedAt"].is_string());

        let account = account(&app).await;
        assert_eq!(account["balance"], 70.0);
        assert_eq!(account["totalSaved"], 30.0);
        assert_eq!(account["savingStreak"], 1);

        let expenses: Value = app
            .server
            .get(endpoints::EXPENSES)
            .authorization_bearer(&app.token)
            .await
            .json();
        assert_eq!(expenses[0]["category"], "Goal Contribution");
        assert_eq!(expenses[0]["goalId"], goal_id);
    }

    #[tokio::test]
    async fn contribution_above_balance_is_rejected() {
        let app = must_create_test_app(10.0);
        let goal_id = app
            .server
            .post(endpoints::GOALS)
            .authorization_bearer(&app.token)
            .json(&json!({ "title": "Bike", "targetAmount": 100, "category": "Other" }))
            .await
            .json::<Value>()["id"]
            .as_i64()
            .unwrap();

        let response = app
            .server
            .post(&format_endpoint(endpoints::GOAL_CONTRIBUTION, goal_id))
            .authorization_bearer(&app.token)
            .json(&json!({ "amount": 10.01 }))
            .await;

        response.assert_status_bad_request();
        response.assert_json(&json!({ "message": "Insufficient balance" }));

        let goals: Value = app
            .server
            .get(endpoints::GOALS)
            .authorization_bearer(&app.token)
            .await
            .json();
        assert_eq!(goals[0]["currentAmount"], 0.0);
        let account = account(&app).await;
        assert_eq!(account["balance"], 10.0);
        assert_eq!(account["savingStreak"], 0);
    }

    #[tokio::test]
    async fn zero_contribution_is_invalid() {
        let app = must_create_test_app(10.0);

        let response = app
            .server
            .post(&format_endpoint(endpoints::GOAL_CONTRIBUTION, 1))
            .authorization_bearer(&app.token)
            .json(&json!({ "amount": 0 }))
            .await;

        response.assert_status_bad_request();
        response.assert_json(&json!({
            "message": "Validation failed",
            "errors": [
                { "field": "amount", "message": "Contribution amount must be greater than 0" },
            ],
        }));
    }

    #[tokio::test]
    async fn deleting_goal_responds_with_message() {
        let app = must_create_test_app(0.0);
        let goal_id = app
            .server
            .post(endpoints::GOALS)
            .authorization_bearer(&app.token)
            .json(&json!({ "title": "Bike", "targetAmount": 100, "category": "Other" }))
            .await
            .json::<Value>()["id"]
            .as_i64()
            .unwrap();

        let response = app
            .server
            .delete(&format_endpoint(endpoints::GOAL, goal_id))
            .authorization_bearer(&app.token)
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({ "message": "Goal removed" }));
    }

    #[tokio::test]
    async fn community_contributions_accumulate_per_user() {
        let app = must_create_test_app(100.0);
        let (other, other_token) = app.must_add_user(0.0);

        let response = app
            .server
            .post(endpoints::COMMUNITY_GOALS)
            .authorization_bearer(&other_token)
            .json(&json!({
                "title": "Park benches",
                "description": "Three new benches for the park",
                "targetAmount": 300,
                "category": "Community",
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let goal: Value = response.json();
        assert_eq!(goal["createdBy"], json!({ "id": other.id, "name": other.name }));
        let path = format_endpoint(
            endpoints::COMMUNITY_GOAL_CONTRIBUTION,
            goal["id"].as_i64().unwrap(),
        );

        for amount in [20, 15] {
            app.server
                .post(&path)
                .authorization_bearer(&app.token)
                .json(&json!({ "amount": amount }))
                .await
                .assert_status_ok();
        }

        let goals: Value = app
            .server
            .get(endpoints::COMMUNITY_GOALS)
            .authorization_bearer(&app.token)
            .await
            .json();
        let contributors = goals[0]["contributors"].as_array().unwrap();
        assert_eq!(contributors.len(), 1);
        assert_eq!(
            contributors[0]["user"],
            json!({ "id": app.user.id, "name": app.user.name })
        );
        assert_eq!(contributors[0]["amount"], 35.0);
        assert_eq!(goals[0]["currentAmount"], 35.0);
        assert_eq!(account(&app).await["balance"], 65.0);
    }

    #[tokio::test]
    async fn contribute_to_missing_community_goal() {
        let app = must_create_test_app(100.0);

        let response = app
            .server
            .post(&format_endpoint(endpoints::COMMUNITY_GOAL_CONTRIBUTION, 404))
            .authorization_bearer(&app.token)
            .json(&json!({ "amount": 5 }))
            .await;

        response.assert_status_not_found();
        response.assert_json(&json!({ "message": "Community goal not found" }));
    }
}

//! HTTP-level integration tests for task endpoints: creation, filtered
//! listing, status lifecycle and deletion.

mod common;

use axum::http::StatusCode;
use common::{
    alice, body_json, bob, build_test_app, carol, create_project, create_task, delete_as, get_as,
    join_project, post_json_as, set_status,
};
use sqlx::PgPool;

/// Alice's project with Bob as collaborator. Returns the project id.
async fn shared_project(pool: &PgPool) -> i64 {
    let project = create_project(pool, &alice(), "Shared").await;
    let code = project["invite_code"].as_str().unwrap();
    assert_eq!(join_project(pool, &bob(), code).await.status(), StatusCode::NO_CONTENT);
    project["id"].as_i64().unwrap()
}

async fn fetch_task(pool: &PgPool, task_id: i64) -> serde_json::Value {
    let uri = format!("/api/v1/tasks/{task_id}");
    let response = get_as(build_test_app(pool.clone()), &uri, &alice()).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"].clone()
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_task_starts_in_todo(pool: PgPool) {
    let project_id = shared_project(&pool).await;
    let task = create_task(&pool, &alice(), project_id, "Design", Some(&bob())).await;

    assert_eq!(task["status"], "To Do");
    assert_eq!(task["project_id"], project_id);
    assert_eq!(task["price"], 15000.0);
    assert_eq!(task["assignee_email"], "bob@example.com");
    assert_eq!(task["assignee_name"], "Bob");
    assert_eq!(task["created_by_email"], "alice@example.com");
    assert!(task["solution_description"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_assignee_must_be_project_member(pool: PgPool) {
    let project_id = shared_project(&pool).await;
    let response = post_json_as(
        build_test_app(pool),
        &format!("/api/v1/projects/{project_id}/tasks"),
        &alice(),
        serde_json::json!({ "name": "Outsourced", "assignee_email": "carol@example.com" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_task_rejects_blank_name_and_negative_price(pool: PgPool) {
    let project_id = shared_project(&pool).await;
    for body in [
        serde_json::json!({ "name": "  " }),
        serde_json::json!({ "name": "Cheap", "price": -1.0 }),
    ] {
        let response = post_json_as(
            build_test_app(pool.clone()),
            &format!("/api/v1/projects/{project_id}/tasks"),
            &alice(),
            body,
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_non_member_cannot_create_task(pool: PgPool) {
    let project_id = shared_project(&pool).await;
    let response = post_json_as(
        build_test_app(pool),
        &format!("/api/v1/projects/{project_id}/tasks"),
        &carol(),
        serde_json::json!({ "name": "Sneaky" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Filtered listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_tasks_filters_by_status_and_assignment(pool: PgPool) {
    let project_id = shared_project(&pool).await;
    let done = create_task(&pool, &alice(), project_id, "done-by-bob", Some(&bob())).await;
    create_task(&pool, &alice(), project_id, "todo-by-alice", Some(&alice())).await;
    create_task(&pool, &alice(), project_id, "todo-unassigned", None).await;
    create_task(&pool, &alice(), project_id, "todo-by-bob", Some(&bob())).await;
    let done_id = done["id"].as_i64().unwrap();
    let response = set_status(&pool, &bob(), done_id, "Done", Some("fixed")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let names = |json: &serde_json::Value| -> Vec<String> {
        json["data"]["tasks"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap().to_string())
            .collect()
    };
    let base = format!("/api/v1/projects/{project_id}/tasks");

    let json = body_json(get_as(build_test_app(pool.clone()), &base, &bob()).await).await;
    assert_eq!(
        names(&json),
        vec!["done-by-bob", "todo-by-alice", "todo-unassigned", "todo-by-bob"]
    );
    assert_eq!(json["data"]["counts"]["total"], 4);
    assert_eq!(json["data"]["counts"]["to_do"], 3);
    assert_eq!(json["data"]["counts"]["done"], 1);
    assert_eq!(json["data"]["counts"]["assigned"], 2);

    let json = body_json(
        get_as(build_test_app(pool.clone()), &format!("{base}?status=Done"), &bob()).await,
    )
    .await;
    assert_eq!(names(&json), vec!["done-by-bob"]);

    let json = body_json(
        get_as(
            build_test_app(pool.clone()),
            &format!("{base}?status=To%20Do&assigned_only=true"),
            &bob(),
        )
        .await,
    )
    .await;
    assert_eq!(names(&json), vec!["todo-by-bob"]);
    // Counters ignore the filter.
    assert_eq!(json["data"]["counts"]["total"], 4);

    let json = body_json(
        get_as(build_test_app(pool), &format!("{base}?status=&assigned_only=true"), &bob()).await,
    )
    .await;
    assert_eq!(names(&json), vec!["done-by-bob", "todo-by-bob"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_tasks_with_unknown_status_returns_400(pool: PgPool) {
    let project_id = shared_project(&pool).await;
    let response = get_as(
        build_test_app(pool),
        &format!("/api/v1/projects/{project_id}/tasks?status=Blocked"),
        &alice(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Status lifecycle
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_assignee_moves_task_between_todo_and_in_progress(pool: PgPool) {
    let project_id = shared_project(&pool).await;
    let task = create_task(&pool, &alice(), project_id, "Flip", Some(&bob())).await;
    let id = task["id"].as_i64().unwrap();

    let response = set_status(&pool, &bob(), id, "In Progress", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "In Progress");

    let response = set_status(&pool, &bob(), id, "To Do", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(fetch_task(&pool, id).await["status"], "To Do");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_closing_without_solution_leaves_task_unchanged(pool: PgPool) {
    let project_id = shared_project(&pool).await;
    let task = create_task(&pool, &alice(), project_id, "Close", Some(&bob())).await;
    let id = task["id"].as_i64().unwrap();
    set_status(&pool, &bob(), id, "In Progress", None).await;

    for solution in [None, Some(""), Some("   ")] {
        let response = set_status(&pool, &bob(), id, "Done", solution).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    let stored = fetch_task(&pool, id).await;
    assert_eq!(stored["status"], "In Progress");
    assert!(stored["solution_description"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_closing_with_solution_persists_both(pool: PgPool) {
    let project_id = shared_project(&pool).await;
    let task = create_task(&pool, &alice(), project_id, "Close", Some(&bob())).await;
    let id = task["id"].as_i64().unwrap();

    let response = set_status(&pool, &bob(), id, "Done", Some("<p>Replaced the part</p>")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let returned = body_json(response).await["data"].clone();
    assert_eq!(returned["status"], "Done");
    assert_eq!(returned["solution_description"], "<p>Replaced the part</p>");

    let stored = fetch_task(&pool, id).await;
    assert_eq!(stored["status"], "Done");
    assert_eq!(stored["solution_description"], "<p>Replaced the part</p>");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_done_task_cannot_be_reopened(pool: PgPool) {
    let project_id = shared_project(&pool).await;
    let task = create_task(&pool, &alice(), project_id, "Final", Some(&bob())).await;
    let id = task["id"].as_i64().unwrap();
    set_status(&pool, &bob(), id, "Done", Some("finished")).await;

    let response = set_status(&pool, &bob(), id, "In Progress", None).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(fetch_task(&pool, id).await["status"], "Done");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_solution_with_non_done_status_returns_400(pool: PgPool) {
    let project_id = shared_project(&pool).await;
    let task = create_task(&pool, &alice(), project_id, "Notes", Some(&bob())).await;
    let id = task["id"].as_i64().unwrap();

    let response = set_status(&pool, &bob(), id, "In Progress", Some("early notes")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_only_assignee_or_creator_changes_status(pool: PgPool) {
    let project_id = shared_project(&pool).await;
    // Bob creates a task assigned to Alice; Carol joins but is neither.
    let task = create_task(&pool, &bob(), project_id, "Owned", Some(&alice())).await;
    let id = task["id"].as_i64().unwrap();

    let uri = format!("/api/v1/projects/{project_id}");
    let project = body_json(get_as(build_test_app(pool.clone()), &uri, &alice()).await).await;
    join_project(&pool, &carol(), project["data"]["invite_code"].as_str().unwrap()).await;

    let response = set_status(&pool, &carol(), id, "In Progress", None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    assert_eq!(set_status(&pool, &alice(), id, "In Progress", None).await.status(), StatusCode::OK);
    assert_eq!(set_status(&pool, &bob(), id, "To Do", None).await.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_status_value_is_rejected(pool: PgPool) {
    let project_id = shared_project(&pool).await;
    let task = create_task(&pool, &alice(), project_id, "Typo", None).await;
    let id = task["id"].as_i64().unwrap();

    let response = set_status(&pool, &alice(), id, "Finished", None).await;
    assert!(response.status().is_client_error());
    assert_eq!(fetch_task(&pool, id).await["status"], "To Do");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_non_member_cannot_read_tasks(pool: PgPool) {
    let project_id = shared_project(&pool).await;
    let task = create_task(&pool, &alice(), project_id, "Internal", Some(&bob())).await;
    let task_id = task["id"].as_i64().unwrap();

    let uri = format!("/api/v1/tasks/{task_id}");
    let response = get_as(build_test_app(pool.clone()), &uri, &carol()).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], "FORBIDDEN");

    let uri = format!("/api/v1/projects/{project_id}/tasks");
    let response = get_as(build_test_app(pool.clone()), &uri, &carol()).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The collaborator still sees both.
    let response = get_as(build_test_app(pool), &uri, &bob()).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_status_update_on_missing_task_returns_404(pool: PgPool) {
    let response = set_status(&pool, &alice(), 777777, "In Progress", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_task_permissions(pool: PgPool) {
    let project_id = shared_project(&pool).await;
    let by_alice = create_task(&pool, &alice(), project_id, "Alice's", Some(&bob())).await;
    let by_bob = create_task(&pool, &bob(), project_id, "Bob's", None).await;

    // Assignee who did not create the task cannot delete it.
    let uri = format!("/api/v1/tasks/{}", by_alice["id"].as_i64().unwrap());
    let response = delete_as(build_test_app(pool.clone()), &uri, &bob()).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Project creator may delete a collaborator's task.
    let uri = format!("/api/v1/tasks/{}", by_bob["id"].as_i64().unwrap());
    let response = delete_as(build_test_app(pool.clone()), &uri, &alice()).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_as(build_test_app(pool), &uri, &alice()).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

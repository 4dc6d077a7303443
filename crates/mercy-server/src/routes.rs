//! Route table.
//!
//! | Method | Path | Permission | Resolver |
//! |---|---|---|---|
//! | POST | `/op/login` | - | - |
//! | POST | `/op/validate` | - | - |
//! | POST | `/op/{entity}/add` | alter tag | - |
//! | POST | `/op/{entity}/update` | alter tag | yes |
//! | GET | `/op/{entity}` | - | yes |
//! | GET | `/op/students`, `/op/students/query`, `/op/items` | - | - |
//! | GET | `/student`, `/item` | public | yes |
//! | GET | `/items` | public | - |

use crate::error::ApiError;
use crate::handlers::{self, item, login, staff, student};
use crate::middleware::{authenticate, require_permission, resolve};
use crate::state::AppState;
use axum::error_handling::HandleErrorLayer;
use axum::middleware::from_fn_with_state;
use axum::{BoxError, Router};
use axum::routing::{get, post};
use mercy_core::{ErrorCode, Item, Permission, Staff, Student};
use mercy_policy::Requirement;
use std::time::Duration;
use tower::ServiceBuilder;
use tower::timeout::TimeoutLayer;
use tower::timeout::error::Elapsed;
use tower_http::trace::TraceLayer;

pub fn router(state: AppState, request_timeout: Duration) -> Router {
    let resolve_student = from_fn_with_state(state.clone(), resolve::<Student>);
    let resolve_staff = from_fn_with_state(state.clone(), resolve::<Staff>);
    let resolve_item = from_fn_with_state(state.clone(), resolve::<Item>);

    let alter_students = from_fn_with_state(
        Requirement::single(Permission::AlterStudents),
        require_permission,
    );
    let alter_staffs = from_fn_with_state(
        Requirement::single(Permission::AlterStaffs),
        require_permission,
    );
    let alter_items = from_fn_with_state(
        Requirement::single(Permission::AlterItems),
        require_permission,
    );

    let op = Router::new()
        .route(crate::middleware::LOGIN_PATH, post(login::login))
        .route("/op/validate", post(login::validate))
        // Students
        .route(
            "/op/student/add",
            post(student::add).layer(alter_students.clone()),
        )
        .route(
            "/op/student/update",
            post(student::update).layer(
                ServiceBuilder::new()
                    .layer(alter_students)
                    .layer(resolve_student.clone()),
            ),
        )
        .route(
            "/op/student",
            get(student::show).layer(resolve_student.clone()),
        )
        .route("/op/students", get(student::list))
        .route("/op/students/query", get(student::search))
        // Staff
        .route("/op/staff/add", post(staff::add).layer(alter_staffs.clone()))
        .route(
            "/op/staff/update",
            post(staff::update).layer(
                ServiceBuilder::new()
                    .layer(alter_staffs)
                    .layer(resolve_staff.clone()),
            ),
        )
        .route("/op/staff", get(staff::show).layer(resolve_staff))
        // Items
        .route("/op/item/add", post(item::add).layer(alter_items.clone()))
        .route(
            "/op/item/update",
            post(item::update).layer(
                ServiceBuilder::new()
                    .layer(alter_items)
                    .layer(resolve_item.clone()),
            ),
        )
        .route("/op/item", get(item::show).layer(resolve_item.clone()))
        .route("/op/items", get(item::list))
        .route_layer(from_fn_with_state(state.clone(), authenticate));

    let public = Router::new()
        .route("/student", get(student::public).layer(resolve_student))
        .route("/item", get(item::public).layer(resolve_item))
        .route("/items", get(item::catalogue))
        .route("/healthz", get(handlers::healthz));

    with_deadline(op.merge(public), request_timeout)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Fail requests running past `timeout` with `RequestTimeout`.
fn with_deadline<S>(router: Router<S>, timeout: Duration) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(deadline_error))
            .layer(TimeoutLayer::new(timeout)),
    )
}

async fn deadline_error(err: BoxError) -> ApiError {
    if err.is::<Elapsed>() {
        tracing::warn!("Request exceeded its deadline");
        ApiError::new(ErrorCode::RequestTimeout)
    } else {
        ApiError::Internal(anyhow::anyhow!("request failed: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_deadline_renders_error_body() {
        let app = with_deadline(
            Router::new()
                .route(
                    "/slow",
                    get(|| async {
                        tokio::time::sleep(Duration::from_millis(200)).await;
                        "late"
                    }),
                )
                .route("/fast", get(|| async { "ok" })),
            Duration::from_millis(20),
        );

        let resp = app
            .clone()
            .oneshot(Request::get("/slow").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::REQUEST_TIMEOUT);
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({"error": "RequestTimeout"}));

        let resp = app
            .oneshot(Request::get("/fast").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}

//! 用户处理器
//!
//! 解析路径和请求体，调用服务层，并把结果（或其缺失）映射为 HTTP 状态码。

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use std::sync::Arc;

use super::{model::User, service::UserService};
use crate::core::error::CoreError;

#[derive(Clone)]
pub struct UserState {
    pub user_service: Arc<dyn UserService>,
}

/// 用户路由，可挂载到任何能提取出 [`UserState`] 的应用状态上
pub fn routes<S>() -> Router<S>
where
    UserState: FromRef<S>,
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/users", get(get_users).post(create_user))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
}

/// 创建用户，客户端提供的 id 会被忽略
pub async fn create_user(
    State(state): State<UserState>,
    Json(mut payload): Json<User>,
) -> Result<(StatusCode, Json<User>), CoreError> {
    payload.id = None;
    let user = state.user_service.save_user(payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn get_users(State(state): State<UserState>) -> Result<Json<Vec<User>>, CoreError> {
    let users = state.user_service.get_all_users().await?;
    Ok(Json(users))
}

pub async fn get_user(
    State(state): State<UserState>,
    Path(id): Path<i64>,
) -> Result<Json<User>, CoreError> {
    let user = state
        .user_service
        .get_user_by_id(id)
        .await?
        .ok_or(CoreError::NotFound)?;
    Ok(Json(user))
}

pub async fn update_user(
    State(state): State<UserState>,
    Path(id): Path<i64>,
    Json(payload): Json<User>,
) -> Result<Json<User>, CoreError> {
    let user = state
        .user_service
        .update_user(id, payload)
        .await?
        .ok_or(CoreError::NotFound)?;
    Ok(Json(user))
}

pub async fn delete_user(
    State(state): State<UserState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, CoreError> {
    if state.user_service.delete_user(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::user::repository::RepoError;
    use crate::app::user::service::MockUserService;
    use axum_test::TestServer;
    use mockall::predicate::*;
    use serde_json::json;

    fn test_user() -> User {
        User::with_id(1, "John Doe", "123 Main Street")
    }

    fn server(service: MockUserService) -> TestServer {
        let state = UserState {
            user_service: Arc::new(service),
        };
        let app: Router = routes().with_state(state);
        TestServer::new(app).unwrap()
    }

    #[tokio::test]
    async fn test_create_user() {
        let mut service = MockUserService::new();
        service
            .expect_save_user()
            .withf(|user| user.id.is_none() && user.name == "John Doe")
            .times(1)
            .returning(|_| Ok(test_user()));

        // 请求体带 id，处理器应当忽略
        let response = server(service).post("/users").json(&test_user()).await;

        response.assert_status(StatusCode::CREATED);
        let body: serde_json::Value = response.json();
        assert_eq!(body["id"], 1);
        assert_eq!(body["name"], "John Doe");
        assert_eq!(body["address"], "123 Main Street");
    }

    #[tokio::test]
    async fn test_get_all_users() {
        let mut service = MockUserService::new();
        service.expect_get_all_users().times(1).returning(|| {
            Ok(vec![
                test_user(),
                User::with_id(2, "Jane Doe", "456 Park Avenue"),
            ])
        });

        let response = server(service).get("/users").await;

        response.assert_status_ok();
        let users: Vec<User> = response.json();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].name, "John Doe");
        assert_eq!(users[1].name, "Jane Doe");
    }

    #[tokio::test]
    async fn test_get_user_by_id_found() {
        let mut service = MockUserService::new();
        service
            .expect_get_user_by_id()
            .with(eq(1))
            .times(1)
            .returning(|_| Ok(Some(test_user())));

        let response = server(service).get("/users/1").await;

        response.assert_status_ok();
        response.assert_json(&json!({
            "id": 1,
            "name": "John Doe",
            "address": "123 Main Street"
        }));
    }

    #[tokio::test]
    async fn test_get_user_by_id_not_found() {
        let mut service = MockUserService::new();
        service
            .expect_get_user_by_id()
            .with(eq(999))
            .times(1)
            .returning(|_| Ok(None));

        let response = server(service).get("/users/999").await;

        response.assert_status_not_found();
        assert!(response.text().is_empty());
    }

    #[tokio::test]
    async fn test_update_user_success() {
        let updated = User::with_id(1, "Updated Name", "Updated Address");
        let mut service = MockUserService::new();
        service
            .expect_update_user()
            .withf(|id, details| *id == 1 && details.name == "Updated Name")
            .times(1)
            .returning(|id, details| {
                Ok(Some(User::with_id(id, details.name, details.address)))
            });

        let response = server(service).put("/users/1").json(&updated).await;

        response.assert_status_ok();
        let body: User = response.json();
        assert_eq!(body, updated);
    }

    #[tokio::test]
    async fn test_update_user_not_found() {
        let mut service = MockUserService::new();
        service
            .expect_update_user()
            .withf(|id, _| *id == 999)
            .times(1)
            .returning(|_, _| Ok(None));

        let response = server(service)
            .put("/users/999")
            .json(&User::with_id(999, "Updated Name", "Updated Address"))
            .await;

        response.assert_status_not_found();
        assert!(response.text().is_empty());
    }

    #[tokio::test]
    async fn test_delete_user_success() {
        let mut service = MockUserService::new();
        service
            .expect_delete_user()
            .with(eq(1))
            .times(1)
            .returning(|_| Ok(true));

        let response = server(service).delete("/users/1").await;

        response.assert_status(StatusCode::NO_CONTENT);
        assert!(response.text().is_empty());
    }

    #[tokio::test]
    async fn test_delete_user_not_found() {
        let mut service = MockUserService::new();
        service
            .expect_delete_user()
            .with(eq(999))
            .times(1)
            .returning(|_| Ok(false));

        let response = server(service).delete("/users/999").await;

        response.assert_status_not_found();
    }

    #[tokio::test]
    async fn test_storage_failure_returns_500() {
        let mut service = MockUserService::new();
        service
            .expect_get_all_users()
            .times(1)
            .returning(|| Err(RepoError::Poisoned));

        let response = server(service).get("/users").await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_non_numeric_id_is_rejected() {
        let mut service = MockUserService::new();
        service.expect_get_user_by_id().never();

        let response = server(service).get("/users/abc").await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}

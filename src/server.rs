//! HTTP 服务装配：状态、路由、中间件、启动

use axum::{
    extract::{FromRef, State},
    middleware,
    response::Json,
    routing::get,
    Router,
};
use std::{sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;

use crate::app::user::{
    handler::{self, UserState},
    repository::{InMemoryUserRepository, RepoResult, SqlxUserRepository, UserRepository},
    service::DefaultUserService,
};
use crate::core::{error::CoreError, middleware::request_logging_middleware};
use crate::infrastructure::{
    config::{AppConfig, DatabaseConfig, StorageBackend},
    database::DatabaseManager,
};

/// 应用状态
#[derive(Clone)]
pub struct AppState {
    pub users: UserState,
    pub repository: Arc<dyn UserRepository>,
}

impl AppState {
    /// 以构造函数组合三层：仓储 -> 服务 -> 处理器状态
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        let user_service = Arc::new(DefaultUserService::new(repository.clone()));
        Self {
            users: UserState { user_service },
            repository,
        }
    }
}

impl FromRef<AppState> for UserState {
    fn from_ref(state: &AppState) -> Self {
        state.users.clone()
    }
}

/// 按配置创建仓储并初始化表结构
pub async fn connect(config: &DatabaseConfig) -> RepoResult<AppState> {
    let repository: Arc<dyn UserRepository> = match config.backend {
        StorageBackend::Sqlite => {
            let db = DatabaseManager::new(config).await?;
            let repo = SqlxUserRepository::new(db.get_pool().clone());
            repo.init_schema().await?;
            Arc::new(repo)
        }
        StorageBackend::Memory => {
            info!("Using in-memory user storage");
            Arc::new(InMemoryUserRepository::new())
        }
    };

    Ok(AppState::new(repository))
}

/// 创建路由
pub fn build_router(state: AppState, timeout: Duration) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(handler::routes::<AppState>())
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_logging_middleware))
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(timeout))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// 健康检查
async fn health_check(State(state): State<AppState>) -> Result<Json<serde_json::Value>, CoreError> {
    let users_count = state.repository.count().await?;

    Ok(Json(serde_json::json!({
        "status": "healthy",
        "database": "connected",
        "users_count": users_count,
        "timestamp": chrono::Utc::now().to_rfc3339()
    })))
}

/// 启动服务器，Ctrl-C 时优雅退出
pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    let state = connect(&config.database).await?;
    let app = build_router(state, Duration::from_secs(config.http.timeout_seconds));

    let listener = TcpListener::bind(config.listen_addr()).await?;
    let addr = listener.local_addr()?;

    info!("🚀 User CRUD server running on http://{}", addr);
    info!("📖 API 端点:");
    info!("   POST   /users         - 创建用户");
    info!("   GET    /users         - 获取所有用户");
    info!("   GET    /users/:id     - 获取特定用户");
    info!("   PUT    /users/:id     - 更新用户");
    info!("   DELETE /users/:id     - 删除用户");
    info!("   GET    /health        - 健康检查");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("服务器已停止");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("收到 Ctrl-C，正在关闭...");
    }
}

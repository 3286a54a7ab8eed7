use tracing::info;
use user_crud_service::infrastructure::{config::AppConfig, logger::Logger};
use user_crud_service::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;

    // 初始化日志
    Logger::init(&config.logging.level);

    info!("启动用户 CRUD 服务...");
    server::run(config).await
}

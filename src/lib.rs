//! # 用户 CRUD 服务
//!
//! 单一 `User` 实体（id、name、address）的增删改查 HTTP 服务，分层如下：
//! - 应用层 (`app`)：处理器 -> 服务 -> 仓储
//! - 核心层 (`core`)：统一错误处理、请求日志中间件
//! - 基础设施层 (`infrastructure`)：配置、数据库连接池、日志
//! - 服务装配 (`server`)：路由、中间件栈、启动

pub mod app;
pub mod core;
pub mod infrastructure;
pub mod server;

pub use app::user::User;

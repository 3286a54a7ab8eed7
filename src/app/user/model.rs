//! 用户数据模型

use serde::{Deserialize, Serialize};

/// 用户实体
///
/// `id` 由存储层分配，持久化之前为 `None`（序列化为 `null`）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    pub address: String,
}

impl User {
    /// 创建尚未持久化的用户
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            address: address.into(),
        }
    }

    /// 创建带 id 的用户（已持久化）
    pub fn with_id(id: i64, name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            name: name.into(),
            address: address.into(),
        }
    }
}

/// `users` 表的行映射
#[derive(Debug, sqlx::FromRow)]
pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub address: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: Some(row.id),
            name: row.name,
            address: row.address,
        }
    }
}

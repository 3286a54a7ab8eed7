//! 用户仓储层
//!
//! 仓储是用户数据的唯一所有者。提供两种实现：
//! - [`SqlxUserRepository`]：基于 SQLite 连接池，生产环境使用
//! - [`InMemoryUserRepository`]：基于内存 `BTreeMap`，用于演示和测试

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use sqlx::SqlitePool;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, RwLock};
use tracing::info;

use super::model::{User, UserRow};

/// 仓储错误类型
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),
    #[error("内存存储锁已损坏")]
    Poisoned,
}

pub type RepoResult<T> = Result<T, RepoError>;

/// 用户仓储 trait
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// 按插入顺序返回全部用户
    async fn find_all(&self) -> RepoResult<Vec<User>>;

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<User>>;

    /// 插入或更新。
    ///
    /// `id` 为空时插入新行并分配 id；否则覆盖该 id 对应的行（不存在则以该 id 插入）。
    async fn save(&self, user: User) -> RepoResult<User>;

    /// 删除指定 id，不存在时什么也不做
    async fn delete_by_id(&self, id: i64) -> RepoResult<()>;

    async fn exists_by_id(&self, id: i64) -> RepoResult<bool>;

    async fn delete_all(&self) -> RepoResult<()>;

    async fn count(&self) -> RepoResult<u64>;
}

const USER_SELECT_SQL: &str = "SELECT id, name, address FROM users";

/// SQLite 用户仓储
#[derive(Clone)]
pub struct SqlxUserRepository {
    pool: SqlitePool,
}

impl SqlxUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// 创建 `users` 表（已存在则跳过）
    pub async fn init_schema(&self) -> RepoResult<()> {
        info!("Creating users table...");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                address TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    async fn find_all(&self) -> RepoResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!("{USER_SELECT_SQL} ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!("{USER_SELECT_SQL} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(User::from))
    }

    async fn save(&self, user: User) -> RepoResult<User> {
        let row = match user.id {
            None => {
                sqlx::query_as::<_, UserRow>(
                    "INSERT INTO users (name, address) VALUES (?, ?) RETURNING id, name, address",
                )
                .bind(&user.name)
                .bind(&user.address)
                .fetch_one(&self.pool)
                .await?
            }
            Some(id) => {
                sqlx::query_as::<_, UserRow>(
                    r#"
                    INSERT INTO users (id, name, address) VALUES (?, ?, ?)
                    ON CONFLICT(id) DO UPDATE SET name = excluded.name, address = excluded.address
                    RETURNING id, name, address
                    "#,
                )
                .bind(id)
                .bind(&user.name)
                .bind(&user.address)
                .fetch_one(&self.pool)
                .await?
            }
        };

        Ok(row.into())
    }

    async fn delete_by_id(&self, id: i64) -> RepoResult<()> {
        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn exists_by_id(&self, id: i64) -> RepoResult<bool> {
        let found: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(found > 0)
    }

    async fn delete_all(&self) -> RepoResult<()> {
        sqlx::query("DELETE FROM users").execute(&self.pool).await?;
        Ok(())
    }

    async fn count(&self) -> RepoResult<u64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(total as u64)
    }
}

/// 内存用户仓储
///
/// id 单调递增，删除后不会复用，`delete_all` 也不会重置计数器。
#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<BTreeMap<i64, User>>>,
    last_id: Arc<AtomicI64>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_all(&self) -> RepoResult<Vec<User>> {
        let users = self.users.read().map_err(|_| RepoError::Poisoned)?;
        Ok(users.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<User>> {
        let users = self.users.read().map_err(|_| RepoError::Poisoned)?;
        Ok(users.get(&id).cloned())
    }

    async fn save(&self, mut user: User) -> RepoResult<User> {
        let id = match user.id {
            Some(id) => {
                self.last_id.fetch_max(id, Ordering::SeqCst);
                id
            }
            None => self.last_id.fetch_add(1, Ordering::SeqCst) + 1,
        };
        user.id = Some(id);

        let mut users = self.users.write().map_err(|_| RepoError::Poisoned)?;
        users.insert(id, user.clone());
        Ok(user)
    }

    async fn delete_by_id(&self, id: i64) -> RepoResult<()> {
        let mut users = self.users.write().map_err(|_| RepoError::Poisoned)?;
        users.remove(&id);
        Ok(())
    }

    async fn exists_by_id(&self, id: i64) -> RepoResult<bool> {
        let users = self.users.read().map_err(|_| RepoError::Poisoned)?;
        Ok(users.contains_key(&id))
    }

    async fn delete_all(&self) -> RepoResult<()> {
        let mut users = self.users.write().map_err(|_| RepoError::Poisoned)?;
        users.clear();
        Ok(())
    }

    async fn count(&self) -> RepoResult<u64> {
        let users = self.users.read().map_err(|_| RepoError::Poisoned)?;
        Ok(users.len() as u64)
    }
}

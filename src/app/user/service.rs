//! 用户业务服务
//!
//! 服务层只做编排：更新和删除前先查询记录是否存在，其余参数原样转交给仓储。
//! "未找到" 统一以 `None` / `false` 表达，不作为错误返回。

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use std::sync::Arc;
use tracing::{debug, info};

use super::model::User;
use super::repository::{RepoResult, UserRepository};

/// 用户服务 trait
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserService: Send + Sync {
    async fn save_user(&self, user: User) -> RepoResult<User>;

    async fn get_all_users(&self) -> RepoResult<Vec<User>>;

    async fn get_user_by_id(&self, id: i64) -> RepoResult<Option<User>>;

    /// 覆盖 `name` 和 `address`，id 保持不变。用户不存在时返回 `None` 且不写入。
    async fn update_user(&self, id: i64, details: User) -> RepoResult<Option<User>>;

    /// 用户不存在时返回 `false` 且不执行删除
    async fn delete_user(&self, id: i64) -> RepoResult<bool>;
}

/// 基于仓储的默认用户服务
#[derive(Clone)]
pub struct DefaultUserService {
    repo: Arc<dyn UserRepository>,
}

impl DefaultUserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl UserService for DefaultUserService {
    async fn save_user(&self, user: User) -> RepoResult<User> {
        let saved = self.repo.save(user).await?;
        info!("Saved user: {} ({:?})", saved.name, saved.id);
        Ok(saved)
    }

    async fn get_all_users(&self) -> RepoResult<Vec<User>> {
        self.repo.find_all().await
    }

    async fn get_user_by_id(&self, id: i64) -> RepoResult<Option<User>> {
        let user = self.repo.find_by_id(id).await?;
        if user.is_none() {
            debug!("用户 {} 不存在", id);
        }
        Ok(user)
    }

    async fn update_user(&self, id: i64, details: User) -> RepoResult<Option<User>> {
        let Some(mut existing) = self.repo.find_by_id(id).await? else {
            debug!("用户 {} 不存在，跳过更新", id);
            return Ok(None);
        };

        existing.name = details.name;
        existing.address = details.address;

        let updated = self.repo.save(existing).await?;
        info!("Updated user: {} ({})", updated.name, id);
        Ok(Some(updated))
    }

    async fn delete_user(&self, id: i64) -> RepoResult<bool> {
        if !self.repo.exists_by_id(id).await? {
            debug!("用户 {} 不存在，跳过删除", id);
            return Ok(false);
        }

        self.repo.delete_by_id(id).await?;
        info!("Deleted user: {}", id);
        Ok(true)
    }
}

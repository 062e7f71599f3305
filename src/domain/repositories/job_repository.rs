// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::job::CrawlJob;
use crate::domain::repositories::RepositoryError;
use async_trait::async_trait;
use uuid::Uuid;

/// 采集任务仓库特质
///
/// 定义任务队列的数据访问接口
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// 创建新任务
    async fn create(&self, job: &CrawlJob) -> Result<CrawlJob, RepositoryError>;
    /// 根据ID查找任务
    async fn find_by_id(&self, id: Uuid) -> Result<Option<CrawlJob>, RepositoryError>;
    /// 更新任务
    async fn update(&self, job: &CrawlJob) -> Result<CrawlJob, RepositoryError>;
    /// 获取下一个待处理任务并为worker加锁，保证同一任务实例只被一个worker处理
    async fn acquire_next(&self, worker_id: Uuid) -> Result<Option<CrawlJob>, RepositoryError>;
    /// 标记任务已完成
    async fn mark_completed(&self, id: Uuid) -> Result<(), RepositoryError>;
    /// 标记任务终态失败
    async fn mark_failed(&self, id: Uuid) -> Result<(), RepositoryError>;
    /// 重置锁过期的卡住任务，返回重置数量
    async fn reset_stuck_jobs(&self, timeout: chrono::Duration) -> Result<u64, RepositoryError>;
}

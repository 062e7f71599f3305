// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::job::CrawlJob;
use crate::domain::repositories::job_repository::JobRepository;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// 队列错误类型
#[derive(Error, Debug)]
pub enum QueueError {
    /// 仓库错误
    #[error("Repository error: {0}")]
    Repository(#[from] crate::domain::repositories::RepositoryError),
}

/// 任务队列特质
///
/// 队列里只有来源slug，采集结果走关联总线，不进队列
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// 入队任务
    async fn enqueue(&self, job: CrawlJob) -> Result<CrawlJob, QueueError>;

    /// 出队任务，无任务时返回None
    async fn dequeue(&self, worker_id: Uuid) -> Result<Option<CrawlJob>, QueueError>;

    /// 完成任务
    async fn complete(&self, job_id: Uuid) -> Result<(), QueueError>;

    /// 任务终态失败
    async fn fail(&self, job_id: Uuid) -> Result<(), QueueError>;
}

/// PostgreSQL任务队列实现
///
/// 队列状态全部落在crawl_jobs表上，进程重启后未完成的任务
/// 仍然可见并会被继续处理。
pub struct PostgresJobQueue<R: JobRepository> {
    /// 任务仓库
    repository: Arc<R>,
}

impl<R: JobRepository> PostgresJobQueue<R> {
    /// 创建新的PostgreSQL任务队列实例
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R: JobRepository> JobQueue for PostgresJobQueue<R> {
    async fn enqueue(&self, job: CrawlJob) -> Result<CrawlJob, QueueError> {
        let created = self.repository.create(&job).await?;
        Ok(created)
    }

    async fn dequeue(&self, worker_id: Uuid) -> Result<Option<CrawlJob>, QueueError> {
        let job = self.repository.acquire_next(worker_id).await?;
        Ok(job)
    }

    async fn complete(&self, job_id: Uuid) -> Result<(), QueueError> {
        self.repository.mark_completed(job_id).await?;
        Ok(())
    }

    async fn fail(&self, job_id: Uuid) -> Result<(), QueueError> {
        self.repository.mark_failed(job_id).await?;
        Ok(())
    }
}

#[async_trait]
impl<T: JobQueue + ?Sized> JobQueue for Arc<T> {
    async fn enqueue(&self, job: CrawlJob) -> Result<CrawlJob, QueueError> {
        (**self).enqueue(job).await
    }

    async fn dequeue(&self, worker_id: Uuid) -> Result<Option<CrawlJob>, QueueError> {
        (**self).dequeue(worker_id).await
    }

    async fn complete(&self, job_id: Uuid) -> Result<(), QueueError> {
        (**self).complete(job_id).await
    }

    async fn fail(&self, job_id: Uuid) -> Result<(), QueueError> {
        (**self).fail(job_id).await
    }
}

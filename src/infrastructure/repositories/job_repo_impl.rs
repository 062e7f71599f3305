// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::job::{CrawlJob, JobStatus};
use crate::domain::repositories::job_repository::JobRepository;
use crate::domain::repositories::RepositoryError;
use crate::infrastructure::database::entities::crawl_job as job_entity;
use async_trait::async_trait;
use chrono::{DateTime, Duration, FixedOffset, Utc};
use sea_orm::{
    sea_query::{Expr, LockBehavior, LockType},
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

/// 采集任务仓库实现
///
/// 基于SeaORM实现的任务队列数据访问层。获取任务走
/// SELECT ... FOR UPDATE SKIP LOCKED，保证一个任务实例
/// 同一时刻只被一个worker持有。
#[derive(Clone)]
pub struct JobRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl JobRepositoryImpl {
    /// 创建新的任务仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<job_entity::Model> for CrawlJob {
    fn from(model: job_entity::Model) -> Self {
        Self {
            id: model.id,
            source_slug: model.source_slug,
            status: model.status.parse().unwrap_or_default(),
            attempt_count: model.attempt_count,
            max_retries: model.max_retries,
            scheduled_at: model.scheduled_at,
            lock_token: model.lock_token,
            lock_expires_at: model.lock_expires_at,
            started_at: model.started_at,
            completed_at: model.completed_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<CrawlJob> for job_entity::ActiveModel {
    fn from(job: CrawlJob) -> Self {
        Self {
            id: Set(job.id),
            source_slug: Set(job.source_slug.clone()),
            status: Set(job.status.to_string()),
            attempt_count: Set(job.attempt_count),
            max_retries: Set(job.max_retries),
            scheduled_at: Set(job.scheduled_at),
            lock_token: Set(job.lock_token),
            lock_expires_at: Set(job.lock_expires_at),
            started_at: Set(job.started_at),
            completed_at: Set(job.completed_at),
            created_at: Set(job.created_at),
            updated_at: Set(job.updated_at),
        }
    }
}

#[async_trait]
impl JobRepository for JobRepositoryImpl {
    async fn create(&self, job: &CrawlJob) -> Result<CrawlJob, RepositoryError> {
        let model: job_entity::ActiveModel = job.clone().into();

        model.insert(self.db.as_ref()).await?;
        Ok(job.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CrawlJob>, RepositoryError> {
        let model = job_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn update(&self, job: &CrawlJob) -> Result<CrawlJob, RepositoryError> {
        let mut model: job_entity::ActiveModel = job.clone().into();
        model.updated_at = Set(Utc::now().into());

        let updated = model.update(self.db.as_ref()).await?;
        Ok(updated.into())
    }

    async fn acquire_next(&self, worker_id: Uuid) -> Result<Option<CrawlJob>, RepositoryError> {
        let txn = self.db.begin().await?;

        let job = job_entity::Entity::find()
            .filter(job_entity::Column::Status.eq(JobStatus::Queued.to_string()))
            .filter(
                Condition::any()
                    .add(job_entity::Column::ScheduledAt.is_null())
                    .add(job_entity::Column::ScheduledAt.lte(Utc::now())),
            )
            .order_by_asc(job_entity::Column::CreatedAt)
            .lock_with_behavior(LockType::Update, LockBehavior::SkipLocked)
            .one(&txn)
            .await?;

        if let Some(job) = job {
            let mut active: job_entity::ActiveModel = job.into();
            active.lock_token = Set(Some(worker_id));
            active.lock_expires_at = Set(Some((Utc::now() + Duration::minutes(5)).into()));
            active.status = Set(JobStatus::Active.to_string());
            active.started_at = Set(Some(Utc::now().into()));
            let current_attempt = *active.attempt_count.as_ref();
            active.attempt_count = Set(current_attempt + 1);
            active.updated_at = Set(Utc::now().into());

            let updated = active.update(&txn).await?;

            txn.commit().await?;

            return Ok(Some(updated.into()));
        }

        txn.commit().await?;
        Ok(None)
    }

    async fn mark_completed(&self, id: Uuid) -> Result<(), RepositoryError> {
        let job = self
            .find_by_id(id)
            .await?
            .ok_or(RepositoryError::NotFound)?;
        let mut updated = job.clone();
        updated.status = JobStatus::Completed;
        updated.completed_at = Some(Utc::now().into());
        updated.lock_token = None;
        updated.lock_expires_at = None;
        self.update(&updated).await?;
        Ok(())
    }

    async fn mark_failed(&self, id: Uuid) -> Result<(), RepositoryError> {
        let job = self
            .find_by_id(id)
            .await?
            .ok_or(RepositoryError::NotFound)?;
        let mut updated = job.clone();
        updated.status = JobStatus::Failed;
        updated.completed_at = Some(Utc::now().into());
        updated.lock_token = None;
        updated.lock_expires_at = None;
        self.update(&updated).await?;
        Ok(())
    }

    async fn reset_stuck_jobs(&self, timeout: Duration) -> Result<u64, RepositoryError> {
        let threshold = Utc::now() - timeout;

        // Active jobs whose lock has expired, or whose lock never got an
        // expiry and started too long ago, go back to the queue
        let result = job_entity::Entity::update_many()
            .col_expr(
                job_entity::Column::Status,
                Expr::value(JobStatus::Queued.to_string()),
            )
            .col_expr(
                job_entity::Column::LockToken,
                Expr::value(Option::<Uuid>::None),
            )
            .col_expr(
                job_entity::Column::LockExpiresAt,
                Expr::value(Option::<DateTime<FixedOffset>>::None),
            )
            .filter(job_entity::Column::Status.eq(JobStatus::Active.to_string()))
            .filter(
                Condition::any()
                    .add(job_entity::Column::LockExpiresAt.lte(Utc::now()))
                    .add(
                        Condition::all()
                            .add(job_entity::Column::LockExpiresAt.is_null())
                            .add(job_entity::Column::StartedAt.lte(threshold)),
                    ),
            )
            .exec(self.db.as_ref())
            .await?;

        Ok(result.rows_affected)
    }
}

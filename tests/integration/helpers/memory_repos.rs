// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use ingestrs::domain::models::job::{CrawlJob, JobStatus};
use ingestrs::domain::models::product::EnrichedProduct;
use ingestrs::domain::models::source::SourceTarget;
use ingestrs::domain::models::taxonomy::{TaxonomyEntity, TaxonomyKind};
use ingestrs::domain::repositories::job_repository::JobRepository;
use ingestrs::domain::repositories::product_repository::ProductRepository;
use ingestrs::domain::repositories::source_repository::SourceRepository;
use ingestrs::domain::repositories::taxonomy_repository::TaxonomyRepository;
use ingestrs::domain::repositories::RepositoryError;
use sea_orm::DbErr;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

/// 内存来源仓库
pub struct MemorySourceRepository {
    sources: Vec<SourceTarget>,
}

impl MemorySourceRepository {
    pub fn new(sources: Vec<SourceTarget>) -> Self {
        Self { sources }
    }
}

#[async_trait]
impl SourceRepository for MemorySourceRepository {
    async fn find_enabled(&self) -> Result<Vec<SourceTarget>, RepositoryError> {
        Ok(self
            .sources
            .iter()
            .filter(|s| s.enabled)
            .cloned()
            .collect())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<SourceTarget>, RepositoryError> {
        Ok(self.sources.iter().find(|s| s.slug == slug).cloned())
    }
}

/// 内存分类法仓库
///
/// 记录insert调用数，解析器的"每名称至多一次"属性据此断言
#[derive(Default)]
pub struct MemoryTaxonomyRepository {
    entries: Mutex<Vec<TaxonomyEntity>>,
    pub insert_calls: AtomicUsize,
    pub find_calls: AtomicUsize,
}

impl MemoryTaxonomyRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn names(&self, kind: TaxonomyKind) -> Vec<String> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| e.name.clone())
            .collect()
    }
}

#[async_trait]
impl TaxonomyRepository for MemoryTaxonomyRepository {
    async fn find_by_name(
        &self,
        kind: TaxonomyKind,
        name: &str,
    ) -> Result<Option<TaxonomyEntity>, RepositoryError> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.kind == kind && e.name == name)
            .cloned())
    }

    async fn insert(
        &self,
        kind: TaxonomyKind,
        name: &str,
    ) -> Result<TaxonomyEntity, RepositoryError> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        let mut entries = self.entries.lock().unwrap();
        if entries.iter().any(|e| e.kind == kind && e.name == name) {
            return Err(RepositoryError::AlreadyExists);
        }
        let entity = TaxonomyEntity {
            id: Uuid::new_v4(),
            kind,
            name: name.to_string(),
        };
        entries.push(entity.clone());
        Ok(entity)
    }

    async fn list_names(&self, kind: TaxonomyKind) -> Result<Vec<String>, RepositoryError> {
        Ok(self.names(kind))
    }
}

/// 内存产品仓库
///
/// 以 (source_id, link) 为键，可按链接注入写入失败
#[derive(Default)]
pub struct MemoryProductRepository {
    rows: Mutex<HashMap<(Uuid, String), EnrichedProduct>>,
    fail_links: HashSet<String>,
}

impl MemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定一批写入必然失败的链接
    pub fn failing_on(links: &[&str]) -> Self {
        Self {
            rows: Mutex::new(HashMap::new()),
            fail_links: links.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn saved(&self) -> Vec<EnrichedProduct> {
        self.rows.lock().unwrap().values().cloned().collect()
    }

    pub fn saved_by_link(&self, link: &str) -> Option<EnrichedProduct> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|((_, l), _)| l == link)
            .map(|(_, p)| p.clone())
    }
}

#[async_trait]
impl ProductRepository for MemoryProductRepository {
    async fn upsert(
        &self,
        source_id: Uuid,
        product: &EnrichedProduct,
    ) -> Result<Uuid, RepositoryError> {
        if self.fail_links.contains(&product.link) {
            return Err(RepositoryError::Database(DbErr::Custom(
                "injected write failure".to_string(),
            )));
        }
        self.rows
            .lock()
            .unwrap()
            .insert((source_id, product.link.clone()), product.clone());
        Ok(Uuid::new_v4())
    }
}

/// 内存任务仓库
///
/// 行为对齐数据库实现：acquire自增attempt_count并写锁字段
#[derive(Default)]
pub struct MemoryJobRepository {
    jobs: Mutex<Vec<CrawlJob>>,
}

impl MemoryJobRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Vec<CrawlJob> {
        self.jobs.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobRepository for MemoryJobRepository {
    async fn create(&self, job: &CrawlJob) -> Result<CrawlJob, RepositoryError> {
        self.jobs.lock().unwrap().push(job.clone());
        Ok(job.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CrawlJob>, RepositoryError> {
        Ok(self
            .jobs
            .lock()
            .unwrap()
            .iter()
            .find(|j| j.id == id)
            .cloned())
    }

    async fn update(&self, job: &CrawlJob) -> Result<CrawlJob, RepositoryError> {
        let mut jobs = self.jobs.lock().unwrap();
        let stored = jobs
            .iter_mut()
            .find(|j| j.id == job.id)
            .ok_or(RepositoryError::NotFound)?;
        *stored = job.clone();
        stored.updated_at = Utc::now().into();
        Ok(stored.clone())
    }

    async fn acquire_next(&self, worker_id: Uuid) -> Result<Option<CrawlJob>, RepositoryError> {
        let now = Utc::now();
        let mut jobs = self.jobs.lock().unwrap();
        let job = jobs.iter_mut().find(|j| {
            j.status == JobStatus::Queued
                && j.scheduled_at.map(|at| at <= now).unwrap_or(true)
        });

        if let Some(job) = job {
            job.status = JobStatus::Active;
            job.lock_token = Some(worker_id);
            job.lock_expires_at = Some((now + Duration::minutes(5)).into());
            job.started_at = Some(now.into());
            job.attempt_count += 1;
            return Ok(Some(job.clone()));
        }

        Ok(None)
    }

    async fn mark_completed(&self, id: Uuid) -> Result<(), RepositoryError> {
        let mut jobs = self.jobs.lock().unwrap();
        let job = jobs
            .iter_mut()
            .find(|j| j.id == id)
            .ok_or(RepositoryError::NotFound)?;
        job.status = JobStatus::Completed;
        job.completed_at = Some(Utc::now().into());
        job.lock_token = None;
        job.lock_expires_at = None;
        Ok(())
    }

    async fn mark_failed(&self, id: Uuid) -> Result<(), RepositoryError> {
        let mut jobs = self.jobs.lock().unwrap();
        let job = jobs
            .iter_mut()
            .find(|j| j.id == id)
            .ok_or(RepositoryError::NotFound)?;
        job.status = JobStatus::Failed;
        job.completed_at = Some(Utc::now().into());
        job.lock_token = None;
        job.lock_expires_at = None;
        Ok(())
    }

    async fn reset_stuck_jobs(&self, _timeout: Duration) -> Result<u64, RepositoryError> {
        let now = Utc::now();
        let mut reset = 0;
        for job in self.jobs.lock().unwrap().iter_mut() {
            if job.status == JobStatus::Active
                && job.lock_expires_at.map(|at| at <= now).unwrap_or(false)
            {
                job.status = JobStatus::Queued;
                job.lock_token = None;
                job.lock_expires_at = None;
                reset += 1;
            }
        }
        Ok(reset)
    }
}

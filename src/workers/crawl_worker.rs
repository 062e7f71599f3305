// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::bus::{result_topic, CorrelationBus};
use crate::crawler::{profiles, SiteCrawler};
use crate::domain::models::job::{CrawlJob, JobStatus};
use crate::domain::models::product::CrawlOutcome;
use crate::domain::repositories::job_repository::JobRepository;
use crate::domain::repositories::source_repository::SourceRepository;
use crate::domain::services::product_sink::ProductSink;
use crate::queue::JobQueue;
use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

/// 采集工作器
///
/// 从队列拉取任务，执行来源采集，把批次交给持久化汇，
/// 再把结果摘要发布到关联总线。
pub struct CrawlWorker<R>
where
    R: JobRepository + Send + Sync,
{
    repository: Arc<R>,
    sources: Arc<dyn SourceRepository>,
    crawler: Arc<SiteCrawler>,
    sink: Arc<ProductSink>,
    bus: Arc<CorrelationBus<CrawlOutcome>>,
    worker_id: Uuid,
}

impl<R> CrawlWorker<R>
where
    R: JobRepository + Send + Sync,
{
    /// 创建新的采集工作器实例
    pub fn new(
        repository: Arc<R>,
        sources: Arc<dyn SourceRepository>,
        crawler: Arc<SiteCrawler>,
        sink: Arc<ProductSink>,
        bus: Arc<CorrelationBus<CrawlOutcome>>,
    ) -> Self {
        Self {
            repository,
            sources,
            crawler,
            sink,
            bus,
            worker_id: Uuid::new_v4(),
        }
    }

    /// 运行采集工作器
    pub async fn run<Q>(&self, queue: Arc<Q>)
    where
        Q: JobQueue + Send + Sync,
    {
        info!("Crawl worker {} started", self.worker_id);

        loop {
            match self.process_next_job(queue.as_ref()).await {
                Ok(processed) => {
                    if !processed {
                        sleep(Duration::from_secs(1)).await;
                    }
                }
                Err(e) => {
                    error!("Error processing job: {}", e);
                    sleep(Duration::from_secs(1)).await;
                }
            }
        }
    }

    async fn process_next_job<Q>(&self, queue: &Q) -> Result<bool>
    where
        Q: JobQueue,
    {
        let job_opt = queue.dequeue(self.worker_id).await?;

        if let Some(job) = job_opt {
            self.process_job(queue, job).await?;
            return Ok(true);
        }

        Ok(false)
    }

    #[instrument(skip(self, queue, job), fields(job_id = %job.id, source = %job.source_slug))]
    async fn process_job<Q>(&self, queue: &Q, mut job: CrawlJob) -> Result<()>
    where
        Q: JobQueue,
    {
        info!("Processing crawl job");

        let source = match self.sources.find_by_slug(&job.source_slug).await {
            Ok(Some(source)) => source,
            Ok(None) => {
                // The source row is gone; retrying cannot help.
                warn!("Source no longer exists, completing job as no-op");
                queue.complete(job.id).await?;
                return Ok(());
            }
            Err(e) => {
                error!("Failed to load source: {}", e);
                self.handle_failure(&mut job).await?;
                return Ok(());
            }
        };

        let Some(profile) = profiles::for_source(&source.slug) else {
            // No selector profile registered: a no-op success, not a failure.
            warn!("No selector profile registered for source, nothing to crawl");
            queue.complete(job.id).await?;
            return Ok(());
        };

        match self.crawler.crawl(&source, &profile).await {
            Ok(batch) => {
                let products_found = batch.product_count();
                let report = self.sink.save_batch(&batch).await;

                let outcome = CrawlOutcome {
                    source_slug: source.slug.clone(),
                    products_found,
                    saved: report.saved,
                    failed: report.failed,
                };
                let delivered = self.bus.publish(&result_topic(&source.slug), outcome);

                info!(
                    products = products_found,
                    saved = report.saved,
                    failed = report.failed,
                    delivered,
                    "Crawl job finished"
                );
                queue.complete(job.id).await?;
            }
            Err(e) => {
                error!("Crawl failed: {}", e);
                self.handle_failure(&mut job).await?;
            }
        }

        Ok(())
    }

    /// 失败处理
    ///
    /// 未达重试上限的任务按指数退避退回队列，否则标记终态失败。
    /// attempt_count在acquire_next时已自增。
    async fn handle_failure(&self, job: &mut CrawlJob) -> Result<()> {
        if job.attempt_count >= job.max_retries {
            warn!("Job failed after {} attempts", job.attempt_count);
            self.repository.mark_failed(job.id).await?;
        } else {
            let delay_secs = 2u64.pow(job.attempt_count as u32);
            let next_retry = Utc::now() + chrono::Duration::seconds(delay_secs as i64);

            job.status = JobStatus::Queued;
            job.scheduled_at = Some(next_retry.into());
            job.lock_token = None;
            job.lock_expires_at = None;
            job.started_at = None;

            self.repository.update(job).await?;
            info!(
                "Scheduled retry {}/{} for job {} in {}s",
                job.attempt_count, job.max_retries, job.id, delay_secs
            );
        }

        Ok(())
    }
}

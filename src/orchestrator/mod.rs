// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::bus::{result_topic, CorrelationBus};
use crate::domain::models::job::CrawlJob;
use crate::domain::models::product::CrawlOutcome;
use crate::domain::repositories::source_repository::SourceRepository;
use crate::queue::JobQueue;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::timeout;
use tracing::{info, warn};

/// 一轮采集周期的汇总
#[derive(Debug, Default)]
pub struct CycleSummary {
    /// 入队的任务数
    pub dispatched: usize,
    /// 在超时之内拿到结果的来源
    pub outcomes: Vec<CrawlOutcome>,
    /// 等待结果超时的来源slug
    pub timed_out: Vec<String>,
}

/// 采集编排器
///
/// 周期性枚举启用的来源，为每个来源入队一个采集任务，并在
/// 关联总线上等待结果摘要。持久化在worker侧完成，这里的等待
/// 只用于观测：超时记日志，绝不致命。
pub struct Orchestrator<Q>
where
    Q: JobQueue,
{
    sources: Arc<dyn SourceRepository>,
    queue: Arc<Q>,
    bus: Arc<CorrelationBus<CrawlOutcome>>,
    result_timeout: Duration,
    max_retries: i32,
}

impl<Q> Orchestrator<Q>
where
    Q: JobQueue,
{
    pub fn new(
        sources: Arc<dyn SourceRepository>,
        queue: Arc<Q>,
        bus: Arc<CorrelationBus<CrawlOutcome>>,
        result_timeout: Duration,
        max_retries: i32,
    ) -> Self {
        Self {
            sources,
            queue,
            bus,
            result_timeout,
            max_retries,
        }
    }

    /// 执行一轮采集周期
    ///
    /// 先订阅再入队，避免worker抢在订阅前发布导致结果丢失。
    pub async fn run_cycle(&self) -> CycleSummary {
        let mut summary = CycleSummary::default();

        let sources = match self.sources.find_enabled().await {
            Ok(sources) => sources,
            Err(e) => {
                warn!("Failed to enumerate enabled sources: {}", e);
                return summary;
            }
        };

        if sources.is_empty() {
            info!("No enabled sources, skipping cycle");
            return summary;
        }

        let mut waiters: Vec<(String, oneshot::Receiver<CrawlOutcome>)> = Vec::new();
        for source in &sources {
            let rx = self.bus.subscribe(&result_topic(&source.slug));

            let job = CrawlJob::new(&source.slug, self.max_retries);
            match self.queue.enqueue(job).await {
                Ok(_) => {
                    summary.dispatched += 1;
                    waiters.push((source.slug.clone(), rx));
                }
                Err(e) => {
                    warn!(source = %source.slug, "Failed to enqueue crawl job: {}", e);
                }
            }
        }

        info!(dispatched = summary.dispatched, "Crawl cycle dispatched");

        for (slug, rx) in waiters {
            match timeout(self.result_timeout, rx).await {
                Ok(Ok(outcome)) => {
                    info!(
                        source = %slug,
                        products = outcome.products_found,
                        saved = outcome.saved,
                        failed = outcome.failed,
                        "Crawl result received"
                    );
                    summary.outcomes.push(outcome);
                }
                Ok(Err(_)) => {
                    // sender side dropped without publishing
                    warn!(source = %slug, "Result channel closed without a result");
                    summary.timed_out.push(slug);
                }
                Err(_) => {
                    warn!(source = %slug, "Timed out waiting for crawl result");
                    summary.timed_out.push(slug);
                }
            }
        }

        info!(
            received = summary.outcomes.len(),
            timed_out = summary.timed_out.len(),
            "Crawl cycle finished"
        );
        summary
    }
}

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::bus::CorrelationBus;
use crate::crawler::SiteCrawler;
use crate::domain::models::product::CrawlOutcome;
use crate::domain::repositories::job_repository::JobRepository;
use crate::domain::repositories::source_repository::SourceRepository;
use crate::domain::services::product_sink::ProductSink;
use crate::queue::JobQueue;
use crate::workers::crawl_worker::CrawlWorker;
use std::sync::Arc;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// 工作管理器
///
/// 按配置数量启动采集工作器，工作器数量即并发采集上限
pub struct WorkerManager<Q, R>
where
    Q: JobQueue + 'static,
    R: JobRepository + Send + Sync + 'static,
{
    queue: Arc<Q>,
    repository: Arc<R>,
    sources: Arc<dyn SourceRepository>,
    crawler: Arc<SiteCrawler>,
    sink: Arc<ProductSink>,
    bus: Arc<CorrelationBus<CrawlOutcome>>,
    handles: Vec<JoinHandle<()>>,
}

impl<Q, R> WorkerManager<Q, R>
where
    Q: JobQueue + Send + Sync,
    R: JobRepository + Send + Sync,
{
    pub fn new(
        queue: Arc<Q>,
        repository: Arc<R>,
        sources: Arc<dyn SourceRepository>,
        crawler: Arc<SiteCrawler>,
        sink: Arc<ProductSink>,
        bus: Arc<CorrelationBus<CrawlOutcome>>,
    ) -> Self {
        Self {
            queue,
            repository,
            sources,
            crawler,
            sink,
            bus,
            handles: Vec::new(),
        }
    }

    /// 启动工作进程
    ///
    /// # 参数
    ///
    /// * `count` - 要启动的工作进程数量
    pub async fn start_workers(&mut self, count: usize) {
        for _ in 0..count {
            let worker = CrawlWorker::new(
                self.repository.clone(),
                self.sources.clone(),
                self.crawler.clone(),
                self.sink.clone(),
                self.bus.clone(),
            );

            let queue = self.queue.clone();
            let handle = tokio::spawn(async move {
                worker.run(queue).await;
            });
            self.handles.push(handle);
        }

        info!("Started {} crawl workers", count);
    }

    /// 等待关闭信号并关闭工作进程
    pub async fn wait_for_shutdown(&mut self) {
        match signal::ctrl_c().await {
            Ok(()) => info!("Shutdown signal received"),
            Err(err) => error!("Unable to listen for shutdown signal: {}", err),
        }

        info!("Shutting down workers...");
        for handle in &self.handles {
            handle.abort();
        }

        info!("Workers shut down successfully");
    }
}

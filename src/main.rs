// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use ingestrs::bus::CorrelationBus;
use ingestrs::config::settings::Settings;
use ingestrs::crawler::{CrawlSettings, SiteCrawler};
use ingestrs::domain::models::product::CrawlOutcome;
use ingestrs::domain::services::classifier::Classifier;
use ingestrs::domain::services::product_sink::ProductSink;
use ingestrs::domain::services::taxonomy_resolver::TaxonomyResolver;
use ingestrs::engines::chromium::ChromiumEngine;
use ingestrs::engines::traits::BrowserEngine;
use ingestrs::infrastructure::database::connection;
use ingestrs::infrastructure::repositories::{
    JobRepositoryImpl, ProductRepositoryImpl, SourceRepositoryImpl, TaxonomyRepositoryImpl,
};
use ingestrs::infrastructure::services::HttpClassifier;
use ingestrs::orchestrator::Orchestrator;
use ingestrs::queue::{JobScheduler, PostgresJobQueue};
use ingestrs::utils::telemetry;
use ingestrs::workers::WorkerManager;
use migration::{Migrator, MigratorTrait};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动采集周期
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting ingestrs...");

    // 2. Load configuration
    let settings = Arc::new(Settings::new()?);
    info!("Configuration loaded");

    // 3. Connect to database
    let db = connection::create_pool(&settings.database).await?;
    let db = Arc::new(db);
    info!("Database connection established");

    // Run database migrations
    info!("Running database migrations...");
    Migrator::up(db.as_ref(), None).await?;
    info!("Database migrations applied");

    // 4. Initialize repositories and queue
    let source_repo = Arc::new(SourceRepositoryImpl::new(db.clone()));
    let taxonomy_repo = Arc::new(TaxonomyRepositoryImpl::new(db.clone()));
    let product_repo = Arc::new(ProductRepositoryImpl::new(db.clone()));
    let job_repo = Arc::new(JobRepositoryImpl::new(db.clone()));
    let queue = Arc::new(PostgresJobQueue::new(job_repo.clone()));

    // 5. Initialize crawler collaborators
    let engine: Arc<dyn BrowserEngine> = Arc::new(ChromiumEngine::new());
    let resolver = Arc::new(TaxonomyResolver::new(taxonomy_repo.clone()));
    let classifier: Option<Arc<dyn Classifier>> = if settings.classifier.enabled {
        let client = HttpClassifier::new(&settings.classifier)?;
        info!("External classifier enabled at {}", settings.classifier.url);
        Some(Arc::new(client))
    } else {
        None
    };
    let crawler = Arc::new(SiteCrawler::new(
        engine,
        resolver,
        classifier,
        CrawlSettings::from(&settings.crawler),
    ));
    let sink = Arc::new(ProductSink::new(product_repo.clone()));
    let bus: Arc<CorrelationBus<CrawlOutcome>> = Arc::new(CorrelationBus::new());

    // 6. Start workers and queue maintenance
    let mut worker_manager = WorkerManager::new(
        queue.clone(),
        job_repo.clone(),
        source_repo.clone(),
        crawler,
        sink,
        bus.clone(),
    );
    worker_manager.start_workers(settings.crawler.worker_count).await;

    let scheduler = JobScheduler::new(job_repo.clone(), settings.queue.stuck_timeout_minutes);
    let scheduler_handle = scheduler.start();

    // 7. Run crawl cycles until shutdown
    let orchestrator = Orchestrator::new(
        source_repo.clone(),
        queue.clone(),
        bus.clone(),
        Duration::from_secs(settings.crawler.result_timeout),
        settings.queue.max_retries,
    );
    let cycle_interval = Duration::from_secs(settings.crawler.cycle_interval);
    let cycle_handle = tokio::spawn(async move {
        let mut interval = tokio::time::interval(cycle_interval);
        loop {
            interval.tick().await;
            orchestrator.run_cycle().await;
        }
    });

    worker_manager.wait_for_shutdown().await;
    scheduler_handle.abort();
    cycle_handle.abort();

    Ok(())
}

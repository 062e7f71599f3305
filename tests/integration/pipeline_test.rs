// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::helpers::{
    self, MemoryJobRepository, MemoryProductRepository, MemorySourceRepository,
    MemoryTaxonomyRepository, ScriptedBrowser,
};
use ingestrs::bus::CorrelationBus;
use ingestrs::crawler::{CrawlSettings, SiteCrawler};
use ingestrs::domain::models::job::JobStatus;
use ingestrs::domain::models::product::CrawlOutcome;
use ingestrs::domain::models::source::SourceTarget;
use ingestrs::domain::services::product_sink::ProductSink;
use ingestrs::domain::services::taxonomy_resolver::TaxonomyResolver;
use ingestrs::orchestrator::Orchestrator;
use ingestrs::queue::PostgresJobQueue;
use ingestrs::workers::CrawlWorker;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;

const BASE: &str = "https://techmart.example";

fn url(path: &str) -> String {
    format!("{}{}", BASE, path)
}

struct Stack {
    jobs: Arc<MemoryJobRepository>,
    queue: Arc<PostgresJobQueue<MemoryJobRepository>>,
    sources: Arc<MemorySourceRepository>,
    bus: Arc<CorrelationBus<CrawlOutcome>>,
    worker: JoinHandle<()>,
}

impl Stack {
    /// 组装内存版的完整管线并启动一个worker
    fn spawn(
        engine: ScriptedBrowser,
        source_list: Vec<SourceTarget>,
        products: Arc<MemoryProductRepository>,
    ) -> Self {
        let jobs = Arc::new(MemoryJobRepository::new());
        let queue = Arc::new(PostgresJobQueue::new(jobs.clone()));
        let sources = Arc::new(MemorySourceRepository::new(source_list));
        let bus: Arc<CorrelationBus<CrawlOutcome>> = Arc::new(CorrelationBus::new());

        let resolver = Arc::new(TaxonomyResolver::new(Arc::new(
            MemoryTaxonomyRepository::new(),
        )));
        let crawler = Arc::new(SiteCrawler::new(
            Arc::new(engine),
            resolver,
            None,
            CrawlSettings {
                navigation_timeout: Duration::from_secs(5),
                marker_timeout: Duration::from_secs(1),
                detail_timeout: Duration::from_secs(5),
            },
        ));
        let sink = Arc::new(ProductSink::new(products));

        let worker = CrawlWorker::new(
            jobs.clone(),
            sources.clone(),
            crawler,
            sink,
            bus.clone(),
        );
        let worker_queue = queue.clone();
        let worker = tokio::spawn(async move {
            worker.run(worker_queue).await;
        });

        Self {
            jobs,
            queue,
            sources,
            bus,
            worker,
        }
    }

    fn snapshot_statuses(&self) -> Vec<JobStatus> {
        self.jobs.snapshot().iter().map(|j| j.status).collect()
    }

    fn orchestrator(&self, result_timeout: Duration) -> Orchestrator<PostgresJobQueue<MemoryJobRepository>> {
        Orchestrator::new(
            self.sources.clone(),
            self.queue.clone(),
            self.bus.clone(),
            result_timeout,
            3,
        )
    }
}

impl Drop for Stack {
    fn drop(&mut self) {
        self.worker.abort();
    }
}

async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        sleep(Duration::from_millis(25)).await;
    }
    panic!("condition not met within 5s");
}

#[tokio::test]
async fn test_cycle_dispatches_crawls_and_persists_products() {
    let mut pages = HashMap::new();
    pages.insert(
        url("/tools"),
        helpers::techmart_listing(
            "Power Tools",
            &[
                helpers::techmart_card("/p/drill", "Cordless Drill", Some("Sale")),
                helpers::techmart_card("/p/saw", "Circular Saw", None),
            ],
            None,
        ),
    );
    pages.insert(
        url("/p/drill"),
        helpers::techmart_detail("A compact drill.", "BoschCraft"),
    );

    let products = Arc::new(MemoryProductRepository::new());
    let source = helpers::source("techmart", BASE, vec![url("/tools")], vec![]);
    let stack = Stack::spawn(ScriptedBrowser::new(pages), vec![source], products.clone());

    let summary = stack
        .orchestrator(Duration::from_secs(10))
        .run_cycle()
        .await;

    assert_eq!(summary.dispatched, 1);
    assert_eq!(summary.outcomes.len(), 1);
    assert!(summary.timed_out.is_empty());

    // only the discounted card made it through the pipeline
    let outcome = &summary.outcomes[0];
    assert_eq!(outcome.source_slug, "techmart");
    assert_eq!(outcome.products_found, 1);
    assert_eq!(outcome.saved, 1);
    assert_eq!(outcome.failed, 0);

    let saved = products.saved_by_link(&url("/p/drill")).unwrap();
    assert_eq!(saved.name, "Cordless Drill");
    assert_eq!(saved.description, "A compact drill.");
    assert_eq!(saved.brand_name, "BoschCraft");
    assert_eq!(products.saved().len(), 1);

    // the job reached its terminal state
    wait_until(|| {
        stack
            .snapshot_statuses()
            .iter()
            .all(|s| *s == JobStatus::Completed)
    })
    .await;
}

#[tokio::test]
async fn test_source_without_profile_is_noop_success() {
    let products = Arc::new(MemoryProductRepository::new());
    let source = helpers::source("mysteryshop", "https://mysteryshop.example", vec![], vec![]);
    let stack = Stack::spawn(
        ScriptedBrowser::new(HashMap::new()),
        vec![source],
        products.clone(),
    );

    let summary = stack
        .orchestrator(Duration::from_millis(300))
        .run_cycle()
        .await;

    // nothing is published for a no-op job, so the orchestrator times out,
    // but the job itself completes successfully
    assert_eq!(summary.dispatched, 1);
    assert_eq!(summary.timed_out, vec!["mysteryshop".to_string()]);

    wait_until(|| {
        stack
            .snapshot_statuses()
            .iter()
            .all(|s| *s == JobStatus::Completed)
    })
    .await;
    assert!(products.saved().is_empty());
}

#[tokio::test]
async fn test_launch_failure_requeues_with_backoff_then_fails() {
    let products = Arc::new(MemoryProductRepository::new());
    let source = helpers::source("techmart", BASE, vec![url("/tools")], vec![]);
    let stack = Stack::spawn(
        ScriptedBrowser::failing_launch(),
        vec![source],
        products.clone(),
    );

    // max_retries = 1: the first failed attempt is terminal
    let job = ingestrs::domain::models::job::CrawlJob::new("techmart", 1);
    let job_id = job.id;
    use ingestrs::queue::JobQueue;
    stack.queue.enqueue(job).await.unwrap();

    wait_until(|| {
        stack
            .jobs
            .snapshot()
            .iter()
            .any(|j| j.id == job_id && j.status == JobStatus::Failed)
    })
    .await;

    let failed = stack
        .jobs
        .snapshot()
        .into_iter()
        .find(|j| j.id == job_id)
        .unwrap();
    assert_eq!(failed.attempt_count, 1);
    assert!(failed.completed_at.is_some());
    assert!(products.saved().is_empty());
}

#[tokio::test]
async fn test_persistence_failure_skips_only_that_product() {
    let mut pages = HashMap::new();
    pages.insert(
        url("/tools"),
        helpers::techmart_listing(
            "Power Tools",
            &[
                helpers::techmart_card("/p/good", "Good Item", Some("Sale")),
                helpers::techmart_card("/p/bad", "Bad Item", Some("Sale")),
            ],
            None,
        ),
    );

    let bad_link = url("/p/bad");
    let products = Arc::new(MemoryProductRepository::failing_on(&[bad_link.as_str()]));
    let source = helpers::source("techmart", BASE, vec![url("/tools")], vec![]);
    let stack = Stack::spawn(ScriptedBrowser::new(pages), vec![source], products.clone());

    let summary = stack
        .orchestrator(Duration::from_secs(10))
        .run_cycle()
        .await;

    let outcome = &summary.outcomes[0];
    assert_eq!(outcome.products_found, 2);
    assert_eq!(outcome.saved, 1);
    assert_eq!(outcome.failed, 1);

    assert!(products.saved_by_link(&url("/p/good")).is_some());
    assert!(products.saved_by_link(&bad_link).is_none());

    // a partial persistence failure still completes the job
    wait_until(|| {
        stack
            .snapshot_statuses()
            .iter()
            .all(|s| *s == JobStatus::Completed)
    })
    .await;
}

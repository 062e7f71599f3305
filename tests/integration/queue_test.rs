// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::helpers::MemoryJobRepository;
use chrono::{Duration, Utc};
use ingestrs::domain::models::job::{CrawlJob, JobStatus};
use ingestrs::domain::repositories::job_repository::JobRepository;
use ingestrs::queue::{JobQueue, PostgresJobQueue};
use std::sync::Arc;
use uuid::Uuid;

#[tokio::test]
async fn test_dequeue_locks_job_for_one_worker() {
    let repo = Arc::new(MemoryJobRepository::new());
    let queue = PostgresJobQueue::new(repo.clone());
    let worker_id = Uuid::new_v4();

    queue.enqueue(CrawlJob::new("techmart", 3)).await.unwrap();

    let job = queue.dequeue(worker_id).await.unwrap().unwrap();
    assert_eq!(job.status, JobStatus::Active);
    assert_eq!(job.lock_token, Some(worker_id));
    assert_eq!(job.attempt_count, 1);
    assert!(job.lock_expires_at.is_some());

    // the job is held; a second worker sees an empty queue
    let other = queue.dequeue(Uuid::new_v4()).await.unwrap();
    assert!(other.is_none());
}

#[tokio::test]
async fn test_complete_and_fail_are_terminal() {
    let repo = Arc::new(MemoryJobRepository::new());
    let queue = PostgresJobQueue::new(repo.clone());

    let first = queue.enqueue(CrawlJob::new("techmart", 3)).await.unwrap();
    let second = queue.enqueue(CrawlJob::new("homeplus", 3)).await.unwrap();

    queue.dequeue(Uuid::new_v4()).await.unwrap().unwrap();
    queue.complete(first.id).await.unwrap();
    queue.dequeue(Uuid::new_v4()).await.unwrap().unwrap();
    queue.fail(second.id).await.unwrap();

    let jobs = repo.snapshot();
    let first = jobs.iter().find(|j| j.id == first.id).unwrap();
    let second = jobs.iter().find(|j| j.id == second.id).unwrap();
    assert_eq!(first.status, JobStatus::Completed);
    assert!(first.completed_at.is_some());
    assert!(first.lock_token.is_none());
    assert_eq!(second.status, JobStatus::Failed);

    // terminal jobs never come back out of the queue
    assert!(queue.dequeue(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_future_scheduled_job_is_not_dequeued() {
    let repo = Arc::new(MemoryJobRepository::new());
    let queue = PostgresJobQueue::new(repo.clone());

    let mut job = CrawlJob::new("techmart", 3);
    job.scheduled_at = Some((Utc::now() + Duration::minutes(10)).into());
    queue.enqueue(job).await.unwrap();

    assert!(queue.dequeue(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_reset_stuck_jobs_requeues_expired_locks() {
    let repo = Arc::new(MemoryJobRepository::new());
    let queue = PostgresJobQueue::new(repo.clone());

    queue.enqueue(CrawlJob::new("techmart", 3)).await.unwrap();
    let mut job = queue.dequeue(Uuid::new_v4()).await.unwrap().unwrap();

    // simulate a worker that died holding the lock
    job.lock_expires_at = Some((Utc::now() - Duration::minutes(1)).into());
    repo.update(&job).await.unwrap();

    let reset = repo.reset_stuck_jobs(Duration::minutes(30)).await.unwrap();
    assert_eq!(reset, 1);

    let requeued = queue.dequeue(Uuid::new_v4()).await.unwrap().unwrap();
    assert_eq!(requeued.id, job.id);
    assert_eq!(requeued.attempt_count, 2);
}

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::repositories::job_repository::JobRepository;
use chrono::Duration;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration as TokioDuration};
use tracing::{error, info};

/// 任务调度器
///
/// 队列的后台维护：周期性把锁过期的Active任务退回队列。
/// 真正的任务分发由worker通过acquire_next主动拉取。
pub struct JobScheduler<R: JobRepository + 'static> {
    /// 任务仓库
    repository: Arc<R>,
    /// 卡住任务判定超时
    stuck_timeout: Duration,
}

impl<R: JobRepository + 'static> JobScheduler<R> {
    /// 创建新的任务调度器实例
    pub fn new(repository: Arc<R>, stuck_timeout_minutes: i64) -> Self {
        Self {
            repository,
            stuck_timeout: Duration::minutes(stuck_timeout_minutes),
        }
    }

    /// 启动调度器后台任务
    pub fn start(&self) -> JoinHandle<()> {
        let repository = self.repository.clone();
        let stuck_timeout = self.stuck_timeout;

        tokio::spawn(async move {
            let mut interval = interval(TokioDuration::from_secs(60));

            loop {
                interval.tick().await;

                match repository.reset_stuck_jobs(stuck_timeout).await {
                    Ok(count) => {
                        if count > 0 {
                            info!("Reset {} stuck jobs", count);
                        }
                    }
                    Err(e) => {
                        error!("Failed to reset stuck jobs: {}", e);
                    }
                }
            }
        })
    }
}

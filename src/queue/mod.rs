// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 任务队列模块
///
/// 基于数据库的持久化任务队列与维护调度器
pub mod job_queue;
pub mod scheduler;

pub use job_queue::{JobQueue, PostgresJobQueue, QueueError};
pub use scheduler::JobScheduler;

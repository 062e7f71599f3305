// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作器模块
///
/// 从持久化队列拉取采集任务并执行的后台工作器
pub mod crawl_worker;
pub mod manager;

pub use crawl_worker::CrawlWorker;
pub use manager::WorkerManager;

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// 应用程序配置设置
///
/// 包含数据库、采集器、任务队列和分类服务等所有配置项
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// 数据库配置
    pub database: DatabaseSettings,
    /// 采集器配置
    pub crawler: CrawlerSettings,
    /// 任务队列配置
    pub queue: QueueSettings,
    /// 分类服务配置
    pub classifier: ClassifierSettings,
}

/// 数据库配置设置
#[derive(Debug, Deserialize)]
pub struct DatabaseSettings {
    /// 数据库连接URL
    pub url: String,
    /// 最大连接数
    pub max_connections: Option<u32>,
    /// 最小连接数
    pub min_connections: Option<u32>,
    /// 连接超时时间（秒）
    pub connect_timeout: Option<u64>,
    /// 空闲连接超时时间（秒）
    pub idle_timeout: Option<u64>,
}

/// 采集器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerSettings {
    /// 工作器数量（并发采集上限）
    pub worker_count: usize,
    /// 页面导航超时时间（秒）
    pub navigation_timeout: u64,
    /// 列表容器等待超时时间（秒）
    pub marker_timeout: u64,
    /// 详情页导航超时时间（秒）
    pub detail_timeout: u64,
    /// 单来源结果等待超时时间（秒），由编排器施加
    pub result_timeout: u64,
    /// 采集周期间隔（秒）
    pub cycle_interval: u64,
}

/// 任务队列配置设置
#[derive(Debug, Deserialize)]
pub struct QueueSettings {
    /// 任务最大重试次数
    pub max_retries: i32,
    /// 卡住任务的锁超时时间（分钟）
    pub stuck_timeout_minutes: i64,
}

/// 分类服务配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierSettings {
    /// 是否启用外部分类服务
    pub enabled: bool,
    /// 分类服务地址
    pub url: String,
    /// 请求超时时间（秒）
    pub timeout: u64,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从配置文件和环境变量加载配置，支持默认值
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            // Default DB pool settings
            .set_default("database.max_connections", 50)?
            .set_default("database.min_connections", 5)?
            .set_default("database.connect_timeout", 10)?
            .set_default("database.idle_timeout", 300)?
            // Default crawler settings
            .set_default("crawler.worker_count", 4)?
            .set_default("crawler.navigation_timeout", 30)?
            .set_default("crawler.marker_timeout", 5)?
            .set_default("crawler.detail_timeout", 20)?
            .set_default("crawler.result_timeout", 600)?
            .set_default("crawler.cycle_interval", 3600)?
            // Default queue settings
            .set_default("queue.max_retries", 3)?
            .set_default("queue.stuck_timeout_minutes", 30)?
            // Default classifier settings
            .set_default("classifier.enabled", false)?
            .set_default("classifier.url", "http://localhost:8500/classify")?
            .set_default("classifier.timeout", 15)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("INGESTRS").separator("__"));

        builder.build()?.try_deserialize()
    }
}

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// 采集任务实体
///
/// 表示持久化队列中一次待执行的来源采集。任务只携带来源slug，
/// 从不携带采集结果；结果经关联总线投递。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlJob {
    /// 任务唯一标识符
    pub id: Uuid,
    /// 目标来源slug
    pub source_slug: String,
    /// 任务状态
    pub status: JobStatus,
    /// 已尝试次数
    pub attempt_count: i32,
    /// 最大重试次数
    pub max_retries: i32,
    /// 计划执行时间，用于失败退避重排
    pub scheduled_at: Option<DateTime<FixedOffset>>,
    /// 锁定令牌，worker获取任务时写入
    pub lock_token: Option<Uuid>,
    /// 锁定过期时间，超时后任务可被其他worker重新获取
    pub lock_expires_at: Option<DateTime<FixedOffset>>,
    /// 开始执行时间
    pub started_at: Option<DateTime<FixedOffset>>,
    /// 完成时间
    pub completed_at: Option<DateTime<FixedOffset>>,
    /// 创建时间
    pub created_at: DateTime<FixedOffset>,
    /// 更新时间
    pub updated_at: DateTime<FixedOffset>,
}

impl CrawlJob {
    /// 为指定来源创建一个待执行任务
    pub fn new(source_slug: &str, max_retries: i32) -> Self {
        let now: DateTime<FixedOffset> = Utc::now().into();
        Self {
            id: Uuid::new_v4(),
            source_slug: source_slug.to_string(),
            status: JobStatus::Queued,
            attempt_count: 0,
            max_retries,
            scheduled_at: None,
            lock_token: None,
            lock_expires_at: None,
            started_at: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// 任务状态枚举
///
/// Queued -> Active -> Completed | Failed
/// 失败且未达重试上限的任务退回 Queued 并带退避时间
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// 排队等待执行
    #[default]
    Queued,
    /// 已被某个worker独占执行
    Active,
    /// 执行成功
    Completed,
    /// 重试耗尽，终态失败
    Failed,
    /// 已取消
    Cancelled,
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            JobStatus::Queued => write!(f, "queued"),
            JobStatus::Active => write!(f, "active"),
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Failed => write!(f, "failed"),
            JobStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl FromStr for JobStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "queued" => Ok(JobStatus::Queued),
            "active" => Ok(JobStatus::Active),
            "completed" => Ok(JobStatus::Completed),
            "failed" => Ok(JobStatus::Failed),
            "cancelled" => Ok(JobStatus::Cancelled),
            _ => Err(()),
        }
    }
}

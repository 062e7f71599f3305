// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::DbErr;
use thiserror::Error;

/// 仓库模块
///
/// 定义数据访问接口
pub mod job_repository;
pub mod product_repository;
pub mod source_repository;
pub mod taxonomy_repository;

/// 仓库错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    /// 记录未找到
    #[error("Record not found")]
    NotFound,
    /// 唯一约束冲突，并发 find-or-create 的预期分支
    #[error("Record already exists")]
    AlreadyExists,
}

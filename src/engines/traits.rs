// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// 引擎错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    /// 浏览器启动失败，对任务而言是致命错误
    #[error("Browser launch failed: {0}")]
    LaunchFailed(String),

    /// 页面导航失败
    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    /// 等待选择器超时
    #[error("Timed out waiting for selector: {0}")]
    SelectorTimeout(String),

    /// 操作超时
    #[error("Operation timed out")]
    Timeout,

    /// 其他错误
    #[error("Engine error: {0}")]
    Other(String),
}

/// 浏览器引擎特质
///
/// 每次采集调用launch一个会话。浏览器进程昂贵，
/// 会话必须在调用结束时被恰好关闭一次，成功失败路径都不例外。
#[async_trait]
pub trait BrowserEngine: Send + Sync {
    /// 启动一个新的浏览器会话
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, EngineError>;
}

/// 浏览器会话特质
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// 打开一个新页面
    async fn open_page(&self) -> Result<Box<dyn PageHandle>, EngineError>;

    /// 关闭会话并释放浏览器进程
    async fn close(&mut self) -> Result<(), EngineError>;
}

/// 页面句柄特质
///
/// 提取侧只依赖渲染后的HTML：导航、等待列表容器、取内容、关闭。
#[async_trait]
pub trait PageHandle: Send + Sync {
    /// 导航到URL，带超时
    async fn goto(&self, url: &str, timeout: Duration) -> Result<(), EngineError>;

    /// 等待选择器出现，带超时；超时按"没有更多页面"处理而非致命错误
    async fn wait_for_selector(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), EngineError>;

    /// 获取渲染后的页面HTML
    async fn content(&self) -> Result<String, EngineError>;

    /// 关闭页面
    async fn close(&mut self) -> Result<(), EngineError>;
}

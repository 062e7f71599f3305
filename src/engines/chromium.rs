// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::engines::traits::{BrowserEngine, BrowserSession, EngineError, PageHandle};
use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Chromium引擎
///
/// 基于chromiumoxide的浏览器自动化实现。与常驻浏览器不同，
/// 每次launch产生一个独立会话，由调用方在采集结束时关闭，
/// 避免浏览器进程跨任务泄漏。
pub struct ChromiumEngine {
    /// 远程调试地址，设置后connect而非launch本地进程
    remote_url: Option<String>,
}

impl ChromiumEngine {
    pub fn new() -> Self {
        Self {
            remote_url: std::env::var("CHROMIUM_REMOTE_DEBUGGING_URL").ok(),
        }
    }
}

impl Default for ChromiumEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BrowserEngine for ChromiumEngine {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, EngineError> {
        let (browser, mut handler) = if let Some(ref url) = self.remote_url {
            debug!("Connecting to remote Chrome instance at: {}", url);
            Browser::connect(url)
                .await
                .map_err(|e| EngineError::LaunchFailed(e.to_string()))?
        } else {
            let config = BrowserConfig::builder()
                .no_sandbox()
                .arg("--disable-gpu")
                .arg("--disable-dev-shm-usage")
                .request_timeout(Duration::from_secs(30))
                .build()
                .map_err(EngineError::LaunchFailed)?;

            Browser::launch(config)
                .await
                .map_err(|e| EngineError::LaunchFailed(e.to_string()))?
        };

        // Drive browser events until the session ends
        let event_loop = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        Ok(Box::new(ChromiumSession {
            browser: Some(browser),
            event_loop: Some(event_loop),
        }))
    }
}

/// Chromium会话
pub struct ChromiumSession {
    browser: Option<Browser>,
    event_loop: Option<JoinHandle<()>>,
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn open_page(&self) -> Result<Box<dyn PageHandle>, EngineError> {
        let browser = self
            .browser
            .as_ref()
            .ok_or_else(|| EngineError::Other("Session already closed".to_string()))?;

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| EngineError::Other(e.to_string()))?;

        Ok(Box::new(ChromiumPage { page: Some(page) }))
    }

    async fn close(&mut self) -> Result<(), EngineError> {
        if let Some(mut browser) = self.browser.take() {
            if let Err(e) = browser.close().await {
                warn!("Browser close returned error: {}", e);
            }
            let _ = browser.wait().await;
        }
        if let Some(handle) = self.event_loop.take() {
            handle.abort();
        }
        Ok(())
    }
}

/// Chromium页面句柄
pub struct ChromiumPage {
    page: Option<Page>,
}

impl ChromiumPage {
    fn page(&self) -> Result<&Page, EngineError> {
        self.page
            .as_ref()
            .ok_or_else(|| EngineError::Other("Page already closed".to_string()))
    }
}

#[async_trait]
impl PageHandle for ChromiumPage {
    async fn goto(&self, url: &str, timeout: Duration) -> Result<(), EngineError> {
        let page = self.page()?;
        tokio::time::timeout(timeout, page.goto(url))
            .await
            .map_err(|_| EngineError::Timeout)?
            .map_err(|e| EngineError::NavigationFailed(e.to_string()))?;
        Ok(())
    }

    async fn wait_for_selector(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), EngineError> {
        let page = self.page()?;
        // chromiumoxide has no waitForSelector equivalent; poll find_element
        // under a deadline instead.
        let poll = async {
            loop {
                if page.find_element(selector).await.is_ok() {
                    return;
                }
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
        };

        tokio::time::timeout(timeout, poll)
            .await
            .map_err(|_| EngineError::SelectorTimeout(selector.to_string()))
    }

    async fn content(&self) -> Result<String, EngineError> {
        self.page()?
            .content()
            .await
            .map_err(|e| EngineError::Other(e.to_string()))
    }

    async fn close(&mut self) -> Result<(), EngineError> {
        if let Some(page) = self.page.take() {
            if let Err(e) = page.close().await {
                warn!("Page close returned error: {}", e);
            }
        }
        Ok(())
    }
}

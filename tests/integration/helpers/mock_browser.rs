// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use ingestrs::engines::traits::{BrowserEngine, BrowserSession, EngineError, PageHandle};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// 脚本化浏览器引擎
///
/// 用固定的 URL -> HTML 映射代替真实浏览器。计数器记录会话与
/// 页面的生命周期，测试据此断言"恰好关闭一次"这类属性。
pub struct ScriptedBrowser {
    pages: Arc<HashMap<String, String>>,
    fail_launch: bool,
    /// 成功launch的会话数
    pub launches: Arc<AtomicUsize>,
    /// 会话close调用数
    pub session_closes: Arc<AtomicUsize>,
    /// open_page调用数
    pub pages_opened: Arc<AtomicUsize>,
    /// 页面close调用数
    pub pages_closed: Arc<AtomicUsize>,
    /// goto访问过的URL顺序
    pub visits: Arc<Mutex<Vec<String>>>,
}

impl ScriptedBrowser {
    pub fn new(pages: HashMap<String, String>) -> Self {
        Self {
            pages: Arc::new(pages),
            fail_launch: false,
            launches: Arc::new(AtomicUsize::new(0)),
            session_closes: Arc::new(AtomicUsize::new(0)),
            pages_opened: Arc::new(AtomicUsize::new(0)),
            pages_closed: Arc::new(AtomicUsize::new(0)),
            visits: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// 一个launch必然失败的引擎
    pub fn failing_launch() -> Self {
        let mut browser = Self::new(HashMap::new());
        browser.fail_launch = true;
        browser
    }

    pub fn visited(&self) -> Vec<String> {
        self.visits.lock().unwrap().clone()
    }
}

#[async_trait]
impl BrowserEngine for ScriptedBrowser {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, EngineError> {
        if self.fail_launch {
            return Err(EngineError::LaunchFailed("scripted launch failure".into()));
        }
        self.launches.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ScriptedSession {
            pages: self.pages.clone(),
            session_closes: self.session_closes.clone(),
            pages_opened: self.pages_opened.clone(),
            pages_closed: self.pages_closed.clone(),
            visits: self.visits.clone(),
        }))
    }
}

struct ScriptedSession {
    pages: Arc<HashMap<String, String>>,
    session_closes: Arc<AtomicUsize>,
    pages_opened: Arc<AtomicUsize>,
    pages_closed: Arc<AtomicUsize>,
    visits: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl BrowserSession for ScriptedSession {
    async fn open_page(&self) -> Result<Box<dyn PageHandle>, EngineError> {
        self.pages_opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ScriptedPage {
            pages: self.pages.clone(),
            current: Mutex::new(None),
            pages_closed: self.pages_closed.clone(),
            visits: self.visits.clone(),
        }))
    }

    async fn close(&mut self) -> Result<(), EngineError> {
        self.session_closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct ScriptedPage {
    pages: Arc<HashMap<String, String>>,
    current: Mutex<Option<String>>,
    pages_closed: Arc<AtomicUsize>,
    visits: Arc<Mutex<Vec<String>>>,
}

// "div.product-listing" -> "product-listing"
fn selector_token(selector: &str) -> &str {
    let last = selector.split_whitespace().last().unwrap_or(selector);
    last.rsplit(['.', '#']).next().unwrap_or(last)
}

#[async_trait]
impl PageHandle for ScriptedPage {
    async fn goto(&self, url: &str, _timeout: Duration) -> Result<(), EngineError> {
        self.visits.lock().unwrap().push(url.to_string());
        if self.pages.contains_key(url) {
            *self.current.lock().unwrap() = Some(url.to_string());
            Ok(())
        } else {
            Err(EngineError::NavigationFailed(format!("no page at {}", url)))
        }
    }

    async fn wait_for_selector(
        &self,
        selector: &str,
        _timeout: Duration,
    ) -> Result<(), EngineError> {
        let current = self.current.lock().unwrap().clone();
        let html = current
            .and_then(|url| self.pages.get(&url).cloned())
            .unwrap_or_default();
        if html.contains(selector_token(selector)) {
            Ok(())
        } else {
            Err(EngineError::SelectorTimeout(selector.to_string()))
        }
    }

    async fn content(&self) -> Result<String, EngineError> {
        let current = self.current.lock().unwrap().clone();
        current
            .and_then(|url| self.pages.get(&url).cloned())
            .ok_or_else(|| EngineError::Other("no page loaded".into()))
    }

    async fn close(&mut self) -> Result<(), EngineError> {
        self.pages_closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

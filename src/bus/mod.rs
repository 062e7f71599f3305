// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use dashmap::DashMap;
use tokio::sync::oneshot;
use tracing::debug;

/// 关联主题：某来源的采集结果
pub fn result_topic(source_slug: &str) -> String {
    format!("crawl.result.{}", source_slug)
}

/// 事件关联总线
///
/// 把跨执行上下文的异步请求与其最终结果配对。等待方通过
/// `subscribe` 登记一个一次性接收端，发布方通过 `publish`
/// 按主题投递。oneshot通道保证每次等待至多被解析一次，
/// 总线不缓冲历史消息，后登记的等待者不会收到旧负载。
///
/// 总线自身没有超时语义：没有发布方时接收端会一直挂起，
/// 由编排器在外部施加超时。
pub struct CorrelationBus<T> {
    pending: DashMap<String, Vec<oneshot::Sender<T>>>,
}

impl<T: Clone> CorrelationBus<T> {
    pub fn new() -> Self {
        Self {
            pending: DashMap::new(),
        }
    }

    /// 登记对某主题下一次发布的一次性等待
    ///
    /// 返回的接收端在下一次 `publish` 时解析，随后自动注销。
    /// 登记时同步剔除同主题下已放弃（接收端已析构）的等待者，
    /// 从不发布的主题不会随重复登记无限增长。
    pub fn subscribe(&self, topic: &str) -> oneshot::Receiver<T> {
        let (tx, rx) = oneshot::channel();
        let mut waiters = self.pending.entry(topic.to_string()).or_default();
        waiters.retain(|waiter| !waiter.is_closed());
        waiters.push(tx);
        rx
    }

    /// 发布负载，即发即忘
    ///
    /// 当前登记在该主题上的每个等待者各收到一份；没有等待者时
    /// 负载被丢弃。返回实际送达的等待者数量。
    pub fn publish(&self, topic: &str, payload: T) -> usize {
        let Some((_, waiters)) = self.pending.remove(topic) else {
            debug!(topic = %topic, "No pending waiters for published payload");
            return 0;
        };

        let mut delivered = 0;
        for waiter in waiters {
            // A dropped receiver just means the waiter gave up (e.g. timed out).
            if waiter.send(payload.clone()).is_ok() {
                delivered += 1;
            }
        }
        delivered
    }

    /// 当前挂起的等待主题数，用于运维可见性
    pub fn pending_topics(&self) -> usize {
        self.pending.len()
    }

    /// 某主题下登记在册的等待者数量（含尚未剔除的已放弃者）
    pub fn pending_waiters(&self, topic: &str) -> usize {
        self.pending.get(topic).map_or(0, |waiters| waiters.len())
    }
}

impl<T: Clone> Default for CorrelationBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

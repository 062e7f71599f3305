// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::CrawlerSettings;
use crate::crawler::extract::{self, ListingPage, SelectorProfile};
use crate::domain::models::product::{BatchGroup, CrawlBatch, EnrichedProduct};
use crate::domain::models::source::SourceTarget;
use crate::domain::models::taxonomy::TaxonomyKind;
use crate::domain::services::classifier::{
    ClassificationRequest, Classifier, ProductDescriptor,
};
use crate::domain::services::taxonomy_resolver::{normalize_name, TaxonomyResolver};
use crate::engines::traits::{BrowserEngine, BrowserSession, EngineError, PageHandle};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

/// 采集错误类型
///
/// 只有资源获取失败会离开采集调用并传播到任务边界；
/// 每URL与每条目的失败都在各自层级被捕获。
#[derive(Error, Debug)]
pub enum CrawlError {
    /// 浏览器启动失败，任务级致命错误，交给队列重试
    #[error("Browser launch failed: {0}")]
    Launch(#[from] EngineError),

    /// 来源基准URL无法解析
    #[error("Invalid source website: {0}")]
    InvalidSource(String),
}

/// 采集超时配置
#[derive(Debug, Clone, Copy)]
pub struct CrawlSettings {
    /// 列表页导航超时
    pub navigation_timeout: Duration,
    /// 列表容器等待超时
    pub marker_timeout: Duration,
    /// 详情页导航超时
    pub detail_timeout: Duration,
}

impl From<&CrawlerSettings> for CrawlSettings {
    fn from(settings: &CrawlerSettings) -> Self {
        Self {
            navigation_timeout: Duration::from_secs(settings.navigation_timeout),
            marker_timeout: Duration::from_secs(settings.marker_timeout),
            detail_timeout: Duration::from_secs(settings.detail_timeout),
        }
    }
}

/// 单个URL分页循环的状态
///
/// Navigate -> AwaitMarker -> ReadListing -> Enrich -> Append -> NextPage
/// 任一步失败都只终止当前URL的循环，不影响同来源的其余URL。
enum PageState {
    /// 加载列表页
    Navigate(Url),
    /// 等待列表容器出现
    AwaitMarker(Url),
    /// 读取渲染后的HTML并提取产品卡
    ReadListing(Url),
    /// 逐条打开详情页补充字段
    Enrich(ListingPage),
    /// 把富集结果挂到分组下
    Append {
        heading: Option<String>,
        products: Vec<EnrichedProduct>,
        next: Option<Url>,
    },
    /// 决定翻页还是结束
    NextPage(Option<Url>),
    /// 当前URL的循环结束
    Done,
}

/// 站点采集器
///
/// 所有来源共用的分页+富集状态机，站点差异由选择器档案参数化。
/// 一次crawl调用获取一个浏览器会话，覆盖该来源的全部URL与特辑组，
/// 结束时恰好释放一次。
pub struct SiteCrawler {
    engine: Arc<dyn BrowserEngine>,
    resolver: Arc<TaxonomyResolver>,
    classifier: Option<Arc<dyn Classifier>>,
    settings: CrawlSettings,
}

impl SiteCrawler {
    pub fn new(
        engine: Arc<dyn BrowserEngine>,
        resolver: Arc<TaxonomyResolver>,
        classifier: Option<Arc<dyn Classifier>>,
        settings: CrawlSettings,
    ) -> Self {
        Self {
            engine,
            resolver,
            classifier,
            settings,
        }
    }

    /// 执行一次来源采集
    ///
    /// 普通列表URL先按配置顺序处理（空标签），随后处理每个特辑组
    /// （组标签）。返回的批次可能不完整甚至为空：页面级与条目级
    /// 失败只会缩小结果，不会让调用失败。
    pub async fn crawl(
        &self,
        source: &SourceTarget,
        profile: &SelectorProfile,
    ) -> Result<CrawlBatch, CrawlError> {
        let base =
            Url::parse(&source.website).map_err(|e| CrawlError::InvalidSource(e.to_string()))?;

        let mut session = self.engine.launch().await?;

        let mut groups: Vec<BatchGroup> = Vec::new();
        for url in &source.listing_urls {
            self.crawl_url(session.as_ref(), profile, source, &base, url, "", &mut groups)
                .await;
        }
        for collection in &source.collections {
            for url in &collection.urls {
                self.crawl_url(
                    session.as_ref(),
                    profile,
                    source,
                    &base,
                    url,
                    &collection.tag,
                    &mut groups,
                )
                .await;
            }
        }

        // The browser is expensive; release it before the store-bound
        // taxonomy phase rather than after.
        if let Err(e) = session.close().await {
            warn!(source = %source.slug, "Browser session close failed: {}", e);
        }

        self.apply_taxonomy(source, &mut groups).await;

        let batch = CrawlBatch {
            source_id: source.id,
            source_slug: source.slug.clone(),
            groups,
        };
        info!(
            source = %source.slug,
            products = batch.product_count(),
            groups = batch.groups.len(),
            "Crawl finished"
        );
        Ok(batch)
    }

    /// 跑完一个URL的分页循环
    #[allow(clippy::too_many_arguments)]
    async fn crawl_url(
        &self,
        session: &dyn BrowserSession,
        profile: &SelectorProfile,
        source: &SourceTarget,
        base: &Url,
        start_url: &str,
        tag_label: &str,
        groups: &mut Vec<BatchGroup>,
    ) {
        let start = match Url::parse(start_url) {
            Ok(u) => u,
            Err(e) => {
                warn!(source = %source.slug, url = %start_url, "Skipping unparsable listing URL: {}", e);
                return;
            }
        };

        let mut page = match session.open_page().await {
            Ok(p) => p,
            Err(e) => {
                warn!(source = %source.slug, url = %start_url, "Failed to open listing page: {}", e);
                return;
            }
        };

        let mut state = PageState::Navigate(start);
        loop {
            state = match state {
                PageState::Navigate(url) => {
                    match page.goto(url.as_str(), self.settings.navigation_timeout).await {
                        Ok(()) => PageState::AwaitMarker(url),
                        Err(e) => {
                            // terminates only this URL's loop, siblings continue
                            warn!(source = %source.slug, url = %url, "Navigation failed: {}", e);
                            PageState::Done
                        }
                    }
                }
                PageState::AwaitMarker(url) => {
                    match page
                        .wait_for_selector(&profile.listing_marker, self.settings.marker_timeout)
                        .await
                    {
                        Ok(()) => PageState::ReadListing(url),
                        Err(_) => {
                            // absence of the listing container means "no more
                            // pages", not a fatal error
                            debug!(source = %source.slug, url = %url, "Listing marker absent, ending pagination");
                            PageState::Done
                        }
                    }
                }
                PageState::ReadListing(url) => match page.content().await {
                    Ok(html) => PageState::Enrich(extract::extract_listing(profile, &html, base)),
                    Err(e) => {
                        warn!(source = %source.slug, url = %url, "Failed to read page content: {}", e);
                        PageState::Done
                    }
                },
                PageState::Enrich(listing) => {
                    let mut products: Vec<EnrichedProduct> = listing
                        .items
                        .into_iter()
                        .map(|item| EnrichedProduct::from_listing(item, tag_label))
                        .collect();
                    for product in &mut products {
                        self.enrich_item(session, profile, product).await;
                    }
                    PageState::Append {
                        heading: listing.heading,
                        products,
                        next: listing.next_page,
                    }
                }
                PageState::Append {
                    heading,
                    products,
                    next,
                } => {
                    // special collections group under their tag, plain URLs
                    // under the scraped category heading
                    let label = if !tag_label.is_empty() {
                        tag_label.to_string()
                    } else {
                        heading.unwrap_or_else(|| source.name.clone())
                    };
                    append_group(groups, &label, products);
                    PageState::NextPage(next)
                }
                PageState::NextPage(next) => match next {
                    Some(url) => PageState::Navigate(url),
                    None => PageState::Done,
                },
                PageState::Done => break,
            };
        }

        if let Err(e) = page.close().await {
            warn!(source = %source.slug, "Listing page close failed: {}", e);
        }
    }

    /// 富集单个条目
    ///
    /// 失败被限制在本条目：出错时保留列表页的值。
    /// 详情页无论成败都会被关闭。
    async fn enrich_item(
        &self,
        session: &dyn BrowserSession,
        profile: &SelectorProfile,
        product: &mut EnrichedProduct,
    ) {
        let mut page = match session.open_page().await {
            Ok(p) => p,
            Err(e) => {
                warn!(link = %product.link, "Failed to open detail page: {}", e);
                return;
            }
        };

        if let Err(e) = self.fetch_detail(page.as_ref(), profile, product).await {
            warn!(link = %product.link, "Detail enrichment failed, keeping listing values: {}", e);
        }

        if let Err(e) = page.close().await {
            warn!(link = %product.link, "Detail page close failed: {}", e);
        }
    }

    async fn fetch_detail(
        &self,
        page: &dyn PageHandle,
        profile: &SelectorProfile,
        product: &mut EnrichedProduct,
    ) -> Result<(), EngineError> {
        page.goto(&product.link, self.settings.detail_timeout).await?;
        let html = page.content().await?;
        extract::enrich_from_detail(&profile.detail, &html, product);
        Ok(())
    }

    /// 分类法解析阶段
    ///
    /// 每个不同名称在一次采集调用内最多解析一次（本地memo，不做
    /// 跨调用缓存）。存储失败按名称隔离：解析不到就留空。
    async fn apply_taxonomy(&self, source: &SourceTarget, groups: &mut Vec<BatchGroup>) {
        let mut memo: HashMap<(TaxonomyKind, String), Option<Uuid>> = HashMap::new();

        // 1. Group labels double as category names
        for index in 0..groups.len() {
            let label = groups[index].label.clone();
            if let Some(id) = self.resolve_memoized(&mut memo, TaxonomyKind::Category, &label).await
            {
                for product in &mut groups[index].products {
                    if !product.category_ids.contains(&id) {
                        product.category_ids.push(id);
                    }
                }
            }
        }

        // 2. Special-collection tags
        for group in groups.iter_mut() {
            for product in &mut group.products {
                if product.tag_label.is_empty() {
                    continue;
                }
                let tag_label = product.tag_label.clone();
                product.tag_id = self
                    .resolve_memoized(&mut memo, TaxonomyKind::Tag, &tag_label)
                    .await;
            }
        }

        // 3. Brands discovered on detail pages
        for group in groups.iter_mut() {
            for product in &mut group.products {
                if product.brand_name.is_empty() {
                    continue;
                }
                let brand_name = product.brand_name.clone();
                product.brand_id = self
                    .resolve_memoized(&mut memo, TaxonomyKind::Brand, &brand_name)
                    .await;
            }
        }

        // 4. Best-effort external classification
        if let Some(classifier) = self.classifier.clone() {
            self.apply_classification(source, classifier.as_ref(), &mut memo, groups)
                .await;
        }
    }

    async fn apply_classification(
        &self,
        source: &SourceTarget,
        classifier: &dyn Classifier,
        memo: &mut HashMap<(TaxonomyKind, String), Option<Uuid>>,
        groups: &mut Vec<BatchGroup>,
    ) {
        let categories: Vec<String> = groups.iter().map(|g| g.label.clone()).collect();
        let brands = match self.resolver.known_names(TaxonomyKind::Brand).await {
            Ok(names) => names,
            Err(e) => {
                warn!(source = %source.slug, "Failed to load known brands: {}", e);
                Vec::new()
            }
        };
        let products: Vec<ProductDescriptor> = groups
            .iter()
            .flat_map(|g| &g.products)
            .map(|p| ProductDescriptor {
                name: p.name.clone(),
                brand: p.brand_name.clone(),
                color: spec_color(&p.specifications),
            })
            .collect();

        let request = ClassificationRequest {
            categories,
            brands,
            products,
        };
        let response = match classifier.classify(&request).await {
            Ok(r) => r,
            Err(e) => {
                // best effort: taxonomy fields stay unresolved
                warn!(source = %source.slug, "Classification call failed: {}", e);
                return;
            }
        };

        for (label, names) in &response.category_map {
            let Some(id) = self.resolve_memoized(memo, TaxonomyKind::Category, label).await
            else {
                continue;
            };
            for group in groups.iter_mut() {
                for product in &mut group.products {
                    if names.contains(&product.name) && !product.category_ids.contains(&id) {
                        product.category_ids.push(id);
                    }
                }
            }
        }

        for (brand, names) in &response.brand_map {
            let Some(id) = self.resolve_memoized(memo, TaxonomyKind::Brand, brand).await else {
                continue;
            };
            for group in groups.iter_mut() {
                for product in &mut group.products {
                    if names.contains(&product.name) && product.brand_id.is_none() {
                        product.brand_id = Some(id);
                    }
                }
            }
        }
    }

    async fn resolve_memoized(
        &self,
        memo: &mut HashMap<(TaxonomyKind, String), Option<Uuid>>,
        kind: TaxonomyKind,
        name: &str,
    ) -> Option<Uuid> {
        let normalized = normalize_name(name);
        if normalized.is_empty() {
            return None;
        }
        let key = (kind, normalized);
        if let Some(cached) = memo.get(&key) {
            return *cached;
        }

        let resolved = match self.resolver.find_or_create(kind, name).await {
            Ok(entity) => Some(entity.id),
            Err(e) => {
                warn!(kind = %kind, name = %name, "Taxonomy resolution failed: {}", e);
                None
            }
        };
        memo.insert(key, resolved);
        resolved
    }
}

/// 插入或合并一个结果分组，保持分组的发现顺序
fn append_group(groups: &mut Vec<BatchGroup>, label: &str, products: Vec<EnrichedProduct>) {
    if products.is_empty() {
        return;
    }
    if let Some(group) = groups.iter_mut().find(|g| g.label == label) {
        group.products.extend(products);
    } else {
        groups.push(BatchGroup {
            label: label.to_string(),
            products,
        });
    }
}

/// 从规格条目里找颜色项，作为分类服务描述符的color输入
fn spec_color(specifications: &[String]) -> String {
    specifications
        .iter()
        .find(|s| s.to_lowercase().starts_with("color"))
        .and_then(|s| s.split_once(':'))
        .map(|(_, v)| v.trim().to_string())
        .unwrap_or_default()
}

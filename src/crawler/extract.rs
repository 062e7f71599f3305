// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::product::{EnrichedProduct, ListingItem};
use crate::utils::url_utils;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

/// 来源选择器档案
///
/// 一个来源的全部站点特定知识：列表容器标记、产品卡字段选择器、
/// 翻页锚点和详情页选择器。分页/富集引擎对所有来源共用，
/// 差异全部收敛到档案里。
#[derive(Debug, Clone)]
pub struct SelectorProfile {
    /// 列表容器存在的标志选择器，等不到视为"没有更多页面"
    pub listing_marker: String,
    /// 产品卡选择器
    pub card: String,
    /// 卡内链接选择器（取href）
    pub link: String,
    /// 卡内图片选择器（取src）
    pub image: String,
    /// 卡内名称选择器
    pub name: String,
    /// 卡内原价选择器
    pub price: String,
    /// 卡内折扣价选择器
    pub discount_price: String,
    /// 卡内折扣标记选择器，选不中表示非折扣品
    pub discount_label: String,
    /// 卡内评分选择器
    pub rating: Option<String>,
    /// 卡内评分数量选择器
    pub rating_count: Option<String>,
    /// 列表页分类标题选择器
    pub heading: Option<String>,
    /// 下一页锚点选择器（取href）
    pub next_page: String,
    /// 详情页选择器
    pub detail: DetailSelectors,
}

/// 详情页选择器
#[derive(Debug, Clone, Default)]
pub struct DetailSelectors {
    /// 补充图片选择器（取src）
    pub images: String,
    /// 描述选择器
    pub description: String,
    /// 规格条目选择器
    pub specifications: String,
    /// 关键特性条目选择器
    pub key_features: String,
    /// 品牌名选择器
    pub brand: Option<String>,
    /// 评分数量选择器（部分站点只在详情页展示）
    pub rating_count: Option<String>,
    /// 修正后的原价选择器
    pub price: Option<String>,
    /// 修正后的折扣价选择器
    pub discount_price: Option<String>,
}

/// 一个列表页的提取结果
#[derive(Debug, Default)]
pub struct ListingPage {
    /// 列表页上发现的分类标题
    pub heading: Option<String>,
    /// 保留下来的产品条目
    pub items: Vec<ListingItem>,
    /// 解析为绝对地址的下一页链接
    pub next_page: Option<Url>,
}

static PRICE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\d][\d,]*(?:\.\d+)?").unwrap());

/// 从价格文案中解析数值，容忍货币符号与千分位
pub fn parse_price(text: &str) -> Option<f64> {
    let captured = PRICE_RE.find(text)?;
    captured.as_str().replace(',', "").parse().ok()
}

fn parse_selector(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(s) => Some(s),
        Err(e) => {
            debug!(selector = %selector, "Invalid selector in profile: {:?}", e);
            None
        }
    }
}

fn select_text(scope: &ElementRef, selector: &str) -> Option<String> {
    let sel = parse_selector(selector)?;
    let text = scope
        .select(&sel)
        .next()?
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string();
    (!text.is_empty()).then_some(text)
}

fn select_attr(scope: &ElementRef, selector: &str, attr: &str) -> Option<String> {
    let sel = parse_selector(selector)?;
    scope
        .select(&sel)
        .next()?
        .value()
        .attr(attr)
        .map(|s| s.to_string())
}

fn select_attr_all(scope: &ElementRef, selector: &str, attr: &str) -> Vec<String> {
    let Some(sel) = parse_selector(selector) else {
        return Vec::new();
    };
    scope
        .select(&sel)
        .filter_map(|e| e.value().attr(attr))
        .map(|s| s.to_string())
        .collect()
}

fn select_text_all(scope: &ElementRef, selector: &str) -> Vec<String> {
    let Some(sel) = parse_selector(selector) else {
        return Vec::new();
    };
    scope
        .select(&sel)
        .map(|e| {
            e.text()
                .collect::<Vec<_>>()
                .join(" ")
                .trim()
                .to_string()
        })
        .filter(|t| !t.is_empty())
        .collect()
}

/// 提取一个列表页
///
/// 丢弃规则：没有链接的卡静默丢弃；没有折扣标记的卡按
/// 只收录折扣品的策略过滤。相对链接以 `base` 解析为绝对地址。
pub fn extract_listing(profile: &SelectorProfile, html: &str, base: &Url) -> ListingPage {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let heading = profile
        .heading
        .as_deref()
        .and_then(|sel| select_text(&root, sel));

    let mut items = Vec::new();
    if let Some(card_sel) = parse_selector(&profile.card) {
        for card in document.select(&card_sel) {
            // link is the minimum requirement for keeping an item
            let Some(href) = select_attr(&card, &profile.link, "href") else {
                continue;
            };
            let Ok(link) = url_utils::resolve_url(base, &href) else {
                continue;
            };

            // discount-only catalog policy
            let Some(discount_label) = select_text(&card, &profile.discount_label) else {
                continue;
            };

            items.push(ListingItem {
                link: url_utils::canonical_link(&link),
                images: select_attr_all(&card, &profile.image, "src"),
                name: select_text(&card, &profile.name).unwrap_or_default(),
                price: select_text(&card, &profile.price)
                    .as_deref()
                    .and_then(parse_price),
                discount_price: select_text(&card, &profile.discount_price)
                    .as_deref()
                    .and_then(parse_price),
                discount_label: Some(discount_label),
                rating: profile
                    .rating
                    .as_deref()
                    .and_then(|sel| select_text(&card, sel))
                    .and_then(|t| t.parse().ok()),
                rating_count: profile
                    .rating_count
                    .as_deref()
                    .and_then(|sel| select_text(&card, sel))
                    .as_deref()
                    .and_then(parse_count),
            });
        }
    }

    let next_page = select_attr(&root, &profile.next_page, "href")
        .and_then(|href| url_utils::resolve_url(base, &href).ok());

    ListingPage {
        heading,
        items,
        next_page,
    }
}

fn parse_count(text: &str) -> Option<u32> {
    PRICE_RE.find(text)?.as_str().replace(',', "").parse().ok()
}

/// 用详情页补充一条产品记录
///
/// 只在原值之上补充：详情页缺某个字段时保留列表页的值。
pub fn enrich_from_detail(profile: &DetailSelectors, html: &str, product: &mut EnrichedProduct) {
    let document = Html::parse_document(html);
    let root = document.root_element();

    for image in select_attr_all(&root, &profile.images, "src") {
        if !product.images.contains(&image) {
            product.images.push(image);
        }
    }

    if let Some(description) = select_text(&root, &profile.description) {
        product.description = description;
    }
    product.specifications = select_text_all(&root, &profile.specifications);
    product.key_features = select_text_all(&root, &profile.key_features);

    if let Some(brand_sel) = profile.brand.as_deref() {
        if let Some(brand) = select_text(&root, brand_sel) {
            product.brand_name = brand;
        }
    }
    if let Some(count_sel) = profile.rating_count.as_deref() {
        if let Some(count) = select_text(&root, count_sel).as_deref().and_then(parse_count) {
            product.rating_count = Some(count);
        }
    }
    // Detail pages carry the authoritative prices on some sources
    if let Some(price_sel) = profile.price.as_deref() {
        if let Some(price) = select_text(&root, price_sel).as_deref().and_then(parse_price) {
            product.price = Some(price);
        }
    }
    if let Some(discount_sel) = profile.discount_price.as_deref() {
        if let Some(price) = select_text(&root, discount_sel)
            .as_deref()
            .and_then(parse_price)
        {
            product.discount_price = Some(price);
        }
    }
}

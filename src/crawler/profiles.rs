// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::crawler::extract::{DetailSelectors, SelectorProfile};

/// 按来源slug查找内置选择器档案
///
/// 四个目标站点共享同一个分页/富集引擎，站点差异全部在档案里。
/// 返回 `None` 的来源没有对应的采集能力，任务按无操作成功处理。
pub fn for_source(slug: &str) -> Option<SelectorProfile> {
    match slug {
        "techmart" => Some(techmart()),
        "homeplus" => Some(homeplus()),
        "gadgetzone" => Some(gadgetzone()),
        "megadeals" => Some(megadeals()),
        _ => None,
    }
}

fn techmart() -> SelectorProfile {
    SelectorProfile {
        listing_marker: "div.product-listing".to_string(),
        card: "div.product-listing div.product-card".to_string(),
        link: "a.product-link".to_string(),
        image: "img.product-image".to_string(),
        name: "h2.product-name".to_string(),
        price: "span.price-regular".to_string(),
        discount_price: "span.price-sale".to_string(),
        discount_label: "span.discount-badge".to_string(),
        rating: Some("span.rating-value".to_string()),
        rating_count: Some("span.rating-count".to_string()),
        heading: Some("h1.collection-title".to_string()),
        next_page: "nav.pagination a.next".to_string(),
        detail: DetailSelectors {
            images: "div.product-gallery img".to_string(),
            description: "div.product-description".to_string(),
            specifications: "table.spec-table tr".to_string(),
            key_features: "ul.key-features li".to_string(),
            brand: Some("a.brand-link".to_string()),
            rating_count: None,
            price: Some("span.pdp-price-regular".to_string()),
            discount_price: Some("span.pdp-price-sale".to_string()),
        },
    }
}

fn homeplus() -> SelectorProfile {
    SelectorProfile {
        listing_marker: "ul.catalog-grid".to_string(),
        card: "ul.catalog-grid li.catalog-item".to_string(),
        link: "a.item-title".to_string(),
        image: "img.item-thumb".to_string(),
        name: "a.item-title".to_string(),
        price: "del.old-price".to_string(),
        discount_price: "ins.new-price".to_string(),
        discount_label: "span.save-label".to_string(),
        rating: Some("div.stars[data-rating]".to_string()),
        rating_count: None,
        heading: Some("header.category-header h1".to_string()),
        next_page: "a[rel=next]".to_string(),
        detail: DetailSelectors {
            images: "div.media-strip img".to_string(),
            description: "section#description".to_string(),
            specifications: "div.attributes div.attribute".to_string(),
            key_features: "div.highlights li".to_string(),
            brand: Some("span.manufacturer".to_string()),
            rating_count: Some("span.review-total".to_string()),
            price: None,
            discount_price: None,
        },
    }
}

fn gadgetzone() -> SelectorProfile {
    SelectorProfile {
        listing_marker: "section.results".to_string(),
        card: "section.results article.result".to_string(),
        link: "a.result-link".to_string(),
        image: "img.result-img".to_string(),
        name: "h3.result-name".to_string(),
        price: "span.strike".to_string(),
        discount_price: "span.final".to_string(),
        discount_label: "em.deal-tag".to_string(),
        rating: None,
        rating_count: None,
        heading: Some("div.breadcrumbs span.current".to_string()),
        next_page: "div.pager a.pager-next".to_string(),
        detail: DetailSelectors {
            images: "ul.gallery-thumbs img".to_string(),
            description: "div#overview".to_string(),
            specifications: "ul.tech-specs li".to_string(),
            key_features: "div.feature-list p".to_string(),
            brand: None,
            rating_count: Some("a.review-count".to_string()),
            price: None,
            discount_price: None,
        },
    }
}

fn megadeals() -> SelectorProfile {
    SelectorProfile {
        listing_marker: "div#deal-wall".to_string(),
        card: "div#deal-wall div.deal".to_string(),
        link: "a.deal-title".to_string(),
        image: "img.deal-img".to_string(),
        name: "a.deal-title".to_string(),
        price: "span.list-price".to_string(),
        discount_price: "span.deal-price".to_string(),
        discount_label: "span.percent-off".to_string(),
        rating: Some("span.avg-rating".to_string()),
        rating_count: Some("span.num-ratings".to_string()),
        heading: None,
        next_page: "a.load-next".to_string(),
        detail: DetailSelectors {
            images: "div.carousel img".to_string(),
            description: "div.long-desc".to_string(),
            specifications: "table.details td".to_string(),
            key_features: "ul.bullets li".to_string(),
            brand: Some("span.sold-by".to_string()),
            rating_count: None,
            price: None,
            discount_price: None,
        },
    }
}

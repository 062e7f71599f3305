// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::ClassifierSettings;
use crate::domain::services::classifier::{
    ClassificationRequest, ClassificationResponse, Classifier, ClassifierError,
};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// HTTP分类服务客户端
///
/// 把采集到的产品描述符POST给外部分类服务。调用方按尽力而为
/// 处理返回错误，这里只负责传输与反序列化。
pub struct HttpClassifier {
    client: reqwest::Client,
    url: String,
}

impl HttpClassifier {
    /// 创建新的分类服务客户端
    pub fn new(settings: &ClassifierSettings) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout))
            .build()?;

        Ok(Self {
            client,
            url: settings.url.clone(),
        })
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn classify(
        &self,
        request: &ClassificationRequest,
    ) -> Result<ClassificationResponse, ClassifierError> {
        debug!(
            products = request.products.len(),
            categories = request.categories.len(),
            "Sending classification request"
        );

        let response = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| ClassifierError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClassifierError::Http(format!(
                "classifier returned status {}",
                status
            )));
        }

        response
            .json::<ClassificationResponse>()
            .await
            .map_err(|e| ClassifierError::Malformed(e.to_string()))
    }
}

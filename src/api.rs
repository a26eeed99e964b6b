//! HTTP client for the analysis backend.
//!
//! The orchestrator talks to the backend through the `AnalysisBackend` trait
//! so tests can substitute a mock; `BackendClient` is the real reqwest-backed
//! implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;

use crate::logging::{self, obj, v_num, v_str, Domain, Level};
use crate::report::{FlowReport, NetworkReport};
use crate::state::Config;
use crate::upload::UploadFile;

/// Fallback when a rejection body is unparseable or missing the error field.
pub const GENERIC_REJECTION_MSG: &str = "分析失败，请重试";
/// Transport-level failure, distinct from an application rejection.
pub const UNREACHABLE_MSG: &str = "网络错误，请检查后端服务是否启动";
/// Health probe reached the backend but it answered non-200.
pub const HEALTH_DEGRADED_MSG: &str = "后端服务连接异常，请检查服务是否启动";
/// Health probe got no response at all.
pub const HEALTH_UNREACHABLE_MSG: &str = "无法连接到后端服务，请确保后端API服务已启动";

#[derive(Debug, Clone, Error)]
pub enum UploadError {
    /// Backend answered non-2xx with a structured (or absent) error message.
    #[error("{message}")]
    Rejected { message: String },
    /// No usable response from the backend at all.
    #[error("网络错误，请检查后端服务是否启动")]
    Unreachable { detail: String },
    /// 2xx response whose body does not parse as the expected report.
    #[error("返回数据格式错误: {detail}")]
    BadBody { detail: String },
}

impl UploadError {
    /// Message shown to the user; detail fields go to the log only.
    pub fn user_message(&self) -> &str {
        match self {
            UploadError::Rejected { message } => message,
            UploadError::Unreachable { .. } => UNREACHABLE_MSG,
            UploadError::BadBody { .. } => GENERIC_REJECTION_MSG,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    Ok,
    /// Reached the backend, got a non-200.
    Degraded,
    Unreachable,
}

#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    async fn upload_flow(&self, file: &UploadFile) -> Result<FlowReport, UploadError>;
    async fn upload_network(&self, files: &[UploadFile]) -> Result<NetworkReport, UploadError>;
    async fn health(&self) -> HealthStatus;
    /// Whether an asset URL answers 2xx; used before embedding the graph.
    async fn asset_reachable(&self, url: &str) -> bool;
}

/// Stable asset paths keyed by filename.
#[derive(Clone)]
pub struct AssetUrls {
    base: String,
}

impl AssetUrls {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn chart_url(&self, name: &str) -> String {
        format!("{}/charts/{}", self.base, name)
    }

    pub fn network_url(&self, name: &str) -> String {
        format!("{}/networks/{}", self.base, name)
    }

    pub fn download_url(&self, name: &str) -> String {
        format!("{}/download/{}", self.base, name)
    }
}

pub struct BackendClient {
    client: Client,
    base: String,
    health_timeout: Duration,
}

impl BackendClient {
    pub fn new(cfg: &Config) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base: cfg.api_base.trim_end_matches('/').to_string(),
            health_timeout: Duration::from_secs(cfg.health_timeout_secs),
        })
    }

    pub fn urls(&self) -> AssetUrls {
        AssetUrls::new(&self.base)
    }

    async fn post_multipart(&self, path: &str, form: Form) -> Result<String, UploadError> {
        let url = format!("{}/{}", self.base, path);
        let resp = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::Unreachable {
                detail: e.to_string(),
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| UploadError::Unreachable {
            detail: e.to_string(),
        })?;

        if !status.is_success() {
            return Err(UploadError::Rejected {
                message: rejection_message(&body),
            });
        }
        Ok(body)
    }
}

/// Extract the backend's `error` field, falling back to the generic message.
fn rejection_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ApiRejection {
        error: Option<String>,
    }
    serde_json::from_str::<ApiRejection>(body)
        .ok()
        .and_then(|r| r.error)
        .unwrap_or_else(|| GENERIC_REJECTION_MSG.to_string())
}

fn file_part(file: &UploadFile) -> Part {
    Part::bytes(file.bytes.clone()).file_name(file.name.clone())
}

#[async_trait]
impl AnalysisBackend for BackendClient {
    async fn upload_flow(&self, file: &UploadFile) -> Result<FlowReport, UploadError> {
        let form = Form::new().part("file", file_part(file));
        let body = self.post_multipart("upload", form).await?;
        serde_json::from_str(&body).map_err(|e| UploadError::BadBody {
            detail: e.to_string(),
        })
    }

    async fn upload_network(&self, files: &[UploadFile]) -> Result<NetworkReport, UploadError> {
        let mut form = Form::new();
        for file in files {
            form = form.part("files", file_part(file));
        }
        let body = self.post_multipart("upload_network", form).await?;
        serde_json::from_str(&body).map_err(|e| UploadError::BadBody {
            detail: e.to_string(),
        })
    }

    async fn health(&self) -> HealthStatus {
        let url = format!("{}/health", self.base);
        match self
            .client
            .get(&url)
            .timeout(self.health_timeout)
            .send()
            .await
        {
            Ok(resp) if resp.status() == StatusCode::OK => HealthStatus::Ok,
            Ok(resp) => {
                logging::log(
                    Level::Warn,
                    Domain::Probe,
                    "health_degraded",
                    obj(&[("status", v_num(resp.status().as_u16() as f64))]),
                );
                HealthStatus::Degraded
            }
            Err(e) => {
                logging::log(
                    Level::Warn,
                    Domain::Probe,
                    "health_unreachable",
                    obj(&[("detail", v_str(&e.to_string()))]),
                );
                HealthStatus::Unreachable
            }
        }
    }

    async fn asset_reachable(&self, url: &str) -> bool {
        match self.client.get(url).timeout(self.health_timeout).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_message_from_error_field() {
        assert_eq!(rejection_message(r#"{"error":"解析失败"}"#), "解析失败");
    }

    #[test]
    fn test_rejection_message_fallbacks() {
        assert_eq!(rejection_message("not json"), GENERIC_REJECTION_MSG);
        assert_eq!(rejection_message(r#"{"detail":"x"}"#), GENERIC_REJECTION_MSG);
        assert_eq!(rejection_message(r#"{"error":null}"#), GENERIC_REJECTION_MSG);
    }

    #[test]
    fn test_user_messages_distinguish_rejection_from_transport() {
        let rejected = UploadError::Rejected {
            message: "解析失败".to_string(),
        };
        let unreachable = UploadError::Unreachable {
            detail: "connection refused".to_string(),
        };
        assert_eq!(rejected.user_message(), "解析失败");
        assert_eq!(unreachable.user_message(), UNREACHABLE_MSG);
        assert_ne!(rejected.user_message(), unreachable.user_message());
    }

    #[test]
    fn test_asset_urls() {
        let urls = AssetUrls::new("http://localhost:5000/api/");
        assert_eq!(
            urls.chart_url("main_analysis_1.png"),
            "http://localhost:5000/api/charts/main_analysis_1.png"
        );
        assert_eq!(
            urls.network_url("g.html"),
            "http://localhost:5000/api/networks/g.html"
        );
        assert_eq!(
            urls.download_url("report.xlsx"),
            "http://localhost:5000/api/download/report.xlsx"
        );
    }
}

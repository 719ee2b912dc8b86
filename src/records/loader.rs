use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;
use serde_json::Value;
use thiserror::Error;

use super::model::LoadReport;
use super::normalize::normalize_all;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build HTTP client: {source}")]
    HttpClientBuild {
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to setup proxy: {proxy}: {source}")]
    ProxySetup {
        proxy: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to load {resource}: {source}")]
    Request {
        resource: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to load {resource} ({status})")]
    Status { resource: String, status: u16 },

    #[error("Failed to read {resource}: {source}")]
    Read {
        resource: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{resource} is not valid JSON: {source}")]
    Parse {
        resource: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
#[error("{resource} must be an array.")]
pub struct SchemaError {
    pub resource: String,
}

#[derive(Debug, Error)]
pub enum RecordsError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

#[derive(Clone, Debug)]
pub enum RecordSource {
    Url(Url),
    FilePath(PathBuf),
    Inline { name: String, body: String },
}

impl RecordSource {
    /// A URL when the value parses as http(s), a file path otherwise.
    pub fn parse(value: &str) -> Self {
        let raw = value.trim();
        match Url::parse(raw) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => RecordSource::Url(url),
            _ => RecordSource::FilePath(PathBuf::from(raw)),
        }
    }

    /// Name used in error messages, e.g. `records.json`.
    pub fn resource_name(&self) -> String {
        let name = match self {
            RecordSource::Url(url) => url
                .path_segments()
                .and_then(|mut s| s.next_back())
                .unwrap_or_default()
                .to_string(),
            RecordSource::FilePath(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
            RecordSource::Inline { name, .. } => name.clone(),
        };
        if name.is_empty() {
            "records.json".to_string()
        } else {
            name
        }
    }

    pub async fn fetch(&self, client: &reqwest::Client) -> Result<String, LoadError> {
        let resource = self.resource_name();
        match self {
            RecordSource::Url(url) => {
                let response = client
                    .get(url.clone())
                    .header(reqwest::header::CACHE_CONTROL, "no-store")
                    .header(reqwest::header::PRAGMA, "no-cache")
                    .send()
                    .await
                    .map_err(|e| LoadError::Request {
                        resource: resource.clone(),
                        source: e,
                    })?;
                let status = response.status();
                if !status.is_success() {
                    return Err(LoadError::Status {
                        resource,
                        status: status.as_u16(),
                    });
                }
                response.text().await.map_err(|e| LoadError::Request {
                    resource,
                    source: e,
                })
            }
            RecordSource::FilePath(path) => tokio::fs::read_to_string(path)
                .await
                .map_err(|e| LoadError::Read {
                    resource,
                    source: e,
                }),
            RecordSource::Inline { body, .. } => Ok(body.clone()),
        }
    }
}

pub fn build_client(
    timeout_seconds: u64,
    proxy: Option<&str>,
) -> Result<reqwest::Client, LoadError> {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        reqwest::header::USER_AGENT,
        reqwest::header::HeaderValue::from_static(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        )),
    );

    let mut builder = reqwest::Client::builder()
        .default_headers(headers)
        .redirect(reqwest::redirect::Policy::limited(10))
        .timeout(Duration::from_secs(timeout_seconds.max(1)));

    if let Some(proxy) = proxy.filter(|p| !p.trim().is_empty()) {
        let proxy = reqwest::Proxy::all(proxy).map_err(|e| LoadError::ProxySetup {
            proxy: proxy.to_string(),
            source: e,
        })?;
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|e| LoadError::HttpClientBuild { source: e })
}

/// Parses a payload and normalizes its elements.
pub fn parse_records(resource: &str, body: &str) -> Result<LoadReport, RecordsError> {
    let json: Value = serde_json::from_str(body).map_err(|e| LoadError::Parse {
        resource: resource.to_string(),
        source: e,
    })?;
    let Value::Array(values) = json else {
        return Err(SchemaError {
            resource: resource.to_string(),
        }
        .into());
    };
    Ok(normalize_all(&values))
}

pub async fn load_records(
    source: &RecordSource,
    client: &reqwest::Client,
) -> Result<LoadReport, RecordsError> {
    let body = source.fetch(client).await?;
    let report = parse_records(&source.resource_name(), &body)?;
    tracing::debug!(
        resource = %source.resource_name(),
        records = report.records.len(),
        rejected = report.rejected.len(),
        "records loaded"
    );
    Ok(report)
}

pub mod cli;
pub mod constants;
pub mod error;
pub mod image_source;
pub mod normalize;
pub mod proto;
pub mod reader;
pub mod writer;

use std::{future::Future, sync::Arc};

use bytes::Bytes;
use gcp_auth::TokenProvider;
use prost::Message;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use url::Url;

use crate::{constants::*, error::VisionError, proto::*};

/// Anything that can run text detection on an image path.
///
/// [`VisionClient`] talks to the real service; tests substitute a fake.
pub trait TextDetector {
    fn detect(
        &self,
        path: &str,
    ) -> impl Future<Output = Result<AnnotateImageResponse, VisionError>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    ApiKey(String),
    AccessToken(String),
    /// Application Default Credentials: `GOOGLE_APPLICATION_CREDENTIALS`,
    /// the gcloud ADC file or the metadata server, resolved by `gcp_auth`.
    ApplicationDefault,
}

impl Credentials {
    /// API key, then access token, then Application Default Credentials.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(key) = non_empty(&lookup, API_KEY_ENV) {
            return Credentials::ApiKey(key);
        }
        if let Some(token) = non_empty(&lookup, ACCESS_TOKEN_ENV) {
            return Credentials::AccessToken(token);
        }
        Credentials::ApplicationDefault
    }
}

/// Looks up `key`, treating an unset or blank value alike.
fn non_empty(lookup: impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone)]
pub struct VisionConfig {
    pub endpoint: Url,
    pub credentials: Credentials,
    pub quota_project: Option<String>,
}

impl VisionConfig {
    pub fn new(credentials: Credentials) -> Result<Self, VisionError> {
        Ok(Self {
            endpoint: parse_endpoint(VISION_ANNOTATE_ENDPOINT)?,
            credentials,
            quota_project: None,
        })
    }

    pub fn from_env() -> Result<Self, VisionError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, VisionError> {
        let credentials = Credentials::from_lookup(&lookup);
        let endpoint = match non_empty(&lookup, ENDPOINT_ENV) {
            Some(raw) => parse_endpoint(&raw)?,
            None => parse_endpoint(VISION_ANNOTATE_ENDPOINT)?,
        };

        Ok(Self {
            endpoint,
            credentials,
            quota_project: non_empty(&lookup, QUOTA_PROJECT_ENV),
        })
    }
}

fn parse_endpoint(raw: &str) -> Result<Url, VisionError> {
    Url::parse(raw).map_err(|source| VisionError::InvalidEndpoint {
        endpoint: raw.to_string(),
        source,
    })
}

// --- Client Implementation ---

pub struct VisionClient {
    client: reqwest::Client,
    config: VisionConfig,
    token_provider: Option<Arc<dyn TokenProvider>>,
}

impl VisionClient {
    pub fn new(config: VisionConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            token_provider: None,
        }
    }

    /// Builds a client from the environment. Application Default
    /// Credentials are resolved here, so a missing setup fails before the
    /// image is read.
    pub async fn from_env() -> Result<Self, VisionError> {
        let mut client = Self::new(VisionConfig::from_env()?);
        if client.config.credentials == Credentials::ApplicationDefault {
            client.token_provider = Some(gcp_auth::provider().await?);
        }
        Ok(client)
    }

    pub async fn process_image_path(
        &self,
        path: &str,
    ) -> Result<AnnotateImageResponse, VisionError> {
        let image = image_source::load_image_from_path(path)?;
        self.send_request(image).await
    }

    async fn send_request(
        &self,
        image: Bytes,
    ) -> Result<AnnotateImageResponse, VisionError> {
        let payload = build_request(image).encode_to_vec();

        let mut url = self.config.endpoint.clone();
        url.query_pairs_mut().append_pair("$alt", "proto");
        log::debug!("POST {} ({} bytes)", self.config.endpoint, payload.len());

        let response = self
            .client
            .post(url)
            .headers(self.headers().await?)
            .body(payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await?;
            return Err(VisionError::Http { status, body });
        }

        let resp_bytes = response.bytes().await?;
        let batch = BatchAnnotateImagesResponse::decode(resp_bytes)?;

        parse_response(batch)
    }

    async fn headers(&self) -> Result<HeaderMap, VisionError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(PROTOBUF_CONTENT_TYPE));
        headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));

        match &self.config.credentials {
            Credentials::ApiKey(key) => {
                let mut value = HeaderValue::from_str(key)?;
                value.set_sensitive(true);
                headers.insert(API_KEY_HEADER, value);
            }
            Credentials::AccessToken(token) => {
                headers.insert(AUTHORIZATION, bearer(token)?);
            }
            Credentials::ApplicationDefault => {
                let provider = match &self.token_provider {
                    Some(provider) => provider.clone(),
                    None => gcp_auth::provider().await?,
                };
                let token = provider.token(CLOUD_PLATFORM_SCOPES).await?;
                headers.insert(AUTHORIZATION, bearer(token.as_str())?);
            }
        }

        if let Some(project) = &self.config.quota_project {
            headers.insert(USER_PROJECT_HEADER, HeaderValue::from_str(project)?);
        }

        Ok(headers)
    }
}

fn bearer(token: &str) -> Result<HeaderValue, VisionError> {
    let mut value = HeaderValue::from_str(&format!("Bearer {token}"))?;
    value.set_sensitive(true);
    Ok(value)
}

impl TextDetector for VisionClient {
    async fn detect(&self, path: &str) -> Result<AnnotateImageResponse, VisionError> {
        self.process_image_path(path).await
    }
}

/// Which view of the response is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Flat list of text annotations.
    Annotations,
    /// Pages, blocks, paragraphs and words.
    Document,
}

/// Normalizes the path argument, runs detection and renders the line
/// protocol. Nothing is rendered unless the call succeeds.
pub async fn run<D: TextDetector>(
    detector: &D,
    image_arg: &str,
    layout: Layout,
) -> anyhow::Result<String> {
    let path = normalize::normalize_path(image_arg)?;
    let response = detector.detect(&path).await?;

    let output = match layout {
        Layout::Annotations => writer::render_annotations(&response)?,
        Layout::Document => writer::render_document(&response)?,
    };
    Ok(output)
}

/// One image, one `TEXT_DETECTION` feature bounded to 100 results.
pub fn build_request(content: Bytes) -> BatchAnnotateImagesRequest {
    BatchAnnotateImagesRequest {
        requests: vec![AnnotateImageRequest {
            image: Some(Image { content }),
            features: vec![Feature {
                r#type: FeatureType::TextDetection as i32,
                max_results: TEXT_DETECTION_MAX_RESULTS,
            }],
        }],
    }
}

/// Extracts the single image response, failing on an embedded error status.
pub fn parse_response(
    batch: BatchAnnotateImagesResponse,
) -> Result<AnnotateImageResponse, VisionError> {
    let response = batch
        .responses
        .into_iter()
        .next()
        .ok_or(VisionError::EmptyResponse)?;

    if let Some(status) = response.error.as_ref().filter(|s| s.code != 0) {
        return Err(VisionError::Service {
            code: status.code,
            message: status.message.clone(),
        });
    }

    log::debug!(
        "received {} text annotations, {} pages",
        response.text_annotations.len(),
        response
            .full_text_annotation
            .as_ref()
            .map_or(0, |doc| doc.pages.len())
    );

    Ok(response)
}

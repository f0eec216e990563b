use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::multipart;
use reqwest::{Client, Response, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;

#[cfg(test)]
use mockall::automock;

use crate::config::ServerConfig;
use crate::error::{CuratorError, Result};
use crate::gallery::GalleryQuery;
use crate::models::{
    ConversationPage, DeleteAck, GalleryImage, GenerateAccepted, HistoryResponse, ImageTaskStatus,
    ProcessRequest, ProcessResponse, TaskStatus,
};
use crate::studio::GenerateImageRequest;

/// Header the backend expects the CSRF cookie echoed into on mutating calls.
const CSRF_HEADER: &str = "X-CSRFToken";
const CSRF_COOKIE: &str = "csrftoken";

/// One method per backend endpoint. The conversation panel, image studio and
/// archive browser all talk to the backend through this seam so tests can
/// swap in a mock.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Backend: Send + Sync {
    async fn list_conversations(&self, offset: u32, limit: u32) -> Result<ConversationPage>;
    async fn conversation_history(&self, conversation_id: &str) -> Result<HistoryResponse>;
    async fn delete_oldest(&self, count: usize) -> Result<DeleteAck>;
    async fn process_request(&self, request: &ProcessRequest) -> Result<ProcessResponse>;
    async fn task_status(&self, task_id: &str) -> Result<TaskStatus>;
    async fn generate_image(&self, request: &GenerateImageRequest) -> Result<GenerateAccepted>;
    async fn image_task_status(&self, task_id: &str) -> Result<ImageTaskStatus>;
    async fn gallery_images(&self, query: &GalleryQuery) -> Result<Vec<GalleryImage>>;
}

/// Structured error payload some endpoints return on non-success statuses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[derive(Debug)]
pub struct HttpBackend {
    client: Client,
    jar: Arc<Jar>,
    base: Url,
}

impl HttpBackend {
    pub fn new(cfg: &ServerConfig) -> Result<Self> {
        let base = Url::parse(&cfg.base_url)
            .map_err(|e| CuratorError::Config(format!("invalid base_url {}: {e}", cfg.base_url)))?;
        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .timeout(Duration::from_secs(cfg.request_timeout_seconds))
            .build()?;
        Ok(Self { client, jar, base })
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|e| CuratorError::Config(format!("invalid endpoint path {path}: {e}")))
    }

    /// Read the CSRF token back out of the session cookie jar.
    fn csrf_token(&self) -> Option<String> {
        let header = self.jar.cookies(&self.base)?;
        let cookies = header.to_str().ok()?;
        csrf_from_cookie_header(cookies).map(str::to_string)
    }

    fn with_csrf(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.csrf_token() {
            Some(token) => builder.header(CSRF_HEADER, token),
            None => builder,
        }
    }

    /// Map a response into the error taxonomy: structured error body,
    /// unstructured error body, or a decoded payload (with shape mismatches
    /// kept distinct from transport failures).
    async fn decode<T: DeserializeOwned>(response: Response, context: &str) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if let Ok(err) = serde_json::from_str::<ErrorBody>(&body) {
                if let Some(message) = err.message {
                    return Err(CuratorError::Api {
                        status: status.as_u16(),
                        message,
                    });
                }
            }
            return Err(CuratorError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }
        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| CuratorError::UnexpectedResponse(format!("{context}: {e}")))
    }
}

fn csrf_from_cookie_header(cookies: &str) -> Option<&str> {
    cookies
        .split("; ")
        .find_map(|pair| pair.strip_prefix(CSRF_COOKIE)?.strip_prefix('='))
}

#[async_trait]
impl Backend for HttpBackend {
    async fn list_conversations(&self, offset: u32, limit: u32) -> Result<ConversationPage> {
        let response = self
            .client
            .get(self.url("/api/conversations/")?)
            .query(&[("offset", offset), ("limit", limit)])
            .send()
            .await?;
        Self::decode(response, "conversation list").await
    }

    async fn conversation_history(&self, conversation_id: &str) -> Result<HistoryResponse> {
        let response = self
            .client
            .get(self.url(&format!("/api/conversations/{conversation_id}/"))?)
            .send()
            .await?;
        Self::decode(response, "conversation history").await
    }

    async fn delete_oldest(&self, count: usize) -> Result<DeleteAck> {
        let builder = self
            .client
            .post(self.url("/api/conversations/delete_oldest/")?)
            .form(&[("count", count.to_string())]);
        let response = self.with_csrf(builder).send().await?;
        Self::decode(response, "delete oldest").await
    }

    async fn process_request(&self, request: &ProcessRequest) -> Result<ProcessResponse> {
        let builder = self
            .client
            .post(self.url("/api/process_request/")?)
            .json(request);
        let response = self.with_csrf(builder).send().await?;
        Self::decode(response, "process request").await
    }

    async fn task_status(&self, task_id: &str) -> Result<TaskStatus> {
        let response = self
            .client
            .get(self.url(&format!("/api/tasks/{task_id}/status/"))?)
            .send()
            .await?;
        Self::decode(response, "task status").await
    }

    async fn generate_image(&self, request: &GenerateImageRequest) -> Result<GenerateAccepted> {
        let mut form = multipart::Form::new().text("prompt", request.prompt.clone());
        if let Some(negative) = &request.negative_prompt {
            form = form.text("negative_prompt", negative.clone());
        }
        if let Some(image) = &request.input_image {
            let part =
                multipart::Part::bytes(image.bytes.clone()).file_name(image.file_name.clone());
            form = form.part("input_image", part);
        }
        let builder = self
            .client
            .post(self.url("/api/generate-image/")?)
            .multipart(form);
        let response = self.with_csrf(builder).send().await?;
        Self::decode(response, "generate image").await
    }

    async fn image_task_status(&self, task_id: &str) -> Result<ImageTaskStatus> {
        let response = self
            .client
            .get(self.url(&format!("/api/task-status/{task_id}/"))?)
            .send()
            .await?;
        Self::decode(response, "image task status").await
    }

    async fn gallery_images(&self, query: &GalleryQuery) -> Result<Vec<GalleryImage>> {
        let response = self
            .client
            .get(self.url("/api/images/")?)
            .query(&query.as_pairs())
            .send()
            .await?;
        Self::decode(response, "gallery images").await
    }
}

use crate::config::StorageConfig;
use crate::error::{DeployError, OssError};
use crate::models::download::format_bytes;
use crate::storage::signing;
use crate::storage::{content_type_for, BucketInfo, ObjectStore};
use async_trait::async_trait;
use futures_util::Stream;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::header::{AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE, DATE};
use reqwest::{Body, Method, Request, Response, Url};
use std::io;
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

const CHUNK_SIZE: usize = 256 * 1024;

/// Aliyun OSS client for a single bucket
///
/// Talks to the REST API directly with V1 header signatures, using
/// virtual-hosted addressing (`https://<bucket>.<endpoint>/<key>`).
pub struct OssClient {
    client: reqwest::Client,
    access_key_id: String,
    access_key_secret: String,
    bucket: String,
    host: String,
}

impl std::fmt::Debug for OssClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OssClient")
            .field("client", &"Client { ... }")
            .field("access_key_id", &self.access_key_id)
            .field("access_key_secret", &"***")
            .field("bucket", &self.bucket)
            .field("host", &self.host)
            .finish()
    }
}

/// Request body with its exact length
struct Upload {
    body: Body,
    length: u64,
    content_type: &'static str,
}

impl OssClient {
    /// Create a client for the bucket described by `config`
    pub fn new(config: &StorageConfig) -> Result<Self, OssError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("model-oss/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let host = config.bucket_host();
        Url::parse(&format!("https://{host}/"))
            .map_err(|e| OssError::InvalidEndpoint(format!("{host}: {e}")))?;

        Ok(Self {
            client,
            access_key_id: config.access_key_id.clone(),
            access_key_secret: config.access_key_secret.clone(),
            bucket: config.bucket_name.clone(),
            host,
        })
    }

    /// Create a client, reporting a malformed endpoint as a connection failure
    pub fn connect(config: &StorageConfig) -> crate::error::Result<Self> {
        Self::new(config).map_err(DeployError::Connectivity)
    }

    /// Request URL for `key` and an optional sub-resource
    pub fn object_url(&self, key: &str, subresource: Option<&str>) -> Result<Url, OssError> {
        let raw = match subresource {
            Some(sub) => format!("https://{}/{key}?{sub}", self.host),
            None => format!("https://{}/{key}", self.host),
        };

        Url::parse(&raw).map_err(|e| OssError::InvalidEndpoint(format!("{raw}: {e}")))
    }

    /// Build a signed request dated `date`
    fn build_request(
        &self,
        method: Method,
        key: &str,
        subresource: Option<&str>,
        upload: Option<Upload>,
        date: &str,
    ) -> Result<Request, OssError> {
        let url = self.object_url(key, subresource)?;
        let content_type = upload.as_ref().map_or("", |u| u.content_type);

        let string_to_sign = signing::string_to_sign(
            method.as_str(),
            "",
            content_type,
            date,
            &signing::canonical_resource(&self.bucket, key, subresource),
        );
        let signature = signing::sign(&self.access_key_secret, &string_to_sign)?;

        let mut request = self
            .client
            .request(method, url)
            .header(DATE, date)
            .header(
                AUTHORIZATION,
                signing::authorization(&self.access_key_id, &signature),
            );

        if let Some(upload) = upload {
            request = request
                .header(CONTENT_TYPE, upload.content_type)
                .header(CONTENT_LENGTH, upload.length)
                .body(upload.body);
        }

        Ok(request.build()?)
    }

    /// Sign and send one request, mapping error responses to [`OssError::Http`]
    async fn send(
        &self,
        method: Method,
        key: &str,
        subresource: Option<&str>,
        upload: Option<Upload>,
    ) -> Result<Response, OssError> {
        let date = signing::http_date(chrono::Utc::now());
        let request = self.build_request(method, key, subresource, upload, &date)?;

        let response = self.client.execute(request).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::debug!("OSS error response ({status}): {body}");
        Err(error_from_body(status.as_u16(), &body))
    }
}

#[async_trait]
impl ObjectStore for OssClient {
    async fn bucket_info(&self) -> Result<BucketInfo, OssError> {
        let response = self
            .send(Method::GET, "", Some("bucketInfo"), None)
            .await?;
        let body = response.text().await?;

        Ok(BucketInfo {
            name: xml_text(&body, "Name"),
            location: xml_text(&body, "Location"),
            storage_class: xml_text(&body, "StorageClass"),
        })
    }

    async fn put_file(&self, key: &str, path: &Path) -> Result<u64, OssError> {
        let (upload, progress) = streamed_upload(path).await?;
        let length = upload.length;

        match self.send(Method::PUT, key, None, Some(upload)).await {
            Ok(_) => {
                progress.finish_and_clear();
                Ok(length)
            }
            Err(e) => {
                progress.abandon();
                Err(e)
            }
        }
    }

    fn store_name(&self) -> &str {
        "aliyun-oss"
    }
}

/// Streamed body for the file at `path`, with the progress bar it advances
async fn streamed_upload(path: &Path) -> Result<(Upload, ProgressBar), OssError> {
    let file = File::open(path).await?;
    let length = file.metadata().await?.len();

    let progress = upload_progress(length);
    let upload = Upload {
        body: Body::wrap_stream(chunked(file, progress.clone())),
        length,
        content_type: content_type_for(path),
    };
    Ok((upload, progress))
}

/// Byte progress bar for one upload
fn upload_progress(length: u64) -> ProgressBar {
    let progress = ProgressBar::new(length);
    if let Ok(style) = ProgressStyle::with_template(
        "   {bar:40.cyan/blue} {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
    ) {
        progress.set_style(style.progress_chars("=> "));
    }
    tracing::debug!("Uploading {}", format_bytes(length));
    progress
}

/// Read `file` in fixed-size chunks, advancing `progress` as chunks are handed out
fn chunked(
    file: File,
    progress: ProgressBar,
) -> impl Stream<Item = io::Result<Vec<u8>>> + Send + Sync + 'static {
    futures_util::stream::try_unfold((file, progress), |(mut file, progress)| async move {
        let mut chunk = vec![0u8; CHUNK_SIZE];
        let read = file.read(&mut chunk).await?;
        if read == 0 {
            return Ok(None);
        }

        chunk.truncate(read);
        progress.inc(read as u64);
        Ok::<_, io::Error>(Some((chunk, (file, progress))))
    })
}

/// Text of the first `<tag>...</tag>` element in `xml`
#[must_use]
pub fn xml_text(xml: &str, tag: &str) -> Option<String> {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");

    let start = xml.find(&open)? + open.len();
    let end = xml[start..].find(&close)? + start;
    Some(xml[start..end].trim().to_string())
}

/// Build an [`OssError::Http`] from an OSS XML error body
#[must_use]
pub fn error_from_body(status: u16, body: &str) -> OssError {
    OssError::Http {
        status,
        code: xml_text(body, "Code").unwrap_or_else(|| "Unknown".to_string()),
        message: xml_text(body, "Message").unwrap_or_else(|| {
            if body.trim().is_empty() {
                "empty response body".to_string()
            } else {
                body.trim().to_string()
            }
        }),
        request_id: xml_text(body, "RequestId").unwrap_or_else(|| "-".to_string()),
    }
}

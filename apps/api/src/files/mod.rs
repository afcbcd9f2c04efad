//! Resume file storage in an S3-compatible bucket.

pub mod handlers;

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

/// Uploads larger than this are rejected.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Error)]
pub enum FileError {
    #[error("upload failed: {0}")]
    Upload(String),

    #[error("delete failed: {0}")]
    Delete(String),
}

/// Accepted resume formats, keyed by MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeFormat {
    Pdf,
    Docx,
    Txt,
}

impl ResumeFormat {
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        match content_type.split(';').next().unwrap_or("").trim() {
            "application/pdf" => Some(ResumeFormat::Pdf),
            DOCX_MIME => Some(ResumeFormat::Docx),
            "text/plain" => Some(ResumeFormat::Txt),
            _ => None,
        }
    }

    /// The `file_format` label stored on the resume.
    pub fn label(self) -> &'static str {
        match self {
            ResumeFormat::Pdf => "PDF",
            ResumeFormat::Docx => "DOCX",
            ResumeFormat::Txt => "TXT",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ResumeFormat::Pdf => "pdf",
            ResumeFormat::Docx => "docx",
            ResumeFormat::Txt => "txt",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            ResumeFormat::Pdf => "application/pdf",
            ResumeFormat::Docx => DOCX_MIME,
            ResumeFormat::Txt => "text/plain",
        }
    }
}

/// `<user_id>/<unix_millis>-<uuid>.<ext>`
pub fn object_key(user_id: Uuid, unix_millis: i64, format: ResumeFormat) -> String {
    format!("{user_id}/{unix_millis}-{}.{}", Uuid::new_v4(), format.extension())
}

#[async_trait]
pub trait FileStore: Send + Sync {
    /// Stores the object and returns its public URL.
    async fn put(&self, key: &str, format: ResumeFormat, body: Bytes) -> Result<String, FileError>;

    /// Deletes the object behind `url`. Returns `false` for URLs outside our bucket.
    async fn delete_url(&self, url: &str) -> Result<bool, FileError>;
}

/// Public URLs look like `{public_url}/{bucket}/{key}`.
pub struct S3FileStore {
    client: S3Client,
    bucket: String,
    public_url: String,
}

impl S3FileStore {
    pub fn new(client: S3Client, bucket: String, public_url: String) -> Self {
        Self {
            client,
            bucket,
            public_url: public_url.trim_end_matches('/').to_string(),
        }
    }

    fn url_prefix(&self) -> String {
        format!("{}/{}/", self.public_url, self.bucket)
    }

    pub fn public_url_for(&self, key: &str) -> String {
        format!("{}{key}", self.url_prefix())
    }

    /// The object key for a URL we issued, or `None` for foreign links.
    pub fn key_from_url(&self, url: &str) -> Option<String> {
        url.strip_prefix(&self.url_prefix())
            .filter(|key| !key.is_empty())
            .map(str::to_string)
    }
}

#[async_trait]
impl FileStore for S3FileStore {
    async fn put(&self, key: &str, format: ResumeFormat, body: Bytes) -> Result<String, FileError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(format.mime())
            .cache_control("max-age=3600")
            .send()
            .await
            .map_err(|e| FileError::Upload(e.to_string()))?;

        info!("Uploaded resume file to s3://{}/{}", self.bucket, key);
        Ok(self.public_url_for(key))
    }

    async fn delete_url(&self, url: &str) -> Result<bool, FileError> {
        let Some(key) = self.key_from_url(url) else {
            return Ok(false);
        };
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
            .map_err(|e| FileError::Delete(e.to_string()))?;

        info!("Deleted resume file s3://{}/{}", self.bucket, key);
        Ok(true)
    }
}

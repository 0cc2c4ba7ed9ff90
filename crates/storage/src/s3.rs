//! S3 object-storage provider.

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;

use crate::gateway::{ObjectStorage, StorageError, StoredObject};

/// S3 connection settings loaded from the environment.
#[derive(Debug, Clone)]
pub struct S3Config {
    /// Region used for the default virtual-hosted public URL.
    pub region: String,
    /// Optional endpoint override for S3-compatible backends (forces
    /// path-style addressing).
    pub endpoint_url: Option<String>,
    /// Optional base URL for serving objects through a CDN; when set,
    /// public URLs are `{public_base_url}/{bucket}/{key}`.
    pub public_base_url: Option<String>,
}

impl S3Config {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var               | Default     |
    /// |-----------------------|-------------|
    /// | `AWS_REGION`          | `us-east-1` |
    /// | `S3_ENDPOINT_URL`     | unset       |
    /// | `S3_PUBLIC_BASE_URL`  | unset       |
    pub fn from_env() -> Self {
        Self {
            region: std::env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".into()),
            endpoint_url: std::env::var("S3_ENDPOINT_URL").ok(),
            public_base_url: std::env::var("S3_PUBLIC_BASE_URL").ok(),
        }
    }
}

/// Production storage provider backed by the AWS S3 SDK.
///
/// S3 `PutObject` is atomic -- an object either fully exists at its key
/// after a successful call or does not exist at all, which is exactly the
/// all-or-nothing guarantee abandoned uploads rely on.
pub struct S3Storage {
    client: aws_sdk_s3::Client,
    config: S3Config,
}

impl S3Storage {
    /// Build a provider from ambient AWS credentials and [`S3Config`].
    pub async fn connect(config: S3Config) -> Self {
        let shared = aws_config::load_from_env().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = &config.endpoint_url {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Self {
            client: aws_sdk_s3::Client::from_conf(builder.build()),
            config,
        }
    }

    /// Public URL for an object.
    fn public_url(&self, bucket: &str, key: &str) -> String {
        match &self.config.public_base_url {
            Some(base) => format!("{}/{bucket}/{key}", base.trim_end_matches('/')),
            None => format!(
                "https://{bucket}.s3.{}.amazonaws.com/{key}",
                self.config.region
            ),
        }
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject, StorageError> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| StorageError::Write(e.to_string()))?;

        tracing::debug!(bucket, key, "Object stored");

        Ok(StoredObject {
            bucket: bucket.to_string(),
            storage_key: key.to_string(),
            public_url: self.public_url(bucket, key),
        })
    }

    async fn remove(&self, bucket: &str, key: &str) -> Result<(), StorageError> {
        // S3 DeleteObject succeeds on absent keys, so this is idempotent
        // by construction.
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::Delete(e.to_string()))?;

        tracing::debug!(bucket, key, "Object removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(public_base_url: Option<&str>) -> S3Config {
        S3Config {
            region: "eu-west-1".into(),
            endpoint_url: None,
            public_base_url: public_base_url.map(String::from),
        }
    }

    #[test]
    fn default_public_url_is_virtual_hosted() {
        let storage = S3Storage {
            client: aws_sdk_s3::Client::from_conf(
                aws_sdk_s3::Config::builder()
                    .behavior_version(aws_sdk_s3::config::BehaviorVersion::latest())
                    .build(),
            ),
            config: config(None),
        };
        assert_eq!(
            storage.public_url("ai-assets", "7/abc.png"),
            "https://ai-assets.s3.eu-west-1.amazonaws.com/7/abc.png"
        );
    }

    #[test]
    fn cdn_base_url_wins_when_configured() {
        let storage = S3Storage {
            client: aws_sdk_s3::Client::from_conf(
                aws_sdk_s3::Config::builder()
                    .behavior_version(aws_sdk_s3::config::BehaviorVersion::latest())
                    .build(),
            ),
            config: config(Some("https://cdn.example.com/")),
        };
        assert_eq!(
            storage.public_url("ai-assets", "7/abc.png"),
            "https://cdn.example.com/ai-assets/7/abc.png"
        );
    }
}

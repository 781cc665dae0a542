//! Supabase Storage client
//!
//! Implements [`ObjectStore`] for a single bucket through the Storage REST
//! API (`/storage/v1/object/...`). Objects under a public bucket are served
//! from `/storage/v1/object/public/{bucket}/{path}`.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::debug;

use super::{api_error, ObjectStore, StoreResult};
use crate::core::config::SupabaseConfig;

pub struct SupabaseStorageClient {
    http_client: Client,
    base_url: String,
    key: String,
    bucket: String,
}

impl SupabaseStorageClient {
    pub fn new(config: &SupabaseConfig) -> StoreResult<Self> {
        let http_client = Client::builder().build()?;

        Ok(Self {
            http_client,
            base_url: config.url.clone(),
            key: config.key.clone(),
            bucket: config.bucket.clone(),
        })
    }

    pub fn bucket_name(&self) -> &str {
        &self.bucket
    }

    /// Percent-encode each path segment, keeping the separators
    fn encode_path(path: &str) -> String {
        path.split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/")
    }

    fn object_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url,
            urlencoding::encode(&self.bucket),
            Self::encode_path(path)
        )
    }
}

#[async_trait]
impl ObjectStore for SupabaseStorageClient {
    async fn upload(&self, path: &str, data: Vec<u8>, content_type: &str) -> StoreResult<()> {
        let response = self
            .http_client
            .post(self.object_url(path))
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
            .header("Content-Type", content_type)
            .header("x-upsert", "false")
            .body(data)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        debug!("Uploaded '{}' to bucket '{}'", path, self.bucket);
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url,
            urlencoding::encode(&self.bucket),
            Self::encode_path(path)
        )
    }

    async fn remove(&self, paths: &[String]) -> StoreResult<()> {
        let url = format!(
            "{}/storage/v1/object/{}",
            self.base_url,
            urlencoding::encode(&self.bucket)
        );

        let response = self
            .http_client
            .delete(url)
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
            .json(&json!({ "prefixes": paths }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        debug!("Removed {:?} from bucket '{}'", paths, self.bucket);
        Ok(())
    }
}

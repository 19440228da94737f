//! S3-compatible object storage component. Only started and probed when `s3.enabled`.

use crate::components::Component;
use crate::error::AppError;
use crate::settings::S3Settings;
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::Client;
use std::sync::RwLock;

pub struct ObjectStorage {
    settings: S3Settings,
    client: RwLock<Option<Client>>,
}

impl ObjectStorage {
    pub fn new(settings: &S3Settings) -> Self {
        ObjectStorage {
            settings: settings.clone(),
            client: RwLock::new(None),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.settings.bucket
    }

    pub fn client(&self) -> Result<Client, AppError> {
        self.client
            .read()
            .ok()
            .and_then(|guard| guard.clone())
            .ok_or(AppError::NotStarted("s3"))
    }
}

#[async_trait]
impl Component for ObjectStorage {
    async fn start(&self) -> Result<(), AppError> {
        let conn = &self.settings.connection;
        let credentials = Credentials::new(&conn.access_key, &conn.secret_key, None, None, "settings");
        let shared = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(self.settings.region.clone()))
            .endpoint_url(&conn.url)
            .credentials_provider(credentials)
            .load()
            .await;
        // MinIO and most self-hosted endpoints only serve path-style URLs.
        let config = aws_sdk_s3::config::Builder::from(&shared)
            .force_path_style(true)
            .build();
        if let Ok(mut guard) = self.client.write() {
            *guard = Some(Client::from_conf(config));
        }
        tracing::info!(endpoint = %conn.url, bucket = %self.settings.bucket, "object storage client ready");
        Ok(())
    }

    async fn stop(&self) {
        if let Ok(mut guard) = self.client.write() {
            guard.take();
        }
    }

    async fn is_alive(&self) -> Result<bool, AppError> {
        let client = self.client()?;
        client
            .head_bucket()
            .bucket(self.bucket())
            .send()
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn probe_before_start_is_not_started() {
        let storage = ObjectStorage::new(&S3Settings::default());
        assert!(matches!(storage.is_alive().await, Err(AppError::NotStarted("s3"))));
        storage.stop().await;
    }
}

#![allow(dead_code)]

use actix_web::web;
use qasset::{
    entities::asset::AssetResponse,
    middlewares::idempotency::IdempotencyStore,
    settings::{AppConfig, AppEnvironment},
    startup,
    storage::local::LocalStorage,
    AppState,
};
use reqwest::{multipart::{Form, Part}, Client, Response};
use std::{net::TcpListener, path::{Path, PathBuf}, time::Duration};
use tempfile::TempDir;

pub const PLACEHOLDER: &str = "resources/asset/broken.webp";

pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub config: AppConfig,
    pub storage_dir: TempDir,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(|_| {}).await
    }

    pub async fn spawn_with(customize: impl FnOnce(&mut AppConfig)) -> Self {
        let storage_dir = tempfile::tempdir().expect("Failed to create storage dir");
        let mut config = test_config(storage_dir.path());
        customize(&mut config);

        LocalStorage::from(&config)
            .ensure_roots()
            .await
            .expect("Failed to create storage roots");

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let state = web::Data::new(AppState::new(&config));
        let idempotency = IdempotencyStore::new(Duration::from_secs(config.idempotency_ttl_secs));
        let server = startup::run(listener, state, idempotency, config.workers())
            .expect("Failed to bind server");

        tokio::spawn(server);

        let client = Client::new();
        while client.get(&format!("{}/livez", address)).send().await.is_err() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        Self {
            address,
            client,
            config,
            storage_dir,
        }
    }

    pub fn image_root(&self) -> &Path {
        &self.config.image_root
    }

    pub fn file_root(&self) -> &Path {
        &self.config.file_root
    }

    pub async fn upload(
        &self,
        endpoint: &str,
        field: &str,
        path: Option<&str>,
        file_name: &str,
        contents: &[u8],
    ) -> Response {
        let mut form = Form::new();
        if let Some(path) = path {
            form = form.text("path", path.to_string());
        }
        form = form.part(field.to_string(), Part::bytes(contents.to_vec()).file_name(file_name.to_string()));

        self.client
            .post(&format!("{}{}", self.address, endpoint))
            .multipart(form)
            .send()
            .await
            .expect("Failed to upload")
    }

    pub async fn upload_image(&self, path: Option<&str>, file_name: &str) -> Response {
        self.upload("/upload_image", "image", path, file_name, b"\x89PNG fake image").await
    }

    pub async fn delete(&self, endpoint: &str, path: &str, filename: &str) -> Response {
        self.client
            .delete(&format!("{}{}", self.address, endpoint))
            .form(&[("path", path), ("filename", filename)])
            .send()
            .await
            .expect("Failed to delete")
    }

    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(&format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to send GET")
    }
}

pub async fn body_of(response: Response) -> AssetResponse {
    response.json().await.expect("Failed to parse asset response")
}

pub fn placeholder_bytes() -> Vec<u8> {
    std::fs::read(PLACEHOLDER).expect("Placeholder asset is missing")
}

fn test_config(dir: &Path) -> AppConfig {
    AppConfig {
        env: AppEnvironment::Testing,
        name: "QAsset Test".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        worker_count: 1,
        image_root: dir.join("images"),
        file_root: dir.join("files"),
        placeholder: PathBuf::from(PLACEHOLDER),
        ..AppConfig::default()
    }
}

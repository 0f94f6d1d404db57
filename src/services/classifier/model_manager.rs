use crate::error::AppError;
use futures::StreamExt;
use ort::session::Session;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tauri::{AppHandle, Emitter};
use tokio::sync::Mutex;

/// Pretrained binary waste classifier, exported to ONNX.
const WEIGHTS_FILE: &str = "waste_classifier.onnx";

/// Owns the ONNX session and its lifecycle (download, load, status).
/// Registered as managed Tauri state; all fields are shared handles.
#[derive(Clone)]
pub struct ModelManager {
    pub model_dir: PathBuf,
    model: Arc<std::sync::Mutex<Option<Session>>>,
    loading: Arc<Mutex<bool>>,
    error: Arc<Mutex<Option<String>>>,
}

impl ModelManager {
    pub fn new(app_data_dir: PathBuf) -> Self {
        Self {
            model_dir: app_data_dir.join("models"),
            model: Arc::new(std::sync::Mutex::new(None)),
            loading: Arc::new(Mutex::new(false)),
            error: Arc::new(Mutex::new(None)),
        }
    }

    pub fn model_path(&self) -> PathBuf {
        self.model_dir.join(WEIGHTS_FILE)
    }

    /// In-flight download target. Only a completed download is renamed to
    /// `model_path`, so a truncated file never counts as downloaded.
    fn partial_path(&self) -> PathBuf {
        self.model_dir.join(format!("{}.part", WEIGHTS_FILE))
    }

    pub fn is_downloaded(&self) -> bool {
        self.model_path().exists()
    }

    pub fn is_ready(&self) -> bool {
        self.model.lock().unwrap().is_some()
    }

    pub async fn is_loading(&self) -> bool {
        *self.loading.lock().await
    }

    pub async fn get_error(&self) -> Option<String> {
        self.error.lock().await.clone()
    }

    /// Shared handle to the session slot. Inference locks it for the duration
    /// of one run; the model itself is never cloned.
    pub fn session(&self) -> Arc<std::sync::Mutex<Option<Session>>> {
        self.model.clone()
    }

    pub async fn download_model(&self, app: &AppHandle, url: &str) -> Result<(), AppError> {
        if self.is_downloaded() {
            return Ok(());
        }

        std::fs::create_dir_all(&self.model_dir).map_err(|e| {
            AppError::new(format!("Failed to create model directory: {}", e))
        })?;

        let part_path = self.partial_path();
        if let Err(e) = download_file(url, &part_path, app).await {
            let _ = tokio::fs::remove_file(&part_path).await;
            return Err(e);
        }

        tokio::fs::rename(&part_path, &self.model_path())
            .await
            .map_err(|e| {
                AppError::new(format!("Failed to move downloaded weights into place: {}", e))
            })
    }

    pub async fn load_model(&self) -> Result<(), AppError> {
        if self.is_ready() {
            return Ok(());
        }

        {
            let mut loading = self.loading.lock().await;
            if *loading {
                return Err("Model is already loading".into());
            }
            *loading = true;
        }

        *self.error.lock().await = None;

        let result = self.do_load_model().await;

        *self.loading.lock().await = false;

        if let Err(ref e) = result {
            *self.error.lock().await = Some(e.message.clone());
        }

        result
    }

    async fn do_load_model(&self) -> Result<(), AppError> {
        let model_path = self.model_path();
        if !model_path.exists() {
            return Err(AppError::new(format!(
                "Weights file not found: {}",
                model_path.display()
            )));
        }

        let model = tokio::task::spawn_blocking(move || -> Result<Session, AppError> {
            let _ = ort::init().with_name("eco-care").commit();

            let session = Session::builder()
                .map_err(|e| AppError::new(format!("Failed to create session builder: {}", e)))?
                .with_optimization_level(ort::session::builder::GraphOptimizationLevel::Level3)
                .map_err(|e| AppError::new(format!("Failed to set optimization level: {}", e)))?
                .with_intra_threads(2)
                .map_err(|e| AppError::new(format!("Failed to set intra threads: {}", e)))?
                .with_execution_providers([
                    ort::execution_providers::CPUExecutionProvider::default().build(),
                ])
                .map_err(|e| {
                    AppError::new(format!("Failed to register CPU execution provider: {}", e))
                })?
                .commit_from_file(model_path)
                .map_err(|e| AppError::new(format!("Failed to load ONNX model: {}", e)))?;

            Ok(session)
        })
        .await
        .map_err(|e| AppError::new(format!("Failed to spawn model loading task: {}", e)))??;

        *self.model.lock().unwrap() = Some(model);

        Ok(())
    }
}

async fn download_file(url: &str, dest: &Path, app: &AppHandle) -> Result<(), AppError> {
    let client = reqwest::Client::new();
    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        return Err(format!("Failed to download {}: HTTP {}", url, response.status()).into());
    }

    let total_size = response.content_length().unwrap_or(0);
    let mut downloaded: u64 = 0;

    let mut file = tokio::fs::File::create(dest).await.map_err(|e| {
        AppError::new(format!("Failed to create file {}: {}", dest.display(), e))
    })?;

    let mut stream = response.bytes_stream();
    let mut last_emit = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        downloaded += chunk.len() as u64;
        tokio::io::AsyncWriteExt::write_all(&mut file, &chunk)
            .await
            .map_err(|e| AppError::new(format!("Failed to write to file: {}", e)))?;

        if total_size > 0 {
            let progress = (downloaded * 100) / total_size;
            // Emit every 1% or so to reduce traffic
            if progress > last_emit {
                let _ = app.emit("download-progress", progress);
                last_emit = progress;
            }
        }
    }
    let _ = app.emit("download-progress", 100u64);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_download_is_not_a_downloaded_model() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ModelManager::new(dir.path().to_path_buf());
        std::fs::create_dir_all(&manager.model_dir).unwrap();

        // A download that died mid-stream leaves only the in-flight file.
        std::fs::write(manager.partial_path(), b"truncated stream").unwrap();
        assert!(!manager.is_downloaded());

        // Renaming into place is what completes a download.
        std::fs::rename(manager.partial_path(), manager.model_path()).unwrap();
        assert!(manager.is_downloaded());
    }
}

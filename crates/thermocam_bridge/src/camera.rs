//! Captura de snapshot da câmera IoT via HTTP.
//!
//! O caminho remoto é sempre o mesmo (`/cam.jpg` por padrão); só o nome do
//! arquivo local muda conforme a política de captura.

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thermocam_core::config::CameraConfig;
use tracing::info;

/// Erros de uma captura. Nenhum é fatal e nenhum é repetido.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("Erro na câmera {url}: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("Câmera {url} não respondeu JPEG (content-type: {content_type:?})")]
    NotJpeg { url: String, content_type: String },

    #[error("Falha ao salvar {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Ponto de troca entre o correlator e a câmera real.
pub trait Snapshot {
    /// Busca uma foto da câmera em `ip` e grava em `target`.
    fn capture(&self, ip: IpAddr, target: &Path) -> Result<PathBuf, CaptureError>;
}

/// Cliente HTTP bloqueante da câmera.
pub struct CameraClient {
    client: reqwest::blocking::Client,
    http_port: u16,
    snapshot_path: String,
}

impl CameraClient {
    pub fn new(config: &CameraConfig) -> reqwest::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs_f64(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            http_port: config.http_port,
            snapshot_path: config.snapshot_path.clone(),
        })
    }

    /// URL do snapshot; a porta só aparece quando não é 80.
    pub fn snapshot_url(&self, ip: IpAddr) -> String {
        let host = match (ip, self.http_port) {
            (IpAddr::V4(v4), 80) => v4.to_string(),
            (IpAddr::V6(v6), 80) => format!("[{v6}]"),
            _ => SocketAddr::new(ip, self.http_port).to_string(),
        };
        format!("http://{host}{}", self.snapshot_path)
    }
}

impl Snapshot for CameraClient {
    fn capture(&self, ip: IpAddr, target: &Path) -> Result<PathBuf, CaptureError> {
        let url = self.snapshot_url(ip);

        let response = self
            .client
            .get(&url)
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .map_err(|source| CaptureError::Transport {
                url: url.clone(),
                source,
            })?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();
        if !content_type.contains("image/jpeg") {
            return Err(CaptureError::NotJpeg { url, content_type });
        }

        let body = response
            .bytes()
            .map_err(|source| CaptureError::Transport {
                url: url.clone(),
                source,
            })?;

        std::fs::write(target, &body).map_err(|source| CaptureError::Write {
            path: target.to_path_buf(),
            source,
        })?;

        info!("Foto salva: {} ({} bytes)", target.display(), body.len());
        Ok(target.to_path_buf())
    }
}

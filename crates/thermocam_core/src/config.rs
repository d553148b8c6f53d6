//! Configuração unificada via TOML.
//!
//! Os valores padrão são as constantes de fábrica da ponte; um
//! `config.toml` só é necessário para mudá-las.

use crate::policy::ELEVATED_THRESHOLD;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Nome do dispositivo da câmera.
pub const CAMERA_DEVICE: &str = "cam_a_5";
/// Nome do dispositivo do sensor PIR/térmico.
pub const SENSOR_DEVICE: &str = "pir_s_5";
/// Diretório onde as fotos e o log são salvos.
pub const SAVE_DIR: &str = "photo";
/// Porta UDP de escuta.
pub const UDP_PORT: u16 = 1024;

/// Configuração da ponte (UDP, dispositivos e arquivos).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Porta UDP para escutar
    pub port: u16,
    /// Nome da câmera nos pacotes
    pub camera_device: String,
    /// Nome do sensor nos pacotes
    pub sensor_device: String,
    /// Diretório das fotos
    pub save_dir: String,
    /// Arquivo CSV, relativo a `save_dir`
    pub log_file: String,
    /// Temperatura (°C) a partir da qual a foto é arquivada
    pub elevated_threshold: f64,
    /// Janela (s) em que a câmera pode trocar de IP; 0 = primeiro IP fica
    pub discovery_window_secs: u64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            port: UDP_PORT,
            camera_device: CAMERA_DEVICE.into(),
            sensor_device: SENSOR_DEVICE.into(),
            save_dir: SAVE_DIR.into(),
            log_file: "log.csv".into(),
            elevated_threshold: ELEVATED_THRESHOLD,
            discovery_window_secs: 0,
        }
    }
}

impl BridgeConfig {
    pub fn save_dir(&self) -> PathBuf {
        PathBuf::from(&self.save_dir)
    }

    pub fn log_path(&self) -> PathBuf {
        self.save_dir().join(&self.log_file)
    }

    pub fn discovery_window(&self) -> Option<Duration> {
        (self.discovery_window_secs > 0).then(|| Duration::from_secs(self.discovery_window_secs))
    }
}

/// Configuração do acesso HTTP à câmera.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Porta HTTP da câmera
    pub http_port: u16,
    /// Caminho remoto do snapshot (sempre o mesmo, qualquer que seja o arquivo local)
    pub snapshot_path: String,
    /// Timeout da requisição em segundos
    pub timeout_secs: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            http_port: 80,
            snapshot_path: "/cam.jpg".into(),
            timeout_secs: 10.0,
        }
    }
}

/// Configuração raiz do aplicativo.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub bridge: BridgeConfig,
    pub camera: CameraConfig,
}

impl AppConfig {
    /// Carrega configuração de um arquivo TOML.
    pub fn load(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(content) => match toml::from_str::<AppConfig>(&content) {
                    Ok(config) => {
                        info!("Configuração carregada de {}", path.display());
                        return config;
                    }
                    Err(e) => {
                        warn!("Erro ao parsear {}: {}", path.display(), e);
                    }
                },
                Err(e) => {
                    warn!("Erro ao ler {}: {}", path.display(), e);
                }
            }
        }

        info!("Usando configuração padrão");
        AppConfig::default()
    }

    /// Salva configuração em arquivo TOML.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content = toml::to_string_pretty(self).map_err(|e| e.to_string())?;
        std::fs::write(path, content).map_err(|e| e.to_string())?;
        info!("Configuração salva em {}", path.display());
        Ok(())
    }

    /// Retorna o caminho padrão do config.toml.
    pub fn default_path() -> PathBuf {
        let exe_dir = std::env::current_exe()
            .map(|p| p.parent().unwrap_or(Path::new(".")).to_path_buf())
            .unwrap_or_else(|_| PathBuf::from("."));
        exe_dir.join("config.toml")
    }

    /// Valida a configuração e retorna lista de erros.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let bridge = &self.bridge;

        if bridge.port == 0 {
            errors.push("Porta UDP não pode ser 0".into());
        }
        for (label, name) in [
            ("câmera", &bridge.camera_device),
            ("sensor", &bridge.sensor_device),
        ] {
            if !is_device_name(name) {
                errors.push(format!(
                    "Nome de dispositivo da {label} inválido: {name:?} (7 caracteres, '_' na posição 5)"
                ));
            }
        }
        if bridge.camera_device == bridge.sensor_device {
            errors.push("Câmera e sensor não podem ter o mesmo nome".into());
        }
        if bridge.save_dir.trim().is_empty() {
            errors.push("Diretório de fotos vazio".into());
        }
        if bridge.log_file.trim().is_empty() {
            errors.push("Arquivo de log vazio".into());
        }
        if !bridge.elevated_threshold.is_finite() {
            errors.push(format!(
                "Limiar de temperatura inválido: {}",
                bridge.elevated_threshold
            ));
        }
        if !(self.camera.timeout_secs.is_finite() && self.camera.timeout_secs > 0.0) {
            errors.push(format!(
                "Timeout da câmera inválido: {}",
                self.camera.timeout_secs
            ));
        }
        if !self.camera.snapshot_path.starts_with('/') {
            errors.push(format!(
                "Caminho do snapshot deve começar com '/': {:?}",
                self.camera.snapshot_path
            ));
        }

        errors
    }
}

/// Nome no formato `xxxxx_x` imprimível (7 caracteres, `_` no índice 5).
fn is_device_name(name: &str) -> bool {
    name.len() == 7
        && name.bytes().all(|b| b > b' ' && b <= b'~' && b != b',')
        && name.as_bytes()[5] == b'_'
}

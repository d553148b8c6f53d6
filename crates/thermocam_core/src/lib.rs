//! # Thermocam Core
//!
//! Crate compartilhada que define o protocolo texto dos dispositivos IoT,
//! os tipos de medição, a política de captura, o log CSV e a configuração
//! TOML da ponte sensor → câmera.
//!
//! ## Módulos
//! - [`types`] – Registro UDP, medição e pedido de captura
//! - [`protocol`] – Decodificação, limpeza e validação do datagrama
//! - [`registry`] – Descoberta do IP da câmera
//! - [`policy`] – Escolha do nome do arquivo de foto
//! - [`logbook`] – Log CSV append-only de temperaturas
//! - [`config`] – Configuração unificada via TOML

pub mod types;
pub mod protocol;
pub mod registry;
pub mod policy;
pub mod logbook;
pub mod config;

// Re-exports convenientes
pub use types::{CaptureKind, CaptureRequest, Measurement, SensorRecord};
pub use protocol::{decode_datagram, parse_record, sanitize, MAX_DATAGRAM};
pub use registry::{DeviceRegistry, Discovery};
pub use policy::plan_capture;
pub use logbook::{LogEntry, Logbook};
pub use config::{AppConfig, BridgeConfig, CameraConfig};

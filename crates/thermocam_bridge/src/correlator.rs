//! Correlator: transforma registros UDP em capturas e linhas de log.
//!
//! Cada datagrama passa inteiro pelo pipeline antes do próximo ser lido:
//!
//! ```text
//! bytes → UTF-8 → limpeza → formato ─┬─ câmera → registro de IP
//!                                    └─ sensor → medição → captura → log CSV
//! ```
//!
//! Falhas em qualquer etapa descartam só o registro atual.

use crate::camera::Snapshot;
use crate::listener::{is_transient, Listener};
use chrono::{Local, NaiveDateTime};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Instant;
use thermocam_core::config::{AppConfig, BridgeConfig};
use thermocam_core::logbook::LOG_TIME_FORMAT;
use thermocam_core::protocol::{decode_datagram, parse_record, sanitize, RecordError};
use thermocam_core::types::MeasurementError;
use thermocam_core::{
    plan_capture, CaptureRequest, DeviceRegistry, Discovery, LogEntry, Logbook, Measurement,
    SensorRecord,
};
use tracing::{debug, error, info, warn};

/// Motivo de descarte de um datagrama.
#[derive(Debug, PartialEq)]
pub enum DropReason {
    Record(RecordError),
    Measurement(MeasurementError),
}

/// Resultado da captura de uma medição.
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureOutcome {
    /// Câmera ainda não descoberta; nenhuma requisição HTTP
    NoCamera,
    Saved(PathBuf),
    Failed,
}

/// O que aconteceu com um datagrama.
#[derive(Debug, PartialEq)]
pub enum Outcome {
    Dropped(DropReason),
    Camera(Discovery),
    Measured {
        measurement: Measurement,
        capture: CaptureOutcome,
        logged: bool,
    },
    /// Registro válido de um dispositivo desconhecido
    Unrelated(String),
}

pub struct Correlator<S: Snapshot> {
    bridge: BridgeConfig,
    registry: DeviceRegistry,
    last: Option<Measurement>,
    logbook: Logbook,
    camera: S,
    started: Instant,
}

impl<S: Snapshot> Correlator<S> {
    pub fn new(config: &AppConfig, camera: S) -> Self {
        let bridge = config.bridge.clone();
        Self {
            registry: DeviceRegistry::new(&bridge.camera_device, bridge.discovery_window()),
            logbook: Logbook::new(bridge.log_path()),
            bridge,
            last: None,
            camera,
            started: Instant::now(),
        }
    }

    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    /// Última medição válida do sensor.
    pub fn last_measurement(&self) -> Option<&Measurement> {
        self.last.as_ref()
    }

    /// Loop principal: recebe até o socket falhar de forma definitiva.
    pub fn run(&mut self, listener: &mut Listener) {
        loop {
            match listener.recv() {
                Ok((data, source)) => {
                    let now = Local::now().naive_local();
                    self.handle_datagram(data, source, now);
                }
                Err(ref e) if is_transient(e) => {}
                Err(e) => {
                    error!("Erro ao receber UDP: {e}");
                    break;
                }
            }
        }
    }

    /// Processa um datagrama recebido de `source` no instante `now`.
    pub fn handle_datagram(&mut self, data: &[u8], source: SocketAddr, now: NaiveDateTime) -> Outcome {
        let text = match decode_datagram(data) {
            Ok(text) => text,
            Err(e) => {
                warn!("{e}");
                return Outcome::Dropped(DropReason::Record(e));
            }
        };

        let clean = sanitize(text);
        info!("{}, {}, {}", now.format(LOG_TIME_FORMAT), source.ip(), clean);

        let record = match parse_record(&clean) {
            Ok(record) => record,
            Err(e) => {
                debug!("{e}");
                return Outcome::Dropped(DropReason::Record(e));
            }
        };

        if self.registry.is_camera(record.device()) {
            return Outcome::Camera(self.discover(source));
        }
        if record.device() == self.bridge.sensor_device {
            return self.measure(&record, now);
        }

        debug!("Dispositivo ignorado: {}", record.device());
        Outcome::Unrelated(record.device)
    }

    fn discover(&mut self, source: SocketAddr) -> Discovery {
        let discovery = self.registry.observe(source.ip(), self.started.elapsed());
        match discovery {
            Discovery::Bound(ip) => info!("Câmera descoberta: IP_CAM = {ip}"),
            Discovery::Rebound { previous, current } => {
                info!("Câmera mudou de IP: {previous} → {current}")
            }
            Discovery::Unchanged(_) => {}
            Discovery::Ignored { bound, offered } => {
                warn!("Câmera em {offered} ignorada, mantendo {bound}")
            }
        }
        discovery
    }

    fn measure(&mut self, record: &SensorRecord, now: NaiveDateTime) -> Outcome {
        let measurement = match Measurement::from_record(record) {
            Ok(m) => m,
            Err(e) => {
                debug!("Registro do sensor descartado: {e}");
                return Outcome::Dropped(DropReason::Measurement(e));
            }
        };

        let capture = match self.registry.camera_ip() {
            Some(ip) => {
                let request =
                    plan_capture(ip, &measurement, now, self.bridge.elevated_threshold);
                self.capture(&request)
            }
            None => {
                info!("Sem câmera: foto não capturada");
                CaptureOutcome::NoCamera
            }
        };

        let logged = match self.logbook.append(&LogEntry::new(now, &measurement)) {
            Ok(()) => true,
            Err(e) => {
                warn!("Falha ao gravar log: {e}");
                false
            }
        };

        self.last = Some(measurement.clone());
        Outcome::Measured {
            measurement,
            capture,
            logged,
        }
    }

    fn capture(&self, request: &CaptureRequest) -> CaptureOutcome {
        let target = self.bridge.save_dir().join(&request.filename);
        debug!(
            "Captura {:?} de {} → {} (arquivo permanente: {})",
            request.kind,
            request.target_ip,
            target.display(),
            request.kind.is_archival()
        );

        match self.camera.capture(request.target_ip, &target) {
            Ok(path) => CaptureOutcome::Saved(path),
            Err(e) => {
                warn!("{e}");
                CaptureOutcome::Failed
            }
        }
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────

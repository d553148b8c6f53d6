//! Definição de tipos/structs da ponte sensor → câmera.
//!
//! Todos os tipos aqui são efêmeros: criados por datagrama e descartados
//! depois do processamento. O histórico durável fica no log CSV.

use std::net::IpAddr;

// ──────────────────────────────────────────────
// Registro UDP
// ──────────────────────────────────────────────

/// Registro texto recebido de um dispositivo (`nome,campo1,campo2,...`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorRecord {
    /// Nome do dispositivo (7 caracteres, ex.: `pir_s_5`)
    pub device: String,
    /// Campos separados por vírgula; `fields[0]` é o nome quando ele não contém vírgula
    pub fields: Vec<String>,
}

impl SensorRecord {
    pub fn device(&self) -> &str {
        &self.device
    }
}

// ──────────────────────────────────────────────
// Medição
// ──────────────────────────────────────────────

/// Erros de conversão dos campos do sensor.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum MeasurementError {
    #[error("Registro com {0} campos (mínimo 4)")]
    TooFewFields(usize),

    #[error("Estado PIR inválido: {0:?}")]
    InvalidPir(String),

    #[error("Temperatura inválida: {0:?}")]
    InvalidTemperature(String),
}

/// Número mínimo de campos de um registro do sensor.
pub const SENSOR_MIN_FIELDS: usize = 4;

/// Última leitura do sensor PIR/térmico.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    /// 0 = ciclo terminado/ocioso, diferente de 0 = medindo
    pub pir: i64,
    /// Temperatura (°C)
    pub temperature: f64,
    /// Texto original do campo, usado no nome do arquivo
    pub temperature_text: String,
}

impl Measurement {
    /// Extrai `pir` (campo 1) e temperatura (campo 3) de um registro.
    pub fn from_record(record: &SensorRecord) -> Result<Self, MeasurementError> {
        if record.fields.len() < SENSOR_MIN_FIELDS {
            return Err(MeasurementError::TooFewFields(record.fields.len()));
        }

        let pir_text = &record.fields[1];
        let pir = pir_text
            .parse::<i64>()
            .map_err(|_| MeasurementError::InvalidPir(pir_text.clone()))?;

        let temperature_text = &record.fields[3];
        let temperature = temperature_text
            .parse::<f64>()
            .map_err(|_| MeasurementError::InvalidTemperature(temperature_text.clone()))?;

        Ok(Self {
            pir,
            temperature,
            temperature_text: temperature_text.clone(),
        })
    }

    /// `true` quando o ciclo de medição acabou de terminar.
    pub fn is_idle(&self) -> bool {
        self.pir == 0
    }
}

// ──────────────────────────────────────────────
// Captura
// ──────────────────────────────────────────────

/// Motivo da captura, em ordem de prioridade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureKind {
    /// Temperatura elevada: arquivo permanente com a temperatura no nome
    Elevated,
    /// Fim de ciclo: arquivo permanente só com o horário
    CycleEnd,
    /// Medindo: `cam.jpg` sobrescrito a cada leitura
    LivePreview,
}

impl CaptureKind {
    /// `true` se o arquivo não é sobrescrito por capturas seguintes.
    pub fn is_archival(self) -> bool {
        !matches!(self, CaptureKind::LivePreview)
    }
}

/// Pedido de captura para a câmera descoberta.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureRequest {
    pub target_ip: IpAddr,
    /// Nome relativo ao diretório de fotos
    pub filename: String,
    pub kind: CaptureKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fields: &[&str]) -> SensorRecord {
        SensorRecord {
            device: fields[0].to_string(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
        }
    }

    #[test]
    fn parses_pir_and_temperature() {
        let m = Measurement::from_record(&record(&["pir_s_5", "1", "0", "36.1"])).unwrap();
        assert_eq!(m.pir, 1);
        assert_eq!(m.temperature, 36.1);
        assert_eq!(m.temperature_text, "36.1");
        assert!(!m.is_idle());
    }

    #[test]
    fn extra_fields_are_ignored() {
        let m =
            Measurement::from_record(&record(&["pir_s_5", "0", "x", "38.1", "22.0", "55"])).unwrap();
        assert!(m.is_idle());
        assert_eq!(m.temperature, 38.1);
    }

    #[test]
    fn rejects_short_record() {
        assert_eq!(
            Measurement::from_record(&record(&["pir_s_5", "1", "0"])),
            Err(MeasurementError::TooFewFields(3))
        );
    }

    #[test]
    fn rejects_non_numeric_fields() {
        assert!(matches!(
            Measurement::from_record(&record(&["pir_s_5", "on", "0", "36.1"])),
            Err(MeasurementError::InvalidPir(_))
        ));
        assert!(matches!(
            Measurement::from_record(&record(&["pir_s_5", "1", "0", "hot"])),
            Err(MeasurementError::InvalidTemperature(_))
        ));
    }

    #[test]
    fn only_live_preview_overwrites() {
        assert!(CaptureKind::Elevated.is_archival());
        assert!(CaptureKind::CycleEnd.is_archival());
        assert!(!CaptureKind::LivePreview.is_archival());
    }
}

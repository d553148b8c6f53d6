//! Política de captura – decide o nome do arquivo de cada foto.
//!
//! Prioridade:
//! 1. Temperatura ≥ limiar → `cam_<AAAAMMDD-HHMMSS>.<temp>.jpg`
//! 2. PIR = 0 (fim do ciclo) → `cam_<AAAAMMDD-HHMMSS>.jpg`
//! 3. Medindo → `cam.jpg` (sobrescrito, visualização ao vivo)

use crate::types::{CaptureKind, CaptureRequest, Measurement};
use chrono::NaiveDateTime;
use std::net::IpAddr;

/// Limiar padrão de temperatura elevada (°C).
pub const ELEVATED_THRESHOLD: f64 = 37.5;

/// Nome fixo da visualização ao vivo.
pub const LIVE_PREVIEW_FILE: &str = "cam.jpg";

/// Formato de horário usado nos nomes de arquivo.
pub const FILENAME_TIME_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Classifica uma medição.
pub fn classify(measurement: &Measurement, threshold: f64) -> CaptureKind {
    if measurement.temperature >= threshold {
        CaptureKind::Elevated
    } else if measurement.is_idle() {
        CaptureKind::CycleEnd
    } else {
        CaptureKind::LivePreview
    }
}

/// Monta o pedido de captura para a câmera em `target_ip`.
pub fn plan_capture(
    target_ip: IpAddr,
    measurement: &Measurement,
    at: NaiveDateTime,
    threshold: f64,
) -> CaptureRequest {
    let kind = classify(measurement, threshold);
    let stamp = at.format(FILENAME_TIME_FORMAT);
    let filename = match kind {
        CaptureKind::Elevated => format!("cam_{stamp}.{}.jpg", measurement.temperature_text),
        CaptureKind::CycleEnd => format!("cam_{stamp}.jpg"),
        CaptureKind::LivePreview => LIVE_PREVIEW_FILE.to_string(),
    };

    CaptureRequest {
        target_ip,
        filename,
        kind,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::net::Ipv4Addr;

    const CAM: IpAddr = IpAddr::V4(Ipv4Addr::new(192, 168, 0, 10));

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2021, 1, 24)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn measurement(pir: i64, temp: &str) -> Measurement {
        Measurement {
            pir,
            temperature: temp.parse().unwrap(),
            temperature_text: temp.into(),
        }
    }

    #[test]
    fn measuring_overwrites_live_preview() {
        let first = plan_capture(CAM, &measurement(1, "36.1"), at(10, 0, 0), ELEVATED_THRESHOLD);
        let second = plan_capture(CAM, &measurement(1, "35.4"), at(10, 0, 5), ELEVATED_THRESHOLD);
        assert_eq!(first.filename, "cam.jpg");
        assert_eq!(second.filename, "cam.jpg");
        assert_eq!(first.kind, CaptureKind::LivePreview);
        assert_eq!(first.target_ip, CAM);
    }

    #[test]
    fn cycle_end_keeps_timestamp_only() {
        let req = plan_capture(CAM, &measurement(0, "36.1"), at(10, 57, 57), ELEVATED_THRESHOLD);
        assert_eq!(req.filename, "cam_20210124-105757.jpg");
        assert_eq!(req.kind, CaptureKind::CycleEnd);
    }

    #[test]
    fn elevated_dominates_pir_state() {
        for pir in [0, 1, 7] {
            let req = plan_capture(CAM, &measurement(pir, "38.1"), at(11, 11, 40), ELEVATED_THRESHOLD);
            assert_eq!(req.filename, "cam_20210124-111140.38.1.jpg");
            assert_eq!(req.kind, CaptureKind::Elevated);
        }
    }

    #[test]
    fn threshold_is_inclusive() {
        assert_eq!(classify(&measurement(1, "37.5"), ELEVATED_THRESHOLD), CaptureKind::Elevated);
        assert_eq!(classify(&measurement(1, "37.49"), ELEVATED_THRESHOLD), CaptureKind::LivePreview);
    }

    #[test]
    fn filename_keeps_literal_temperature_text() {
        let req = plan_capture(CAM, &measurement(1, "38.10"), at(11, 11, 40), ELEVATED_THRESHOLD);
        assert_eq!(req.filename, "cam_20210124-111140.38.10.jpg");
    }
}

//! Protocolo texto dos dispositivos IoT.
//!
//! Cada datagrama UDP é uma linha ASCII de até 128 bytes:
//!
//! ```text
//! ┌───────────────┬───┬──────────────────────────┐
//! │ Nome (7)      │ , │ campo1,campo2,...        │
//! │ xxx_x_d       │   │                          │
//! └───────────────┴───┴──────────────────────────┘
//!  índice 5 = '_'  índice 7 = ','
//! ```
//!
//! Ex.: `pir_s_5,1,0,36.1` (sensor) ou `cam_a_5,...` (câmera).

use crate::types::SensorRecord;

/// Tamanho máximo lido de cada datagrama.
pub const MAX_DATAGRAM: usize = 128;

/// Tamanho fixo do nome do dispositivo.
pub const DEVICE_NAME_LEN: usize = 7;

/// Posição do `_` dentro do nome.
const UNDERSCORE_INDEX: usize = 5;

/// Posição da primeira vírgula (logo após o nome).
const COMMA_INDEX: usize = DEVICE_NAME_LEN;

/// Erros de decodificação/validação de um datagrama.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum RecordError {
    #[error("Datagrama não é UTF-8 válido: {0}")]
    Decode(String),

    #[error("Formato inválido: {0:?} (esperado 'xxxxx_x,...')")]
    Framing(String),
}

/// Decodifica bytes recebidos via UDP em texto.
pub fn decode_datagram(data: &[u8]) -> Result<&str, RecordError> {
    std::str::from_utf8(data).map_err(|e| RecordError::Decode(e.to_string()))
}

/// Mantém apenas caracteres imprimíveis (`' ' < c <= '~'`).
///
/// Espaços, controles e não-ASCII são removidos, não substituídos.
pub fn sanitize(text: &str) -> String {
    text.chars().filter(|&c| c > ' ' && c <= '~').collect()
}

/// Valida o formato e separa os campos de um texto já limpo.
///
/// Os índices são de caractere, então o resultado não depende de o texto
/// ter passado por [`sanitize`].
pub fn parse_record(clean: &str) -> Result<SensorRecord, RecordError> {
    let mut chars = clean.chars();
    let framed = chars.nth(UNDERSCORE_INDEX) == Some('_')
        && chars.nth(COMMA_INDEX - UNDERSCORE_INDEX - 1) == Some(',');
    if !framed {
        return Err(RecordError::Framing(clean.to_string()));
    }

    let fields: Vec<String> = clean.split(',').map(str::to_string).collect();
    Ok(SensorRecord {
        device: clean.chars().take(DEVICE_NAME_LEN).collect(),
        fields,
    })
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────

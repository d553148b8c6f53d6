//! Log CSV append-only das leituras do sensor.
//!
//! Colunas: `timestamp,pir,temperature`, sem linha de cabeçalho: cada
//! leitura vira exatamente uma linha. O arquivo é aberto, escrito e
//! fechado a cada registro; nenhum handle fica aberto entre leituras.

use crate::types::Measurement;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

/// Formato de horário do log e do trace no console.
pub const LOG_TIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Erros ao gravar ou ler o log.
#[derive(Debug, thiserror::Error)]
pub enum LogbookError {
    #[error("Erro de E/S em {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Erro de CSV em {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },
}

/// Uma linha do log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub pir: i64,
    pub temperature: f64,
}

impl LogEntry {
    pub fn new(at: NaiveDateTime, measurement: &Measurement) -> Self {
        Self {
            timestamp: at.format(LOG_TIME_FORMAT).to_string(),
            pir: measurement.pir,
            temperature: measurement.temperature,
        }
    }
}

/// Arquivo de log em disco.
#[derive(Debug, Clone)]
pub struct Logbook {
    path: PathBuf,
}

impl Logbook {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Acrescenta uma linha.
    pub fn append(&self, entry: &LogEntry) -> Result<(), LogbookError> {
        let io_err = |source| LogbookError::Io {
            path: self.path.clone(),
            source,
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(io_err)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.serialize(entry).map_err(|source| LogbookError::Csv {
            path: self.path.clone(),
            source,
        })?;
        writer.flush().map_err(io_err)?;
        Ok(())
    }

    /// Lê todas as linhas do log.
    pub fn read_entries(&self) -> Result<Vec<LogEntry>, LogbookError> {
        let csv_err = |source| LogbookError::Csv {
            path: self.path.clone(),
            source,
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(&self.path)
            .map_err(csv_err)?;
        reader
            .deserialize()
            .collect::<Result<Vec<LogEntry>, _>>()
            .map_err(csv_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2021, 1, 24)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn measurement(pir: i64, temperature: f64) -> Measurement {
        Measurement {
            pir,
            temperature,
            temperature_text: temperature.to_string(),
        }
    }

    #[test]
    fn entry_uses_console_time_format() {
        let entry = LogEntry::new(at(10, 57, 57), &measurement(0, 36.1));
        assert_eq!(entry.timestamp, "2021/01/24 10:57:57");
    }

    #[test]
    fn one_line_per_record_without_header() {
        let dir = tempfile::tempdir().unwrap();
        let book = Logbook::new(dir.path().join("log.csv"));

        book.append(&LogEntry::new(at(10, 0, 0), &measurement(1, 36.1))).unwrap();
        book.append(&LogEntry::new(at(10, 0, 5), &measurement(0, 36.4))).unwrap();

        let text = std::fs::read_to_string(book.path()).unwrap();
        assert_eq!(
            text,
            "2021/01/24 10:00:00,1,36.1\n2021/01/24 10:00:05,0,36.4\n"
        );
    }

    #[test]
    fn logged_values_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let book = Logbook::new(dir.path().join("log.csv"));
        let samples = [(1, 36.1), (0, 37.0), (3, 38.15), (-1, 0.0)];

        for (i, &(pir, temp)) in samples.iter().enumerate() {
            book.append(&LogEntry::new(at(11, 0, i as u32), &measurement(pir, temp)))
                .unwrap();
        }

        let entries = book.read_entries().unwrap();
        assert_eq!(entries.len(), samples.len());
        for (entry, &(pir, temp)) in entries.iter().zip(samples.iter()) {
            assert_eq!(entry.pir, pir);
            assert_eq!(entry.temperature, temp);
        }
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let book = Logbook::new(dir.path().join("nao_existe").join("log.csv"));
        let result = book.append(&LogEntry::new(at(10, 0, 0), &measurement(1, 36.1)));
        assert!(matches!(result, Err(LogbookError::Io { .. })));
    }
}

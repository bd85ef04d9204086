//! Run records and their export.
//!
//! A completed run is captured as a [`RunRecord`] and written out twice:
//! the full record as pretty JSON, the readings alone as CSV for whatever
//! charts them.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use trustbed_core::EvaluationProtocol;
use trustbed_types::Time;
use uuid::Uuid;

use crate::reading::Reading;

/// Errors raised while exporting run results.
#[derive(Debug, Error)]
pub enum OutputError {
    /// I/O error (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything one run produced, plus enough context to reproduce it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    /// Unique identifier for this run
    pub id: Uuid,
    /// Seed every random draw derived from
    pub seed: u64,
    /// Name of the trust model under evaluation
    pub model: String,
    /// Name of the driving scenario
    pub scenario: String,
    /// Name of the protocol variant the factory selected
    pub protocol: String,
    /// Ticks the run completed
    pub duration: Time,
    /// Every reading collected, in tick order
    pub readings: Vec<Reading>,
}

impl RunRecord {
    /// Captures a completed run, minting a fresh id.
    pub fn new(
        seed: u64,
        protocol: &dyn EvaluationProtocol,
        duration: Time,
        readings: Vec<Reading>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            seed,
            model: protocol.model_name().to_string(),
            scenario: protocol.scenario_name().to_string(),
            protocol: protocol.name().to_string(),
            duration,
            readings,
        }
    }

    /// Serializes the record to pretty JSON.
    pub fn to_json(&self) -> Result<String, OutputError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the full record to a JSON file.
    pub fn write_json(&self, path: &Path) -> Result<(), OutputError> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Writes the readings to a CSV file with a `tick,metric,service,value`
    /// header.
    pub fn write_csv(&self, path: &Path) -> Result<(), OutputError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "tick,metric,service,value")?;
        for reading in &self.readings {
            writeln!(
                writer,
                "{},{},{},{}",
                reading.tick, reading.metric, reading.service, reading.value
            )?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Writes all output files to a directory.
    ///
    /// Creates the directory if it doesn't exist. Writes:
    /// - `run.json` - the full record
    /// - `readings.csv` - the readings alone
    pub fn write_all(&self, output_dir: &Path) -> Result<(), OutputError> {
        fs::create_dir_all(output_dir)?;

        self.write_json(&output_dir.join("run.json"))?;
        self.write_csv(&output_dir.join("readings.csv"))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn make_test_record() -> RunRecord {
        RunRecord {
            id: Uuid::new_v4(),
            seed: 42,
            model: "averaging".to_string(),
            scenario: "random".to_string(),
            protocol: "no-decisions".to_string(),
            duration: 2,
            readings: vec![
                Reading::new(1, "kendalls-tau-a", 0, 0.5),
                Reading::new(2, "kendalls-tau-a", 0, 0.75),
            ],
        }
    }

    #[test]
    fn test_record_to_json() {
        let record = make_test_record();
        let json = record.to_json().unwrap();

        assert!(json.contains("\"seed\": 42"));
        assert!(json.contains("kendalls-tau-a"));
        assert!(json.contains("no-decisions"));
    }

    #[test]
    fn test_record_json_round_trip() {
        let record = make_test_record();
        let json = record.to_json().unwrap();
        let back: RunRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(back.id, record.id);
        assert_eq!(back.seed, record.seed);
        assert_eq!(back.readings, record.readings);
    }

    #[test]
    fn test_write_json() {
        let dir = tempdir().unwrap();
        let record = make_test_record();
        let path = dir.path().join("run.json");

        record.write_json(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains(&record.id.to_string()));
        assert!(content.contains("kendalls-tau-a"));
    }

    #[test]
    fn test_write_csv() {
        let dir = tempdir().unwrap();
        let record = make_test_record();
        let path = dir.path().join("readings.csv");

        record.write_csv(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "tick,metric,service,value");
        assert_eq!(lines[1], "1,kendalls-tau-a,0,0.5");
        assert_eq!(lines[2], "2,kendalls-tau-a,0,0.75");
    }

    #[test]
    fn test_write_csv_with_no_readings_keeps_the_header() {
        let dir = tempdir().unwrap();
        let mut record = make_test_record();
        record.readings.clear();
        let path = dir.path().join("readings.csv");

        record.write_csv(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.trim_end(), "tick,metric,service,value");
    }

    #[test]
    fn test_write_all() {
        let dir = tempdir().unwrap();
        let record = make_test_record();
        let out = dir.path().join("results");

        record.write_all(&out).unwrap();

        assert!(out.join("run.json").exists());
        assert!(out.join("readings.csv").exists());
    }
}

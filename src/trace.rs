// JSONL tracing of pipeline stages
use chrono::{SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Serialize)]
struct TraceEntry<'a, I, O>
where
    I: Serialize,
    O: Serialize,
{
    run_id: &'a str,
    stage: &'a str,
    #[serde(serialize_with = "serialize_as_json")]
    input: &'a I,
    #[serde(serialize_with = "serialize_as_json")]
    output: &'a O,
    latency_ms: u64,
    timestamp: String,
}

/// Embeds a value as a JSON string so every line has the same flat shape
fn serialize_as_json<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Serialize,
    S: Serializer,
{
    let json_string = serde_json::to_string(value).map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&json_string)
}

/// Appends one JSON line per pipeline stage to a trace file
///
/// All lines written by one logger share a run id. A logger whose file could
/// not be opened is disabled rather than failing the request.
#[derive(Clone)]
pub struct TraceLogger {
    writer: Option<Arc<Mutex<BufWriter<File>>>>,
    run_id: String,
}

impl TraceLogger {
    pub fn new(trace_file: Option<PathBuf>) -> Self {
        let writer = trace_file.and_then(|path| {
            match OpenOptions::new().create(true).append(true).open(&path) {
                Ok(file) => Some(Arc::new(Mutex::new(BufWriter::new(file)))),
                Err(e) => {
                    warn!("Failed to open trace file {:?}: {}", path, e);
                    None
                }
            }
        });

        Self {
            writer,
            run_id: Uuid::new_v4().to_string(),
        }
    }

    pub fn disabled() -> Self {
        Self {
            writer: None,
            run_id: Uuid::new_v4().to_string(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.writer.is_some()
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn log_stage<I, O>(&self, stage: &str, input: &I, output: &O, latency_ms: u64)
    where
        I: Serialize,
        O: Serialize,
    {
        let Some(writer) = &self.writer else {
            return;
        };

        let entry = TraceEntry {
            run_id: &self.run_id,
            stage,
            input,
            output,
            latency_ms,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };

        if let Ok(mut writer) = writer.lock() {
            match serde_json::to_string(&entry) {
                Ok(json) => {
                    if let Err(e) = writeln!(writer, "{}", json) {
                        warn!("Failed to write trace entry: {}", e);
                    }
                    if let Err(e) = writer.flush() {
                        warn!("Failed to flush trace file: {}", e);
                    }
                }
                Err(e) => {
                    warn!("Failed to serialize trace entry for stage {}: {}", stage, e);
                }
            }
        }

        debug!(stage, latency_ms, "Trace entry written");
    }
}

impl std::fmt::Debug for TraceLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TraceLogger")
            .field("enabled", &self.is_enabled())
            .field("run_id", &self.run_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use tempfile::tempdir;

    #[test]
    fn test_disabled_logger_writes_nothing() {
        let logger = TraceLogger::disabled();
        assert!(!logger.is_enabled());
        logger.log_stage("detect", &"markup", &3usize, 1);
    }

    #[test]
    fn test_writes_jsonl_entries() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("trace.jsonl");
        let logger = TraceLogger::new(Some(path.clone()));
        assert!(logger.is_enabled());

        logger.log_stage("detect", &serde_json::json!({"markup_len": 120}), &vec!["LoginScreen"], 2);
        logger.log_stage("extract", &"reply", &serde_json::json!({"files": 4}), 5);

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["stage"], "detect");
        assert_eq!(first["latency_ms"], 2);
        assert_eq!(first["input"], r#"{"markup_len":120}"#);
        assert_eq!(first["output"], r#"["LoginScreen"]"#);

        let second: Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(first["run_id"], second["run_id"]);
        assert_eq!(second["run_id"], logger.run_id());
    }

    #[test]
    fn test_unopenable_file_disables_logger() {
        let dir = tempdir().unwrap();
        let logger = TraceLogger::new(Some(dir.path().join("missing").join("trace.jsonl")));
        assert!(!logger.is_enabled());
    }
}

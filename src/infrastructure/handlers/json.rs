//! JSON lines backend.

use chrono::SecondsFormat;
use serde_json::{json, Map};
use std::io;
use std::sync::Arc;

use crate::application::ports::{Handler, LogWriter};
use crate::domain::field::Entry;

/// Renders one JSON object per line with the entry's fields grouped under a
/// `fields` key:
///
/// ```text
/// {"fields":{"logger":"/svc","tid":1},"level":"info","message":"starting up","timestamp":"..."}
/// ```
pub struct JsonHandler {
    writer: Arc<dyn LogWriter>,
}

impl JsonHandler {
    pub fn new(writer: Arc<dyn LogWriter>) -> Self {
        JsonHandler { writer }
    }
}

impl Handler for JsonHandler {
    fn handle(&self, entry: &Entry) -> io::Result<()> {
        let mut fields = Map::new();
        for field in &entry.fields {
            fields.insert(field.name.clone(), field.value.clone());
        }
        let record = json!({
            "fields": fields,
            "level": entry.level.as_str(),
            "timestamp": entry.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true),
            "message": entry.message,
        });
        let mut buf = serde_json::to_vec(&record)?;
        buf.push(b'\n');
        self.writer.write(&buf)
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::field::Field;
    use crate::domain::level::Level;
    use serde_json::Value;
    use std::sync::Mutex;

    struct CaptureWriter(Mutex<Vec<u8>>);

    impl LogWriter for CaptureWriter {
        fn write(&self, buf: &[u8]) -> io::Result<()> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(())
        }
    }

    #[test]
    fn test_renders_one_object_per_line() {
        let capture = Arc::new(CaptureWriter(Mutex::new(vec![])));
        let handler = JsonHandler::new(capture.clone());
        handler
            .handle(&Entry::new(
                Level::Info,
                "ready",
                vec![Field::new("logger", "/svc"), Field::new("port", 8080)],
            ))
            .unwrap();

        let bytes = capture.0.lock().unwrap().clone();
        let line = String::from_utf8(bytes).unwrap();
        assert!(line.ends_with('\n'));

        let parsed: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["level"], "info");
        assert_eq!(parsed["message"], "ready");
        assert_eq!(parsed["fields"]["logger"], "/svc");
        assert_eq!(parsed["fields"]["port"], 8080);
        assert!(parsed["timestamp"].is_string());
    }
}

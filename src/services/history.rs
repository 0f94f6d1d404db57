use crate::models::toolkit_types::UploadRecord;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// Process-lifetime upload log, registered as managed Tauri state.
/// Append-only; nothing survives a restart.
#[derive(Default)]
pub struct UploadHistory {
    records: Mutex<Vec<UploadRecord>>,
}

impl UploadHistory {
    pub fn record(&self, file_name: &str, size_bytes: u64) -> UploadRecord {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0) as i64;

        let record = UploadRecord {
            file_name: file_name.to_string(),
            timestamp,
            size_bytes,
        };
        self.records.lock().unwrap().push(record.clone());
        record
    }

    /// Records in insertion order.
    pub fn snapshot(&self) -> Vec<UploadRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_append_in_order() {
        let history = UploadHistory::default();
        history.record("first.jpg", 10);
        history.record("second.png", 20);
        history.record("third.webp", 30);

        let records = history.snapshot();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].file_name, "first.jpg");
        assert_eq!(records[2].file_name, "third.webp");
        assert_eq!(records.iter().map(|r| r.size_bytes).sum::<u64>(), 60);
    }

    #[test]
    fn snapshot_of_fresh_history_is_empty() {
        assert!(UploadHistory::default().snapshot().is_empty());
    }
}

//! Output formatting.

use mediatimeline::{Record, SnapshotInfo};

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

/// Format a list of records.
pub fn format_records(records: &[Record], mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => to_json(&records),
        OutputMode::Human => {
            if records.is_empty() {
                return "(empty)".to_string();
            }
            records
                .iter()
                .map(format_line)
                .collect::<Vec<_>>()
                .join("\n")
        }
    }
}

/// Format a single record.
pub fn format_record(record: &Record, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => to_json(record),
        OutputMode::Human => {
            let mut out = format_line(record);
            for media in &record.images {
                out.push_str(&format!("\n  image {} {}", media.id, media.image));
            }
            out
        }
    }
}

/// Format a bare id.
pub fn format_id(id: u64, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => serde_json::json!({ "last_id": id }).to_string(),
        OutputMode::Human => id.to_string(),
    }
}

/// Format store and snapshot statistics.
pub fn format_info(
    records: usize,
    last_id: u64,
    snapshot: Option<&SnapshotInfo>,
    mode: OutputMode,
) -> String {
    match mode {
        OutputMode::Json => {
            let snapshot = snapshot.map(|s| {
                serde_json::json!({
                    "path": s.path.display().to_string(),
                    "file_size": s.file_size,
                    "format_version": s.format_version,
                    "body_len": s.body_len,
                    "checksum": format!("{:08x}", s.checksum),
                })
            });
            serde_json::json!({
                "records": records,
                "last_id": last_id,
                "snapshot": snapshot,
            })
            .to_string()
        }
        OutputMode::Human => {
            let mut out = format!("records:  {}\nlast_id:  {}", records, last_id);
            match snapshot {
                Some(s) => out.push_str(&format!(
                    "\nsnapshot: {}\n  version:  {}\n  size:     {} bytes ({} compressed body)\n  crc32:    {:08x}",
                    s.path.display(),
                    s.format_version,
                    s.file_size,
                    s.body_len,
                    s.checksum
                )),
                None => out.push_str("\nsnapshot: (none)"),
            }
            out
        }
    }
}

fn format_line(record: &Record) -> String {
    let star = if record.favorited { "*" } else { " " };
    format!(
        "{}{} {} @{} [{} image(s)] {}",
        star,
        record.id,
        record.posted.format("%Y-%m-%d %H:%M"),
        record.user.screen_name,
        record.images.len(),
        record.text.replace('\n', " ")
    )
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
}

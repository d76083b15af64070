use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use cardex_core::jsonl::{RejectedLine, decode_lines};
use cardex_core::{CardIndex, CardRecord};
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub(super) struct ImportReport {
    pub imported: usize,
    pub skipped_lines: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped_sample: Vec<RejectedLine>,
    pub rejected: usize,
    pub postings_added: usize,
}

/// Upserts every decodable line. Records the index refuses (blank id or name)
/// are counted, not fatal; store failures abort the import.
pub(super) fn import_jsonl(index: &CardIndex, path: &Path) -> Result<ImportReport> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let decoded =
        decode_lines::<CardRecord>(&raw).ensure_any_decoded(&path.display().to_string())?;
    for rejected in &decoded.rejected {
        warn!(path = %path.display(), line = rejected.line, error = %rejected.reason, "skipped invalid line");
    }

    let mut report = ImportReport {
        skipped_lines: decoded.skipped_lines,
        skipped_sample: decoded.rejected,
        ..ImportReport::default()
    };
    for record in &decoded.items {
        match index.upsert_record(record) {
            Ok(added) => {
                report.imported += 1;
                report.postings_added += added.total();
            }
            Err(err) if err.is_input_error() => {
                warn!(record_id = %record.id, error = %err, "rejected record");
                report.rejected += 1;
            }
            Err(err) => {
                return Err(err).with_context(|| format!("failed to store record {}", record.id));
            }
        }
    }
    Ok(report)
}

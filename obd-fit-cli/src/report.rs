//! Summary reporting
//!
//! Renders the result of a transcode run either as a short text block for
//! the terminal or as a JSON document for scripting.

use chrono::Local;
use obd_fit_encoder::TranscodeSummary;
use serde::Serialize;

/// The JSON report envelope: run metadata around the summary fields
#[derive(Serialize)]
struct JsonReport<'a> {
    generated: String,
    tool_version: &'static str,
    #[serde(flatten)]
    summary: &'a TranscodeSummary,
}

/// Render the summary as a human-readable text block
pub fn render_text(summary: &TranscodeSummary) -> String {
    let mut out = String::new();
    out.push_str("═══════════════════════════════════════════════\n");
    out.push_str("  Transcode Summary\n");
    out.push_str("═══════════════════════════════════════════════\n");
    out.push_str(&format!("  Rows translated: {}\n", summary.rows));
    out.push_str(&format!("  OBD-II records:  {}\n", summary.obdii_records));
    out.push_str(&format!("  GPS records:     {}\n", summary.gps_records));
    out.push_str(&format!("  Records written: {}\n", summary.records_written));
    if let Some(output) = &summary.output {
        out.push_str(&format!("  Output:          {}\n", output.display()));
    }
    out
}

/// Render the summary as pretty-printed JSON
pub fn render_json(summary: &TranscodeSummary) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport {
        generated: Local::now().to_rfc3339(),
        tool_version: env!("CARGO_PKG_VERSION"),
        summary,
    })
}

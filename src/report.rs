//! Structured medical report generation.
//!
//! Free-form clinical notes go to the chain with a scribe prompt that
//! demands a JSON object; the first balanced JSON object is extracted
//! from the (often chatty) model output, parsed into `MedicalReport`,
//! and rendered as a one-page PDF.

use printpdf::*;
use serde::{Deserialize, Serialize};
use std::io::BufWriter;

use crate::llm::{DispatchError, FailoverChain, Prompt};

const REPORT_SYSTEM_PROMPT: &str = "You are a Medical Scribe. Convert the following clinical \
notes into a professional structured medical report.\n\n\
### STRUCTURE:\n\
1. **Clinic/Hospital**: MedExa Digital Clinic\n\
2. **Patient Summary**: Brief overview of the patient's condition.\n\
3. **Diagnosis**: Clear statement of the suspected or confirmed illness.\n\
4. **Prescription Table**: List each medicine, dosage, and timing (e.g., \"Take after breakfast\").\n\
5. **Advice/Lifestyle**: Additional instructions (e.g., \"Drink plenty of water\", \"Bed rest for 3 days\").\n\
6. **Follow-up**: When the patient should return.\n\n\
### FINAL OUTPUT (JSON Format):\n\
Return ONLY a JSON object with keys: \"summary\", \"diagnosis\", \"medications\", \"advice\", \"follow_up\".";

/// Parsed report, one field per required JSON key. `medications` stays
/// loosely typed because models emit anything from string lists to
/// `{name, dosage, timing}` objects.
#[derive(Debug, Serialize, Deserialize)]
pub struct MedicalReport {
    pub summary: String,
    pub diagnosis: String,
    pub medications: Vec<serde_json::Value>,
    pub advice: String,
    pub follow_up: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Report generation failed: {0}")]
    Generation(#[from] DispatchError),
    #[error("Model output contains no JSON object")]
    NoJsonObject,
    #[error("Report JSON has an invalid shape: {0}")]
    InvalidShape(String),
    #[error("PDF rendering failed: {0}")]
    Pdf(String),
}

/// Extract the first balanced top-level JSON object from `text`.
///
/// Brace counting is string- and escape-aware so braces inside JSON
/// string values never unbalance the scan.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parse model output into a report, tolerating prose around the JSON.
pub fn parse_report(output: &str) -> Result<MedicalReport, ReportError> {
    let json = extract_json_object(output).ok_or(ReportError::NoJsonObject)?;
    serde_json::from_str(json).map_err(|e| ReportError::InvalidShape(e.to_string()))
}

/// Turn clinical notes into a structured report via the chain.
pub fn generate_report(chain: &FailoverChain, notes: &str) -> Result<MedicalReport, ReportError> {
    let user_text = format!("Notes to process: {notes}");
    let prompt = Prompt::new(REPORT_SYSTEM_PROMPT, &user_text);
    let output = chain.generate(&prompt)?;
    parse_report(&output)
}

fn medication_line(entry: &serde_json::Value) -> String {
    match entry {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Object(map) => {
            let mut parts = Vec::new();
            for key in ["name", "medicine", "dosage", "timing"] {
                if let Some(serde_json::Value::String(v)) = map.get(key) {
                    parts.push(v.clone());
                }
            }
            if parts.is_empty() {
                entry.to_string()
            } else {
                parts.join(" - ")
            }
        }
        other => other.to_string(),
    }
}

/// Render the report as a single A4 page.
pub fn render_report_pdf(report: &MedicalReport) -> Result<Vec<u8>, ReportError> {
    let (doc, page1, layer1) =
        PdfDocument::new("Medical Report", Mm(210.0), Mm(297.0), "Layer 1");
    let layer = doc.get_page(page1).get_layer(layer1);

    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ReportError::Pdf(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ReportError::Pdf(e.to_string()))?;

    let mut y = Mm(280.0);

    layer.use_text("MedExa Digital Clinic", 14.0, Mm(20.0), y, &bold);
    y -= Mm(6.0);
    layer.use_text("Structured Medical Report", 10.0, Mm(20.0), y, &font);
    y -= Mm(4.5);
    let date = chrono::Local::now().format("%Y-%m-%d").to_string();
    layer.use_text(format!("Date: {date}"), 9.0, Mm(20.0), y, &font);
    y -= Mm(10.0);

    let sections = [
        ("PATIENT SUMMARY", report.summary.as_str()),
        ("DIAGNOSIS", report.diagnosis.as_str()),
    ];
    for (heading, body) in sections {
        layer.use_text(heading, 11.0, Mm(20.0), y, &bold);
        y -= Mm(6.0);
        for line in wrap_text(body, 80) {
            layer.use_text(&line, 9.0, Mm(25.0), y, &font);
            y -= Mm(4.5);
        }
        y -= Mm(4.0);
    }

    layer.use_text("PRESCRIPTIONS", 11.0, Mm(20.0), y, &bold);
    y -= Mm(6.0);
    for entry in &report.medications {
        for line in wrap_text(&medication_line(entry), 80) {
            layer.use_text(&line, 9.0, Mm(25.0), y, &font);
            y -= Mm(4.5);
        }
    }
    y -= Mm(4.0);

    let tail = [
        ("ADVICE", report.advice.as_str()),
        ("FOLLOW-UP", report.follow_up.as_str()),
    ];
    for (heading, body) in tail {
        layer.use_text(heading, 11.0, Mm(20.0), y, &bold);
        y -= Mm(6.0);
        for line in wrap_text(body, 80) {
            layer.use_text(&line, 9.0, Mm(25.0), y, &font);
            y -= Mm(4.5);
        }
        y -= Mm(4.0);
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| ReportError::Pdf(e.to_string()))?;
    buf.into_inner().map_err(|e| ReportError::Pdf(e.to_string()))
}

fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.len() + word.len() + 1 > max_chars && !current.is_empty() {
            lines.push(current.clone());
            current.clear();
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

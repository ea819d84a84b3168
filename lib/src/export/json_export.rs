// lib/src/export/json_export.rs
// Hand-built JSON: field order and layout are part of the file format.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use models::{Age, Patient, VisitRecord};

use super::{export_timestamp, or_default};

/// Escapes a value for a JSON string body: backslash and double quote are
/// escaped, line feeds become spaces.
pub fn clean(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', " ")
}

/// Age is written as a bare number; anything that is not numeric is quoted
/// and an empty age is `null`.
fn age_literal(age: &Age) -> String {
    match age {
        Age::Years(years) => years.to_string(),
        Age::Text(text) if text.trim().is_empty() => "null".to_string(),
        Age::Text(text) if text.trim().parse::<f64>().is_ok() => text.trim().to_string(),
        Age::Text(text) => format!("\"{}\"", clean(text)),
    }
}

/// Renders a patient's demographics and full visit history. Username and
/// password are never exported; attachments only appear as a Si/No flag.
pub fn render_json(patient: &Patient, visits: &[VisitRecord], exported_at: &DateTime<Utc>) -> String {
    let mut out = String::new();
    out.push_str("{\n");
    out.push_str("    \"info_paciente\": {\n");
    let _ = writeln!(out, "        \"nombre\": \"{}\",", clean(&patient.full_name));
    let _ = writeln!(out, "        \"ci\": \"{}\",", clean(&patient.national_id));
    let _ = writeln!(out, "        \"edad\": {},", age_literal(&patient.age));
    let _ = writeln!(out, "        \"telefono\": \"{}\",", clean(or_default(&patient.phone, "N/A")));
    let _ = writeln!(out, "        \"email\": \"{}\",", clean(or_default(&patient.email, "N/A")));
    let _ = writeln!(out, "        \"alergias\": \"{}\"", clean(or_default(&patient.allergies, "Ninguna")));
    out.push_str("    },\n");

    out.push_str("    \"historial_medico\": [\n");
    for (index, visit) in visits.iter().enumerate() {
        out.push_str("        {\n");
        let _ = writeln!(out, "            \"id_encuentro\": {},", index + 1);
        let _ = writeln!(out, "            \"fecha\": \"{}\",", clean(&visit.date));
        let _ = writeln!(out, "            \"motivo\": \"{}\",", clean(&visit.reason));
        let _ = writeln!(out, "            \"peso_kg\": \"{}\",", clean(&visit.weight));
        let _ = writeln!(out, "            \"presion_arterial\": \"{}\",", clean(&visit.blood_pressure));
        let _ = writeln!(out, "            \"diagnostico\": \"{}\",", clean(&visit.diagnosis));
        let _ = writeln!(out, "            \"tratamiento\": \"{}\",", clean(&visit.treatment));
        let _ = writeln!(out, "            \"observaciones\": \"{}\",", clean(&visit.notes));
        let _ = writeln!(
            out,
            "            \"tiene_documento_adjunto\": \"{}\"",
            if visit.has_attachment() { "Si" } else { "No" }
        );
        if index + 1 < visits.len() {
            out.push_str("        },\n");
        } else {
            out.push_str("        }\n");
        }
    }
    out.push_str("    ],\n");

    out.push_str("    \"metadata\": {\n");
    let _ = writeln!(out, "        \"fecha_exportacion\": \"{}\",", export_timestamp(exported_at));
    let _ = writeln!(out, "        \"total_encuentros\": {}", visits.len());
    out.push_str("    }\n");
    out.push('}');
    out
}

// lib/src/export/xml_export.rs
// Values are interpolated as-is. Markup characters in stored text are not
// escaped, so a value containing `<` or `&` yields a malformed document.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use models::{Patient, VisitRecord};

use super::export_service::ExportAudience;
use super::{export_timestamp, or_default};

pub fn render_xml(
    patient: &Patient,
    visits: &[VisitRecord],
    audience: ExportAudience,
    exported_at: &DateTime<Utc>,
) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str("<expediente_medico>\n");

    out.push_str("  <datos_paciente>\n");
    let _ = writeln!(out, "    <nombre>{}</nombre>", patient.full_name);
    let _ = writeln!(out, "    <ci>{}</ci>", patient.national_id);
    let _ = writeln!(out, "    <edad>{}</edad>", patient.age);
    let _ = writeln!(out, "    <telefono>{}</telefono>", or_default(&patient.phone, "N/A"));
    let _ = writeln!(out, "    <email>{}</email>", or_default(&patient.email, "N/A"));
    let _ = writeln!(out, "    <alergias>{}</alergias>", or_default(&patient.allergies, "Ninguna"));
    out.push_str("  </datos_paciente>\n");

    out.push_str("  <historial_encuentros>\n");
    if visits.is_empty() {
        out.push_str("    <nota>Sin encuentros registrados</nota>\n");
    }
    for (index, visit) in visits.iter().enumerate() {
        let _ = writeln!(out, "    <encuentro id=\"{}\">", index + 1);
        let _ = writeln!(out, "      <fecha>{}</fecha>", visit.date);
        let _ = writeln!(out, "      <motivo>{}</motivo>", visit.reason);
        let _ = writeln!(out, "      <peso_kg>{}</peso_kg>", visit.weight);
        let _ = writeln!(out, "      <presion_arterial>{}</presion_arterial>", visit.blood_pressure);
        let _ = writeln!(out, "      <diagnostico>{}</diagnostico>", visit.diagnosis);
        let _ = writeln!(out, "      <tratamiento>{}</tratamiento>", visit.treatment);
        let _ = writeln!(out, "      <observaciones>{}</observaciones>", visit.notes);
        let attachment = if visit.has_attachment() { audience.attachment_present_label() } else { "No" };
        let _ = writeln!(out, "      <documento_adjunto>{}</documento_adjunto>", attachment);
        out.push_str("    </encuentro>\n");
    }
    out.push_str("  </historial_encuentros>\n");

    out.push_str("  <metadata>\n");
    let _ = writeln!(out, "    <fecha_exportacion>{}</fecha_exportacion>", export_timestamp(exported_at));
    let _ = writeln!(out, "    <total_encuentros>{}</total_encuentros>", visits.len());
    out.push_str("  </metadata>\n");
    out.push_str("</expediente_medico>");
    out
}

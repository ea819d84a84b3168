// server/src/cli/handlers.rs

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use colored::Colorize;
use lib::{
    ClinicDatabase, Doctor, DoctorForm, ExportFormat, HistoryView, Patient, PatientForm, UserRecord, VisitRecord,
};
use log::info;
use security::{
    authorize, authorize_patient, IdentityService, LoginOutcome, Permission, SessionPrincipal, RECOVERY_NOTICE,
};

use crate::cli::commands::{
    DoctorArgs, DoctorCommand, DoctorUpdateArgs, ExportArgs, PatientArgs, PatientCommand, PatientUpdateArgs,
    VisitArgs, VisitCommand,
};

/// Everything a command handler needs for one invocation.
pub struct CliContext {
    pub db: ClinicDatabase,
    pub identity: IdentityService,
    pub principal: Option<SessionPrincipal>,
    pub output_directory: PathBuf,
}

impl CliContext {
    pub fn new(db: ClinicDatabase, output_directory: PathBuf) -> Self {
        let identity = IdentityService::new(&db);
        CliContext { db, identity, principal: None, output_directory }
    }

    /// Logs in with the given credentials, if any. An admin or doctor login
    /// also seeds the default collections.
    pub fn authenticate(&mut self, username: Option<&str>, password: Option<&str>) -> Result<Option<LoginOutcome>> {
        let (username, password) = match (username, password) {
            (Some(u), Some(p)) => (u, p),
            (None, None) => return Ok(None),
            _ => bail!("Both --username and --password are required to log in"),
        };
        let outcome = self.identity.login(username, password)?;
        if outcome == LoginOutcome::InvalidCredentials {
            bail!("Usuario o contraseña incorrectos.");
        }
        self.principal = outcome.principal();
        if matches!(self.principal, Some(SessionPrincipal::Admin | SessionPrincipal::Doctor { .. })) {
            self.db.ensure_seeded()?;
        }
        Ok(Some(outcome))
    }

    fn principal(&self) -> Option<&SessionPrincipal> {
        self.principal.as_ref()
    }
}

pub fn handle_seed(ctx: &CliContext) -> Result<()> {
    let report = ctx.db.ensure_seeded()?;
    if report.changed() {
        println!(
            "Seeded defaults (doctors: {}, patients: {})",
            if report.doctors_seeded { "yes" } else { "no" },
            if report.patients_seeded { "yes" } else { "no" }
        );
    } else {
        println!("Collections already initialised; nothing to seed.");
    }
    Ok(())
}

pub fn handle_login(outcome: Option<&LoginOutcome>) -> Result<()> {
    match outcome {
        Some(LoginOutcome::Admin) => println!("Inicio de sesión (Admin) exitoso. -> admin"),
        Some(LoginOutcome::Doctor(doctor)) => {
            println!("Inicio de sesión (Doctor: {}) exitoso. -> doctor", doctor.full_name)
        }
        Some(LoginOutcome::Patient(patient)) => println!(
            "Inicio de sesión (Paciente: {}) exitoso. -> paciente-vista?id={}",
            patient.full_name, patient.national_id
        ),
        Some(LoginOutcome::InvalidCredentials) | None => bail!("Usuario o contraseña incorrectos."),
    }
    Ok(())
}

pub fn handle_recover_password() {
    println!("{}", RECOVERY_NOTICE);
}

pub fn handle_users(ctx: &CliContext) -> Result<()> {
    authorize(ctx.principal(), Permission::ManageUsers)?;
    print_doctors(&ctx.db.doctors().list_all()?);
    println!();
    print_patients(&ctx.db.patients().list_all()?);
    Ok(())
}

pub fn handle_lookup(ctx: &CliContext, national_id: &str) -> Result<()> {
    if national_id.trim().is_empty() {
        bail!("Ingrese un número de cédula para buscar.");
    }
    let found = match ctx.principal() {
        Some(SessionPrincipal::Admin) => {
            authorize(ctx.principal(), Permission::SearchDirectory)?;
            ctx.db.lookup_by_national_id(national_id)?
        }
        _ => {
            authorize(ctx.principal(), Permission::ListPatients)?;
            ctx.db.patients().find_by_national_id(national_id.trim())?.map(UserRecord::Patient)
        }
    };
    match found {
        Some(record) => {
            let id = match &record {
                UserRecord::Patient(p) => &p.national_id,
                UserRecord::Doctor(d) => &d.national_id,
            };
            println!("{} {} ({})", record.role_label().bold(), record.full_name(), id);
            Ok(())
        }
        None => bail!("No se encontró ningún usuario con la cédula {}", national_id.trim()),
    }
}

pub fn handle_patient(ctx: &CliContext, command: PatientCommand) -> Result<()> {
    match command {
        PatientCommand::List => {
            authorize(ctx.principal(), Permission::ListPatients)?;
            print_patients(&ctx.db.patients().list_all()?);
        }
        PatientCommand::Add(args) => add_patient(ctx, args)?,
        PatientCommand::Show { national_id } => show_patient(ctx, &national_id)?,
        PatientCommand::Update(args) => update_patient(ctx, args)?,
        PatientCommand::Delete { national_id } => {
            authorize(ctx.principal(), Permission::ManageUsers)?;
            let removed = ctx.db.patients().delete(&national_id)?;
            println!("Paciente {} eliminado junto con su historial.", removed.full_name);
        }
    }
    Ok(())
}

fn add_patient(ctx: &CliContext, args: PatientArgs) -> Result<()> {
    // Doctors use Add-Patient (login = national id); admins Add-User.
    let username = match ctx.principal() {
        Some(SessionPrincipal::Admin) => {
            authorize(ctx.principal(), Permission::ManageUsers)?;
            args.login_username
        }
        _ => {
            authorize(ctx.principal(), Permission::AddPatient)?;
            None
        }
    };
    let patient = PatientForm {
        full_name: args.name,
        national_id: args.national_id,
        age: args.age,
        phone: args.phone,
        email: args.email,
        allergies: args.allergies,
        username,
        password: args.new_password,
    }
    .validate()?;
    let name = patient.full_name.clone();
    ctx.db.patients().create(patient)?;
    println!("Paciente {} registrado.", name);
    Ok(())
}

fn show_patient(ctx: &CliContext, national_id: &str) -> Result<()> {
    let principal = authorize_patient(ctx.principal(), Permission::ViewProfile, national_id)?;
    let patient = ctx
        .db
        .patients()
        .find_by_national_id(national_id)?
        .ok_or_else(|| anyhow!("Paciente no encontrado."))?;

    if principal.is_read_only() {
        println!("{}", "(vista de administrador, solo lectura)".dimmed());
    }
    println!("{}", patient.full_name.bold());
    println!("  CI:        {}", patient.national_id);
    println!("  Edad:      {}", patient.age);
    println!("  Teléfono:  {}", or_na(&patient.phone));
    println!("  Email:     {}", or_na(&patient.email));
    println!("  Alergias:  {}", if patient.allergies.is_empty() { "Ninguna" } else { &patient.allergies });
    println!();
    print_history(&ctx.db.history().view_for_patient(national_id)?);
    Ok(())
}

fn update_patient(ctx: &CliContext, args: PatientUpdateArgs) -> Result<()> {
    authorize(ctx.principal(), Permission::ManageUsers)?;
    let patients = ctx.db.patients();
    let current = patients
        .find_by_national_id(&args.national_id)?
        .ok_or_else(|| anyhow!("Paciente no encontrado."))?;

    let updated = PatientForm {
        full_name: args.name.unwrap_or_else(|| current.full_name.clone()),
        national_id: current.national_id.clone(),
        age: args.age.unwrap_or_else(|| current.age.to_string()),
        phone: args.phone.unwrap_or_else(|| current.phone.clone()),
        email: args.email.unwrap_or_else(|| current.email.clone()),
        allergies: args.allergies.unwrap_or_else(|| current.allergies.clone()),
        username: Some(args.login_username.unwrap_or_else(|| current.username.clone())),
        password: args.new_password.unwrap_or_else(|| current.password.clone()),
    }
    .validate_update(&current)?;
    patients.update(&args.national_id, updated)?;
    println!("Paciente {} actualizado.", args.national_id);
    Ok(())
}

pub fn handle_doctor(ctx: &CliContext, command: DoctorCommand) -> Result<()> {
    authorize(ctx.principal(), Permission::ManageUsers)?;
    match command {
        DoctorCommand::List => print_doctors(&ctx.db.doctors().list_all()?),
        DoctorCommand::Add(args) => add_doctor(ctx, args)?,
        DoctorCommand::Update(args) => update_doctor(ctx, args)?,
        DoctorCommand::Delete { national_id } => {
            let removed = ctx.db.doctors().delete(&national_id)?;
            println!("Doctor {} eliminado.", removed.full_name);
        }
    }
    Ok(())
}

fn add_doctor(ctx: &CliContext, args: DoctorArgs) -> Result<()> {
    let doctor = DoctorForm {
        full_name: args.name,
        national_id: args.national_id,
        phone: args.phone,
        username: args.login_username,
        password: args.new_password,
    }
    .validate()?;
    let name = doctor.full_name.clone();
    ctx.db.doctors().create(doctor)?;
    println!("Doctor {} registrado.", name);
    Ok(())
}

fn update_doctor(ctx: &CliContext, args: DoctorUpdateArgs) -> Result<()> {
    let doctors = ctx.db.doctors();
    let current = doctors
        .find_by_national_id(&args.national_id)?
        .ok_or_else(|| anyhow!("Doctor no encontrado."))?;
    let updated = DoctorForm {
        full_name: args.name.unwrap_or_else(|| current.full_name.clone()),
        national_id: current.national_id.clone(),
        phone: args.phone.unwrap_or_else(|| current.phone.clone()),
        username: Some(args.login_username.unwrap_or_else(|| current.username.clone())),
        password: args.new_password.unwrap_or_else(|| current.password.clone()),
    }
    .validate_update(&current)?;
    doctors.update(&args.national_id, updated)?;
    println!("Doctor {} actualizado.", args.national_id);
    Ok(())
}

pub async fn handle_visit(ctx: &CliContext, command: VisitCommand) -> Result<()> {
    match command {
        VisitCommand::Add(args) => add_visit(ctx, args).await,
        VisitCommand::List { national_id } => {
            authorize_patient(ctx.principal(), Permission::ViewProfile, &national_id)?;
            print_history(&ctx.db.history().view_for_patient(&national_id)?);
            Ok(())
        }
    }
}

async fn add_visit(ctx: &CliContext, args: VisitArgs) -> Result<()> {
    authorize_patient(ctx.principal(), Permission::AddVisit, &args.national_id)?;
    let record = VisitRecord {
        date: args.date,
        reason: args.reason,
        weight: args.weight,
        blood_pressure: args.blood_pressure,
        diagnosis: args.diagnosis,
        treatment: args.treatment,
        notes: args.notes,
        attached_document: None,
    };
    ctx.db
        .visits()
        .record_visit(&args.national_id, record, args.attachment.as_deref())
        .await
        .with_context(|| format!("No se pudo guardar el encuentro de {}", args.national_id))?;
    println!("Encuentro guardado para el paciente {}.", args.national_id);
    Ok(())
}

pub async fn handle_export(ctx: &CliContext, args: ExportArgs) -> Result<()> {
    let principal = authorize_patient(ctx.principal(), Permission::ExportRecord, &args.national_id)?;
    let format = ExportFormat::from(args.format);
    let document = ctx.db.export().export(&args.national_id, format, principal.export_audience())?;

    let directory = args.output.unwrap_or_else(|| ctx.output_directory.clone());
    let path = write_export(&directory, &document.file_name, &document.body).await?;
    info!("Export written to {:?}", path);
    println!("{} ({} bytes)", path.display(), document.body.len());
    Ok(())
}

async fn write_export(directory: &Path, file_name: &str, body: &[u8]) -> Result<PathBuf> {
    tokio::fs::create_dir_all(directory)
        .await
        .with_context(|| format!("Failed to create export directory {:?}", directory))?;
    let path = directory.join(file_name);
    tokio::fs::write(&path, body)
        .await
        .with_context(|| format!("Failed to write export file {:?}", path))?;
    Ok(path)
}

fn or_na(value: &str) -> &str {
    if value.is_empty() {
        "N/A"
    } else {
        value
    }
}

fn print_doctors(doctors: &[Doctor]) {
    println!("{}", "Doctores".bold());
    println!("{:<30} {:<12} {:<12} {:<15}", "Nombre", "CI", "Teléfono", "Usuario");
    for doctor in doctors {
        println!(
            "{:<30} {:<12} {:<12} {:<15}",
            doctor.full_name,
            doctor.national_id,
            or_na(&doctor.phone),
            doctor.username
        );
    }
}

fn print_patients(patients: &[Patient]) {
    println!("{}", "Pacientes".bold());
    println!("{:<30} {:<12} {:<6} {:<12} {:<15}", "Nombre", "CI", "Edad", "Teléfono", "Usuario");
    for patient in patients {
        println!(
            "{:<30} {:<12} {:<6} {:<12} {:<15}",
            patient.full_name,
            patient.national_id,
            patient.age.to_string(),
            or_na(&patient.phone),
            patient.username
        );
    }
}

fn print_history(view: &HistoryView) {
    match view {
        HistoryView::Empty => println!("No hay encuentros registrados."),
        HistoryView::Unreadable(reason) => {
            println!("{} ({})", "Error al leer el historial.".red(), reason)
        }
        HistoryView::Entries(visits) => {
            for (index, visit) in visits.iter().enumerate() {
                println!("{}", format!("Encuentro #{} - {}", index + 1, or_na(&visit.date)).bold());
                println!("  Motivo:        {}", or_na(&visit.reason));
                println!("  Peso:          {} kg", or_na(&visit.weight));
                println!("  Presión:       {}", or_na(&visit.blood_pressure));
                println!("  Diagnóstico:   {}", or_na(&visit.diagnosis));
                println!("  Tratamiento:   {}", or_na(&visit.treatment));
                println!("  Observaciones: {}", or_na(&visit.notes));
                println!("  Documento:     {}", if visit.has_attachment() { "Sí" } else { "No" });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::ExportFormatArg;
    use lib::StorageEngine;

    fn context() -> (CliContext, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let ctx = CliContext::new(ClinicDatabase::in_memory(), dir.path().to_path_buf());
        (ctx, dir)
    }

    #[test]
    fn staff_login_seeds_defaults() {
        let (mut ctx, _dir) = context();
        assert!(ctx.authenticate(Some("admin"), Some("admin123")).unwrap().is_some());
        assert_eq!(ctx.principal, Some(SessionPrincipal::Admin));
        assert_eq!(ctx.db.patients().list_all().unwrap().len(), 3);
    }

    #[test]
    fn rejects_bad_credentials() {
        let (mut ctx, _dir) = context();
        ctx.db.ensure_seeded().unwrap();
        assert!(ctx.authenticate(Some("doctor"), Some("nope")).is_err());
        assert!(ctx.authenticate(Some("doctor"), None).is_err());
        assert!(ctx.authenticate(None, None).unwrap().is_none());
    }

    #[test]
    fn doctor_adds_patient_with_national_id_login() {
        let (mut ctx, _dir) = context();
        // Fresh store: the doctor does not exist until seeded.
        assert!(ctx.authenticate(Some("doctor"), Some("12345")).is_err());
        assert!(ctx.principal.is_none());
        ctx.db.ensure_seeded().unwrap();
        ctx.authenticate(Some("doctor"), Some("12345")).unwrap();

        let args = PatientArgs {
            name: "Rosa Cevallos".to_string(),
            national_id: "1305556667".to_string(),
            age: "51".to_string(),
            phone: String::new(),
            email: String::new(),
            allergies: String::new(),
            login_username: Some("ignored".to_string()),
            new_password: "pw".to_string(),
        };
        handle_patient(&ctx, PatientCommand::Add(args)).unwrap();
        let rosa = ctx.db.patients().find_by_national_id("1305556667").unwrap().unwrap();
        assert_eq!(rosa.username, "1305556667");
    }

    #[test]
    fn patient_cannot_manage_users_or_see_others() {
        let (mut ctx, _dir) = context();
        ctx.db.ensure_seeded().unwrap();
        ctx.authenticate(Some("1315896547"), Some("123")).unwrap();

        assert!(handle_users(&ctx).is_err());
        assert!(show_patient(&ctx, "1309874563").is_err());
        assert!(show_patient(&ctx, "1315896547").is_ok());
    }

    #[tokio::test]
    async fn patient_exports_own_record() {
        let (mut ctx, dir) = context();
        ctx.db.ensure_seeded().unwrap();
        ctx.db.history().append("1315896547", VisitRecord::default()).unwrap();
        ctx.authenticate(Some("1315896547"), Some("123")).unwrap();

        let args = ExportArgs { national_id: "1315896547".to_string(), format: ExportFormatArg::Xml, output: None };
        handle_export(&ctx, args).await.unwrap();
        let written = std::fs::read_to_string(dir.path().join("mi-historial-1315896547.xml")).unwrap();
        assert!(written.contains("<total_encuentros>1</total_encuentros>"));
    }

    #[test]
    fn admin_changes_system_doctor_password() {
        let (mut ctx, _dir) = context();
        ctx.authenticate(Some("admin"), Some("admin123")).unwrap();
        let args = DoctorUpdateArgs {
            national_id: "9999999999".to_string(),
            name: None,
            phone: None,
            login_username: None,
            new_password: Some("nuevo".to_string()),
        };
        handle_doctor(&ctx, DoctorCommand::Update(args)).unwrap();

        let system = ctx.db.doctors().find_by_national_id("9999999999").unwrap().unwrap();
        assert_eq!(system.password, "nuevo");
        assert_eq!(system.phone, "N/A");
        assert!(matches!(ctx.identity.login("doctor", "nuevo").unwrap(), LoginOutcome::Doctor(_)));
    }

    #[test]
    fn admin_cannot_set_malformed_phone() {
        let (mut ctx, _dir) = context();
        ctx.authenticate(Some("admin"), Some("admin123")).unwrap();
        let args = DoctorUpdateArgs {
            national_id: "9999999999".to_string(),
            name: None,
            phone: Some("099".to_string()),
            login_username: None,
            new_password: None,
        };
        assert!(handle_doctor(&ctx, DoctorCommand::Update(args)).is_err());
        assert_eq!(ctx.db.doctors().find_by_national_id("9999999999").unwrap().unwrap().phone, "N/A");
    }

    #[test]
    fn admin_adds_patient_with_age_as_text() {
        let (mut ctx, _dir) = context();
        ctx.authenticate(Some("admin"), Some("admin123")).unwrap();
        let args = PatientArgs {
            name: "Rosa Cevallos".to_string(),
            national_id: "1305556667".to_string(),
            age: "51".to_string(),
            phone: String::new(),
            email: String::new(),
            allergies: String::new(),
            login_username: None,
            new_password: "pw".to_string(),
        };
        handle_patient(&ctx, PatientCommand::Add(args)).unwrap();
        let raw = ctx
            .db
            .storage(lib::StorageScope::Persistent)
            .get(lib::storage_engine::keys::PATIENTS_KEY)
            .unwrap()
            .unwrap();
        assert!(raw.contains("\"ci\":\"1305556667\",\"edad\":\"51\""));
    }

    #[test]
    fn admin_cannot_delete_system_doctor() {
        let (mut ctx, _dir) = context();
        ctx.authenticate(Some("admin"), Some("admin123")).unwrap();
        let result = handle_doctor(&ctx, DoctorCommand::Delete { national_id: "9999999999".to_string() });
        assert!(result.is_err());
        assert_eq!(ctx.db.doctors().list_all().unwrap().len(), 1);
    }
}

// security/src/lib.rs

pub mod roles;

use std::fmt;
use std::sync::Arc;

use lib::repositories::{DoctorRepository, PatientRepository};
use lib::storage_engine::keys::DOCTOR_SESSION_KEY;
use lib::storage_engine::{StorageEngine, StorageScope};
use lib::{ClinicDatabase, ClinicError};
use log::{debug, info, warn};
use models::{Doctor, Login, Patient};

pub use roles::{NavigationParams, Permission, SessionPrincipal, ADMIN_ROLE_PARAM};

/// Fixed administrator credential. It is never stored and is checked
/// before any collection.
pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin123";

/// Text shown by the login page's "forgot password" action.
pub const RECOVERY_NOTICE: &str = "Para recuperar su contraseña, por favor contacte a soporte:\n\n\
Correo: soporte.policlinico@email.com\n\
Teléfono: (099) 123-4567";

/// Result of one login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Admin,
    Doctor(Doctor),
    Patient(Patient),
    InvalidCredentials,
}

impl LoginOutcome {
    /// Principal for the landing page. A patient carries its national id
    /// forward; a doctor its display name.
    pub fn principal(&self) -> Option<SessionPrincipal> {
        match self {
            LoginOutcome::Admin => Some(SessionPrincipal::Admin),
            LoginOutcome::Doctor(doctor) => Some(SessionPrincipal::Doctor { name: doctor.full_name.clone() }),
            LoginOutcome::Patient(patient) => {
                Some(SessionPrincipal::Patient { national_id: patient.national_id.clone() })
            }
            LoginOutcome::InvalidCredentials => None,
        }
    }
}

/// Authorization failures.
#[derive(Debug)]
pub enum AuthError {
    /// No principal could be decoded; the caller should send the user to
    /// the login page.
    NotAuthenticated,
    Forbidden(String),
    Storage(ClinicError),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AuthError::NotAuthenticated => write!(f, "Sesión no encontrada. Por favor, inicie sesión."),
            AuthError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AuthError::Storage(err) => write!(f, "Storage error: {}", err),
        }
    }
}

impl std::error::Error for AuthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AuthError::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ClinicError> for AuthError {
    fn from(err: ClinicError) -> Self {
        AuthError::Storage(err)
    }
}

/// Checks that `principal` exists and holds `permission`.
pub fn authorize(principal: Option<&SessionPrincipal>, permission: Permission) -> Result<&SessionPrincipal, AuthError> {
    let principal = principal.ok_or(AuthError::NotAuthenticated)?;
    if principal.has_permission(permission) {
        Ok(principal)
    } else {
        warn!("Denied {} to {}", permission, principal);
        Err(AuthError::Forbidden(format!("{} may not {}", principal, permission)))
    }
}

/// Like `authorize`, and additionally restricts a patient to its own record.
pub fn authorize_patient<'a>(
    principal: Option<&'a SessionPrincipal>,
    permission: Permission,
    national_id: &str,
) -> Result<&'a SessionPrincipal, AuthError> {
    let principal = authorize(principal, permission)?;
    if principal.can_access_patient(national_id) {
        Ok(principal)
    } else {
        warn!("Denied access to patient {} for {}", national_id, principal);
        Err(AuthError::Forbidden(format!("{} may not access patient {}", principal, national_id)))
    }
}

/// Login state machine over the three identity classes.
#[derive(Clone)]
pub struct IdentityService {
    doctors: DoctorRepository,
    patients: PatientRepository,
    session: Arc<dyn StorageEngine>,
}

impl IdentityService {
    pub fn new(db: &ClinicDatabase) -> Self {
        IdentityService {
            doctors: db.doctors(),
            patients: db.patients(),
            session: db.storage(StorageScope::Session),
        }
    }

    /// Tries admin, then doctors, then patients, with exact matching. Any
    /// previous doctor session is cleared first, even when the attempt
    /// fails.
    pub fn login(&self, username: &str, password: &str) -> lib::Result<LoginOutcome> {
        self.session.remove(DOCTOR_SESSION_KEY)?;
        let login = Login::new(username, password);

        if login.matches(ADMIN_USERNAME, ADMIN_PASSWORD) {
            info!("Admin logged in");
            return Ok(LoginOutcome::Admin);
        }

        if let Some(doctor) = self.doctors.find_by_credentials(&login)? {
            self.session.set(DOCTOR_SESSION_KEY, &doctor.full_name)?;
            info!("Doctor {} logged in", doctor.username);
            return Ok(LoginOutcome::Doctor(doctor));
        }

        if let Some(patient) = self.patients.find_by_credentials(&login)? {
            info!("Patient {} logged in", patient.national_id);
            return Ok(LoginOutcome::Patient(patient));
        }

        warn!("Failed login attempt for username '{}'", username);
        Ok(LoginOutcome::InvalidCredentials)
    }

    /// Display name of the logged-in doctor. Absence is the normal
    /// "not logged in" state, not an error.
    pub fn current_doctor_session(&self) -> lib::Result<Option<String>> {
        let name = self.session.get(DOCTOR_SESSION_KEY)?.filter(|name| !name.is_empty());
        debug!("Doctor session present: {}", name.is_some());
        Ok(name)
    }

    pub fn logout(&self) -> lib::Result<()> {
        info!("Clearing doctor session");
        self.session.remove(DOCTOR_SESSION_KEY)
    }

    /// Decodes the principal for a page from its navigation parameters and
    /// the session scope.
    pub fn principal_for(&self, params: &NavigationParams) -> lib::Result<Option<SessionPrincipal>> {
        let session = self.current_doctor_session()?;
        Ok(SessionPrincipal::from_navigation(params, session.as_deref()))
    }
}

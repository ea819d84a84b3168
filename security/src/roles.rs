// security/src/roles.rs

use core::fmt;

use lib::ExportAudience;
use serde::{Deserialize, Serialize};

/// Value of the `role` navigation parameter that switches a profile page
/// into the admin's read-only view.
pub const ADMIN_ROLE_PARAM: &str = "admin";

/// Page-to-page context carried as an `?id=...&role=...` query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationParams {
    pub id: Option<String>,
    pub role: Option<String>,
}

impl NavigationParams {
    /// Parses a query string such as `id=1315896547&role=admin`. Unknown
    /// keys are ignored; a leading `?` is allowed.
    pub fn from_query(query: &str) -> Self {
        let mut params = NavigationParams::default();
        for pair in query.trim_start_matches('?').split('&') {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                "id" if !value.is_empty() => params.id = Some(value.to_string()),
                "role" if !value.is_empty() => params.role = Some(value.to_string()),
                _ => {}
            }
        }
        params
    }

    pub fn to_query(&self) -> String {
        let mut parts = Vec::new();
        if let Some(id) = &self.id {
            parts.push(format!("id={}", id));
        }
        if let Some(role) = &self.role {
            parts.push(format!("role={}", role));
        }
        parts.join("&")
    }
}

/// Operations a principal may be allowed to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Add, modify and delete doctors and patients from the admin console.
    ManageUsers,
    /// Search the whole directory (patients and doctors) by national id.
    SearchDirectory,
    ListPatients,
    AddPatient,
    AddVisit,
    ViewProfile,
    ExportRecord,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::ManageUsers => "manage_users",
            Permission::SearchDirectory => "search_directory",
            Permission::ListPatients => "list_patients",
            Permission::AddPatient => "add_patient",
            Permission::AddVisit => "add_visit",
            Permission::ViewProfile => "view_profile",
            Permission::ExportRecord => "export_record",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const ADMIN_PERMISSIONS: &[Permission] = &[
    Permission::ManageUsers,
    Permission::SearchDirectory,
    Permission::ViewProfile,
    Permission::ExportRecord,
];

const DOCTOR_PERMISSIONS: &[Permission] = &[
    Permission::ListPatients,
    Permission::AddPatient,
    Permission::AddVisit,
    Permission::ViewProfile,
    Permission::ExportRecord,
];

const PATIENT_PERMISSIONS: &[Permission] = &[Permission::ViewProfile, Permission::ExportRecord];

/// The authenticated identity a page is rendered for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SessionPrincipal {
    Admin,
    Doctor { name: String },
    Patient { national_id: String },
}

impl SessionPrincipal {
    /// Decodes the principal once at page entry. `role=admin` wins, then a
    /// stored doctor name, then a bare `id` (the patient's own view).
    /// `None` means "not authenticated".
    pub fn from_navigation(params: &NavigationParams, doctor_session: Option<&str>) -> Option<Self> {
        if params.role.as_deref() == Some(ADMIN_ROLE_PARAM) {
            return Some(SessionPrincipal::Admin);
        }
        if let Some(name) = doctor_session.filter(|name| !name.is_empty()) {
            return Some(SessionPrincipal::Doctor { name: name.to_string() });
        }
        params
            .id
            .as_ref()
            .map(|id| SessionPrincipal::Patient { national_id: id.clone() })
    }

    /// Parameters of a link to the profile of `target`. A patient can only
    /// link to itself, whatever `target` says.
    pub fn navigation_for(&self, target: &str) -> NavigationParams {
        match self {
            SessionPrincipal::Admin => NavigationParams {
                id: Some(target.to_string()),
                role: Some(ADMIN_ROLE_PARAM.to_string()),
            },
            SessionPrincipal::Doctor { .. } => NavigationParams { id: Some(target.to_string()), role: None },
            SessionPrincipal::Patient { national_id } => {
                NavigationParams { id: Some(national_id.clone()), role: None }
            }
        }
    }

    pub fn to_query(&self, target: &str) -> String {
        self.navigation_for(target).to_query()
    }

    pub fn permissions(&self) -> &'static [Permission] {
        match self {
            SessionPrincipal::Admin => ADMIN_PERMISSIONS,
            SessionPrincipal::Doctor { .. } => DOCTOR_PERMISSIONS,
            SessionPrincipal::Patient { .. } => PATIENT_PERMISSIONS,
        }
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }

    /// Staff see every patient; a patient only its own record.
    pub fn can_access_patient(&self, national_id: &str) -> bool {
        match self {
            SessionPrincipal::Admin | SessionPrincipal::Doctor { .. } => true,
            SessionPrincipal::Patient { national_id: own } => own == national_id,
        }
    }

    /// The admin's profile view is read-only.
    pub fn is_read_only(&self) -> bool {
        matches!(self, SessionPrincipal::Admin)
    }

    pub fn export_audience(&self) -> ExportAudience {
        match self {
            SessionPrincipal::Patient { .. } => ExportAudience::Patient,
            _ => ExportAudience::Staff,
        }
    }
}

impl fmt::Display for SessionPrincipal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionPrincipal::Admin => f.write_str("admin"),
            SessionPrincipal::Doctor { name } => write!(f, "doctor '{}'", name),
            SessionPrincipal::Patient { national_id } => write!(f, "patient {}", national_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(id: Option<&str>, role: Option<&str>) -> NavigationParams {
        NavigationParams { id: id.map(str::to_string), role: role.map(str::to_string) }
    }

    #[test]
    fn should_prefer_admin_role_over_doctor_session() {
        let principal = SessionPrincipal::from_navigation(&params(Some("1315896547"), Some("admin")), Some("Dr. X"));
        assert_eq!(principal, Some(SessionPrincipal::Admin));
        assert!(principal.unwrap().is_read_only());
    }

    #[test]
    fn should_decode_doctor_then_patient() {
        assert_eq!(
            SessionPrincipal::from_navigation(&params(Some("1315896547"), None), Some("Dr. (Sistema)")),
            Some(SessionPrincipal::Doctor { name: "Dr. (Sistema)".to_string() })
        );
        assert_eq!(
            SessionPrincipal::from_navigation(&params(Some("1315896547"), None), None),
            Some(SessionPrincipal::Patient { national_id: "1315896547".to_string() })
        );
        assert_eq!(SessionPrincipal::from_navigation(&params(None, None), Some("")), None);
        assert_eq!(SessionPrincipal::from_navigation(&params(None, Some("doctor")), None), None);
    }

    #[test]
    fn should_round_trip_query() {
        let admin = SessionPrincipal::Admin;
        assert_eq!(admin.to_query("1309874563"), "id=1309874563&role=admin");
        let parsed = NavigationParams::from_query("?id=1309874563&role=admin");
        assert_eq!(SessionPrincipal::from_navigation(&parsed, None), Some(SessionPrincipal::Admin));

        let patient = SessionPrincipal::Patient { national_id: "1315896547".to_string() };
        assert_eq!(patient.to_query("1309874563"), "id=1315896547");
        assert_eq!(NavigationParams::from_query("id=&x=1"), NavigationParams::default());
    }

    #[test]
    fn should_scope_permissions_by_role() {
        let admin = SessionPrincipal::Admin;
        let doctor = SessionPrincipal::Doctor { name: "Dr. X".to_string() };
        let patient = SessionPrincipal::Patient { national_id: "1315896547".to_string() };

        assert!(admin.has_permission(Permission::ManageUsers));
        assert!(!admin.has_permission(Permission::AddVisit));
        assert!(doctor.has_permission(Permission::AddVisit));
        assert!(!doctor.has_permission(Permission::ManageUsers));
        assert!(!patient.has_permission(Permission::ListPatients));

        assert!(doctor.can_access_patient("1309874563"));
        assert!(patient.can_access_patient("1315896547"));
        assert!(!patient.can_access_patient("1309874563"));

        assert_eq!(doctor.export_audience(), ExportAudience::Staff);
        assert_eq!(patient.export_audience(), ExportAudience::Patient);
    }
}

// server/src/cli/commands.rs

// Command-line arguments and subcommands of the clinic CLI, defined with `clap`.
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use lib::ExportFormat;

#[derive(Debug, Parser)]
#[command(name = "policlinico-cli")]
#[command(version = "0.1.0")]
#[command(about = "Policlinico patient records: users, visit histories and exports")]
pub struct CliArgs {
    /// TOML configuration file. Missing file means defaults.
    #[arg(long, short = 'c', global = true, env = "POLICLINICO_CONFIG", value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Username used to log in before running the command.
    #[arg(long, short = 'u', global = true, env = "POLICLINICO_USERNAME")]
    pub username: Option<String>,

    #[arg(long, short = 'p', global = true, env = "POLICLINICO_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum Commands {
    /// Write the default doctor and sample patients if never initialised.
    Seed,
    /// Check the given credentials and print the landing page they lead to.
    Login,
    /// Print the support contact for password recovery.
    RecoverPassword,
    /// List every doctor and patient (admin).
    Users,
    /// Find a user by national id. Admins search both collections, doctors
    /// only patients.
    Lookup {
        #[arg(value_name = "NATIONAL_ID")]
        national_id: String,
    },
    #[command(subcommand)]
    Patient(PatientCommand),
    #[command(subcommand)]
    Doctor(DoctorCommand),
    #[command(subcommand)]
    Visit(VisitCommand),
    /// Export a patient's record to a file.
    Export(ExportArgs),
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum PatientCommand {
    List,
    Add(PatientArgs),
    /// Profile and visit history.
    Show {
        #[arg(value_name = "NATIONAL_ID")]
        national_id: String,
    },
    Update(PatientUpdateArgs),
    Delete {
        #[arg(value_name = "NATIONAL_ID")]
        national_id: String,
    },
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum DoctorCommand {
    List,
    Add(DoctorArgs),
    Update(DoctorUpdateArgs),
    Delete {
        #[arg(value_name = "NATIONAL_ID")]
        national_id: String,
    },
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum VisitCommand {
    Add(VisitArgs),
    List {
        #[arg(value_name = "NATIONAL_ID")]
        national_id: String,
    },
}

#[derive(Debug, Args, PartialEq)]
pub struct PatientArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long = "ci")]
    pub national_id: String,
    #[arg(long, default_value = "")]
    pub age: String,
    #[arg(long, default_value = "")]
    pub phone: String,
    #[arg(long, default_value = "")]
    pub email: String,
    #[arg(long, default_value = "")]
    pub allergies: String,
    /// Login name; defaults to the national id.
    #[arg(long = "login")]
    pub login_username: Option<String>,
    #[arg(long = "new-password")]
    pub new_password: String,
}

#[derive(Debug, Args, PartialEq)]
pub struct PatientUpdateArgs {
    #[arg(value_name = "NATIONAL_ID")]
    pub national_id: String,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub age: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub allergies: Option<String>,
    #[arg(long = "login")]
    pub login_username: Option<String>,
    #[arg(long = "new-password")]
    pub new_password: Option<String>,
}

#[derive(Debug, Args, PartialEq)]
pub struct DoctorArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long = "ci")]
    pub national_id: String,
    #[arg(long, default_value = "")]
    pub phone: String,
    #[arg(long = "login")]
    pub login_username: Option<String>,
    #[arg(long = "new-password")]
    pub new_password: String,
}

#[derive(Debug, Args, PartialEq)]
pub struct DoctorUpdateArgs {
    #[arg(value_name = "NATIONAL_ID")]
    pub national_id: String,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long = "login")]
    pub login_username: Option<String>,
    #[arg(long = "new-password")]
    pub new_password: Option<String>,
}

#[derive(Debug, Args, PartialEq)]
pub struct VisitArgs {
    #[arg(value_name = "NATIONAL_ID")]
    pub national_id: String,
    #[arg(long)]
    pub date: String,
    #[arg(long, default_value = "")]
    pub reason: String,
    #[arg(long, default_value = "")]
    pub weight: String,
    #[arg(long = "pressure", default_value = "")]
    pub blood_pressure: String,
    #[arg(long, default_value = "")]
    pub diagnosis: String,
    #[arg(long, default_value = "")]
    pub treatment: String,
    #[arg(long, default_value = "")]
    pub notes: String,
    /// Document to attach to the visit.
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub attachment: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormatArg {
    Json,
    Xml,
    Pdf,
}

impl From<ExportFormatArg> for ExportFormat {
    fn from(arg: ExportFormatArg) -> Self {
        match arg {
            ExportFormatArg::Json => ExportFormat::Json,
            ExportFormatArg::Xml => ExportFormat::Xml,
            ExportFormatArg::Pdf => ExportFormat::Pdf,
        }
    }
}

#[derive(Debug, Args, PartialEq)]
pub struct ExportArgs {
    #[arg(value_name = "NATIONAL_ID")]
    pub national_id: String,
    #[arg(long, short = 'f', value_enum, default_value_t = ExportFormatArg::Json)]
    pub format: ExportFormatArg,
    /// Directory to write into; defaults to `export.output_directory`.
    #[arg(long, short = 'o', value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,
}

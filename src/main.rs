use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod auth;
mod cli;
mod client;
mod config;
mod dashboard;
mod error;
mod guard;
mod resource;
mod resources;
mod session;
mod store;
mod ui;

#[cfg(test)]
mod tests;

use cli::CliHandler;

#[derive(Parser)]
#[command(
    name = "placetrack",
    about = "Placement tracking dashboard for the terminal",
    long_about = "placetrack - campus placement tracking client

OVERVIEW:
  Role-gated views over the placement tracking service: students,
  companies, placement progress, important dates and statistics.

WORKFLOW:
  1. Log in with your account
  2. Browse and filter the directories
  3. Admins manage records, students track their own progress

QUICK START:
  placetrack login                      # Authenticate
  placetrack dashboard                  # Role-specific overview
  placetrack students list              # Browse the student directory
  placetrack status                     # Check session and server status",
    version,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Use an alternate config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in with username and password
    Login(LoginArgs),

    /// Log out and revoke the refresh token
    Logout,

    /// Create an account
    Register(RegisterArgs),

    /// Show authentication and server status
    #[command(aliases = &["st"])]
    Status,

    /// Role-specific overview
    #[command(aliases = &["dash"])]
    Dashboard,

    /// Placement statistics
    Stats,

    /// View or update your profile
    Profile(ProfileArgs),

    /// Student directory
    Students(StudentsArgs),

    /// Company directory
    Companies(CompaniesArgs),

    /// Placement progress records
    Progress(ProgressArgs),

    /// Selection stage catalogue
    Stages,

    /// Important dates and events
    Dates(DatesArgs),

    /// Admin/faculty account management
    Users(UsersArgs),

    /// Configure settings
    #[command(aliases = &["cfg"])]
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct LoginArgs {
    /// Username (prompted when omitted)
    pub username: Option<String>,
}

#[derive(Args)]
pub struct RegisterArgs {
    #[arg(long)]
    pub username: String,

    #[arg(long)]
    pub email: String,

    /// ADMIN, STUDENT or COMPANY
    #[arg(long, default_value = "STUDENT")]
    pub role: String,

    #[arg(long, default_value = "")]
    pub first_name: String,

    #[arg(long, default_value = "")]
    pub last_name: String,

    #[arg(long, default_value = "")]
    pub phone: String,
}

#[derive(Args)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub command: ProfileCommand,
}

#[derive(Subcommand)]
pub enum ProfileCommand {
    /// Show the signed-in profile
    Show,
    /// Update profile fields
    Update(ProfileUpdateArgs),
    /// Change the account password
    ChangePassword,
}

#[derive(Args)]
pub struct ProfileUpdateArgs {
    #[arg(long)]
    pub first_name: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,
}

#[derive(Args)]
pub struct StudentsArgs {
    #[command(subcommand)]
    pub command: StudentsCommand,
}

#[derive(Subcommand)]
pub enum StudentsCommand {
    /// List students with client-side filters
    #[command(aliases = &["ls"])]
    List(StudentListArgs),

    /// Show one student
    Show { id: i64 },

    /// Add a student and provision their login
    Add(StudentAddArgs),

    /// Edit a student record
    Edit(StudentEditArgs),

    /// Delete a student record
    #[command(aliases = &["rm"])]
    Remove {
        id: i64,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Bulk-import students from a CSV file
    Upload { file: PathBuf },

    /// List placed students
    Placed,

    /// List unplaced students
    Unplaced,

    /// Placement history for one student
    History { id: i64 },
}

#[derive(Args)]
pub struct StudentListArgs {
    /// Match name, enrollment number or email
    #[arg(short, long)]
    pub search: Option<String>,

    /// Branch code (CSE, IT, ECE, ME, CE, EE)
    #[arg(long)]
    pub branch: Option<String>,

    /// Year of study (1-4)
    #[arg(long)]
    pub year: Option<String>,

    /// Only placed students
    #[arg(long)]
    pub placed: bool,

    /// Only unplaced students
    #[arg(long, conflicts_with = "placed")]
    pub unplaced: bool,
}

#[derive(Args)]
pub struct StudentAddArgs {
    #[arg(long)]
    pub enrollment: String,

    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub email: String,

    #[arg(long, default_value = "")]
    pub phone: String,

    /// Branch code (CSE, IT, ECE, ME, CE, EE)
    #[arg(long)]
    pub branch: String,

    /// Year of study (1-4)
    #[arg(long, default_value = "1")]
    pub year: String,

    #[arg(long)]
    pub cgpa: f64,

    /// Comma-separated skills
    #[arg(long, default_value = "")]
    pub skills: String,

    #[arg(long)]
    pub placed: bool,

    /// Login password; omitted means one is derived and shown once
    #[arg(long)]
    pub password: Option<String>,
}

#[derive(Args)]
pub struct StudentEditArgs {
    pub id: i64,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub branch: Option<String>,

    #[arg(long)]
    pub year: Option<String>,

    #[arg(long)]
    pub cgpa: Option<f64>,

    #[arg(long)]
    pub skills: Option<String>,

    /// Mark placed (true/false)
    #[arg(long)]
    pub placed: Option<bool>,
}

#[derive(Args)]
pub struct CompaniesArgs {
    #[command(subcommand)]
    pub command: CompaniesCommand,
}

#[derive(Subcommand)]
pub enum CompaniesCommand {
    /// List companies with client-side filters
    #[command(aliases = &["ls"])]
    List(CompanyListArgs),

    /// Show one company
    Show { id: i64 },

    /// Add a company
    Add(CompanyAddArgs),

    /// Edit a company
    Edit(CompanyEditArgs),

    /// Delete a company
    #[command(aliases = &["rm"])]
    Remove {
        id: i64,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Applicants for one company
    Applicants { id: i64 },
}

#[derive(Args)]
pub struct CompanyListArgs {
    /// Match name, role or location
    #[arg(short, long)]
    pub search: Option<String>,

    /// PRODUCT, SERVICE, STARTUP or MNC
    #[arg(long = "type")]
    pub company_type: Option<String>,

    /// HIGH (10+ LPA), MED (5-10) or LOW (under 5)
    #[arg(long)]
    pub package: Option<String>,

    /// Only actively hiring companies
    #[arg(long)]
    pub active: bool,

    /// Only inactive companies
    #[arg(long, conflicts_with = "active")]
    pub inactive: bool,
}

#[derive(Args)]
pub struct CompanyAddArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long, default_value = "")]
    pub description: String,

    /// PRODUCT, SERVICE, STARTUP or MNC
    #[arg(long = "type")]
    pub company_type: String,

    #[arg(long)]
    pub website: Option<String>,

    /// Offered package in LPA
    #[arg(long)]
    pub package: f64,

    #[arg(long, default_value_t = 0.0)]
    pub min_cgpa: f64,

    /// Comma-separated branch codes
    #[arg(long, default_value = "")]
    pub branches: String,

    #[arg(long)]
    pub role: String,

    #[arg(long, default_value = "")]
    pub location: String,

    #[arg(long, default_value = "")]
    pub contact_person: String,

    #[arg(long, default_value = "")]
    pub contact_email: String,

    #[arg(long, default_value = "")]
    pub contact_phone: String,

    /// Mark as not currently hiring
    #[arg(long)]
    pub inactive: bool,
}

#[derive(Args)]
pub struct CompanyEditArgs {
    pub id: i64,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long = "type")]
    pub company_type: Option<String>,

    #[arg(long)]
    pub website: Option<String>,

    #[arg(long)]
    pub package: Option<f64>,

    #[arg(long)]
    pub min_cgpa: Option<f64>,

    #[arg(long)]
    pub branches: Option<String>,

    #[arg(long)]
    pub role: Option<String>,

    #[arg(long)]
    pub location: Option<String>,

    /// Actively hiring (true/false)
    #[arg(long)]
    pub active: Option<bool>,
}

#[derive(Args)]
pub struct ProgressArgs {
    #[command(subcommand)]
    pub command: ProgressCommand,
}

#[derive(Subcommand)]
pub enum ProgressCommand {
    /// List placement records
    #[command(aliases = &["ls"])]
    List(ProgressListArgs),

    /// Your own placement records
    Mine,

    /// Add a placement record
    Add(ProgressAddArgs),

    /// Edit a placement record
    Edit(ProgressEditArgs),

    /// Delete a placement record
    #[command(aliases = &["rm"])]
    Remove {
        id: i64,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Ten most recently updated records
    Recent,

    /// Per-stage results, optionally for one record
    StageResults {
        /// Placement record id
        #[arg(long)]
        record: Option<i64>,
    },
}

#[derive(Args)]
pub struct ProgressListArgs {
    /// Match student name, company name or enrollment number
    #[arg(short, long)]
    pub search: Option<String>,

    /// Status code, e.g. APPLIED or OFFER_ACCEPTED
    #[arg(long)]
    pub status: Option<String>,
}

#[derive(Args)]
pub struct ProgressAddArgs {
    #[arg(long)]
    pub student: i64,

    #[arg(long)]
    pub company: i64,

    #[arg(long, default_value = "APPLIED")]
    pub status: String,

    #[arg(long)]
    pub stage: Option<i64>,

    #[arg(long, default_value = "")]
    pub notes: String,
}

#[derive(Args)]
pub struct ProgressEditArgs {
    pub id: i64,

    #[arg(long)]
    pub status: Option<String>,

    #[arg(long)]
    pub stage: Option<i64>,

    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Args)]
pub struct DatesArgs {
    #[command(subcommand)]
    pub command: DatesCommand,
}

#[derive(Subcommand)]
pub enum DatesCommand {
    /// List events with client-side filters
    #[command(aliases = &["ls"])]
    List(DateListArgs),

    /// Server-side upcoming events
    Upcoming,

    /// Add an event
    Add(DateAddArgs),

    /// Edit an event
    Edit(DateEditArgs),

    /// Delete an event
    #[command(aliases = &["rm"])]
    Remove {
        id: i64,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Args)]
pub struct DateListArgs {
    /// Match title or description
    #[arg(short, long)]
    pub search: Option<String>,

    /// DRIVE, DEADLINE, TEST, INTERVIEW, RESULT or OTHER
    #[arg(long = "type")]
    pub event_type: Option<String>,

    /// Only events after now
    #[arg(long)]
    pub upcoming: bool,

    /// Only events before now
    #[arg(long, conflicts_with = "upcoming")]
    pub past: bool,
}

#[derive(Args)]
pub struct DateAddArgs {
    #[arg(long)]
    pub title: String,

    #[arg(long, default_value = "")]
    pub description: String,

    /// DRIVE, DEADLINE, TEST, INTERVIEW, RESULT or OTHER
    #[arg(long = "type", default_value = "OTHER")]
    pub event_type: String,

    /// Related company id
    #[arg(long)]
    pub company: Option<i64>,

    /// Event instant, RFC 3339 or YYYY-MM-DD
    #[arg(long)]
    pub date: String,

    #[arg(long, default_value = "")]
    pub location: String,

    /// Registration or meeting link
    #[arg(long)]
    pub link: Option<String>,
}

#[derive(Args)]
pub struct DateEditArgs {
    pub id: i64,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long = "type")]
    pub event_type: Option<String>,

    #[arg(long)]
    pub date: Option<String>,

    #[arg(long)]
    pub location: Option<String>,

    /// Active (true/false)
    #[arg(long)]
    pub active: Option<bool>,
}

#[derive(Args)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Subcommand)]
pub enum UsersCommand {
    /// List admin/faculty accounts
    #[command(aliases = &["ls"])]
    List(UserListArgs),

    /// Create an admin/faculty account
    Add(UserAddArgs),

    /// Edit an account
    Edit(UserEditArgs),

    /// Delete an account
    #[command(aliases = &["rm"])]
    Remove {
        id: i64,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Mark an account verified
    Verify { id: i64 },
}

#[derive(Args)]
pub struct UserListArgs {
    /// Match username, email or name
    #[arg(short, long)]
    pub search: Option<String>,
}

#[derive(Args)]
pub struct UserAddArgs {
    #[arg(long)]
    pub username: String,

    #[arg(long)]
    pub email: String,

    #[arg(long, default_value = "ADMIN")]
    pub role: String,

    #[arg(long, default_value = "")]
    pub first_name: String,

    #[arg(long, default_value = "")]
    pub last_name: String,

    #[arg(long, default_value = "")]
    pub phone: String,
}

#[derive(Args)]
pub struct UserEditArgs {
    pub id: i64,

    #[arg(long)]
    pub username: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub first_name: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,

    #[arg(long)]
    pub role: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,
}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    Show,
    SetEndpoint { url: String },
    SetTimeout { seconds: u64 },
    SetVerbose { enabled: String },
    Reset,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(format!("placetrack={}", log_level))
        .init();

    let mut handler = CliHandler::with_config_path(cli.config);

    if let Err(e) = handler.execute(cli.command).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

//! CLI command handlers
//!
//! One handler per command family. Each protected handler opens the
//! session (config, token store, client, bootstrap), evaluates its access
//! guard, and only then touches the API.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use tokio::fs;

use placetrack_protocol::{
    Branch, Company, CompanyDraft, CompanyType, CsvUploadReport, EventType, ImportantDate,
    ImportantDateDraft, PlacementDraft, PlacementRecord, PlacementStatistics, PlacementStatus,
    ProfileUpdate, RegisterRequest, Role, Student, StudentDraft, UserAccount, UserUpdate,
};

use crate::auth::AuthManager;
use crate::client::HttpClient;
use crate::config::{default_config_path, Config};
use crate::dashboard;
use crate::error::{Result, TrackError};
use crate::guard::{AccessGuard, GuardState};
use crate::resource::{apply_filters, ListController, OneShot};
use crate::resources::students::GeneratedCredentials;
use crate::resources::{companies, dates, progress, stages, students, users};
use crate::store::TokenStore;
use crate::ui::UI;
use crate::{
    Commands, CompaniesCommand, CompanyAddArgs, CompanyEditArgs, CompanyListArgs, ConfigCommand,
    DateListArgs, DatesCommand, LoginArgs, ProfileCommand, ProfileUpdateArgs, ProgressCommand,
    ProgressListArgs, RegisterArgs, StudentAddArgs, StudentEditArgs, StudentListArgs,
    StudentsCommand, UserEditArgs, UsersCommand,
};

/// CLI handler for processing commands
pub struct CliHandler {
    config_path: Option<PathBuf>,
    ui: UI,
}

impl CliHandler {
    /// Create a new CLI handler with an optional custom config path
    pub fn with_config_path(config_path: Option<PathBuf>) -> Self {
        Self {
            config_path,
            ui: UI::new(),
        }
    }

    async fn load_config(&self) -> Result<Config> {
        match &self.config_path {
            Some(path) => Config::load_from(path).await,
            None => Config::load().await,
        }
    }

    fn config_file(&self) -> PathBuf {
        self.config_path.clone().unwrap_or_else(default_config_path)
    }

    /// Build the client stack and restore the session from stored tokens.
    async fn open_session(&self) -> Result<(Arc<HttpClient>, AuthManager)> {
        let config = self.load_config().await?;
        let store = TokenStore::open(&config.token_path)?.into_shared();
        let client = HttpClient::new(config, store)?;
        let mut auth = AuthManager::new(client.clone());
        auth.bootstrap().await;
        Ok((Arc::new(client), auth))
    }

    /// Gate a protected view. Denied content is withheld entirely; the
    /// denial itself is the rendered output.
    fn ensure(&self, auth: &AuthManager, guard: &AccessGuard) -> Result<()> {
        match guard.evaluate(auth) {
            GuardState::Authorized => Ok(()),
            GuardState::Loading => Err(TrackError::internal("session state not ready")),
            GuardState::Unauthenticated => {
                self.ui.error("You are not logged in.");
                self.ui.info("Run `placetrack login` first.");
                Err(TrackError::not_logged_in())
            }
            GuardState::Forbidden { role } => {
                self.ui.header("Access Denied");
                self.ui
                    .warning("You don't have permission to access this view.");
                Err(TrackError::authorization(format!(
                    "role {} is not permitted here",
                    role
                )))
            }
        }
    }

    /// Execute a CLI command
    pub async fn execute(&mut self, command: Commands) -> Result<()> {
        match command {
            Commands::Login(args) => self.handle_login(args).await,
            Commands::Logout => self.handle_logout().await,
            Commands::Register(args) => self.handle_register(args).await,
            Commands::Status => self.handle_status().await,
            Commands::Dashboard => self.handle_dashboard().await,
            Commands::Stats => self.handle_stats().await,
            Commands::Profile(args) => self.handle_profile(args.command).await,
            Commands::Students(args) => self.handle_students(args.command).await,
            Commands::Companies(args) => self.handle_companies(args.command).await,
            Commands::Progress(args) => self.handle_progress(args.command).await,
            Commands::Stages => self.handle_stages().await,
            Commands::Dates(args) => self.handle_dates(args.command).await,
            Commands::Users(args) => self.handle_users(args.command).await,
            Commands::Config(args) => self.handle_config(args.command).await,
        }
    }

    // ==================== Auth commands ====================

    async fn handle_login(&mut self, args: LoginArgs) -> Result<()> {
        let (_, mut auth) = self.open_session().await?;

        let username = match args.username {
            Some(u) => u,
            None => self.ui.input("Username")?,
        };
        let password = self.ui.password("Password")?;

        let session = auth.login(&username, &password).await?;

        self.ui.success("Logged in.");
        self.ui.card(
            "Session",
            vec![
                ("User", session.username().to_string()),
                ("Role", session.role().label().to_string()),
            ],
        );
        Ok(())
    }

    async fn handle_logout(&mut self) -> Result<()> {
        let (_, mut auth) = self.open_session().await?;
        auth.logout().await?;
        self.ui.success("Logged out.");
        Ok(())
    }

    async fn handle_register(&mut self, args: RegisterArgs) -> Result<()> {
        let (_, mut auth) = self.open_session().await?;

        let password = self.ui.password("Password")?;
        let password2 = self.ui.password("Confirm password")?;

        let request = RegisterRequest {
            username: args.username,
            email: args.email,
            password,
            password2,
            first_name: args.first_name,
            last_name: args.last_name,
            role: parse_enum::<Role>(&args.role)?,
            phone: args.phone,
        };

        let session = auth.register(&request).await?;
        self.ui.success("Account created and signed in.");
        self.ui.card(
            "Session",
            vec![
                ("User", session.username().to_string()),
                ("Role", session.role().label().to_string()),
            ],
        );
        Ok(())
    }

    async fn handle_status(&mut self) -> Result<()> {
        let config = self.load_config().await?;
        let (_, auth) = self.open_session().await?;

        let mut rows = vec![
            ("Version", env!("CARGO_PKG_VERSION").to_string()),
            ("Server", config.base_url.clone()),
            (
                "Authentication",
                self.ui.format_auth_status(auth.is_authenticated(), false),
            ),
        ];

        if let Some(session) = auth.session() {
            rows.push(("User", session.username().to_string()));
            rows.push(("User ID", session.user_id().to_string()));
            rows.push(("Email", self.ui.format_user_field(Some(session.email().to_string()))));
            rows.push(("Role", session.role().label().to_string()));
            rows.push(("Verified", yes_no(session.claims().is_verified)));
            if let Some(expires) = session.expires_at() {
                rows.push(("Token expires", expires.to_rfc3339()));
            }
        }

        rows.push((
            "Token storage",
            config.token_path.to_string_lossy().to_string(),
        ));

        self.ui.card("placetrack status", rows);
        Ok(())
    }

    // ==================== Dashboard / statistics ====================

    async fn handle_dashboard(&mut self) -> Result<()> {
        let (client, auth) = self.open_session().await?;
        self.ensure(&auth, &AccessGuard::any_authenticated())?;

        if auth.is_student() {
            let view = dashboard::student_dashboard(client.as_ref(), Utc::now()).await?;

            self.ui.header("My Placement Dashboard");
            self.ui.card(
                "Overview",
                vec![
                    ("Applications", view.applications.to_string()),
                    ("Selected / Offers", view.selected.to_string()),
                    ("Pending", view.pending.to_string()),
                ],
            );

            if !view.my_placements.is_empty() {
                self.ui.info("My applications:");
                self.render_progress_table(&view.my_placements.iter().collect::<Vec<_>>());
            }

            self.ui
                .info(&format!("{} companies hiring", view.open_companies.len()));
            if view.upcoming_events.is_empty() {
                self.ui.info("No upcoming events");
            } else {
                self.ui.info("Upcoming events:");
                self.render_dates_table(&view.upcoming_events.iter().collect::<Vec<_>>());
            }
        } else {
            let view = dashboard::admin_dashboard(client.as_ref(), Utc::now()).await?;

            let title = if auth.is_admin() {
                "Placement Dashboard"
            } else {
                "Company Dashboard"
            };
            self.ui.header(title);
            self.render_statistics(&view.statistics);

            if !view.recent.is_empty() {
                self.ui.info("Recent updates:");
                self.render_progress_table(&view.recent.iter().collect::<Vec<_>>());
            }
            if !view.upcoming_events.is_empty() {
                self.ui.info("Upcoming events:");
                self.render_dates_table(&view.upcoming_events.iter().collect::<Vec<_>>());
            }
        }
        Ok(())
    }

    async fn handle_stats(&mut self) -> Result<()> {
        let (client, auth) = self.open_session().await?;
        self.ensure(&auth, &AccessGuard::admin_only())?;

        let stats = progress::statistics(client.as_ref()).await?;
        self.ui.header("Placement Statistics");
        self.render_statistics(&stats);
        Ok(())
    }

    fn render_statistics(&self, stats: &PlacementStatistics) {
        self.ui.card(
            "Totals",
            vec![
                ("Total students", stats.total_students.to_string()),
                ("Placed students", stats.placed_students.to_string()),
                (
                    "Placement %",
                    format!("{:.1}%", stats.placement_percentage),
                ),
                ("Active companies", stats.total_companies.to_string()),
                ("Applications", stats.total_applications.to_string()),
                ("Offers received", stats.offers_received.to_string()),
                ("Offers accepted", stats.offers_accepted.to_string()),
                ("Average package", format!("{:.2} LPA", stats.average_package)),
            ],
        );

        if !stats.status_breakdown.is_empty() {
            self.ui.info("Application status breakdown:");
            let max = stats
                .status_breakdown
                .iter()
                .map(|s| s.count)
                .max()
                .unwrap_or(0);
            for entry in &stats.status_breakdown {
                self.ui.bar(entry.status.label(), entry.count, max);
            }
            self.ui.blank_line();
        }

        if !stats.branch_wise_placement.is_empty() {
            self.ui.info("Branch-wise placement:");
            let max = stats
                .branch_wise_placement
                .iter()
                .map(|b| b.count)
                .max()
                .unwrap_or(0);
            for entry in &stats.branch_wise_placement {
                self.ui.bar(entry.branch.as_str(), entry.count, max);
            }
            self.ui.blank_line();
        }
    }

    // ==================== Profile ====================

    async fn handle_profile(&mut self, command: ProfileCommand) -> Result<()> {
        let (_, mut auth) = self.open_session().await?;
        self.ensure(&auth, &AccessGuard::any_authenticated())?;

        match command {
            ProfileCommand::Show => {
                let user = auth.profile().await?;
                self.render_user_card(&user);
            }
            ProfileCommand::Update(args) => {
                let update = profile_update_from(args)?;
                let user = auth.update_profile(&update).await?;
                self.ui.success("Profile updated.");
                self.render_user_card(&user);
            }
            ProfileCommand::ChangePassword => {
                let old = self.ui.password("Current password")?;
                let new = self.ui.password("New password")?;
                let confirm = self.ui.password("Confirm new password")?;
                let message = auth.change_password(&old, &new, &confirm).await?;
                if message.is_empty() {
                    self.ui.success("Password changed.");
                } else {
                    self.ui.success(&message);
                }
            }
        }
        Ok(())
    }

    fn render_user_card(&self, user: &UserAccount) {
        let name = format!("{} {}", user.first_name, user.last_name);
        self.ui.card(
            "Profile",
            vec![
                ("Username", user.username.clone()),
                ("Name", self.ui.format_user_field(Some(name.trim().to_string()))),
                ("Email", self.ui.format_user_field(Some(user.email.clone()))),
                ("Phone", self.ui.format_user_field(Some(user.phone.clone()))),
                ("Role", user.role.label().to_string()),
                ("Verified", yes_no(user.is_verified)),
            ],
        );
    }

    // ==================== Students ====================

    async fn handle_students(&mut self, command: StudentsCommand) -> Result<()> {
        let (client, auth) = self.open_session().await?;

        match command {
            StudentsCommand::List(args) => {
                self.ensure(&auth, &AccessGuard::any_authenticated())?;
                let mut controller: ListController<Student, _> =
                    ListController::new(client.clone());
                controller.load().await?;

                let filter = student_filter_from(args)?;
                let hits = apply_filters(controller.items(), &filter);
                self.render_students_table(&hits);
                self.ui.info(&format!(
                    "Showing {} of {} students",
                    hits.len(),
                    controller.items().len()
                ));
            }
            StudentsCommand::Show { id } => {
                self.ensure(&auth, &AccessGuard::any_authenticated())?;
                let mut controller: ListController<Student, _> =
                    ListController::new(client.clone());
                controller.load().await?;
                let student = controller
                    .find(id)
                    .ok_or_else(|| TrackError::not_found(format!("student {}", id)))?;
                self.render_student_card(student);
            }
            StudentsCommand::Add(args) => {
                self.ensure(&auth, &AccessGuard::admin_only())?;
                let mut controller: ListController<Student, _> =
                    ListController::new(client.clone());
                let password = args.password.clone();
                let draft = student_draft_from(args)?;

                let (student, mut credentials) =
                    students::create_with_account(&mut controller, draft, password).await?;
                self.ui
                    .success(&format!("Student {} added.", student.enrollment_number));
                self.reveal_credentials(&mut credentials);
            }
            StudentsCommand::Edit(args) => {
                self.ensure(&auth, &AccessGuard::admin_only())?;
                let mut controller: ListController<Student, _> =
                    ListController::new(client.clone());
                controller.load().await?;

                let current = controller
                    .begin_edit(args.id)
                    .ok_or_else(|| TrackError::not_found(format!("student {}", args.id)))?;
                let draft = student_draft_with_overrides(current, &args)?;

                controller.submit(&draft).await?;
                self.ui.success("Student updated.");
            }
            StudentsCommand::Remove { id, force } => {
                self.ensure(&auth, &AccessGuard::admin_only())?;
                let mut controller: ListController<Student, _> =
                    ListController::new(client.clone());
                controller.load().await?;

                let student = controller
                    .find(id)
                    .ok_or_else(|| TrackError::not_found(format!("student {}", id)))?;
                let prompt = format!(
                    "Delete student {} ({})? This cannot be undone",
                    student.name, student.enrollment_number
                );
                if !force && !self.ui.confirm(&prompt)? {
                    return Err(TrackError::user_cancelled());
                }

                controller.remove(id).await?;
                self.ui.success("Student deleted.");
            }
            StudentsCommand::Upload { file } => {
                self.ensure(&auth, &AccessGuard::admin_only())?;
                let report = self.upload_students_csv(client.as_ref(), &file).await?;
                self.render_upload_report(&report);
            }
            StudentsCommand::Placed => {
                self.ensure(&auth, &AccessGuard::any_authenticated())?;
                let placed = students::placed(client.as_ref()).await?;
                self.render_students_table(&placed.iter().collect::<Vec<_>>());
            }
            StudentsCommand::Unplaced => {
                self.ensure(&auth, &AccessGuard::any_authenticated())?;
                let unplaced = students::unplaced(client.as_ref()).await?;
                self.render_students_table(&unplaced.iter().collect::<Vec<_>>());
            }
            StudentsCommand::History { id } => {
                self.ensure(&auth, &AccessGuard::any_authenticated())?;
                let history = students::placement_history(client.as_ref(), id).await?;
                if history.is_empty() {
                    self.ui.info("No placement history.");
                } else {
                    self.render_progress_table(&history.iter().collect::<Vec<_>>());
                }
            }
        }
        Ok(())
    }

    async fn upload_students_csv(
        &self,
        client: &HttpClient,
        file: &Path,
    ) -> Result<CsvUploadReport> {
        if !file.exists() {
            return Err(TrackError::file_not_found(file.display().to_string()));
        }

        let bytes = fs::read(file).await?;
        let file_name = file
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("students.csv");

        students::upload_csv(client, file_name, bytes).await
    }

    fn render_upload_report(&self, report: &CsvUploadReport) {
        self.ui.success(&format!(
            "CSV processed: {} created, {} updated",
            report.created, report.updated
        ));
        if !report.errors.is_empty() {
            self.ui
                .warning(&format!("{} rows were skipped:", report.errors.len()));
            for error in &report.errors {
                self.ui.warning(&format!("  {}", error));
            }
        }
    }

    fn reveal_credentials(&self, credentials: &mut OneShot<GeneratedCredentials>) {
        // Single observation; after this the value is unreachable.
        if let Some(creds) = credentials.consume() {
            self.ui
                .warning("Login credentials - shown once, share them with the student now:");
            self.ui.card(
                "Provisioned Account",
                vec![("Username", creds.username), ("Password", creds.password)],
            );
            self.ui
                .info("The student should change this password after first login.");
        }
    }

    fn render_students_table(&self, students: &[&Student]) {
        if students.is_empty() {
            self.ui.info("No students found.");
            return;
        }
        let rows: Vec<Vec<String>> = students
            .iter()
            .map(|s| {
                vec![
                    s.id.to_string(),
                    s.enrollment_number.clone(),
                    s.name.clone(),
                    s.branch.as_str().to_string(),
                    s.year.clone(),
                    format!("{:.2}", s.cgpa),
                    yes_no(s.is_placed),
                ]
            })
            .collect();
        self.ui.table(
            &["ID", "Enrollment", "Name", "Branch", "Year", "CGPA", "Placed"],
            &rows,
        );
    }

    fn render_student_card(&self, student: &Student) {
        self.ui.card(
            &format!("{} - {}", student.enrollment_number, student.name),
            vec![
                ("Email", student.email.clone()),
                ("Phone", self.ui.format_user_field(Some(student.phone.clone()))),
                ("Branch", student.branch.label().to_string()),
                ("Year", student.year.clone()),
                ("CGPA", format!("{:.2}", student.cgpa)),
                ("Skills", self.ui.format_user_field(Some(student.skills.clone()))),
                ("Placed", yes_no(student.is_placed)),
            ],
        );
    }

    // ==================== Companies ====================

    async fn handle_companies(&mut self, command: CompaniesCommand) -> Result<()> {
        let (client, auth) = self.open_session().await?;

        match command {
            CompaniesCommand::List(args) => {
                self.ensure(&auth, &AccessGuard::any_authenticated())?;
                let mut controller: ListController<Company, _> =
                    ListController::new(client.clone());
                controller.load().await?;

                let filter = company_filter_from(args)?;
                let hits = apply_filters(controller.items(), &filter);
                self.render_companies_table(&hits);
                self.ui.info(&format!(
                    "Showing {} of {} companies",
                    hits.len(),
                    controller.items().len()
                ));
            }
            CompaniesCommand::Show { id } => {
                self.ensure(&auth, &AccessGuard::any_authenticated())?;
                let mut controller: ListController<Company, _> =
                    ListController::new(client.clone());
                controller.load().await?;
                let company = controller
                    .find(id)
                    .ok_or_else(|| TrackError::not_found(format!("company {}", id)))?;
                self.render_company_card(company);
            }
            CompaniesCommand::Add(args) => {
                self.ensure(&auth, &AccessGuard::admin_only())?;
                let mut controller: ListController<Company, _> =
                    ListController::new(client.clone());
                let draft = company_draft_from(args)?;
                let outcome = controller.submit(&draft).await?;
                self.ui
                    .success(&format!("Company {} added.", outcome.record().name));
            }
            CompaniesCommand::Edit(args) => {
                self.ensure(&auth, &AccessGuard::admin_only())?;
                let mut controller: ListController<Company, _> =
                    ListController::new(client.clone());
                controller.load().await?;

                let current = controller
                    .begin_edit(args.id)
                    .ok_or_else(|| TrackError::not_found(format!("company {}", args.id)))?;
                let draft = company_draft_with_overrides(current, &args)?;

                controller.submit(&draft).await?;
                self.ui.success("Company updated.");
            }
            CompaniesCommand::Remove { id, force } => {
                self.ensure(&auth, &AccessGuard::admin_only())?;
                let mut controller: ListController<Company, _> =
                    ListController::new(client.clone());
                controller.load().await?;

                let company = controller
                    .find(id)
                    .ok_or_else(|| TrackError::not_found(format!("company {}", id)))?;
                let prompt = format!("Delete company {}? This cannot be undone", company.name);
                if !force && !self.ui.confirm(&prompt)? {
                    return Err(TrackError::user_cancelled());
                }

                controller.remove(id).await?;
                self.ui.success("Company deleted.");
            }
            CompaniesCommand::Applicants { id } => {
                self.ensure(&auth, &AccessGuard::any_authenticated())?;
                let applicants = companies::applicants(client.as_ref(), id).await?;
                if applicants.is_empty() {
                    self.ui.info("No applicants yet.");
                } else {
                    self.render_progress_table(&applicants.iter().collect::<Vec<_>>());
                }
            }
        }
        Ok(())
    }

    fn render_companies_table(&self, companies: &[&Company]) {
        if companies.is_empty() {
            self.ui.info("No companies found.");
            return;
        }
        let rows: Vec<Vec<String>> = companies
            .iter()
            .map(|c| {
                vec![
                    c.id.to_string(),
                    c.name.clone(),
                    c.company_type.as_str().to_string(),
                    c.job_role.clone(),
                    format!("{:.2} LPA", c.package_offered),
                    c.job_location.clone(),
                    yes_no(c.is_active),
                ]
            })
            .collect();
        self.ui.table(
            &["ID", "Name", "Type", "Role", "Package", "Location", "Hiring"],
            &rows,
        );
    }

    fn render_company_card(&self, company: &Company) {
        self.ui.card(
            &format!("{} - {}", company.name, company.job_role),
            vec![
                ("Type", company.company_type.label().to_string()),
                ("Package", format!("{:.2} LPA", company.package_offered)),
                ("Min CGPA", format!("{:.2}", company.min_cgpa_required)),
                ("Branches", company.eligible_branches.clone()),
                ("Location", company.job_location.clone()),
                ("Website", self.ui.format_user_field(Some(company.website.clone()))),
                ("Contact", company.contact_person.clone()),
                ("Contact email", company.contact_email.clone()),
                ("Hiring", yes_no(company.is_active)),
            ],
        );
    }

    // ==================== Placement progress ====================

    async fn handle_progress(&mut self, command: ProgressCommand) -> Result<()> {
        let (client, auth) = self.open_session().await?;

        match command {
            ProgressCommand::List(args) => {
                self.ensure(&auth, &AccessGuard::any_authenticated())?;
                let mut controller: ListController<PlacementRecord, _> =
                    ListController::new(client.clone());
                controller.load().await?;

                let filter = progress_filter_from(args)?;
                let hits = apply_filters(controller.items(), &filter);
                self.render_progress_table(&hits);
                self.ui.info(&format!(
                    "Showing {} of {} records",
                    hits.len(),
                    controller.items().len()
                ));
            }
            ProgressCommand::Mine => {
                self.ensure(&auth, &AccessGuard::any_authenticated())?;
                let mut controller: ListController<PlacementRecord, _> =
                    ListController::new(client.clone());
                controller.load_from(progress::MY_PROGRESS).await?;
                if controller.items().is_empty() {
                    self.ui.info("No placement records yet.");
                } else {
                    self.render_progress_table(&controller.items().iter().collect::<Vec<_>>());
                }
            }
            ProgressCommand::Add(args) => {
                self.ensure(&auth, &AccessGuard::any_authenticated())?;
                let mut controller: ListController<PlacementRecord, _> =
                    ListController::new(client.clone());
                let draft = PlacementDraft {
                    student: args.student,
                    company: args.company,
                    current_stage: args.stage,
                    status: Some(parse_enum::<PlacementStatus>(&args.status)?),
                    notes: args.notes,
                };
                controller.submit(&draft).await?;
                self.ui.success("Placement record added.");
            }
            ProgressCommand::Edit(args) => {
                self.ensure(&auth, &AccessGuard::any_authenticated())?;
                let mut controller: ListController<PlacementRecord, _> =
                    ListController::new(client.clone());
                controller.load().await?;

                let current = controller
                    .begin_edit(args.id)
                    .ok_or_else(|| TrackError::not_found(format!("record {}", args.id)))?;

                let mut draft = PlacementDraft::from(current);
                if let Some(status) = &args.status {
                    draft.status = Some(parse_enum::<PlacementStatus>(status)?);
                }
                if let Some(stage) = args.stage {
                    draft.current_stage = Some(stage);
                }
                if let Some(notes) = args.notes {
                    draft.notes = notes;
                }

                controller.submit(&draft).await?;
                self.ui.success("Placement record updated.");
            }
            ProgressCommand::Remove { id, force } => {
                self.ensure(&auth, &AccessGuard::admin_only())?;
                let mut controller: ListController<PlacementRecord, _> =
                    ListController::new(client.clone());
                controller.load().await?;

                if controller.find(id).is_none() {
                    return Err(TrackError::not_found(format!("record {}", id)));
                }
                if !force
                    && !self
                        .ui
                        .confirm(&format!("Delete placement record {}?", id))?
                {
                    return Err(TrackError::user_cancelled());
                }

                controller.remove(id).await?;
                self.ui.success("Placement record deleted.");
            }
            ProgressCommand::Recent => {
                self.ensure(&auth, &AccessGuard::any_authenticated())?;
                let recent = progress::recent_updates(client.as_ref()).await?;
                self.render_progress_table(&recent.iter().collect::<Vec<_>>());
            }
            ProgressCommand::StageResults { record } => {
                self.ensure(&auth, &AccessGuard::any_authenticated())?;
                let mut results = stages::stage_progress(client.as_ref()).await?;
                if let Some(record_id) = record {
                    results.retain(|r| r.placement_progress == record_id);
                }
                if results.is_empty() {
                    self.ui.info("No stage results found.");
                } else {
                    let rows: Vec<Vec<String>> = results
                        .iter()
                        .map(|r| {
                            vec![
                                r.id.to_string(),
                                r.placement_progress.to_string(),
                                r.stage.to_string(),
                                r.result.label().to_string(),
                                r.scheduled_date
                                    .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                                    .unwrap_or_else(|| "-".to_string()),
                                r.feedback.clone(),
                            ]
                        })
                        .collect();
                    self.ui.table(
                        &["ID", "Record", "Stage", "Result", "Scheduled", "Feedback"],
                        &rows,
                    );
                }
            }
        }
        Ok(())
    }

    fn render_progress_table(&self, records: &[&PlacementRecord]) {
        if records.is_empty() {
            self.ui.info("No placement records found.");
            return;
        }
        let rows: Vec<Vec<String>> = records
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.student_name.clone().unwrap_or_else(|| r.student.to_string()),
                    r.company_name.clone().unwrap_or_else(|| r.company.to_string()),
                    r.status.label().to_string(),
                    r.current_stage_name.clone().unwrap_or_else(|| "-".to_string()),
                    r.application_date
                        .map(|d| d.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                ]
            })
            .collect();
        self.ui.table(
            &["ID", "Student", "Company", "Status", "Stage", "Applied"],
            &rows,
        );
    }

    // ==================== Stages ====================

    async fn handle_stages(&mut self) -> Result<()> {
        let (client, auth) = self.open_session().await?;
        self.ensure(&auth, &AccessGuard::any_authenticated())?;

        let stages = stages::stages(client.as_ref()).await?;
        if stages.is_empty() {
            self.ui.info("No stages configured.");
            return Ok(());
        }

        let rows: Vec<Vec<String>> = stages
            .iter()
            .map(|s| {
                vec![
                    s.sequence_order.to_string(),
                    s.name.clone(),
                    s.stage_type.label().to_string(),
                    s.description.clone(),
                ]
            })
            .collect();
        self.ui.table(&["Order", "Stage", "Type", "Description"], &rows);
        Ok(())
    }

    // ==================== Important dates ====================

    async fn handle_dates(&mut self, command: DatesCommand) -> Result<()> {
        let (client, auth) = self.open_session().await?;

        match command {
            DatesCommand::List(args) => {
                self.ensure(&auth, &AccessGuard::any_authenticated())?;
                let mut controller: ListController<ImportantDate, _> =
                    ListController::new(client.clone());
                controller.load().await?;

                let filter = date_filter_from(args)?;
                let hits = apply_filters(controller.items(), &filter);
                self.render_dates_table(&hits);
                self.ui.info(&format!(
                    "Showing {} of {} events",
                    hits.len(),
                    controller.items().len()
                ));
            }
            DatesCommand::Upcoming => {
                self.ensure(&auth, &AccessGuard::any_authenticated())?;
                let upcoming = dates::upcoming(client.as_ref()).await?;
                if upcoming.is_empty() {
                    self.ui.info("No upcoming events");
                } else {
                    self.render_dates_table(&upcoming.iter().collect::<Vec<_>>());
                }
            }
            DatesCommand::Add(args) => {
                self.ensure(&auth, &AccessGuard::admin_only())?;
                let mut controller: ListController<ImportantDate, _> =
                    ListController::new(client.clone());
                let draft = ImportantDateDraft {
                    title: args.title,
                    description: args.description,
                    event_type: Some(parse_enum::<EventType>(&args.event_type)?),
                    company: args.company,
                    event_date: Some(parse_event_date(&args.date)?),
                    location: args.location,
                    link: args.link,
                    is_active: true,
                };
                let outcome = controller.submit(&draft).await?;
                self.ui
                    .success(&format!("Event \"{}\" added.", outcome.record().title));
            }
            DatesCommand::Edit(args) => {
                self.ensure(&auth, &AccessGuard::admin_only())?;
                let mut controller: ListController<ImportantDate, _> =
                    ListController::new(client.clone());
                controller.load().await?;

                let current = controller
                    .begin_edit(args.id)
                    .ok_or_else(|| TrackError::not_found(format!("event {}", args.id)))?;

                let mut draft = ImportantDateDraft::from(current);
                if let Some(title) = args.title {
                    draft.title = title;
                }
                if let Some(description) = args.description {
                    draft.description = description;
                }
                if let Some(event_type) = &args.event_type {
                    draft.event_type = Some(parse_enum::<EventType>(event_type)?);
                }
                if let Some(date) = &args.date {
                    draft.event_date = Some(parse_event_date(date)?);
                }
                if let Some(location) = args.location {
                    draft.location = location;
                }
                if let Some(active) = args.active {
                    draft.is_active = active;
                }

                controller.submit(&draft).await?;
                self.ui.success("Event updated.");
            }
            DatesCommand::Remove { id, force } => {
                self.ensure(&auth, &AccessGuard::admin_only())?;
                let mut controller: ListController<ImportantDate, _> =
                    ListController::new(client.clone());
                controller.load().await?;

                let event = controller
                    .find(id)
                    .ok_or_else(|| TrackError::not_found(format!("event {}", id)))?;
                let prompt = format!("Delete event \"{}\"?", event.title);
                if !force && !self.ui.confirm(&prompt)? {
                    return Err(TrackError::user_cancelled());
                }

                controller.remove(id).await?;
                self.ui.success("Event deleted.");
            }
        }
        Ok(())
    }

    fn render_dates_table(&self, events: &[&ImportantDate]) {
        if events.is_empty() {
            self.ui.info("No events found.");
            return;
        }
        let rows: Vec<Vec<String>> = events
            .iter()
            .map(|e| {
                vec![
                    e.id.to_string(),
                    e.title.clone(),
                    e.event_type.label().to_string(),
                    e.event_date.format("%Y-%m-%d %H:%M").to_string(),
                    self.ui.format_user_field(Some(e.location.clone())),
                    yes_no(e.is_active),
                ]
            })
            .collect();
        self.ui
            .table(&["ID", "Title", "Type", "When", "Location", "Active"], &rows);
    }

    // ==================== User management ====================

    async fn handle_users(&mut self, command: UsersCommand) -> Result<()> {
        let (client, auth) = self.open_session().await?;
        self.ensure(&auth, &AccessGuard::admin_only())?;

        match command {
            UsersCommand::List(args) => {
                let mut controller: ListController<UserAccount, _> =
                    ListController::new(client.clone());
                controller.load().await?;

                let staff: Vec<UserAccount> = users::admin_faculty(controller.items())
                    .into_iter()
                    .cloned()
                    .collect();
                let filter = users::UserFilter {
                    search: args.search.unwrap_or_default(),
                    role: None,
                };
                let hits = apply_filters(&staff, &filter);

                if hits.is_empty() {
                    self.ui.info("No users found.");
                } else {
                    let rows: Vec<Vec<String>> = hits
                        .iter()
                        .map(|u| {
                            vec![
                                u.id.to_string(),
                                u.username.clone(),
                                u.email.clone(),
                                u.role.label().to_string(),
                                yes_no(u.is_verified),
                                yes_no(u.is_active),
                            ]
                        })
                        .collect();
                    self.ui.table(
                        &["ID", "Username", "Email", "Role", "Verified", "Active"],
                        &rows,
                    );
                }
                self.ui.info(&format!(
                    "Showing {} of {} admin/faculty users",
                    hits.len(),
                    staff.len()
                ));
            }
            UsersCommand::Add(args) => {
                let password = self.ui.password("Password for the new account")?;
                let password2 = self.ui.password("Confirm password")?;

                let request = RegisterRequest {
                    username: args.username,
                    email: args.email,
                    password,
                    password2,
                    first_name: args.first_name,
                    last_name: args.last_name,
                    role: parse_enum::<Role>(&args.role)?,
                    phone: args.phone,
                };
                let user = users::create(client.as_ref(), &request).await?;
                self.ui.success(&format!("User {} created.", user.username));
            }
            UsersCommand::Edit(args) => {
                let update = user_update_from(&args)?;
                let user = users::update(client.as_ref(), args.id, &update).await?;
                self.ui.success(&format!("User {} updated.", user.username));
            }
            UsersCommand::Remove { id, force } => {
                let mut controller: ListController<UserAccount, _> =
                    ListController::new(client.clone());
                controller.load().await?;

                let user = controller
                    .find(id)
                    .ok_or_else(|| TrackError::not_found(format!("user {}", id)))?;
                let prompt = format!("Delete account {}?", user.username);
                if !force && !self.ui.confirm(&prompt)? {
                    return Err(TrackError::user_cancelled());
                }

                controller.remove(id).await?;
                self.ui.success("User deleted.");
            }
            UsersCommand::Verify { id } => {
                let response = users::verify(client.as_ref(), id).await?;
                self.ui
                    .success(&format!("User {} verified.", response.user.username));
            }
        }
        Ok(())
    }

    // ==================== Config ====================

    async fn handle_config(&mut self, command: ConfigCommand) -> Result<()> {
        let path = self.config_file();

        match command {
            ConfigCommand::Show => {
                let config = self.load_config().await?;
                self.ui.card(
                    "Configuration",
                    vec![
                        ("Endpoint", config.base_url.clone()),
                        ("Timeout", format!("{}s", config.timeout)),
                        ("Verbose", yes_no(config.verbose)),
                        (
                            "Token storage",
                            config.token_path.to_string_lossy().to_string(),
                        ),
                        ("Config file", path.to_string_lossy().to_string()),
                    ],
                );
            }
            ConfigCommand::SetEndpoint { url } => {
                let mut config = self.load_config().await?;
                config.base_url = url;
                config.validate()?;
                config.save(&path).await?;
                self.ui.success("Endpoint updated.");
            }
            ConfigCommand::SetTimeout { seconds } => {
                let mut config = self.load_config().await?;
                config.timeout = seconds;
                config.validate()?;
                config.save(&path).await?;
                self.ui.success("Timeout updated.");
            }
            ConfigCommand::SetVerbose { enabled } => {
                let mut config = self.load_config().await?;
                config.verbose = match enabled.to_ascii_lowercase().as_str() {
                    "true" | "on" | "yes" => true,
                    "false" | "off" | "no" => false,
                    other => {
                        return Err(TrackError::invalid_input(format!(
                            "expected true/false, got {}",
                            other
                        )))
                    }
                };
                config.save(&path).await?;
                self.ui.success("Verbose flag updated.");
            }
            ConfigCommand::Reset => {
                let config = Config::default();
                config.save(&path).await?;
                self.ui.success("Configuration reset to defaults.");
            }
        }
        Ok(())
    }
}

// ==================== Parsing helpers ====================

fn parse_enum<T>(value: &str) -> Result<T>
where
    T: FromStr<Err = String>,
{
    T::from_str(value).map_err(TrackError::invalid_input)
}

/// Accept RFC 3339 instants or bare dates (midnight UTC).
fn parse_event_date(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)));
    }
    Err(TrackError::invalid_input(format!(
        "unrecognized date \"{}\" (use RFC 3339 or YYYY-MM-DD)",
        raw
    )))
}

/// Fold a pair of mutually exclusive flags into an optional constraint.
fn tri_flag(yes: bool, no: bool) -> Option<bool> {
    match (yes, no) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

fn yes_no(value: bool) -> String {
    if value { "yes" } else { "no" }.to_string()
}

fn student_filter_from(args: StudentListArgs) -> Result<students::StudentFilter> {
    Ok(students::StudentFilter {
        search: args.search.unwrap_or_default(),
        branch: args.branch.as_deref().map(parse_enum::<Branch>).transpose()?,
        year: args.year,
        placed: tri_flag(args.placed, args.unplaced),
    })
}

fn student_draft_from(args: StudentAddArgs) -> Result<StudentDraft> {
    Ok(StudentDraft {
        enrollment_number: args.enrollment,
        name: args.name,
        email: args.email,
        phone: args.phone,
        branch: Some(parse_enum::<Branch>(&args.branch)?),
        year: args.year,
        cgpa: args.cgpa,
        skills: args.skills,
        is_placed: args.placed,
        username: None,
        password: None,
    })
}

fn student_draft_with_overrides(current: &Student, args: &StudentEditArgs) -> Result<StudentDraft> {
    let mut draft = StudentDraft::from(current);
    if let Some(name) = &args.name {
        draft.name = name.clone();
    }
    if let Some(email) = &args.email {
        draft.email = email.clone();
    }
    if let Some(phone) = &args.phone {
        draft.phone = phone.clone();
    }
    if let Some(branch) = &args.branch {
        draft.branch = Some(parse_enum::<Branch>(branch)?);
    }
    if let Some(year) = &args.year {
        draft.year = year.clone();
    }
    if let Some(cgpa) = args.cgpa {
        draft.cgpa = cgpa;
    }
    if let Some(skills) = &args.skills {
        draft.skills = skills.clone();
    }
    if let Some(placed) = args.placed {
        draft.is_placed = placed;
    }
    Ok(draft)
}

fn company_filter_from(args: CompanyListArgs) -> Result<companies::CompanyFilter> {
    Ok(companies::CompanyFilter {
        search: args.search.unwrap_or_default(),
        company_type: args
            .company_type
            .as_deref()
            .map(parse_enum::<CompanyType>)
            .transpose()?,
        package: args
            .package
            .as_deref()
            .map(parse_enum::<companies::PackageTier>)
            .transpose()?,
        active: tri_flag(args.active, args.inactive),
    })
}

fn company_draft_from(args: CompanyAddArgs) -> Result<CompanyDraft> {
    Ok(CompanyDraft {
        name: args.name,
        description: args.description,
        company_type: Some(parse_enum::<CompanyType>(&args.company_type)?),
        website: args.website,
        package_offered: args.package,
        min_cgpa_required: args.min_cgpa,
        eligible_branches: args.branches,
        job_role: args.role,
        job_location: args.location,
        contact_person: args.contact_person,
        contact_email: args.contact_email,
        contact_phone: args.contact_phone,
        is_active: !args.inactive,
    })
}

fn company_draft_with_overrides(current: &Company, args: &CompanyEditArgs) -> Result<CompanyDraft> {
    let mut draft = CompanyDraft::from(current);
    if let Some(name) = &args.name {
        draft.name = name.clone();
    }
    if let Some(description) = &args.description {
        draft.description = description.clone();
    }
    if let Some(company_type) = &args.company_type {
        draft.company_type = Some(parse_enum::<CompanyType>(company_type)?);
    }
    if let Some(website) = &args.website {
        draft.website = Some(website.clone());
    }
    if let Some(package) = args.package {
        draft.package_offered = package;
    }
    if let Some(min_cgpa) = args.min_cgpa {
        draft.min_cgpa_required = min_cgpa;
    }
    if let Some(branches) = &args.branches {
        draft.eligible_branches = branches.clone();
    }
    if let Some(role) = &args.role {
        draft.job_role = role.clone();
    }
    if let Some(location) = &args.location {
        draft.job_location = location.clone();
    }
    if let Some(active) = args.active {
        draft.is_active = active;
    }
    Ok(draft)
}

fn progress_filter_from(args: ProgressListArgs) -> Result<progress::ProgressFilter> {
    Ok(progress::ProgressFilter {
        search: args.search.unwrap_or_default(),
        status: args
            .status
            .as_deref()
            .map(parse_enum::<PlacementStatus>)
            .transpose()?,
    })
}

fn date_filter_from(args: DateListArgs) -> Result<dates::DateFilter> {
    let window = if args.upcoming {
        Some((dates::DateWindow::Upcoming, Utc::now()))
    } else if args.past {
        Some((dates::DateWindow::Past, Utc::now()))
    } else {
        None
    };

    Ok(dates::DateFilter {
        search: args.search.unwrap_or_default(),
        event_type: args
            .event_type
            .as_deref()
            .map(parse_enum::<EventType>)
            .transpose()?,
        window,
    })
}

fn profile_update_from(args: ProfileUpdateArgs) -> Result<ProfileUpdate> {
    let update = ProfileUpdate {
        first_name: args.first_name,
        last_name: args.last_name,
        email: args.email,
        phone: args.phone,
    };
    if update.first_name.is_none()
        && update.last_name.is_none()
        && update.email.is_none()
        && update.phone.is_none()
    {
        return Err(TrackError::invalid_input("nothing to update"));
    }
    Ok(update)
}

fn user_update_from(args: &UserEditArgs) -> Result<UserUpdate> {
    let update = UserUpdate {
        username: args.username.clone(),
        email: args.email.clone(),
        first_name: args.first_name.clone(),
        last_name: args.last_name.clone(),
        role: args.role.as_deref().map(parse_enum::<Role>).transpose()?,
        phone: args.phone.clone(),
    };
    if update.username.is_none()
        && update.email.is_none()
        && update.first_name.is_none()
        && update.last_name.is_none()
        && update.role.is_none()
        && update.phone.is_none()
    {
        return Err(TrackError::invalid_input("nothing to update"));
    }
    Ok(update)
}

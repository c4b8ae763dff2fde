//! CLI module for the jobboard command-line client.
//!
//! Provides subcommands for talking to a job-board API:
//! - `login` / `register` / `logout` / `whoami` - Session management
//! - `jobs list` - List all jobs
//! - `jobs search <text>` - List jobs matching a search text
//! - `jobs show <id>` - Show one job with its applications
//! - `jobs add` / `jobs edit <id>` / `jobs delete <id>` - Admin job management
//! - `config check` - Validate configuration file

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use crate::api::ApiClient;
use crate::config::Config;
use crate::forms::{FormController, FormKind, JobForm, LoginForm, RegisterForm, RegisterOutcome};
use crate::jobs::format::{format_date, format_salary, truncate};
use crate::jobs::{Confirmation, JobAction, JobDetailViewModel, JobListViewModel};
use crate::notice::Notice;
use crate::session::{FileStore, Role, SessionStore};

/// CLI arguments structure
#[derive(Parser, Debug)]
#[command(name = "jobboard")]
#[command(author, version, about = "Command-line client for the job board", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "jobboard.toml")]
    pub config: PathBuf,

    /// Override log level
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// API base URL (overrides the config file)
    #[arg(long, env = "JOBBOARD_API_URL")]
    pub api_url: Option<String>,

    /// Keep the session in memory only, for this invocation
    #[arg(long)]
    pub ephemeral: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and store the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "JOBBOARD_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create a new account
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Password confirmation
        #[arg(long)]
        repeat_password: String,
        #[arg(long, value_enum, default_value = "job-seeker")]
        role: RoleArg,
    },

    /// Forget the stored session
    Logout,

    /// Show the stored session
    Whoami,

    /// Job commands
    #[command(subcommand)]
    Jobs(JobsCommands),

    /// Configuration management commands
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug)]
pub enum JobsCommands {
    /// List all jobs
    List,
    /// List jobs whose title, company, location or skills contain TEXT
    Search { text: String },
    /// Show details for a job
    Show { id: String },
    /// Post a new job (admin)
    Add(JobArgs),
    /// Replace a job's fields (admin); unspecified fields keep their value
    Edit {
        id: String,
        #[command(flatten)]
        fields: JobArgs,
    },
    /// Delete a job (admin)
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Validate configuration file
    Check,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RoleArg {
    Admin,
    JobSeeker,
}

impl From<RoleArg> for Role {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::Admin => Role::Admin,
            RoleArg::JobSeeker => Role::JobSeeker,
        }
    }
}

/// Job form fields as flags
#[derive(Args, Debug, Default)]
pub struct JobArgs {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub company: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub salary: Option<String>,
    #[arg(long)]
    pub job_type: Option<String>,
    #[arg(long)]
    pub experience_level: Option<String>,
    /// Comma-separated
    #[arg(long)]
    pub skills: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    pub deadline: Option<String>,
    /// Open or Closed
    #[arg(long)]
    pub status: Option<String>,
}

impl JobArgs {
    fn apply(&self, form: &mut FormController<JobForm>) {
        let pairs = [
            ("title", &self.title),
            ("company", &self.company),
            ("description", &self.description),
            ("location", &self.location),
            ("salary", &self.salary),
            ("jobType", &self.job_type),
            ("experienceLevel", &self.experience_level),
            ("skills", &self.skills),
            ("applicationDeadline", &self.deadline),
            ("status", &self.status),
        ];
        for (name, value) in pairs {
            if let Some(value) = value {
                form.set_field(name, value.clone());
            }
        }
    }
}

/// Everything a command needs: the effective config and an API client
pub struct AppContext {
    pub config: Config,
    pub api: ApiClient,
}

impl AppContext {
    pub fn new(cli: &Cli, mut config: Config) -> Result<Self> {
        if let Some(url) = &cli.api_url {
            config.api.base_url = url.clone();
        }
        let session = if cli.ephemeral {
            SessionStore::in_memory()
        } else {
            let store = FileStore::open(config.session.session_file())
                .context("Failed to open session storage")?;
            SessionStore::new(Arc::new(store))
        };
        let api = ApiClient::from_config(&config.api, session).context("Failed to create HTTP client")?;
        Ok(Self { config, api })
    }
}

/// Run a CLI command
pub async fn run_command(cli: &Cli, config: Config) -> Result<()> {
    if let Commands::Config(ConfigCommands::Check) = &cli.command {
        return cmd_config_check(cli);
    }

    let ctx = AppContext::new(cli, config)?;
    match &cli.command {
        Commands::Login { email, password } => cmd_login(&ctx, email, password).await,
        Commands::Register {
            username,
            email,
            password,
            repeat_password,
            role,
        } => cmd_register(&ctx, username, email, password, repeat_password, (*role).into()).await,
        Commands::Logout => cmd_logout(&ctx),
        Commands::Whoami => cmd_whoami(&ctx),
        Commands::Jobs(JobsCommands::List) => cmd_jobs_list(&ctx, None).await,
        Commands::Jobs(JobsCommands::Search { text }) => cmd_jobs_list(&ctx, Some(text)).await,
        Commands::Jobs(JobsCommands::Show { id }) => cmd_jobs_show(&ctx, id).await,
        Commands::Jobs(JobsCommands::Add(fields)) => cmd_jobs_add(&ctx, fields).await,
        Commands::Jobs(JobsCommands::Edit { id, fields }) => cmd_jobs_edit(&ctx, id, fields).await,
        Commands::Jobs(JobsCommands::Delete { id, yes }) => cmd_jobs_delete(&ctx, id, *yes).await,
        Commands::Config(ConfigCommands::Check) => unreachable!("handled above"),
    }
}

/// Print a notice; error notices become the command's error
fn report(notice: &Notice) -> Result<()> {
    if notice.is_error() {
        anyhow::bail!("{}", notice.message);
    }
    println!("[OK] {}", notice.message);
    Ok(())
}

/// Submit a form and report its notice
async fn submit_and_report<K: FormKind>(form: &mut FormController<K>, api: &ApiClient) -> Result<Option<K::Output>> {
    let output = form.submit(api).await.ok();
    if let Some(notice) = form.notice() {
        report(notice)?;
    }
    Ok(output)
}

async fn cmd_login(ctx: &AppContext, email: &str, password: &str) -> Result<()> {
    let mut form = FormController::new(LoginForm);
    form.set_field("email", email);
    form.set_field("password", password);

    if let Some(session) = submit_and_report(&mut form, &ctx.api).await? {
        if let Some(role) = session.role {
            println!("Logged in as {}", role);
        }
    }
    Ok(())
}

async fn cmd_register(
    ctx: &AppContext,
    username: &str,
    email: &str,
    password: &str,
    repeat_password: &str,
    role: Role,
) -> Result<()> {
    let mut form = FormController::new(RegisterForm);
    form.set_field("username", username);
    form.set_field("email", email);
    form.set_field("password", password);
    form.set_field("repeatPassword", repeat_password);
    form.set_field("role", role.to_string());

    match submit_and_report(&mut form, &ctx.api).await? {
        Some(RegisterOutcome::SignedIn) => println!("You are now logged in."),
        Some(RegisterOutcome::Registered) => println!("Use 'jobboard login' to sign in."),
        None => {}
    }
    Ok(())
}

fn cmd_logout(ctx: &AppContext) -> Result<()> {
    ctx.api
        .session()
        .clear()
        .map_err(|e| anyhow::anyhow!("Error in logging out: {}", e))?;
    println!("[OK] Logged out");
    Ok(())
}

fn cmd_whoami(ctx: &AppContext) -> Result<()> {
    let session = ctx.api.session().session()?;
    if !session.is_authenticated() {
        println!("Not logged in.");
        return Ok(());
    }
    println!("User ID: {}", session.user_id.as_deref().unwrap_or("-"));
    println!(
        "Role:    {}",
        session.role.map(|r| r.to_string()).unwrap_or_else(|| "-".to_string())
    );
    Ok(())
}

async fn cmd_jobs_list(ctx: &AppContext, search: Option<&String>) -> Result<()> {
    let mut view = JobListViewModel::mount(ctx.api.clone());
    if let Err(e) = view.refresh().await {
        return report(&Notice::from_error_or(&e, "Error in getting jobs from database!"));
    }

    let jobs: Vec<_> = match search {
        Some(text) => view.filtered_by(text).collect(),
        None => view.jobs().iter().collect(),
    };

    if jobs.is_empty() {
        println!("No jobs found.");
        return Ok(());
    }

    println!();
    println!(
        "{:<26}  {:<28}  {:<18}  {:<16}  {:>12}  {:<10}",
        "ID", "TITLE", "COMPANY", "LOCATION", "SALARY", "DEADLINE"
    );
    println!("{}", "-".repeat(120));
    for job in jobs {
        println!(
            "{:<26}  {:<28}  {:<18}  {:<16}  {:>12}  {:<10}",
            truncate(&job.id, 26),
            truncate(&job.title, 28),
            truncate(&job.company, 18),
            truncate(&job.location, 16),
            format_salary(job.salary),
            format_date(job.application_deadline)
        );
    }
    println!();

    let actions: Vec<&str> = view
        .actions()
        .iter()
        .map(|a| match a {
            JobAction::View => "show",
            JobAction::Edit => "edit",
            JobAction::Delete => "delete",
        })
        .collect();
    println!("Available actions: {}", actions.join(", "));
    Ok(())
}

async fn cmd_jobs_show(ctx: &AppContext, id: &str) -> Result<()> {
    let view = match JobDetailViewModel::load(&ctx.api, id).await {
        Ok(view) => view,
        Err(e) => return report(&JobDetailViewModel::load_failed(&e)),
    };

    let job = view.job();
    println!();
    println!("=== {} ===", job.title);
    println!();
    for (label, value) in view.summary() {
        println!("{:<26} {}", format!("{}:", label), value);
    }
    if !job.skills.is_empty() {
        println!("{:<26} {}", "Skills:", job.skills.join(", "));
    }
    println!();
    println!("{}", job.description);
    println!();
    println!("Applications ({}):", view.application_count());
    if view.applications().is_empty() {
        println!("  No applications so far for this job.");
    }
    for application in view.applications() {
        println!(
            "  {}  applied {}",
            application.user_id(),
            format_date(application.applied_at())
        );
    }
    println!();
    Ok(())
}

async fn cmd_jobs_add(ctx: &AppContext, fields: &JobArgs) -> Result<()> {
    let mut form = FormController::<JobForm>::create_job();
    fields.apply(&mut form);
    submit_and_report(&mut form, &ctx.api).await?;
    Ok(())
}

async fn cmd_jobs_edit(ctx: &AppContext, id: &str, fields: &JobArgs) -> Result<()> {
    let mut form = match FormController::<JobForm>::load_for_edit(&ctx.api, id).await {
        Ok(form) => form,
        Err(e) => return report(&Notice::from_error_or(&e, "Unable to load the Job details!")),
    };
    fields.apply(&mut form);
    submit_and_report(&mut form, &ctx.api).await?;
    Ok(())
}

async fn cmd_jobs_delete(ctx: &AppContext, id: &str, yes: bool) -> Result<()> {
    let mut view = JobListViewModel::mount(ctx.api.clone());
    if !view.is_admin() {
        tracing::warn!("deleting a job without an admin session");
    }

    let confirmation = if yes {
        Confirmation::Confirmed
    } else {
        // Best effort: the title is only known when the list loads
        if let Err(e) = view.refresh().await {
            tracing::debug!(error = %e, "could not load job titles for the delete prompt");
        }
        confirm(&view.delete_prompt(id))?
    };

    match view.request_delete(id, confirmation).await {
        Some(notice) => report(&notice),
        None => {
            println!("Cancelled.");
            Ok(())
        }
    }
}

fn confirm(prompt: &str) -> Result<Confirmation> {
    print!("{} [y/N] ", prompt);
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(match answer.trim().to_lowercase().as_str() {
        "y" | "yes" => Confirmation::Confirmed,
        _ => Confirmation::Cancelled,
    })
}

/// Validate configuration file
fn cmd_config_check(cli: &Cli) -> Result<()> {
    let config_path = &cli.config;

    println!("Checking configuration file: {}", config_path.display());
    println!();

    if !config_path.exists() {
        println!("[!!] Configuration file not found: {}", config_path.display());
        println!();
        println!("Defaults will be used.");
        return Ok(());
    }

    let config = Config::load(config_path)?;
    println!("[OK] Configuration file is valid!");
    println!();
    println!("API:");
    println!("  Base URL:     {}", config.api.base_url);
    println!(
        "  Timeout:      {}",
        config
            .api
            .timeout_secs
            .map(|s| format!("{}s", s))
            .unwrap_or_else(|| "none".to_string())
    );
    println!();
    println!("Session:");
    println!("  File:         {}", config.session.session_file().display());
    println!();
    println!("Logging:");
    println!("  Level:        {}", config.logging.level);
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_login() {
        let cli = Cli::try_parse_from(["jobboard", "login", "--email", "a@b.com", "--password", "x"]).unwrap();
        match cli.command {
            Commands::Login { email, password } => {
                assert_eq!(email, "a@b.com");
                assert_eq!(password, "x");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_register_default_role() {
        let cli = Cli::try_parse_from([
            "jobboard",
            "register",
            "--username",
            "al",
            "--email",
            "a@b.com",
            "--password",
            "Password1",
            "--repeat-password",
            "Password1",
        ])
        .unwrap();
        match cli.command {
            Commands::Register { role, .. } => assert_eq!(Role::from(role), Role::JobSeeker),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_jobs_edit_flags() {
        let cli = Cli::try_parse_from([
            "jobboard", "jobs", "edit", "42", "--salary", "70000", "--skills", "Rust, Go",
        ])
        .unwrap();
        match cli.command {
            Commands::Jobs(JobsCommands::Edit { id, fields }) => {
                assert_eq!(id, "42");
                assert_eq!(fields.salary.as_deref(), Some("70000"));
                assert_eq!(fields.title, None);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_ephemeral_context_skips_session_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut config = Config::default();
        config.session.data_dir = dir.path().join("never-created");
        let cli = Cli::try_parse_from(["jobboard", "--ephemeral", "--api-url", "http://h/api/", "whoami"]).unwrap();

        let ctx = AppContext::new(&cli, config).unwrap();
        assert_eq!(ctx.api.base_url(), "http://h/api");
        assert_eq!(ctx.config.api.base_url, "http://h/api/");
        assert!(!dir.path().join("never-created").exists());
    }

    #[test]
    fn test_job_args_only_override_given_fields() {
        let mut form = FormController::<JobForm>::create_job();
        form.set_field("title", "Original");
        let args = JobArgs {
            company: Some("Acme".into()),
            deadline: Some("2025-10-01".into()),
            ..Default::default()
        };
        args.apply(&mut form);

        assert_eq!(form.field("title"), "Original");
        assert_eq!(form.field("company"), "Acme");
        assert_eq!(form.field("applicationDeadline"), "2025-10-01");
        assert_eq!(form.field("status"), "Open");
    }
}

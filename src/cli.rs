// src/cli.rs
use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

use crate::app::AppContext;
use crate::search::{page_from_param, search_query, Debouncer};
use crate::services::ListQuery;
use crate::stores::{FetchOutcome, RECENT_APPLICANTS_LIMIT};
use crate::types::{
    Application, ApplicationDraft, ApplicationFilter, Job, JobDraft, ProfileDraft, ProfilePatch,
    User,
};
use crate::utils::{add_skill, redact_token, remove_skill};

#[derive(Parser)]
#[command(name = "hireboard")]
#[command(about = "Browse jobs, apply and manage the hiring board from the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Override the API base URL for this run
    #[arg(long, global = true)]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Log in and store the session
    Login { email: String, password: String },
    /// Create a client account and log in
    Signup {
        name: String,
        email: String,
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the logged-in user
    Whoami,
    #[command(subcommand)]
    Jobs(JobsCommand),
    /// Apply to a job as the logged-in user
    Apply {
        job_id: i64,
        #[arg(long)]
        cover_letter: Option<String>,
        #[arg(long)]
        resume_url: Option<String>,
    },
    /// List my applications
    Applications,
    #[command(subcommand)]
    Profile(ProfileCommand),
    #[command(subcommand)]
    Admin(AdminCommand),
}

#[derive(Subcommand)]
pub enum JobsCommand {
    /// List open positions
    List {
        #[arg(long, default_value = "1")]
        page: String,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        sort: Option<String>,
    },
    /// Show one job
    Show { id: i64 },
    /// Search as you type: one query per line, results once typing settles
    Search,
}

#[derive(Subcommand)]
pub enum ProfileCommand {
    Show,
    /// Create my profile
    Create {
        full_name: String,
        #[arg(long)]
        summary: Option<String>,
        #[arg(long = "skill")]
        skills: Vec<String>,
    },
    /// Add or remove skills on my profile
    Skills {
        #[arg(long = "add")]
        add: Vec<String>,
        #[arg(long = "remove")]
        remove: Vec<String>,
    },
    Delete,
}

#[derive(Subcommand)]
pub enum AdminCommand {
    /// Dashboard totals and recent applicants
    Stats,
    /// List all jobs
    Jobs {
        #[arg(long, default_value = "1")]
        page: String,
        #[arg(long)]
        search: Option<String>,
    },
    /// Post a new job
    CreateJob {
        title: String,
        company: String,
        #[arg(long, default_value = "")]
        location: String,
    },
    /// List users
    Users {
        #[arg(long, default_value = "1")]
        page: String,
        #[arg(long)]
        search: Option<String>,
    },
    /// List applications
    Applications {
        #[arg(long, default_value = "1")]
        page: String,
        #[arg(long)]
        search: Option<String>,
        /// users, company or job
        #[arg(long)]
        filter: Option<String>,
    },
    /// Move an application to a new status
    SetStatus { id: i64, status: String },
    DeleteJob { id: i64 },
    DeleteUser { id: i64 },
}

// ===== Output helpers =====

fn print_job_row(job: &Job) {
    println!(
        "{:<6} {:<30} {:<20} {:<15} {}",
        job.id,
        job.title,
        job.company,
        job.location,
        job.hiring_status.as_str()
    );
}

fn print_application_row(app: &Application) {
    let job = app
        .job
        .as_ref()
        .map(|j| j.title.clone())
        .unwrap_or_else(|| format!("job #{}", app.job_id));
    let applicant = app
        .user
        .as_ref()
        .map(|u| u.name.clone())
        .unwrap_or_else(|| format!("user #{}", app.user_id));
    println!(
        "{:<6} {:<30} {:<20} {:<12} {}",
        app.id,
        job,
        applicant,
        app.status.as_str(),
        app.applied_at.as_deref().unwrap_or("-")
    );
}

fn print_user_row(user: &User) {
    println!(
        "{:<6} {:<25} {:<30} {:?}",
        user.id,
        user.name,
        user.email,
        user.role()
    );
}

fn report(outcome: FetchOutcome, error: Option<String>) -> Result<()> {
    match outcome {
        FetchOutcome::Loaded | FetchOutcome::Dropped | FetchOutcome::Stale => Ok(()),
        FetchOutcome::SessionExpired => bail!("Your session has expired. Please log in again."),
        FetchOutcome::Failed => Err(anyhow!(error.unwrap_or_else(|| "Request failed".to_string()))),
    }
}

async fn require_user(ctx: &AppContext) -> Result<User> {
    if !ctx.auth.check_auth().await {
        bail!("Not logged in. Run `hireboard login <email> <password>` first.");
    }
    ctx.auth
        .user()
        .ok_or_else(|| anyhow!("Session has no user"))
}

async fn require_admin(ctx: &AppContext) -> Result<User> {
    let user = require_user(ctx).await?;
    if !user.is_admin() {
        bail!("This command needs an admin account");
    }
    Ok(user)
}

/// Read queries from stdin and search once the user stops typing.
async fn search_jobs_interactive(ctx: &AppContext) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut debouncer = Debouncer::default();
    println!("Type a search and press enter; an empty line on its own clears it. Ctrl-D quits.");

    loop {
        let next_line = match debouncer.deadline() {
            Some(due) => {
                let wait = tokio::time::sleep_until(tokio::time::Instant::from_std(due));
                tokio::select! {
                    line = lines.next_line() => Some(line),
                    _ = wait => None,
                }
            }
            None => Some(lines.next_line().await),
        };

        match next_line {
            Some(line) => match line.context("Failed to read from stdin")? {
                Some(query) => debouncer.input(&query, Instant::now()),
                None => break,
            },
            None => {
                let Some(query) = debouncer.poll(Instant::now()) else {
                    continue;
                };
                let outcome = ctx
                    .jobs
                    .search_all(search_query(&query, ctx.jobs.default_limit()))
                    .await;
                report(outcome, ctx.jobs.error())?;
                if ctx.jobs.shows_empty_state() {
                    println!("No jobs found");
                }
                for job in ctx.jobs.items() {
                    print_job_row(&job);
                }
            }
        }
    }

    Ok(())
}

// ===== Command dispatch =====

pub async fn handle_command(ctx: &AppContext, command: Command) -> Result<()> {
    match command {
        Command::Login { email, password } => {
            let user = ctx.auth.login(&email, &password).await.map_err(|e| {
                error!("Login failed: {}", e);
                anyhow!(ctx.auth.error().unwrap_or_else(|| e.to_string()))
            })?;
            println!("Logged in as {} <{}>", user.name, user.email);
        }

        Command::Signup {
            name,
            email,
            password,
        } => {
            let user = ctx
                .auth
                .signup(&name, &email, &password)
                .await
                .map_err(|e| anyhow!(ctx.auth.error().unwrap_or_else(|| e.to_string())))?;
            println!("Welcome, {}! Account created and logged in.", user.name);
        }

        Command::Logout => {
            ctx.logout().await;
            println!("Logged out");
        }

        Command::Whoami => {
            if !ctx.auth.check_auth().await {
                println!("Not logged in");
                return Ok(());
            }
            let state = ctx.auth.state();
            if let Some(user) = state.user {
                println!("{} <{}> ({:?})", user.name, user.email, user.role());
            }
            if let Some(token) = state.token {
                println!("token: {}", redact_token(&token));
            }
        }

        Command::Jobs(JobsCommand::List { page, search, sort }) => {
            let mut query = ListQuery::new(page_from_param(&page), ctx.jobs.default_limit());
            if let Some(search) = search.as_deref() {
                query = query.with_search(search);
            }
            if let Some(sort) = sort.as_deref() {
                query = query.with_sort(sort);
            }
            let outcome = if query.has_search() {
                ctx.jobs.search_all(query).await
            } else {
                ctx.jobs.fetch_all(query).await
            };
            report(outcome, ctx.jobs.error())?;

            if ctx.jobs.shows_empty_state() {
                println!("No jobs found");
                return Ok(());
            }
            for job in ctx.jobs.items() {
                print_job_row(&job);
            }
            let pagination = ctx.jobs.pagination();
            println!(
                "page {}/{} ({} jobs)",
                pagination.current_page, pagination.total_pages, pagination.total
            );
        }

        Command::Jobs(JobsCommand::Search) => {
            search_jobs_interactive(ctx).await?;
        }

        Command::Jobs(JobsCommand::Show { id }) => {
            let outcome = ctx.jobs.fetch_by_id(id).await;
            report(outcome, ctx.jobs.error())?;
            let job = ctx
                .jobs
                .selected()
                .ok_or_else(|| anyhow!("Job {} not found", id))?;
            println!("{} at {}", job.title, job.company);
            println!("{} | {} | {}", job.location, job.employment_type, job.salary_range);
            if !job.short_description.is_empty() {
                println!("\n{}", job.short_description);
            }
            if !job.requirements.is_empty() {
                println!("\nRequirements:\n{}", job.requirements);
            }
            if !job.deadline.is_empty() {
                println!("\nApply before {}", job.deadline);
            }
        }

        Command::Apply {
            job_id,
            cover_letter,
            resume_url,
        } => {
            let user = require_user(ctx).await?;
            let mut draft = ApplicationDraft::new(job_id, user.id);
            if let Some(letter) = cover_letter.as_deref() {
                draft = draft.with_cover_letter(letter);
            }
            if let Some(url) = resume_url.as_deref() {
                draft = draft.with_resume_url(url);
            }
            let application = ctx.applications.apply_to_job(draft).await?;
            info!("Applied to job {} as user {}", job_id, user.id);
            println!(
                "Application {} submitted ({})",
                application.id,
                application.status.as_str()
            );
        }

        Command::Applications => {
            require_user(ctx).await?;
            let outcome = ctx.applications.fetch_my_applications().await;
            report(outcome, ctx.applications.error())?;
            let mine = ctx.applications.my_applications();
            if mine.is_empty() {
                println!("You have not applied to any jobs yet");
            }
            for app in &mine {
                print_application_row(app);
            }
        }

        Command::Profile(ProfileCommand::Show) => {
            require_user(ctx).await?;
            match ctx.profile.fetch_my_profile().await? {
                Some(profile) => {
                    println!("{}", profile.full_name);
                    if let Some(summary) = &profile.summary {
                        println!("{}", summary);
                    }
                    if !profile.skills.is_empty() {
                        println!("Skills: {}", profile.skills.join(", "));
                    }
                    for exp in &profile.experiences {
                        println!(
                            "  {} at {} ({} - {})",
                            exp.role,
                            exp.company,
                            exp.start_date,
                            exp.end_date.as_deref().unwrap_or("present")
                        );
                    }
                }
                None => println!("No profile yet. Create one with `hireboard profile create`."),
            }
        }

        Command::Profile(ProfileCommand::Create {
            full_name,
            summary,
            skills,
        }) => {
            require_user(ctx).await?;
            let mut draft = ProfileDraft::new(&full_name);
            draft.summary = summary;
            for skill in &skills {
                draft.add_skill(skill);
            }
            let profile = ctx.profile.create_profile(&draft).await?;
            println!("Profile {} created", profile.id);
        }

        Command::Profile(ProfileCommand::Skills { add, remove }) => {
            require_user(ctx).await?;
            let profile = ctx
                .profile
                .fetch_my_profile()
                .await?
                .ok_or_else(|| anyhow!("No profile yet. Create one with `hireboard profile create`."))?;
            let mut skills = profile.skills;
            for skill in &add {
                add_skill(&mut skills, skill);
            }
            for skill in &remove {
                remove_skill(&mut skills, skill);
            }
            let patch = ProfilePatch {
                skills: Some(skills),
                ..Default::default()
            };
            let updated = ctx.profile.update_profile(&patch).await?;
            println!("Skills: {}", updated.skills.join(", "));
        }

        Command::Profile(ProfileCommand::Delete) => {
            require_user(ctx).await?;
            ctx.profile.delete_profile().await?;
            println!("Profile deleted");
        }

        Command::Admin(command) => {
            require_admin(ctx).await?;
            handle_admin_command(ctx, command).await?;
        }
    }

    Ok(())
}

async fn handle_admin_command(ctx: &AppContext, command: AdminCommand) -> Result<()> {
    match command {
        AdminCommand::Stats => {
            ctx.dashboard.fetch_dashboard(RECENT_APPLICANTS_LIMIT).await?;
            let state = ctx.dashboard.state();
            if let Some(stats) = state.stats {
                println!("Jobs:         {}", stats.total_jobs);
                println!("Users:        {}", stats.total_users);
                println!("Applications: {}", stats.total_applications);
                for (status, count) in &stats.applications_by_status {
                    println!("  {:<12} {}", status, count);
                }
            }
            println!("\nRecent applicants:");
            for applicant in &state.recent {
                println!(
                    "{:<6} {:<25} {:<30} {:<12} {}",
                    applicant.id,
                    applicant.applicant_name,
                    applicant.job_title,
                    applicant.current_stage,
                    applicant.applied_date
                );
            }
        }

        AdminCommand::Jobs { page, search } => {
            let mut query = ListQuery::new(page_from_param(&page), ctx.admin_jobs.default_limit());
            if let Some(search) = search.as_deref() {
                query = query.with_search(search);
            }
            report(ctx.admin_jobs.fetch_all(query).await, ctx.admin_jobs.error())?;
            if ctx.admin_jobs.shows_empty_state() {
                println!("No jobs found");
            }
            for job in ctx.admin_jobs.items() {
                print_job_row(&job);
            }
        }

        AdminCommand::CreateJob {
            title,
            company,
            location,
        } => {
            let mut draft = JobDraft::new(&title, &company);
            draft.location = location;
            match ctx.admin_jobs.create_job(&draft).await? {
                Some(job) => println!("Job {} created", job.id),
                None => println!("Job created"),
            }
        }

        AdminCommand::Users { page, search } => {
            let mut query = ListQuery::new(page_from_param(&page), ctx.admin_users.default_limit());
            if let Some(search) = search.as_deref() {
                query = query.with_search(search);
            }
            report(ctx.admin_users.fetch_all(query).await, ctx.admin_users.error())?;
            if ctx.admin_users.shows_empty_state() {
                println!("No users found");
            }
            for user in ctx.admin_users.items() {
                print_user_row(&user);
            }
        }

        AdminCommand::Applications {
            page,
            search,
            filter,
        } => {
            let filter = filter
                .as_deref()
                .map(str::parse::<ApplicationFilter>)
                .transpose()
                .map_err(|e| anyhow!(e))?;
            let admin = ctx.applications.admin();
            let outcome = ctx
                .applications
                .fetch_admin_applications(
                    page_from_param(&page),
                    admin.default_limit(),
                    search.as_deref(),
                    filter,
                )
                .await;
            report(outcome, admin.error())?;
            if admin.shows_empty_state() {
                println!("No applications found");
            }
            for app in ctx.applications.admin_applications() {
                print_application_row(&app);
            }
        }

        AdminCommand::SetStatus { id, status } => {
            ctx.applications
                .update_application_status(id, &status)
                .await?;
            println!("Application {} is now {}", id, status.trim().to_lowercase());
        }

        AdminCommand::DeleteJob { id } => {
            ctx.admin_jobs.delete(id).await?;
            println!("Job {} deleted", id);
        }

        AdminCommand::DeleteUser { id } => {
            ctx.admin_users.delete(id).await?;
            println!("User {} deleted", id);
        }
    }

    Ok(())
}

//! Command-line front end for the activation flow.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use el_app::app_paths::AppPaths;
use el_app::models::ActivationView;
use el_app::usecases::{ActivationOrchestrator, ActivationOrchestratorError};
use el_core::activation::ActivationState;
use el_core::config::AppConfig;
use el_core::ports::{ActivationEventPort, AppDirsPort};
use el_core::profile::{catalog, ProfileDraft};
use el_platform::DirsAppDirsAdapter;
use tracing::{info, info_span, Instrument};

use crate::bootstrap::{apply_env_overrides, load_config_or_empty, wire_activation, ActivationRuntime};

#[derive(Debug, Parser)]
#[command(name = "extlink", version, about = "Unlock the browser extension for the signed-in account")]
pub struct Cli {
    /// Config file (defaults to config.toml in the app data directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show session and extension runtime status without sending anything
    Status,
    /// Run the activation check and deliver the token if the profile exists
    Activate,
    /// Save the onboarding profile, then deliver the token
    Register(RegisterArgs),
    /// Deliver the token again, optionally to a different extension id
    Sync {
        #[arg(long)]
        extension_id: Option<String>,
    },
    /// Print the identity provider sign-in URL
    SignInUrl,
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Status => "status",
            Command::Activate => "activate",
            Command::Register(_) => "register",
            Command::Sync { .. } => "sync",
            Command::SignInUrl => "sign-in-url",
        }
    }
}

#[derive(Debug, clap::Args)]
pub struct RegisterArgs {
    #[arg(long)]
    pub full_name: Option<String>,
    /// Department code, e.g. CSE
    #[arg(long)]
    pub department: String,
    #[arg(long, default_value = "")]
    pub academic_year: String,
    /// Date of birth, YYYY-MM-DD
    #[arg(long, default_value = "")]
    pub dob: String,
    #[arg(long, default_value = el_core::profile::DEFAULT_COUNTRY_CODE)]
    pub country_code: String,
    #[arg(long)]
    pub phone: String,
}

impl RegisterArgs {
    fn into_draft(self, prefilled: ProfileDraft) -> ProfileDraft {
        ProfileDraft {
            full_name: self.full_name.unwrap_or(prefilled.full_name),
            department: self.department,
            academic_year: self.academic_year,
            date_of_birth: self.dob,
            country_code: self.country_code,
            phone_number: self.phone,
        }
    }
}

/// Prints state changes and sign-in prompts as they happen.
pub struct ConsoleEventSink;

#[async_trait]
impl ActivationEventPort for ConsoleEventSink {
    async fn emit_activation_state_changed(&self, state: ActivationState) {
        println!("-> {}", state_label(&state));
    }

    async fn emit_sign_in_required(&self, sign_in_url: Option<String>) {
        match sign_in_url {
            Some(url) => println!("Sign in required: {url}"),
            None => println!("Sign in required."),
        }
    }
}

fn state_label(state: &ActivationState) -> String {
    match state {
        ActivationState::NotStarted => "not started".to_string(),
        ActivationState::AwaitingProfile { error: None } => "awaiting profile".to_string(),
        ActivationState::AwaitingProfile { error: Some(err) } => {
            format!("awaiting profile ({err})")
        }
        ActivationState::Syncing { attempt } => format!("syncing (attempt {attempt})"),
        ActivationState::Synced => "synced".to_string(),
        ActivationState::SyncFailed { reason } => format!("sync failed ({reason})"),
    }
}

fn print_view(view: &ActivationView) {
    println!();
    println!("[step {}/3] {}", view.step.number(), view.headline);
    println!("{}", view.message);
    if view.show_troubleshooting {
        println!("Extension ID: {}", view.extension_address);
    }
    if view.retry_enabled {
        println!("Run `extlink sync` to try again, or `extlink sync --extension-id <ID>` to use a different extension.");
    }
}

/// Synced, or waiting on a form nobody has filled in yet.
fn is_clean_exit(state: &ActivationState) -> bool {
    matches!(
        state,
        ActivationState::Synced | ActivationState::AwaitingProfile { error: None }
    )
}

fn exit_code_for(state: &ActivationState) -> ExitCode {
    if is_clean_exit(state) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn resolve_config(cli_config: Option<PathBuf>, paths: &AppPaths) -> anyhow::Result<AppConfig> {
    let path = cli_config.unwrap_or_else(|| paths.config_path.clone());
    let config = load_config_or_empty(&path)?;
    Ok(apply_env_overrides(config, |key| std::env::var(key).ok()))
}

pub async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let app_dirs = DirsAppDirsAdapter::new()
        .get_app_dirs()
        .context("Failed to resolve app data directory")?;
    let paths = AppPaths::from_app_dirs(&app_dirs);
    let config = resolve_config(cli.config, &paths)?;

    let runtime = wire_activation(&config, &paths, Arc::new(ConsoleEventSink))
        .context("Failed to wire activation")?;

    let span = info_span!("cli.command", command = cli.command.name());
    execute(cli.command, &runtime).instrument(span).await
}

/// One delivery per invocation: the view-load check already sends when the profile exists.
async fn run_sync(
    orchestrator: &ActivationOrchestrator,
    extension_id: Option<&str>,
) -> Result<ActivationState, ActivationOrchestratorError> {
    if let Some(extension_id) = extension_id {
        orchestrator.edit_extension_address(extension_id).await?;
    }
    let state = orchestrator.initialize().await?;
    if matches!(state, ActivationState::SyncFailed { .. }) {
        orchestrator.open_troubleshooting();
    }
    Ok(state)
}

async fn execute(command: Command, runtime: &ActivationRuntime) -> anyhow::Result<ExitCode> {
    let orchestrator = &runtime.orchestrator;
    match command {
        Command::Status => {
            match runtime.identity.current_session().await? {
                Some(session) => {
                    println!("Signed in as {}", session.user_id);
                    if let Some(expires_at_ms) = session.expires_at_ms {
                        println!("Token expires at {expires_at_ms} (unix ms)");
                    }
                }
                None => println!("Not signed in."),
            }
            println!("Extension ID: {}", runtime.settings.extension_address);
            let availability = if runtime.extension_runtime.is_available() {
                "available"
            } else {
                "unavailable"
            };
            println!("Extension runtime: {availability}");
            Ok(ExitCode::SUCCESS)
        }
        Command::Activate => {
            let state = orchestrator.initialize().await?;
            print_view(&orchestrator.view().await);
            if matches!(state, ActivationState::AwaitingProfile { .. }) {
                println!("Departments:");
                for (code, label) in catalog::DEPARTMENTS {
                    println!("  {code:<14} {label}");
                }
                println!("Academic years: {}", catalog::ACADEMIC_YEARS.join(", "));
                println!("Complete your profile with `extlink register --department <CODE> --phone <NUMBER>`.");
            }
            Ok(exit_code_for(&state))
        }
        Command::Register(args) => {
            let state = orchestrator.initialize().await?;
            if !matches!(state, ActivationState::AwaitingProfile { .. }) {
                info!(state = ?state, "registration skipped");
                print_view(&orchestrator.view().await);
                return Ok(exit_code_for(&state));
            }
            let draft = args.into_draft(orchestrator.profile_draft().await);
            let state = orchestrator.submit_profile(draft).await?;
            print_view(&orchestrator.view().await);
            Ok(exit_code_for(&state))
        }
        Command::Sync { extension_id } => {
            let state = run_sync(orchestrator, extension_id.as_deref()).await?;
            print_view(&orchestrator.view().await);
            Ok(exit_code_for(&state))
        }
        Command::SignInUrl => {
            let url = runtime
                .identity
                .sign_in_url(&runtime.settings.sign_in_redirect)?;
            println!("{url}");
            Ok(ExitCode::SUCCESS)
        }
    }
}

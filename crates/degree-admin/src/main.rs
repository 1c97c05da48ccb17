//! # Degree Admin
//!
//! Command-line front end of the admin screens.
//!
//! ```bash
//! degree-admin list programs --parent 2          # programs of faculty 2
//! degree-admin list cancellations --status PENDING
//! degree-admin decide 14 approved --comment "Documents verified"
//! degree-admin assign-role 7 3
//! ```
//!
//! Settings come from `degree-admin.toml` (or `--config`) and
//! `DEGREE_ADMIN__*` variables; see [`degree_admin::settings`].

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use degree_admin::api::ListQuery;
use degree_admin::console::AdminConsole;
use degree_admin::model::{CancellationRequestId, Decision, RoleId, UserId};
use degree_admin::settings::load_settings;
use list_controller::tracing::setup_tracing;
use list_controller::{LoadStatus, Resource, ResourceListController, ResourceSource};
use std::fmt::Display;
use std::path::PathBuf;
use tracing::{info, Instrument};

#[derive(Debug, Parser)]
#[command(name = "degree-admin", about = "Administer degree modalities")]
struct Cli {
    /// Settings file (defaults to ./degree-admin.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print one screen's list
    List {
        screen: Screen,
        /// Server-side status filter
        #[arg(long)]
        status: Option<String>,
        /// Parent id (faculty for programs, program for program-modalities,
        /// modality for documents and requirements)
        #[arg(long)]
        parent: Option<u64>,
    },
    /// Record the council's decision on a cancellation request
    Decide {
        id: u64,
        decision: DecisionArg,
        #[arg(long)]
        comment: Option<String>,
    },
    /// Grant a role to a user
    AssignRole { user: u64, role: u64 },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Screen {
    Faculties,
    Programs,
    Modalities,
    ProgramModalities,
    Documents,
    Requirements,
    Roles,
    Permissions,
    Users,
    Cancellations,
}

impl Screen {
    /// Query key of the parent filter, if the screen has one.
    fn parent_key(self) -> Option<&'static str> {
        match self {
            Screen::Programs => Some("facultyId"),
            Screen::ProgramModalities => Some("programId"),
            Screen::Documents | Screen::Requirements => Some("modalityId"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DecisionArg {
    Approved,
    Rejected,
}

impl From<DecisionArg> for Decision {
    fn from(arg: DecisionArg) -> Self {
        match arg {
            DecisionArg::Approved => Decision::Approved,
            DecisionArg::Rejected => Decision::Rejected,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_tracing();

    let cli = Cli::parse();
    let settings = load_settings(cli.config.as_deref()).context("loading settings")?;
    info!(api = %settings.api_base_url, "Starting degree-admin");

    let console = AdminConsole::from_settings(&settings).context("building HTTP client")?;

    match cli.command {
        Command::List {
            screen,
            status,
            parent,
        } => {
            let mut query = ListQuery::default();
            if let Some(status) = status {
                query = query.with_status(status);
            }
            if let Some(id) = parent {
                let Some(key) = screen.parent_key() else {
                    bail!("{screen:?} has no parent filter");
                };
                query = query.with_parent(key, id);
            }
            let span = tracing::info_span!("list", ?screen);
            async {
                match screen {
                    Screen::Faculties => print_screen(&console.faculties, query).await,
                    Screen::Programs => print_screen(&console.programs, query).await,
                    Screen::Modalities => print_screen(&console.modalities, query).await,
                    Screen::ProgramModalities => {
                        print_screen(&console.program_modalities, query).await
                    }
                    Screen::Documents => print_screen(&console.documents, query).await,
                    Screen::Requirements => print_screen(&console.requirements, query).await,
                    Screen::Roles => print_screen(&console.roles, query).await,
                    Screen::Permissions => print_screen(&console.permissions, query).await,
                    Screen::Users => print_screen(&console.users, query).await,
                    Screen::Cancellations => print_screen(&console.cancellations, query).await,
                }
            }
            .instrument(span)
            .await
        }
        Command::Decide {
            id,
            decision,
            comment,
        } => {
            let id = CancellationRequestId(id);
            console.cancellations.load(ListQuery::default()).await;
            let Some(request) = console
                .cancellations
                .collection()
                .items()
                .iter()
                .find(|r| r.id == id)
                .cloned()
            else {
                bail!("No cancellation request with id {id}");
            };
            let result = console
                .decide_cancellation(&request, decision.into(), comment)
                .await;
            report(&console.cancellations, result.is_ok())
        }
        Command::AssignRole { user, role } => {
            let user = UserId(user);
            console.users.load(ListQuery::default()).await;
            let Some(target) = console
                .users
                .collection()
                .items()
                .iter()
                .find(|u| u.id == user)
                .cloned()
            else {
                bail!("No user with id {user}");
            };
            let result = console.assign_role(&target, RoleId(role)).await;
            report(&console.users, result.is_ok())
        }
    }
}

async fn print_screen<T, S>(
    controller: &ResourceListController<T, S>,
    query: S::Params,
) -> anyhow::Result<()>
where
    T: Resource + Display,
    S: ResourceSource<T>,
{
    let collection = controller.load(query).await;
    if collection.status() == LoadStatus::Error {
        bail!(collection
            .error()
            .unwrap_or("Could not load the list")
            .to_owned());
    }
    for item in collection.visible() {
        println!("{item}");
    }
    println!("{} {}", collection.visible().len(), T::LABEL);
    Ok(())
}

/// Print the controller's notice and turn a failure into an error exit.
fn report<T, S>(controller: &ResourceListController<T, S>, ok: bool) -> anyhow::Result<()>
where
    T: Resource,
    S: ResourceSource<T>,
{
    let text = controller.notice().map(|n| n.text).unwrap_or_default();
    if ok {
        println!("{text}");
        Ok(())
    } else {
        bail!(text)
    }
}

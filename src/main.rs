use anyhow::Result;
use clap::Parser;
use sigma_admin::commands::{self, ConnectionArgs, GrantTarget, Onboarding};
use std::path::PathBuf;

/// sigma-admin - bulk administration for the Sigma REST API
///
/// Credentials and connection settings can also be supplied through
/// SIGMA_ENV, SIGMA_CLOUD, SIGMA_CLIENT_ID, SIGMA_CLIENT_SECRET and
/// SIGMA_BASE_URL.
#[derive(Parser, Debug)]
#[command(author, version = env!("SIGMA_ADMIN_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Update member attributes from a CSV keyed by email address
    BatchUpdateUsers(BatchUpdateArgs),

    /// Transfer all documents owned by one member to another
    ReassignDocs(ReassignArgs),

    /// Export a workbook, or one of its elements, to JSON files
    ExportWorkbook(ExportArgs),

    /// Add or remove members of a team
    ManageTeam(ManageTeamArgs),

    /// Create a new member and grant initial access
    OnboardMember(OnboardArgs),
}

#[derive(clap::Args, Debug)]
struct BatchUpdateArgs {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// CSV with an Email column and optional First Name, Last Name,
    /// New Email, Member Type and isArchived columns
    #[arg(long, value_name = "FILE")]
    csv: PathBuf,

    /// Stop at the first member that cannot be updated
    #[arg(long, alias = "abort_on_update_fail")]
    abort_on_failure: bool,
}

#[derive(clap::Args, Debug)]
struct ReassignArgs {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Email of the member who currently owns the documents
    #[arg(long = "current-owner", alias = "curr_owner", value_name = "EMAIL")]
    current_owner: String,

    /// Email of the member to transfer the documents to
    #[arg(long = "new-owner", alias = "new_owner", value_name = "EMAIL")]
    new_owner: String,

    /// Folder to move the documents into
    #[arg(long = "folder", alias = "new_folder", value_name = "ID")]
    folder: Option<String>,
}

#[derive(clap::Args, Debug)]
struct ExportArgs {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// ID of the workbook to export
    #[arg(long = "workbook-id", alias = "workbook_id")]
    workbook_id: String,

    /// Export only this element
    #[arg(long = "element-id", alias = "element_id")]
    element_id: Option<String>,

    /// File name prefix (defaults to the workbook ID)
    #[arg(long)]
    filename: Option<String>,

    /// Directory to write the JSON files to
    #[arg(long = "output-dir", value_name = "DIR", default_value = ".")]
    output_dir: PathBuf,
}

#[derive(clap::Args, Debug)]
struct ManageTeamArgs {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// ID of the team
    #[arg(long = "team-id", alias = "team_id")]
    team_id: String,

    /// Member IDs to add
    #[arg(short = 'a', long, num_args = 1.., value_name = "MEMBER_ID")]
    add: Vec<String>,

    /// Member IDs to remove
    #[arg(short = 'r', long, num_args = 1.., value_name = "MEMBER_ID")]
    remove: Vec<String>,

    /// CSV with member_id,operation columns, where operation is add or remove
    #[arg(short = 'f', long, value_name = "FILE")]
    file: Option<PathBuf>,

    /// Print the change without sending it
    #[arg(long, alias = "dry_run")]
    dry_run: bool,
}

#[derive(clap::Args, Debug)]
struct OnboardArgs {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Email of the new member
    #[arg(long)]
    email: String,

    #[arg(long = "first-name", alias = "first_name")]
    first_name: String,

    #[arg(long = "last-name", alias = "last_name")]
    last_name: String,

    /// Member type, e.g. admin, creator, explorer, viewer
    #[arg(long = "member-type", alias = "member_type")]
    member_type: String,

    /// Connection to grant access to
    #[arg(long = "connection-id", alias = "connection_id", requires = "connection_permission")]
    connection_id: Option<String>,

    /// Permission to grant on the connection
    #[arg(long = "connection-permission", requires = "connection_id")]
    connection_permission: Option<String>,

    /// Workspace to grant access to
    #[arg(long = "workspace-id", alias = "workspace_id", requires = "workspace_permission")]
    workspace_id: Option<String>,

    /// Permission to grant on the workspace
    #[arg(long = "workspace-permission", requires = "workspace_id")]
    workspace_permission: Option<String>,
}

fn grant_target(id: Option<String>, permission: Option<String>) -> Option<GrantTarget> {
    Some(GrantTarget {
        id: id?,
        permission: permission?,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match cli.command {
        Commands::BatchUpdateUsers(args) => {
            let client = args.connection.connect().await?;
            let report =
                commands::batch_update_users(&client, &args.csv, args.abort_on_failure).await?;
            println!(
                "{} updated, {} unchanged, {} failed",
                report.updated, report.unchanged, report.failed
            );
        }
        Commands::ReassignDocs(args) => {
            let client = args.connection.connect().await?;
            let moved = commands::reassign_docs(
                &client,
                &args.current_owner,
                &args.new_owner,
                args.folder.as_deref(),
            )
            .await?;
            println!("{} documents transferred", moved);
        }
        Commands::ExportWorkbook(args) => {
            let client = args.connection.connect().await?;
            commands::export_workbook(
                &client,
                &args.workbook_id,
                args.element_id.as_deref(),
                args.filename.as_deref(),
                &args.output_dir,
            )
            .await?;
        }
        Commands::ManageTeam(args) => {
            let changes = commands::build_membership(&args.add, &args.remove, args.file.as_deref())?;
            if args.dry_run {
                println!("{}", serde_json::to_string_pretty(&changes)?);
            } else {
                let client = args.connection.connect().await?;
                commands::manage_team(&client, &args.team_id, &changes).await?;
            }
        }
        Commands::OnboardMember(args) => {
            let client = args.connection.connect().await?;
            let onboarding = Onboarding {
                email: args.email,
                first_name: args.first_name,
                last_name: args.last_name,
                member_type: args.member_type,
                connection: grant_target(args.connection_id, args.connection_permission),
                workspace: grant_target(args.workspace_id, args.workspace_permission),
            };
            commands::onboard_member(&client, &onboarding).await?;
        }
    }
    Ok(())
}

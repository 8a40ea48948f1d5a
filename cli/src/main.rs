//! Expert Directory CLI: command-line client for the directory service
//!
//! Uses the RemoteClient to talk to a running service; `validate-csv` works
//! offline on a local sheet.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use expert_directory::filter::distinct_options;
use expert_directory::{
    summarize, ApiConfig, DirectoryClient, DirectoryView, FilterCriteria, Member, MemberField,
    RemoteClient, ResultBoard, Roster, SearchView,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "expert-directory", version, about = "Expert Directory CLI")]
struct Cli {
    /// Service base URL
    #[arg(long, global = true, env = "DIRECTORY_API_URL")]
    url: Option<String>,

    /// API key sent in the Authorization header
    #[arg(long, global = true, env = "DIRECTORY_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// YAML file with `base_url` and `api_key`
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OptionField {
    Organization,
    MemberType,
    Tag,
    JobPosition,
}

impl From<OptionField> for MemberField {
    fn from(field: OptionField) -> Self {
        match field {
            OptionField::Organization => MemberField::AffiliationOrganization,
            OptionField::MemberType => MemberField::MembershipCategory,
            OptionField::Tag => MemberField::Tags,
            OptionField::JobPosition => MemberField::JobPosition,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Find experts for a question and show the result board
    Search {
        question: String,
    },
    /// List members, optionally narrowed by name
    Members {
        #[arg(long)]
        name: Option<String>,
    },
    /// Filter members by criteria
    Filter {
        #[arg(long = "org")]
        organizations: Vec<String>,

        #[arg(long = "member-type")]
        member_types: Vec<String>,

        #[arg(long = "tag")]
        tags: Vec<String>,

        #[arg(long, default_value_t = 0)]
        ai_min: u32,

        #[arg(long, default_value_t = 50)]
        ai_max: u32,

        #[arg(long, default_value_t = 0)]
        health_min: u32,

        #[arg(long, default_value_t = 50)]
        health_max: u32,

        /// Filter the full list locally instead of asking the service
        #[arg(long)]
        local: bool,
    },
    /// Distinct values of a field, as offered by the filter pickers
    Options {
        field: OptionField,
    },
    /// Get service status
    Status,
    /// Check a community sheet export without uploading it
    ValidateCsv {
        path: PathBuf,
    },
}

fn api_config(cli: &Cli) -> anyhow::Result<ApiConfig> {
    let mut config = match &cli.config {
        Some(path) => ApiConfig::from_yaml_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ApiConfig::default(),
    };
    if let Some(url) = &cli.url {
        config.base_url = url.clone();
    }
    if let Some(key) = &cli.api_key {
        config.api_key = key.clone();
    }
    Ok(config)
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let client = RemoteClient::new(api_config(&cli)?);

    match cli.command {
        Commands::Search { ref question } => run_search(&client, question, &cli.format).await,
        Commands::Members { ref name } => run_members(&client, name.as_deref(), &cli.format).await,
        Commands::Filter {
            ref organizations,
            ref member_types,
            ref tags,
            ai_min,
            ai_max,
            health_min,
            health_max,
            local,
        } => {
            let criteria = FilterCriteria::new()
                .with_organizations(organizations.iter().cloned())
                .with_member_types(member_types.iter().cloned())
                .with_tags(tags.iter().cloned())
                .with_ai_experience(ai_min, ai_max)
                .with_health_experience(health_min, health_max);
            run_filter(&client, &criteria, local, &cli.format).await
        }
        Commands::Options { field } => run_options(&client, field.into(), &cli.format).await,
        Commands::Status => run_status(&client, &cli.format).await,
        Commands::ValidateCsv { ref path } => run_validate(path),
    }
}

async fn run_search(client: &RemoteClient, question: &str, format: &OutputFormat) -> anyhow::Result<()> {
    let view = match client.search(question).await {
        Ok(groups) => SearchView::searching(question).resolve(&groups),
        Err(e) => SearchView::searching(question).fail(e.to_string()),
    };

    match view {
        SearchView::Results { board, .. } => print_board(&board, format)?,
        SearchView::NoResults { .. } => println!("(no experts found)"),
        SearchView::Failed { message } => bail!(message),
        SearchView::Idle | SearchView::Searching { .. } => {}
    }
    Ok(())
}

fn print_board(board: &ResultBoard, format: &OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(board)?),
        OutputFormat::Table => {
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["Category", "Expert", "Organization", "Match", "Color"]);

            for edge in &board.edges {
                let category = board.category_for(edge.source).unwrap_or_default();
                let (name, organization) = board
                    .member_for(edge.target)
                    .map(|m| (m.full_name(), m.affiliation_organization.clone()))
                    .unwrap_or_default();
                table.add_row(vec![
                    category.to_string(),
                    name,
                    organization,
                    edge.label.clone(),
                    edge.color.clone(),
                ]);
            }

            println!("{}", table);
            println!(
                "{} categories, {} experts",
                board.category_count(),
                board.expert_count()
            );
        }
    }
    Ok(())
}

async fn run_members(client: &RemoteClient, name: Option<&str>, format: &OutputFormat) -> anyhow::Result<()> {
    let mut view = match client.list_members().await {
        Ok(members) => DirectoryView::loaded(members),
        Err(e) => DirectoryView::failed(e.to_string()),
    };
    if let Some(name) = name {
        view = view.apply_name(name);
    }

    if let DirectoryView::Failed { message } = &view {
        bail!(message.clone());
    }
    print_members(view.visible(), format)
}

async fn run_filter(
    client: &RemoteClient,
    criteria: &FilterCriteria,
    local: bool,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    if let Some(applied) = summarize(criteria) {
        let chips: Vec<&str> = applied.chips.iter().map(|c| c.label.as_str()).collect();
        eprintln!("Filters: {}", chips.join(" | "));
    }

    let members = if local {
        let view = DirectoryView::loaded(client.list_members().await?).apply_criteria(criteria);
        view.visible().to_vec()
    } else if criteria.is_unconstrained() {
        client.list_members().await?
    } else {
        client.filter_members(criteria).await?
    };

    print_members(&members, format)
}

async fn run_options(client: &RemoteClient, field: MemberField, format: &OutputFormat) -> anyhow::Result<()> {
    let members = client.list_members().await?;
    let options = distinct_options(&members, field);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&options)?),
        OutputFormat::Table => {
            for option in options {
                println!("{}", option);
            }
        }
    }
    Ok(())
}

fn print_members(members: &[Member], format: &OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(members)?),
        OutputFormat::Table => {
            if members.is_empty() {
                println!("(no members)");
                return Ok(());
            }

            let years = |v: Option<u32>| v.map(|y| y.to_string()).unwrap_or_else(|| "-".into());
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec![
                "Id", "Name", "Email", "Organization", "Type", "Tags", "AI yrs", "Health yrs",
            ]);

            for m in members {
                table.add_row(vec![
                    m.user_id.to_string(),
                    m.full_name(),
                    m.email.clone(),
                    m.affiliation_organization.clone(),
                    m.membership_category.clone(),
                    m.tags.clone(),
                    years(m.years_experience_ia),
                    years(m.years_experience_healthcare),
                ]);
            }

            println!("{}", table);
            println!("{} member(s)", members.len());
        }
    }
    Ok(())
}

async fn run_status(client: &RemoteClient, format: &OutputFormat) -> anyhow::Result<()> {
    let status = client.status().await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        OutputFormat::Table => {
            println!("Status:  {}", status.status);
            println!("Version: {}", status.version);
            if let Some(roster) = status.roster {
                println!("Members: {}", roster.members);
            }
        }
    }

    Ok(())
}

fn run_validate(path: &Path) -> anyhow::Result<()> {
    let file = std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut roster = Roster::new();
    let report = roster
        .import_csv(file)
        .with_context(|| format!("{} is not a valid community sheet", path.display()))?;

    println!(
        "OK: {} member(s), {} row(s) without email",
        report.added, report.skipped
    );
    Ok(())
}

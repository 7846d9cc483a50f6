use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use workbook_merge::{FieldChange, PolicyRegistry};
use workbook_model::{
    allowed_roles, is_editable_by, progress_for, Document, MemberDraft, Role, Section, TeamSetup,
};
use workbook_store::{Session, WorkbookConfig, CONFIG_FILE};

fn cli() -> Command {
    Command::new("workbook")
        .version(workbook_store::VERSION)
        .about("Offline-first project workbook with snapshot merging")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .default_value(CONFIG_FILE)
                .value_parser(value_parser!(PathBuf))
                .help("Configuration file"),
        )
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Override the configured data directory"),
        )
        .subcommand(
            Command::new("init")
                .about("Start a new project with its team")
                .arg(
                    Arg::new("team")
                        .long("team")
                        .required(true)
                        .help("Team name"),
                )
                .arg(Arg::new("project").long("project").help("Project name"))
                .arg(Arg::new("center").long("center").help("School or center name"))
                .arg(
                    Arg::new("member")
                        .long("member")
                        .action(ArgAction::Append)
                        .value_parser(parse_member)
                        .help("ROLE=NAME, repeatable (e.g. coordinator=Ana)"),
                )
                .arg(Arg::new("zone").long("zone").help("Gastronomic zone"))
                .arg(
                    Arg::new("force")
                        .long("force")
                        .action(ArgAction::SetTrue)
                        .help("Replace an existing project"),
                ),
        )
        .subcommand(Command::new("demo").about("Replace the project with the demo project"))
        .subcommand(
            Command::new("show")
                .about("Summarize the current project")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print the whole document as JSON"),
                ),
        )
        .subcommand(
            Command::new("import")
                .about("Merge a snapshot exported by another member")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Exported .json snapshot"),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Write a snapshot to share with the team")
                .arg(
                    Arg::new("out")
                        .long("out")
                        .value_parser(value_parser!(PathBuf))
                        .help("Output directory (defaults to the data directory)"),
                )
                .arg(
                    Arg::new("as")
                        .long("as")
                        .help("Member id to export as (names the file)"),
                ),
        )
        .subcommand(
            Command::new("policies")
                .about("List merge policies per field")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("can-edit")
                .about("Check whether a role may edit a section")
                .arg(
                    Arg::new("section")
                        .long("section")
                        .required(true)
                        .value_parser(|s: &str| s.parse::<Section>().map_err(|e| e.to_string()))
                        .help("Section name (e.g. costings)"),
                )
                .arg(
                    Arg::new("role")
                        .long("role")
                        .value_parser(|s: &str| s.parse::<Role>().map_err(|e| e.to_string()))
                        .help("Role (omit to check with no signed-in member)"),
                ),
        )
}

fn parse_member(value: &str) -> Result<(Role, String), String> {
    let (role, name) = value
        .split_once(['=', ':'])
        .ok_or_else(|| format!("expected ROLE=NAME, got '{value}'"))?;
    let role = role.parse::<Role>().map_err(|e| e.to_string())?;
    Ok((role, name.trim().to_string()))
}

fn init_tracing(default_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(matches: &ArgMatches) -> Result<WorkbookConfig> {
    let path = matches
        .get_one::<PathBuf>("config")
        .cloned()
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
    let mut config = WorkbookConfig::load(&path)
        .with_context(|| format!("loading configuration from {}", path.display()))?;
    if let Some(dir) = matches.get_one::<PathBuf>("data-dir") {
        config = config.with_data_dir(dir);
    }
    Ok(config)
}

async fn open_session(config: &WorkbookConfig) -> Result<Session> {
    let store = Arc::new(config.file_store());
    let session = Session::open(store, config.ids.generator())
        .await
        .with_context(|| format!("opening workbook in {}", config.data_dir.display()))?;
    Ok(session.with_pretty_export(config.pretty_export))
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();
    let config = load_config(&matches)?;
    init_tracing(&config.log_level);

    match matches.subcommand() {
        Some(("init", args)) => init(&config, args).await,
        Some(("demo", _)) => demo(&config).await,
        Some(("show", args)) => show(&config, args.get_flag("json")).await,
        Some(("import", args)) => {
            let file = args
                .get_one::<PathBuf>("file")
                .context("missing import file")?;
            import(&config, file).await
        }
        Some(("export", args)) => export(&config, args).await,
        Some(("policies", args)) => policies(args.get_flag("json")),
        Some(("can-edit", args)) => {
            let section = *args
                .get_one::<Section>("section")
                .context("missing section")?;
            can_edit(section, args.get_one::<Role>("role").copied());
            Ok(())
        }
        _ => Ok(()),
    }
}

async fn init(config: &WorkbookConfig, args: &ArgMatches) -> Result<()> {
    let mut setup = TeamSetup::from_document(&Document::new(String::new()));
    setup.meta.team_name = args
        .get_one::<String>("team")
        .cloned()
        .unwrap_or_default();
    setup.meta.project_name = args.get_one::<String>("project").cloned();
    setup.meta.center_name = args.get_one::<String>("center").cloned();
    if let Some(zone) = args.get_one::<String>("zone") {
        setup.gastronomic_zone = zone.clone();
    }
    if let Some(members) = args.get_many::<(Role, String)>("member") {
        setup.members = members
            .map(|(role, name)| MemberDraft::new(*role, name.as_str()))
            .collect();
    }
    if setup.members.iter().all(|draft| draft.name.trim().is_empty()) {
        bail!("team setup needs at least one --member ROLE=NAME");
    }

    let mut session = open_session(config).await?;
    if let Some(previous) = replaced_project(session.document(), args.get_flag("force"))? {
        eprintln!("note: replacing previous project {previous}");
    }
    session.reset();
    setup.meta.created_at = session.document().meta.created_at;
    session
        .finish_setup(&setup)
        .context("finishing team setup")?;
    session.flush().await?;

    let document = session.document();
    println!("Created project {} for team {}", document.id, document.meta.team_name);
    for member in &document.members {
        println!("  {:<14} {}", member.role.wire_name(), member.name);
    }
    Ok(())
}

/// Title of the project `init` would overwrite, refusing unless `force`
fn replaced_project(document: &Document, force: bool) -> Result<Option<String>> {
    if document.members.is_empty() {
        return Ok(None);
    }
    if !force {
        bail!(
            "the workbook already holds project {}; pass --force to replace it",
            document.title()
        );
    }
    Ok(Some(document.title().to_string()))
}

async fn demo(config: &WorkbookConfig) -> Result<()> {
    let mut session = open_session(config).await?;
    session.load_demo();
    session.flush().await?;
    println!("Loaded demo project: {}", session.document().title());
    Ok(())
}

async fn show(config: &WorkbookConfig, json: bool) -> Result<()> {
    let session = open_session(config).await?;
    let document = session.document();

    if json {
        println!("{}", document.to_json_pretty()?);
        return Ok(());
    }

    print_summary(document);
    Ok(())
}

fn print_summary(document: &Document) {
    println!("{}", document.title());
    println!("=====================");
    println!("Id:        {}", document.id);
    println!("Team:      {}", document.meta.team_name);
    println!("Zone:      {}", document.phase1.gastronomic_zone);
    println!();
    println!("Trends:    {}", document.phase2.trends.len());
    println!("Dishes:    {}", document.phase3.dishes.len());
    println!("Timeline:  {}", document.phase4.timeline.len());
    println!("Costings:  {}", document.phase5.costings.len());
    println!("Reviews:   {}", document.phase6.evaluations.len());
    println!();
    println!("Members:");
    for member in &document.members {
        let tasks: Vec<String> = progress_for(document, member)
            .iter()
            .map(|t| {
                let mark = if t.done() { "x" } else { " " };
                format!("[{mark}] {} {}/{}", t.title, t.current, t.target)
            })
            .collect();
        println!("  {:<14} {:<12} {}", member.role.wire_name(), member.name, tasks.join("  "));
    }
}

async fn import(config: &WorkbookConfig, file: &Path) -> Result<()> {
    let mut session = open_session(config).await?;
    let report = match session.import_file(file).await {
        Ok(report) => report,
        Err(err) => {
            session.flush().await?;
            bail!("{}: {err}", file.display());
        }
    };
    session.flush().await?;

    println!("{}", report.summary());
    for field in report.changed() {
        match field.change {
            FieldChange::Collection(stats) => println!(
                "  {:<28} +{} ~{}",
                field.path, stats.appended, stats.replaced
            ),
            FieldChange::Scalar { .. } => println!("  {:<28} updated", field.path),
        }
    }
    Ok(())
}

async fn export(config: &WorkbookConfig, args: &ArgMatches) -> Result<()> {
    let mut session = open_session(config).await?;
    if let Some(id) = args.get_one::<String>("as") {
        if !session.sign_in(id) {
            bail!("no member with id '{id}'");
        }
    }

    let dir = args
        .get_one::<PathBuf>("out")
        .cloned()
        .unwrap_or_else(|| config.data_dir.clone());
    let path = session
        .export_to(&dir)
        .await
        .with_context(|| format!("exporting to {}", dir.display()))?;
    println!("{}", path.display());
    Ok(())
}

fn policies(json: bool) -> Result<()> {
    let registry = PolicyRegistry::workbook();

    if json {
        let fields: Vec<_> = registry.iter().collect();
        println!("{}", serde_json::to_string_pretty(&fields)?);
        return Ok(());
    }

    for field in registry.iter() {
        let key = field.key.map(|k| format!(" by {k}")).unwrap_or_default();
        println!(
            "{:<28} {:<24} wins: {}{key}",
            field.path,
            field.kind.name(),
            field.kind.winner_on_conflict()
        );
    }
    Ok(())
}

fn can_edit(section: Section, role: Option<Role>) {
    let allowed = is_editable_by(section, role);
    let roles: Vec<&str> = allowed_roles(section).iter().map(|r| r.wire_name()).collect();

    println!("{}", if allowed { "yes" } else { "no" });
    println!("{section} is editable by: {}", roles.join(", "));
}

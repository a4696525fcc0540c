//! Datamonster command-line client.
//!
//! Lists and edits settlements and survivors through the settlement API. Configuration is read
//! once at startup from the environment (and a `.env` file, if present); `--api-url` and
//! `--session` override it.

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use datamonster_client::config::{API_URL_ENV, SESSION_ENV, TIMEOUT_ENV};
use datamonster_client::{
    ClientConfig, ClientError, DatamonsterApi, EditOutcome, HttpTransport, SettlementEditor,
    SurvivorEditor,
};
use datamonster_core::{
    DisorderSlots, DraftForm, FieldChange, Gender, Stat, Survivor, SurvivorStatus,
    DISORDER_SLOTS,
};
use datamonster_types::SettlementName;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "datamonster")]
#[command(about = "Kingdom Death settlement and survivor editor")]
struct Cli {
    /// Settlement API base URL
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Value of the dm_session cookie
    #[arg(long, global = true)]
    session: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Settlements visible to the signed-in user
    #[command(subcommand)]
    Settlements(SettlementCommand),
    /// Survivors of a settlement
    #[command(subcommand)]
    Survivors(SurvivorCommand),
    /// Glossary lookups
    #[command(subcommand)]
    Glossary(GlossaryCommand),
}

#[derive(Subcommand)]
enum SettlementCommand {
    List,
    Create {
        /// Settlement name (5 to 25 characters)
        name: String,
    },
}

#[derive(Subcommand)]
enum SurvivorCommand {
    List {
        settlement_id: String,
    },
    Create(CreateSurvivorArgs),
    Edit(EditSurvivorArgs),
}

#[derive(Args)]
struct CreateSurvivorArgs {
    settlement_id: String,
    #[arg(long)]
    name: String,
    #[arg(long, default_value = "M")]
    gender: Gender,
    /// Stat assignment such as `survival=3`; repeatable
    #[arg(long = "set", value_parser = parse_assignment)]
    sets: Vec<(Stat, i32)>,
    /// Disorder id; repeatable, up to three
    #[arg(long = "disorder")]
    disorders: Vec<String>,
}

#[derive(Args)]
struct EditSurvivorArgs {
    settlement_id: String,
    survivor_id: String,
    /// Stat assignment such as `survival=3`; repeatable
    #[arg(long = "set", value_parser = parse_assignment)]
    sets: Vec<(Stat, i32)>,
    #[arg(long)]
    status: Option<SurvivorStatus>,
    /// Disorder id for slot 1, or `-` to clear it
    #[arg(long)]
    disorder1: Option<String>,
    /// Disorder id for slot 2, or `-` to clear it
    #[arg(long)]
    disorder2: Option<String>,
    /// Disorder id for slot 3, or `-` to clear it
    #[arg(long)]
    disorder3: Option<String>,
}

#[derive(Subcommand)]
enum GlossaryCommand {
    Disorders {
        /// Only show disorders whose name contains this text
        #[arg(long, default_value = "")]
        query: String,
    },
}

fn parse_assignment(raw: &str) -> Result<(Stat, i32), String> {
    let (stat, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected stat=value, got {raw:?}"))?;
    let stat = stat.parse::<Stat>().map_err(|e| e.to_string())?;
    let value = value
        .trim()
        .parse::<i32>()
        .map_err(|_| format!("{} must be a whole number", stat.label()))?;
    Ok((stat, value))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("datamonster=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    run(cli).await
}

fn resolve_config(cli: &Cli) -> anyhow::Result<ClientConfig> {
    let api_url = cli.api_url.clone().or_else(|| std::env::var(API_URL_ENV).ok());
    let session = cli.session.clone().or_else(|| std::env::var(SESSION_ENV).ok());
    let timeout = std::env::var(TIMEOUT_ENV).ok();

    ClientConfig::from_values(api_url.as_deref(), session.as_deref(), timeout.as_deref())
        .context("invalid client configuration")
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = resolve_config(&cli)?;
    tracing::debug!("using api at {}", config.base_url());
    let api = DatamonsterApi::new(HttpTransport::new(config)?);

    let result = match cli.command {
        Commands::Settlements(command) => settlements(&api, command).await,
        Commands::Survivors(command) => survivors(&api, command).await,
        Commands::Glossary(command) => glossary(&api, command).await,
    };

    result.map_err(|e| {
        if matches!(e.downcast_ref::<ClientError>(), Some(ClientError::Unauthorized)) {
            e.context(format!("sign in and set {SESSION_ENV} or --session"))
        } else {
            e
        }
    })
}

async fn settlements(
    api: &DatamonsterApi<HttpTransport>,
    command: SettlementCommand,
) -> anyhow::Result<()> {
    match command {
        SettlementCommand::List => {
            let settlements = api.list_settlements().await?;
            if settlements.is_empty() {
                println!("No settlements found.");
            }
            for s in settlements {
                println!("{}\t{}\tyear {}", s.id, s.name, s.current_year);
            }
        }
        SettlementCommand::Create { name } => {
            let name = SettlementName::new(&name).context("invalid settlement name")?;
            let editor = SettlementEditor::new(api);
            match editor.create(name).await? {
                EditOutcome::Created(s) => println!("Created settlement {} ({})", s.name, s.id),
                other => report(other),
            }
        }
    }
    Ok(())
}

async fn survivors(
    api: &DatamonsterApi<HttpTransport>,
    command: SurvivorCommand,
) -> anyhow::Result<()> {
    match command {
        SurvivorCommand::List { settlement_id } => {
            let survivors = api.list_survivors(&settlement_id).await?;
            if survivors.is_empty() {
                println!("No survivors found.");
            }
            for s in &survivors {
                print_survivor(s);
            }
        }
        SurvivorCommand::Create(args) => {
            if args.disorders.len() > DISORDER_SLOTS {
                bail!("survivors have at most {DISORDER_SLOTS} disorders");
            }
            let mut form = DraftForm::create()
                .apply(FieldChange::Name(args.name))?
                .apply(FieldChange::Gender(args.gender))?;
            for (stat, value) in args.sets {
                form = form.apply(FieldChange::Stat(stat, value))?;
            }
            for (slot, id) in args.disorders.into_iter().enumerate() {
                form = form.apply(FieldChange::Disorder {
                    slot,
                    value: Some(id),
                })?;
            }
            ensure_valid(&form)?;

            let editor = SurvivorEditor::new(api, args.settlement_id);
            match editor.submit_create(form).await? {
                EditOutcome::Created(s) => {
                    println!("Created survivor:");
                    print_survivor(&s);
                }
                other => report(other),
            }
        }
        SurvivorCommand::Edit(args) => {
            let editor = SurvivorEditor::load(api, &args.settlement_id).await?;
            let Some(baseline) = editor.survivor(&args.survivor_id) else {
                bail!(
                    "survivor {} not found in settlement {}",
                    args.survivor_id,
                    args.settlement_id
                );
            };

            let form = edit_form(&baseline, args)?;
            ensure_valid(&form)?;

            match editor.submit_edit(&baseline, form).await? {
                EditOutcome::Updated => {
                    println!("Survivor updated:");
                    if let Some(s) = editor.survivor(&baseline.id) {
                        print_survivor(&s);
                    }
                }
                other => report(other),
            }
        }
    }
    Ok(())
}

async fn glossary(
    api: &DatamonsterApi<HttpTransport>,
    command: GlossaryCommand,
) -> anyhow::Result<()> {
    match command {
        GlossaryCommand::Disorders { query } => {
            let glossary = api.glossary().await?;
            let found = glossary.selectable_disorders(&DisorderSlots::default(), 0, &query)?;
            if found.is_empty() {
                println!("No disorders found.");
            }
            for d in found {
                println!("{}\t{}\t{}", d.id, d.name, d.effect);
            }
        }
    }
    Ok(())
}

/// Edit form for `baseline` with every change requested on the command line applied.
fn edit_form(baseline: &Survivor, args: EditSurvivorArgs) -> anyhow::Result<DraftForm> {
    let mut form = DraftForm::edit(baseline);
    for (stat, value) in args.sets {
        form = form.apply(FieldChange::Stat(stat, value))?;
    }
    if let Some(status) = args.status {
        form = form.apply(FieldChange::Status(status))?;
    }
    let slots = [args.disorder1, args.disorder2, args.disorder3];
    for (slot, value) in slots.into_iter().enumerate() {
        if let Some(value) = value {
            let value = (value != "-").then_some(value);
            form = form.apply(FieldChange::Disorder { slot, value })?;
        }
    }
    Ok(form)
}

fn ensure_valid(form: &DraftForm) -> anyhow::Result<()> {
    if form.can_submit() {
        return Ok(());
    }
    for (field, message) in form.errors().iter() {
        eprintln!("  {field}: {message}");
    }
    bail!("survivor has {} invalid field(s)", form.errors().len())
}

fn report<E>(outcome: EditOutcome<E>) {
    match outcome {
        EditOutcome::NoChanges => println!("No changes to save."),
        EditOutcome::Busy => println!("Another save is still in progress."),
        EditOutcome::Updated => println!("Saved."),
        EditOutcome::Created(_) => println!("Created."),
    }
}

fn print_survivor(s: &Survivor) {
    let stats = Stat::ALL
        .iter()
        .map(|stat| format!("{}={}", stat.wire_key(), s.stats.get(*stat)))
        .collect::<Vec<_>>()
        .join(" ");
    let insane = if s.is_insane() { " [insane]" } else { "" };
    println!(
        "{}\t{} ({}, {}){}\n\t{}\n\tdisorders: {}",
        s.id,
        s.name,
        s.gender,
        s.status,
        insane,
        stats,
        if s.disorders.is_empty() {
            "-".to_owned()
        } else {
            s.disorders.join(", ")
        }
    );
}

/// Marquee - catalog add-flow client
use clap::{Args, Parser, Subcommand, ValueEnum};
use marquee_client::{
    load_poster, AddEntityForm, CatalogApi, CatalogClient, DismissReason, DuplicateGuard,
    GuardInput, SubmitOutcome, SuggestBox,
};
use marquee_core::types::{EntityKind, PartDraft};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;

use config::CliConfig;
use error::CliError;

#[derive(Parser)]
#[command(name = "marquee")]
#[command(about = "Add movies and series to a Marquee catalog", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// API base URL (overrides the config file)
    #[arg(long, global = true, env = "MARQUEE_URL")]
    url: Option<String>,

    /// Access token sent with every request (overrides the config file)
    #[arg(long, global = true, env = "MARQUEE_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Movie,
    Series,
}

impl From<KindArg> for EntityKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Movie => EntityKind::Movie,
            KindArg::Series => EntityKind::Series,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether a title already exists
    Check {
        /// Title to check
        name: String,
        /// Entity kind
        #[arg(short, long, value_enum, default_value = "movie")]
        kind: KindArg,
        /// Category for the composite check
        #[arg(long)]
        category: Option<i64>,
        /// Release year for the composite check
        #[arg(long)]
        year: Option<String>,
        /// Subcategory for the composite check
        #[arg(long)]
        subcategory: Option<i64>,
    },
    /// Suggest existing titles for a partial name
    Suggest {
        /// Partial title
        query: String,
        /// Entity kind
        #[arg(short, long, value_enum, default_value = "movie")]
        kind: KindArg,
    },
    /// Show the number the next entity will get
    NextNumber {
        /// Entity kind
        #[arg(short, long, value_enum, default_value = "movie")]
        kind: KindArg,
    },
    /// Add a movie or series
    Add(AddArgs),
}

#[derive(Args)]
struct AddArgs {
    /// Entity kind
    #[arg(value_enum)]
    kind: KindArg,
    /// Title
    #[arg(short, long)]
    name: String,
    /// Category id
    #[arg(long)]
    category: Option<i64>,
    /// Subcategory id
    #[arg(long)]
    subcategory: Option<i64>,
    /// Release year (required for movies)
    #[arg(short, long)]
    year: Option<String>,
    /// Genre id (repeatable)
    #[arg(short, long = "genre")]
    genres: Vec<i64>,
    /// Mark as already watched
    #[arg(long)]
    watched: bool,
    /// Poster image file
    #[arg(long)]
    poster: Option<PathBuf>,
    /// Extra part/season as NUMBER or NUMBER:YEAR (repeatable)
    #[arg(short, long = "part", value_parser = parse_part)]
    parts: Vec<PartDraft>,
}

fn parse_part(s: &str) -> std::result::Result<PartDraft, String> {
    let (number, year) = match s.split_once(':') {
        Some((number, year)) => (number, year),
        None => (s, ""),
    };
    let number = number
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("'{}' is not a part number", number))?;
    Ok(PartDraft::new(number, year.trim()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "marquee=info,marquee_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = CliConfig::load(cli.config.as_deref())?;
    if let Some(url) = cli.url {
        config.server.url = url;
    }
    if let Some(token) = cli.token {
        config.server.access_token = Some(token);
    }
    config.validate()?;

    let client = CatalogClient::new(config.client_config())?;
    tracing::debug!(url = %client.url(), authenticated = client.is_authenticated(), "Client ready");

    match cli.command {
        Commands::Check {
            name,
            kind,
            category,
            year,
            subcategory,
        } => {
            check(&client, &config, kind.into(), name, category, year, subcategory).await?;
        }
        Commands::Suggest { query, kind } => {
            suggest(&client, &config, kind.into(), &query).await?;
        }
        Commands::NextNumber { kind } => {
            let number = client.next_number(kind.into()).await?;
            println!("Next number: {}", number);
        }
        Commands::Add(args) => {
            add(client, &config, args).await?;
        }
    }

    Ok(())
}

async fn check(
    client: &CatalogClient,
    config: &CliConfig,
    kind: EntityKind,
    name: String,
    category: Option<i64>,
    year: Option<String>,
    subcategory: Option<i64>,
) -> anyhow::Result<()> {
    let year = match year {
        Some(input) => Some(marquee_core::parse_year(&input).ok_or_else(|| {
            CliError::InvalidArgument(format!("'{}' is not a valid year", input))
        })?),
        None => None,
    };

    let mut guard = DuplicateGuard::new(
        Arc::new(client.clone()),
        kind,
        config.form_settings().duplicate_debounce,
    );
    guard.update(&GuardInput {
        name,
        category_id: category,
        year,
        subcategory_id: subcategory,
    });
    let (name_check, composite_check) = guard.settled().await;

    println!("Name match:      {}", yes_no(name_check.duplicate));
    println!("Composite match: {}", yes_no(composite_check.duplicate));
    if guard.blocks_submit() {
        println!("This {} would be rejected as a duplicate.", kind);
    }

    Ok(())
}

async fn suggest(
    client: &CatalogClient,
    config: &CliConfig,
    kind: EntityKind,
    query: &str,
) -> anyhow::Result<()> {
    let mut suggest_box =
        SuggestBox::new(Arc::new(client.clone()), kind, &config.form_settings());
    suggest_box.set_query(query);

    let mut rx = suggest_box.subscribe();
    let state = rx.wait_for(|s| !s.loading).await?.clone();

    if state.suggestions.is_empty() {
        println!("No suggestions.");
    } else {
        for (index, title) in state.suggestions.iter().enumerate() {
            println!("{:>2}. {}", index + 1, title);
        }
    }

    Ok(())
}

async fn add(client: CatalogClient, config: &CliConfig, args: AddArgs) -> anyhow::Result<()> {
    let kind: EntityKind = args.kind.into();
    let mut form = AddEntityForm::new(Arc::new(client), kind, &config.form_settings());

    form.set_name(args.name);
    // Nothing to pick from without a prompt; drop the typeahead fetch
    form.dismiss_suggestions(DismissReason::OutsideClick);
    form.set_category(args.category);
    form.set_subcategory(args.subcategory);
    if let Some(year) = args.year {
        form.set_release_year(year);
    }
    for genre in args.genres {
        form.toggle_genre(genre);
    }
    form.set_watched(args.watched);
    if let Some(path) = args.poster {
        form.set_poster(Some(load_poster(&path).await?));
    }
    for part in args.parts {
        form.add_part(part);
    }

    form.guard().settled().await;

    match form.submit().await {
        SubmitOutcome::Created { id, parts_created } => {
            println!("Created {} #{}", kind, id);
            for number in parts_created {
                println!("  + {} {}", kind.child_label(), number);
            }
            if let Some(next) = form.next_number() {
                println!("Next number: {}", next);
            }
            Ok(())
        }
        SubmitOutcome::Rejected(problems) => {
            for problem in &problems {
                eprintln!("  - {}", problem);
            }
            anyhow::bail!("{} not submitted: {} problem(s)", kind, problems.len())
        }
        SubmitOutcome::Failed(failure) => {
            if let Some(parent_id) = failure.parent_id {
                eprintln!(
                    "{} #{} was created; {}s created before the failure: {:?}",
                    kind,
                    parent_id,
                    kind.child_label(),
                    failure.parts_created
                );
            }
            anyhow::bail!(failure.message)
        }
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

use adoptlite::adopt::{AdoptModel, AdoptStore, AdoptsFilter, AuthUser, get_adoption_by_id, list_adoptions};
use adoptlite::config::{self, AppConfig};
use adoptlite::graphql::{build_schema, execute_as, sdl};
use adoptlite::import::{ImportOptions, import_file};
use adoptlite::{Database, engine::Engine};
use bson::oid::ObjectId;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "adoptlite", version, about = "Adoption listings over an embedded document store", long_about = None)]
struct Cli {
    /// Path to a config file (TOML)
    #[arg(long, help = "Path to a config file (TOML). If omitted, ADOPTLITE_CONFIG or ./adoptlite.toml is used.")]
    config: Option<PathBuf>,
    #[arg(long = "data", help = "NDJSON/JSON seed file for the listing collection (repeatable)")]
    data_files: Vec<PathBuf>,
    #[arg(long, help = "Listing collection name (default: adopts)")]
    collection: Option<String>,
    #[arg(long, help = "Maximum number of results per query")]
    max_limit: Option<usize>,
    #[arg(long, help = "Directory for rolling log files; stderr when omitted")]
    log_dir: Option<PathBuf>,
    #[arg(long, help = "off|error|warn|info|debug|trace")]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

/// The requesting user, standing in for a session.
#[derive(Args, Debug, Clone)]
struct UserArgs {
    #[arg(long, help = "Requesting user id (ObjectId hex)")]
    user: Option<String>,
    #[arg(long, allow_hyphen_values = true, requires = "lat", help = "User longitude")]
    lng: Option<f64>,
    #[arg(long, allow_hyphen_values = true, requires = "lng", help = "User latitude")]
    lat: Option<f64>,
}

impl UserArgs {
    fn auth_user(&self) -> Result<Option<AuthUser>, Box<dyn std::error::Error>> {
        let Some(id) = &self.user else {
            return Ok(None);
        };
        let oid = ObjectId::parse_str(id).map_err(|e| format!("invalid --user: {e}"))?;
        let mut user = AuthUser::new(oid);
        if let (Some(lng), Some(lat)) = (self.lng, self.lat) {
            user = user.at(lng, lat);
        }
        Ok(Some(user))
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "List adoptions near the user; prints NDJSON to stdout")]
    Adopts {
        #[command(flatten)]
        user: UserArgs,
        #[arg(long, help = "Filter JSON, e.g. {\"gender\":\"male\",\"age_gte\":2,\"distance\":5}")]
        filter: Option<String>,
        #[arg(long, allow_hyphen_values = true, help = "Maximum number of results")]
        first: Option<i64>,
        #[arg(long, allow_hyphen_values = true, help = "Number of results to skip")]
        skip: Option<i64>,
    },
    #[command(about = "Show one adoption by id")]
    Adopt {
        #[arg(help = "Adoption id (ObjectId hex)")]
        id: String,
    },
    #[command(about = "Execute a GraphQL query and print the JSON response")]
    Graphql {
        #[arg(help = "GraphQL query text")]
        query: String,
        #[arg(long, help = "Variables JSON object")]
        variables: Option<String>,
        #[command(flatten)]
        user: UserArgs,
    },
    #[command(about = "Print the GraphQL schema (SDL)")]
    Schema,
    #[command(about = "Load a data file and report what would be imported")]
    Import {
        #[arg(help = "Path to an NDJSON or JSON array file")]
        file: PathBuf,
        #[arg(long, help = "Fail on the first bad record instead of skipping it")]
        strict: bool,
    },
}

fn open_store(cfg: &AppConfig) -> Result<Arc<dyn AdoptStore>, Box<dyn std::error::Error>> {
    let db = Arc::new(Database::open(cfg.engine_options())?);
    Ok(Arc::new(AdoptModel::with_collection(db, cfg.collection_name())))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let overrides = AppConfig {
        data_files: cli.data_files.clone(),
        collection: cli.collection.clone(),
        max_limit: cli.max_limit,
        log_dir: cli.log_dir.clone(),
        log_level: cli.log_level.clone(),
        ..AppConfig::default()
    };
    let cfg = config::load(cli.config.as_deref(), overrides)?;
    if let Err(e) = cfg.init_logging() {
        eprintln!("logging disabled: {e}");
    }
    cfg.apply_query_limits();
    log::debug!("effective config: {cfg:?}");

    match cli.command {
        Commands::Adopts { user, filter, first, skip } => {
            let user = user.auth_user()?.ok_or("adopts needs --user")?;
            let filter: Option<AdoptsFilter> = filter.map(|s| serde_json::from_str(&s)).transpose()?;
            let store = open_store(&cfg)?;
            for adopt in list_adoptions(store.as_ref(), filter.as_ref(), first, skip, &user).await? {
                println!("{}", adopt.to_json());
            }
        }
        Commands::Adopt { id } => {
            let store = open_store(&cfg)?;
            match get_adoption_by_id(store.as_ref(), &id).await? {
                Some(adopt) => println!("{}", adopt.to_json()),
                None => println!("null"),
            }
        }
        Commands::Graphql { query, variables, user } => {
            let schema = build_schema(open_store(&cfg)?);
            let mut request = async_graphql::Request::new(query);
            if let Some(v) = variables {
                let json: serde_json::Value = serde_json::from_str(&v)?;
                request = request.variables(async_graphql::Variables::from_json(json));
            }
            let response = execute_as(&schema, request, user.auth_user()?).await;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::Schema => {
            let schema = build_schema(open_store(&cfg)?);
            print!("{}", sdl(&schema));
        }
        Commands::Import { file, strict } => {
            let engine = Engine::new();
            let opts = ImportOptions {
                collection: cfg.collection_name().to_string(),
                skip_errors: !strict,
                ..ImportOptions::default()
            };
            let report = import_file(&engine, &file, &opts)?;
            println!("inserted={} skipped={}", report.inserted, report.skipped);
            for (line, err) in &report.errors {
                eprintln!("line {line}: {err}");
            }
        }
    }
    Ok(())
}

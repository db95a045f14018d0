use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use schema_diff::config::{self, Config, DatabaseConfig};
use schema_diff::db::Endpoint;
use schema_diff::schema::doc::{append_missing, render_markdown, Dictionary};
use schema_diff::utils::logging::init_logging;
use schema_diff::{SchemaAnalyzer, SchemaBatch, SchemaDiffClient};

#[derive(Parser, Debug)]
#[command(name = "schema_diff", version, about = "Compare two MySQL schemas")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the statements that give the source the destination's structure
    Diff {
        /// Source database url or dump file
        #[arg(long)]
        src: Option<String>,
        /// Destination database url or dump file
        #[arg(long)]
        dst: Option<String>,
        /// Execute the statements against the source
        #[arg(long)]
        exec: bool,
        /// Also write the statements to a timestamped file in this directory
        #[arg(long)]
        script_dir: Option<String>,
    },
    /// Print markdown documentation of the source schema
    Doc {
        #[arg(long)]
        src: Option<String>,
        /// Column dictionary; missing descriptions are appended to it
        #[arg(long)]
        dict: Option<PathBuf>,
    },
    /// Print the parsed source schema as JSON
    Inspect {
        #[arg(long)]
        src: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => {
            let path = path.to_string_lossy();
            config::load_from_file(&path).with_context(|| format!("loading {}", path))?
        }
        None => Config::default(),
    };

    let mut logging = config.logging.clone().unwrap_or_default();
    if let Some(level) = &cli.log_level {
        logging.level = level.clone();
    }
    init_logging(&logging)?;

    match cli.command {
        Command::Diff {
            src,
            dst,
            exec,
            script_dir,
        } => {
            override_url(&mut config.source, src);
            override_url(&mut config.destination, dst);
            config.apply.exec |= exec;
            if script_dir.is_some() {
                config.apply.script_directory = script_dir;
            }
            run_diff(config).await
        }
        Command::Doc { src, dict } => {
            override_url(&mut config.source, src);
            let batch = analyze(&config.source).await?;
            run_doc(&batch, dict)
        }
        Command::Inspect { src } => {
            override_url(&mut config.source, src);
            let batch = analyze(&config.source).await?;
            println!("{}", serde_json::to_string_pretty(&batch)?);
            Ok(())
        }
    }
}

fn override_url(database: &mut DatabaseConfig, url: Option<String>) {
    if let Some(url) = url {
        database.url = url;
    }
}

async fn analyze(database: &DatabaseConfig) -> Result<SchemaBatch> {
    if database.url.trim().is_empty() {
        bail!("no source given; pass --src or set source.url");
    }
    let endpoint = Endpoint::open(database).await?;
    Ok(SchemaAnalyzer::new(endpoint.source()).analyze().await?)
}

async fn run_diff(config: Config) -> Result<()> {
    let client = SchemaDiffClient::new(config).await?;
    let statements = client.compare().await?;

    for statement in &statements {
        println!("{};", statement);
    }

    if !statements.is_empty() {
        if let Some(path) = client.apply(&statements).await? {
            eprintln!("script written to {}", path.display());
        }
    }
    Ok(())
}

fn run_doc(batch: &SchemaBatch, dict: Option<PathBuf>) -> Result<()> {
    let dictionary = match &dict {
        Some(path) if path.exists() => Dictionary::load(path)?,
        _ => Dictionary::default(),
    };

    let doc = render_markdown(batch, &dictionary);
    println!("{}", doc.markdown);

    if let Some(path) = &dict {
        append_missing(path, &doc.missing)?;
    }
    Ok(())
}

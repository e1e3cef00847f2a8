//! CLI interface for the document store

use anyhow::Result;
use clap::{Parser, Subcommand};
use semantic_docstore::{
    logging, DistanceMetric, DocumentFile, DocumentStore, ErrorKind, StoreConfig,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "docstore")]
#[command(about = "An in-memory semantic document store", long_about = None)]
struct Cli {
    /// Distance metric used for ranking
    #[arg(long, env = "DOCSTORE_METRIC", default_value = "squared_euclidean")]
    metric: DistanceMetric,

    /// Pin the vector dimension instead of learning it from the first document
    #[arg(long, env = "DOCSTORE_DIMENSION")]
    dimension: Option<usize>,

    /// Output dimension of the hashing embedder
    #[arg(long, env = "DOCSTORE_EMBEDDING_DIMENSION", default_value_t = 256)]
    embedding_dimension: usize,

    /// Decimal places shown for distances
    #[arg(long, env = "DOCSTORE_PRECISION", default_value_t = 4)]
    precision: usize,

    /// Preload a .json/.txt file before running the command (repeatable)
    #[arg(long, global = true)]
    load: Vec<PathBuf>,

    /// Increase log verbosity (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add .json/.txt files to the store
    Add {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print the most relevant document for a query
    Query {
        text: String,
        /// Number of documents to print
        #[arg(short, long, default_value = "1")]
        k: usize,
    },
    /// Remove every document
    DeleteAll,
    /// Print the number of stored documents
    Count,
    /// Read commands from stdin against a single store
    Shell,
    /// Start the HTTP API server
    Serve {
        /// Address to bind to
        #[arg(long, default_value = "127.0.0.1:3000")]
        addr: String,
    },
}

const EXIT_OK: u8 = 0;
const EXIT_FAILURE: u8 = 1;
const EXIT_EMPTY_COLLECTION: u8 = 2;

fn add(store: &DocumentStore, paths: &[PathBuf]) -> u8 {
    match DocumentFile::read_all(paths).and_then(|files| store.add_documents(&files)) {
        Ok(report) => {
            println!("{}", report);
            EXIT_OK
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_FAILURE
        }
    }
}

fn query(store: &DocumentStore, text: &str, k: usize) -> u8 {
    let result = if k <= 1 {
        store.query(text).map(|hit| vec![hit])
    } else {
        store.query_top(text, k)
    };

    match result {
        Ok(hits) if hits.is_empty() => {
            println!("No relevant document found for '{}'", text);
            EXIT_OK
        }
        Ok(hits) => {
            for hit in hits {
                println!("{}", hit.header());
                println!("{}", hit.body);
            }
            EXIT_OK
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            if e.kind() == ErrorKind::EmptyCollection {
                EXIT_EMPTY_COLLECTION
            } else {
                EXIT_FAILURE
            }
        }
    }
}

fn delete_all(store: &DocumentStore) -> u8 {
    match store.delete_all() {
        Ok(report) => {
            println!("{}", report);
            EXIT_OK
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_FAILURE
        }
    }
}

fn count(store: &DocumentStore) -> u8 {
    match store.count() {
        Ok(n) => {
            println!("{}", n);
            EXIT_OK
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_FAILURE
        }
    }
}

fn shell(store: &DocumentStore) -> Result<u8> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    print!("> ");
    stdout.flush()?;
    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();
        let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        match command {
            "" => {}
            "add" => {
                let paths: Vec<PathBuf> = rest.split_whitespace().map(PathBuf::from).collect();
                add(store, &paths);
            }
            "query" => {
                query(store, rest, 1);
            }
            "delete-all" => {
                delete_all(store);
            }
            "count" => {
                count(store);
            }
            "quit" | "exit" => break,
            "help" => {
                println!("Commands: add <file>..., query <text>, delete-all, count, quit");
            }
            other => eprintln!("Unknown command: {}", other),
        }

        print!("> ");
        stdout.flush()?;
    }
    println!();
    Ok(EXIT_OK)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    let config = StoreConfig {
        metric: cli.metric,
        dimension: cli.dimension,
        embedding_dimension: cli.embedding_dimension,
        precision: cli.precision,
    };
    let store = DocumentStore::with_hash_embedder(config);

    if !cli.load.is_empty() {
        let code = add(&store, &cli.load);
        if code != EXIT_OK {
            return Ok(ExitCode::from(code));
        }
    }

    let code = match cli.command {
        Commands::Add { files } => add(&store, &files),
        Commands::Query { text, k } => query(&store, &text, k),
        Commands::DeleteAll => delete_all(&store),
        Commands::Count => count(&store),
        Commands::Shell => shell(&store)?,
        Commands::Serve { addr } => {
            semantic_docstore::server::start(&addr, store).await?;
            EXIT_OK
        }
    };

    Ok(ExitCode::from(code))
}

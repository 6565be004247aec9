use clap::{ArgGroup, Parser};

use crate::error::{RelayError, Result};

#[derive(Parser, Debug, Clone)]
#[clap(
    author,
    version,
    about = "Relay Elasticsearch queries through a Kibana console proxy"
)]
#[clap(group(
    ArgGroup::new("operation")
        .required(true)
        .args(["get_indices", "get_stats", "search", "raw_query", "dump"])
))]
pub struct Cli {
    /// Kibana server URL (including http/https)
    #[clap(short = 's', long = "server-url", alias = "server_url", required = true)]
    pub server_url: String,

    /// Username for Kibana, do not provide if no auth is required
    #[clap(short, long)]
    pub username: Option<String>,

    /// Password for Kibana, do not provide if no auth is required
    #[clap(short, long)]
    pub password: Option<String>,

    /// Fetch indices
    #[clap(long)]
    pub get_indices: bool,

    /// Fetch cluster stats
    #[clap(long)]
    pub get_stats: bool,

    /// Output indices in JSON format
    #[clap(long, requires = "get_indices")]
    pub json: bool,

    /// Wildcard search term
    #[clap(long)]
    pub search: Option<String>,

    /// Raw JSON query string or @/path/to/file.json to search with
    #[clap(long)]
    pub raw_query: Option<String>,

    /// Index to search in (required by --dump)
    #[clap(long)]
    pub indice: Option<String>,

    /// Dump every document of --indice as JSON lines
    #[clap(long)]
    pub dump: bool,

    /// Dump output path, '$' for stdout (default: <indice>.json)
    #[clap(long, requires = "dump")]
    pub output: Option<String>,

    /// Release the scroll context once the dump is complete
    #[clap(long, requires = "dump")]
    pub clear_scroll: bool,

    /// Verify TLS certificates (disabled by default for self-signed setups)
    #[clap(long)]
    pub verify_tls: bool,

    /// Quiet mode, hide the progress spinner
    #[clap(long)]
    pub quiet: bool,

    /// Debug mode, enable verbose logging
    #[clap(long)]
    pub debug: bool,
}

/// The single action selected on the command line
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    GetIndices { json: bool },
    GetStats,
    Search { term: String, index: Option<String> },
    RawQuery { query: String, index: Option<String> },
    Dump {
        index: String,
        output: Option<String>,
        clear_scroll: bool,
    },
}

impl Cli {
    /// Resolve the selected operation, rejecting incomplete invocations
    pub fn operation(&self) -> Result<Operation> {
        // '*' means all indices, same as not naming one
        let index = self
            .indice
            .clone()
            .filter(|index| !index.is_empty() && index != "*");

        if self.dump {
            let index = index.ok_or_else(|| {
                RelayError::Usage("--dump requires a concrete --indice to dump".to_string())
            })?;
            return Ok(Operation::Dump {
                index,
                output: self.output.clone(),
                clear_scroll: self.clear_scroll,
            });
        }

        if self.get_indices {
            Ok(Operation::GetIndices { json: self.json })
        } else if self.get_stats {
            Ok(Operation::GetStats)
        } else if let Some(term) = &self.search {
            Ok(Operation::Search {
                term: term.clone(),
                index,
            })
        } else if let Some(query) = &self.raw_query {
            Ok(Operation::RawQuery {
                query: query.clone(),
                index,
            })
        } else {
            Err(RelayError::Usage(
                "one of --get-indices, --get-stats, --search, --raw-query or --dump is required"
                    .to_string(),
            ))
        }
    }
}

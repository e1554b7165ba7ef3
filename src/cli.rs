use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

pub const DEFAULT_BATCH_SIZE: usize = 1000;
pub const DEFAULT_TOKEN_COUNT: u64 = 10_000_000;

#[derive(Parser, Debug)]
#[command(
    name = "tokens",
    version,
    about = "Generate random tokens and bulk-import them into a SQLite store"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate random tokens and write them to a file
    Generate(GenerateArgs),
    /// Import tokens from a file or stdin into the tokens table
    Import(ImportArgs),
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// File to write the tokens to; `-` writes to stdout.
    #[arg(long, short = 'f', default_value = "tokens.txt")]
    pub file: PathBuf,

    /// Number of tokens to generate.
    #[arg(short = 'n', long = "number", default_value_t = DEFAULT_TOKEN_COUNT)]
    pub count: u64,

    /// Seed for token generation. The current UNIX time is used when omitted.
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Args, Debug, Clone)]
pub struct ImportArgs {
    /// File to read the tokens from. Reads stdin when omitted.
    #[arg(long, short = 'f')]
    pub file: Option<PathBuf>,

    /// SQLite path or `file:` URI of the token store.
    #[arg(long, env = "TOKENS_DSN")]
    pub dsn: Option<String>,

    /// Batch size used for bulk import.
    #[arg(long = "bs", short = 'b', default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// Write a JSON run report here after a successful commit.
    #[arg(long)]
    pub report_path: Option<PathBuf>,
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Generate(_) => "generate",
            Self::Import(_) => "import",
        }
    }
}

impl GenerateArgs {
    pub fn writes_to_stdout(&self) -> bool {
        self.file.as_os_str() == "-"
    }
}

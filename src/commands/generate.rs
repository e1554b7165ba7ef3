use std::fs::File;
use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use crate::cli::GenerateArgs;
use crate::token::random_token;

pub fn run(args: GenerateArgs) -> Result<()> {
    let seed = args
        .seed
        .unwrap_or_else(|| Utc::now().timestamp().max(0) as u64);

    info!(
        file = %args.file.display(),
        count = args.count,
        seed,
        "generating tokens"
    );

    if args.writes_to_stdout() {
        let stdout = io::stdout();
        generate(stdout.lock(), args.count, seed)?;
    } else {
        let file = File::create(&args.file)
            .with_context(|| format!("could not create tokens file: {}", args.file.display()))?;
        generate(file, args.count, seed)?;
    }

    info!(count = args.count, "generate completed");
    Ok(())
}

/// Writes `count` tokens, one per line. Equal seeds yield identical output.
pub fn generate<W: Write>(writer: W, count: u64, seed: u64) -> Result<()> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut writer = BufWriter::new(writer);

    for _ in 0..count {
        let token = random_token(&mut rng);
        writeln!(writer, "{token}").context("could not write token")?;
    }

    writer.flush().context("could not flush writer")?;
    Ok(())
}

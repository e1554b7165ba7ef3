use std::fs::File;
use std::io::{self, BufReader};

use anyhow::{Context, Result, bail};
use chrono::Utc;

use super::*;
use crate::cli::ImportArgs;
use crate::model::ImportRunReport;
use crate::util::{now_utc_string, utc_compact_string, write_json_pretty};

pub fn run(args: ImportArgs) -> Result<()> {
    let started_ts = Utc::now();
    let started_at = now_utc_string();
    let run_id = format!("import-{}", utc_compact_string(started_ts));

    let Some(dsn) = args.dsn.as_deref().filter(|dsn| !dsn.is_empty()) else {
        bail!("missing database data source name (--dsn or TOKENS_DSN)");
    };

    validate_batch_size(args.batch_size)?;

    let input = args
        .file
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "<stdin>".to_string());
    info!(run_id = %run_id, input = %input, batch_size = args.batch_size, "starting import");

    let cancel = CancelFlag::new();
    let handler_flag = cancel.clone();
    ctrlc::set_handler(move || {
        warn!("interrupt received, aborting import");
        handler_flag.cancel();
    })
    .context("could not install interrupt handler")?;

    let mut connection = open_store(dsn)?;

    let summary = match &args.file {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("could not open tokens file: {}", path.display()))?;
            import_tokens(&mut connection, BufReader::new(file), args.batch_size, &cancel)?
        }
        None => import_tokens(&mut connection, io::stdin().lock(), args.batch_size, &cancel)?,
    };

    info!(
        rows_inserted = summary.counts.rows_inserted,
        rows_already_present = summary.counts.rows_already_present,
        batches = summary.counts.batches_flushed,
        "import committed"
    );

    if let Some(report_path) = &args.report_path {
        let report = ImportRunReport {
            manifest_version: 1,
            run_id,
            status: "committed".to_string(),
            started_at,
            finished_at: now_utc_string(),
            input,
            batch_size: args.batch_size,
            counts: summary.counts,
            diagnostics: summary.diagnostics,
        };
        write_json_pretty(report_path, &report)?;
        info!(path = %report_path.display(), "wrote import run report");
    }

    Ok(())
}

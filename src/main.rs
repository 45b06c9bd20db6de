use anyhow::Result;
use clap::Parser;
use console::style;
use std::path::PathBuf;
use tracing::info;

use s3sweep::config::Config;
use s3sweep::s3::S3Store;
use s3sweep::sweep::{self, FileOutcome};

#[derive(Parser, Debug)]
#[command(
    name = "s3sweep",
    version = env!("CARGO_PKG_VERSION"),
    about = "Sweep a directory into S3: upload each file, remove it locally once stored",
    long_about = "Recursively uploads every file under BASEDIR to the target S3 bucket under a \
                  key derived from the file's path and modification time, deleting each local \
                  file only after its upload is confirmed. Intended for periodic invocation \
                  (e.g. from cron); a failed file is reported and left in place for the next run.",
    after_help = "Examples:\n  \
                  s3sweep /var/spool/outbox my-backup-bucket      # Sweep a spool directory\n  \
                  s3sweep ./exports my-backup-bucket --debug      # With verbose diagnostics\n\n\
                  Configuration (.env or environment):\n  \
                  AWS_REGION=us-west-2\n  \
                  AWS_PROFILE=backup\n  \
                  LOG_LEVEL=info"
)]
struct Cli {
    /// Base directory path to upload from
    basedir: PathBuf,

    /// Target S3 bucket name
    bucket: String,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file early to get LOG_LEVEL
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.debug {
        "debug".to_string()
    } else {
        std::env::var("LOG_LEVEL")
            .ok()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .unwrap_or_else(|| "info".to_string())
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_new(&log_level)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    Config::validate_bucket_name(&cli.bucket)?;
    let config = Config::from_env()?;

    info!(
        "s3sweep v{} from:{} to:{}",
        env!("CARGO_PKG_VERSION"),
        cli.basedir.display(),
        cli.bucket
    );

    let store = S3Store::new(&config).await;

    // Fatal preconditions (missing basedir, unknown/unreachable bucket)
    // propagate here and exit non-zero; per-file failures do not.
    let summary = sweep::run(&store, &cli.bucket, &cli.basedir).await?;

    println!();
    for outcome in &summary.outcomes {
        match outcome {
            FileOutcome::Swept { path, key } => {
                println!(
                    "{} {} {}",
                    style("✓").green(),
                    style(path.display()).green(),
                    style(format!("→ s3://{}/{}", cli.bucket, key)).dim()
                );
            }
            FileOutcome::CleanupFailed { path, key, reason } => {
                println!(
                    "{} {} {}",
                    style("⚠").yellow(),
                    style(path.display()).yellow(),
                    style(format!(
                        "uploaded to s3://{}/{} but local delete failed: {}",
                        cli.bucket, key, reason
                    ))
                    .dim()
                );
            }
            FileOutcome::Failed { path, reason } => {
                println!(
                    "{} {} - {}",
                    style("✗").red(),
                    style(path.display()).red(),
                    style(reason).red()
                );
            }
        }
    }

    println!("\n{}", style("═".repeat(70)).dim());
    println!(
        "{}",
        style(format!(
            "Summary: {} swept, {} failed, {} cleanup warnings",
            summary.swept(),
            summary.failed(),
            summary.cleanup_failed()
        ))
        .bold()
    );
    if summary.walk_warnings > 0 {
        println!(
            "{}",
            style(format!(
                "{} path(s) skipped during traversal (see warnings above)",
                summary.walk_warnings
            ))
            .yellow()
        );
    }

    Ok(())
}

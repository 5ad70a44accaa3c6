//! jobrun CLI - trigger and monitor runs on the remote job-run service.

use std::time::Duration;

use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use jobrun_client::{create_job, run_job, JobRunConfig, RunOptions};
use jobrun_core::{EnvironmentId, JobDefinition, ProjectId};

/// jobrun CLI - remote job-run management tool
#[derive(Parser)]
#[command(name = "jobrun")]
#[command(about = "Trigger and monitor remote job runs", long_about = None)]
struct Cli {
    /// Account ID (falls back to JOBRUN_ACCOUNT_ID)
    #[arg(long, global = true)]
    account_id: Option<u64>,

    /// API token (falls back to JOBRUN_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,

    /// API domain
    #[arg(long, global = true)]
    api_domain: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Trigger a run of an existing job
    Run {
        /// Reason for triggering the run, kept by the service for audit
        #[arg(short, long)]
        cause: String,

        /// Job ID (falls back to JOBRUN_JOB_ID)
        #[arg(long)]
        job_id: Option<u64>,

        /// Wait for the run to finish and attach artifact URLs
        #[arg(long)]
        wait: bool,

        /// Give up waiting after this many seconds
        #[arg(long)]
        max_wait_secs: Option<u64>,

        /// Seconds between status polls
        #[arg(long, default_value = "1")]
        poll_interval_secs: u64,

        /// Extra trigger argument as key=value; value parsed as JSON when
        /// possible, kept as a string otherwise (repeatable)
        #[arg(long = "arg", value_name = "KEY=VALUE")]
        args: Vec<String>,
    },

    /// Create a new job
    #[command(name = "create-job")]
    CreateJob {
        /// Name of the job
        #[arg(short, long)]
        name: String,

        /// Project to create the job in
        #[arg(long)]
        project_id: u64,

        /// Environment the job runs in
        #[arg(long)]
        environment_id: u64,

        /// Command the job executes, in order (repeatable)
        #[arg(long = "step", value_name = "COMMAND")]
        steps: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = JobRunConfig::new();
    if let Some(account_id) = cli.account_id {
        config = config.with_account_id(account_id);
    }
    if let Some(token) = cli.token {
        config = config.with_token(token);
    }
    if let Some(domain) = cli.api_domain {
        config = config.with_api_domain(domain);
    }

    match cli.command {
        Commands::Run {
            cause,
            job_id,
            wait,
            max_wait_secs,
            poll_interval_secs,
            args,
        } => {
            if let Some(job_id) = job_id {
                config = config.with_job_id(job_id);
            }

            let mut options = RunOptions::new()
                .with_poll_interval(Duration::from_secs(poll_interval_secs));
            if wait {
                options = options.wait_for_completion();
            }
            if let Some(secs) = max_wait_secs {
                options = options.with_max_wait(Duration::from_secs(secs));
            }
            for raw in &args {
                let (key, value) = parse_extra_arg(raw)?;
                options = options.with_extra_arg(key, value);
            }

            debug!(cause = %cause, wait = wait, "Triggering job run");
            let result = run_job(&config, &cause, &options).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }

        Commands::CreateJob {
            name,
            project_id,
            environment_id,
            steps,
        } => {
            let definition = JobDefinition::new(
                name,
                ProjectId::new(project_id),
                EnvironmentId::new(environment_id),
                steps,
            );
            let record = create_job(&config, &definition).await?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
    }

    Ok(())
}

/// Split `key=value`, decoding the value as JSON when it parses as such.
fn parse_extra_arg(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("invalid --arg '{}': expected KEY=VALUE", raw))?;
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

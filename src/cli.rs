use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use log::info;

use crate::config::BuildConfig;
use crate::error::JenkinsError;
use crate::jenkins::{
    resolve_queue_item, wait_for_build, BuildResult, JenkinsClient, JobPath, LogStream, QueueRef,
};
use crate::output;

/// Bound on queue-to-build resolution after a submission.
const QUEUE_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Parser)]
#[command(name = "jenkinsctl")]
#[command(author, version, about = "Drive Jenkins builds from the command line", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    connection: Connection,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Connection {
    /// Jenkins base URL
    #[arg(long, env = "JENKINS_URL")]
    url: String,

    /// Jenkins user name
    #[arg(long, env = "JENKINS_USER")]
    user: Option<String>,

    /// Jenkins API token
    #[arg(long, env = "JENKINS_TOKEN")]
    token: Option<String>,
}

#[derive(Args)]
struct WaitOpts {
    /// Maximum seconds to wait for completion
    #[arg(long, default_value_t = 3600)]
    timeout: u64,

    /// Seconds between status polls
    #[arg(long, default_value_t = 2)]
    interval: u64,
}

impl WaitOpts {
    fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    fn interval(&self) -> Duration {
        Duration::from_secs(self.interval)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a build described by a YAML config file
    Build {
        /// YAML file with `job` and `params`
        file: PathBuf,

        /// Override a parameter from the file (name=value, repeatable)
        #[arg(short, long = "param")]
        params: Vec<String>,

        /// Block until the build completes
        #[arg(short, long, default_value_t = false)]
        wait: bool,

        #[command(flatten)]
        wait_opts: WaitOpts,
    },

    /// Re-run a build with the same parameters
    Rebuild {
        /// Job name, folders separated with `/`
        job: String,

        /// Build to copy parameters from (defaults to the last build)
        build_number: Option<u32>,

        /// Block until the new build completes
        #[arg(short, long, default_value_t = false)]
        wait: bool,

        #[command(flatten)]
        wait_opts: WaitOpts,
    },

    /// Wait for an already-running build to complete
    Wait {
        /// Job name, folders separated with `/`
        job: String,

        /// Build number (defaults to the last build)
        build_number: Option<u32>,

        #[command(flatten)]
        wait_opts: WaitOpts,
    },

    /// Print a build's console output, following it while it runs
    Log {
        /// Job name, folders separated with `/`
        job: String,

        /// Build number (defaults to the last build)
        build_number: Option<u32>,
    },
}

/// Process exit code for a finished build.
fn exit_code_for(result: Option<BuildResult>) -> i32 {
    match result {
        Some(BuildResult::Success) => 0,
        Some(BuildResult::Failure)
        | Some(BuildResult::Aborted)
        | Some(BuildResult::Unstable)
        | Some(BuildResult::NotBuilt) => 1,
        _ => 2,
    }
}

/// Timeouts map to their own exit code so scripts can tell "took too long"
/// from "failed".
fn handle_timeout(err: JenkinsError) -> Result<i32> {
    match err {
        JenkinsError::QueueTimeout { .. } | JenkinsError::BuildTimeout { .. } => {
            eprintln!("\nError: {err}");
            Ok(3)
        }
        other => Err(other.into()),
    }
}

impl Cli {
    pub async fn execute(self) -> Result<i32> {
        let client = JenkinsClient::new(
            &self.connection.url,
            self.connection.user.clone(),
            self.connection.token.clone(),
        )?;

        match self.command {
            Commands::Build {
                file,
                params,
                wait,
                wait_opts,
            } => {
                let mut config = BuildConfig::load(&file)?;
                config.override_params(&params)?;
                let job = JobPath::new(&config.job);
                submit_and_watch(&client, &job, config.params_vec(), wait, &wait_opts).await
            }

            Commands::Rebuild {
                job,
                build_number,
                wait,
                wait_opts,
            } => {
                let job = JobPath::new(&job);
                let number = resolve_build_number(&client, &job, build_number).await?;
                let status = client.build(&job, number).await?;
                submit_and_watch(&client, &job, status.parameters(), wait, &wait_opts).await
            }

            Commands::Wait {
                job,
                build_number,
                wait_opts,
            } => {
                let job = JobPath::new(&job);
                let number = resolve_build_number(&client, &job, build_number).await?;

                println!("Waiting for build {job} #{number} to complete...");
                println!(
                    "Timeout: {}s, Poll interval: {}s",
                    wait_opts.timeout, wait_opts.interval
                );

                match wait_for_build(&client, &job, number, wait_opts.timeout(), wait_opts.interval())
                    .await
                {
                    Ok(status) => {
                        output::print_build_summary(&status);
                        Ok(exit_code_for(status.result))
                    }
                    Err(err) => handle_timeout(err),
                }
            }

            Commands::Log { job, build_number } => {
                let job = JobPath::new(&job);
                let number = resolve_build_number(&client, &job, build_number).await?;
                let mut stream = LogStream::new(&client, &job, number);
                while let Some(chunk) = stream.next_chunk().await? {
                    print!("{chunk}");
                }
                Ok(0)
            }
        }
    }
}

async fn resolve_build_number(
    client: &JenkinsClient,
    job: &JobPath,
    build_number: Option<u32>,
) -> Result<u32> {
    match build_number {
        Some(number) => Ok(number),
        None => Ok(client.last_build_number(job).await?),
    }
}

async fn submit_and_watch(
    client: &JenkinsClient,
    job: &JobPath,
    params: Vec<(String, String)>,
    wait: bool,
    wait_opts: &WaitOpts,
) -> Result<i32> {
    info!("submitting build for {job} with {} parameter(s)", params.len());
    let queue: QueueRef = client.submit_build(job, &params).await?;
    println!("Build queued: {queue}");

    if !wait {
        return Ok(0);
    }

    println!("Waiting for build to start...");
    let number = match resolve_queue_item(client, &queue, QUEUE_TIMEOUT).await {
        Ok(number) => number,
        Err(err) => return handle_timeout(err),
    };
    println!("Build #{number} started");

    println!(
        "Waiting for build to complete (timeout: {}s, interval: {}s)...",
        wait_opts.timeout, wait_opts.interval
    );
    match wait_for_build(client, job, number, wait_opts.timeout(), wait_opts.interval()).await {
        Ok(status) => {
            output::print_build_summary(&status);
            Ok(exit_code_for(status.result))
        }
        Err(err) => handle_timeout(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_mapping() {
        assert_eq!(exit_code_for(Some(BuildResult::Success)), 0);
        assert_eq!(exit_code_for(Some(BuildResult::Failure)), 1);
        assert_eq!(exit_code_for(Some(BuildResult::Aborted)), 1);
        assert_eq!(exit_code_for(Some(BuildResult::Unstable)), 1);
        assert_eq!(exit_code_for(Some(BuildResult::NotBuilt)), 1);
        assert_eq!(exit_code_for(Some(BuildResult::Unknown)), 2);
        assert_eq!(exit_code_for(None), 2);
    }

    #[test]
    fn test_timeout_errors_map_to_exit_code_3() {
        let code = handle_timeout(JenkinsError::BuildTimeout {
            job: "myjob".to_string(),
            number: 1,
            timeout: Duration::from_secs(10),
        })
        .unwrap();
        assert_eq!(code, 3);
    }

    #[test]
    fn test_non_timeout_errors_propagate() {
        let result = handle_timeout(JenkinsError::Malformed("bad".to_string()));
        assert!(result.is_err());
    }
}

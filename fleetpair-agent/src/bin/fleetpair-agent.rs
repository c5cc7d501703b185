// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Fleetpair agent daemon
//!
//! Runs the management-endpoint discovery and pairing loop with the
//! production collaborators: SSDP discovery, filesystem endpoint store,
//! GPG keyring, and a container-runtime status command.

use anyhow::Result;
use clap::Parser;
use fleetpair_agent::agent::Agent;
use fleetpair_agent::config::{ConfigHandle, ManagementConfig};
use fleetpair_agent::keyring::GpgKeyring;
use fleetpair_agent::pairing::DependentClient;
use fleetpair_agent::runtime::CommandRuntime;
use fleetpair_agent::store::FileStore;
use fleetpair_discovery_ssdp::SsdpDiscovery;
use std::sync::Arc;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "fleetpair-agent")]
#[command(about = "Management-endpoint discovery and pairing agent", long_about = None)]
struct Cli {
    /// Expected management-endpoint fingerprint; empty accepts any
    #[arg(long, default_value = "")]
    fingerprint: String,

    /// Pinned management-endpoint address; empty discovers one
    #[arg(long, default_value = "")]
    host: String,

    /// Management REST port
    #[arg(long, default_value = "8443")]
    port: String,

    /// Path of the public-key endpoint on the management server
    #[arg(long, default_value = "/rest/v1/security/keyman/getpublickey")]
    public_key_path: String,

    /// Skip TLS certificate validation on management calls
    #[arg(long)]
    allow_insecure: bool,

    /// Directory for the durable endpoint record
    #[arg(long, default_value = "/var/lib/fleetpair")]
    store_dir: String,

    /// Container-runtime command reporting workload state; the workload
    /// name is appended, stdout containing RUNNING means active
    #[arg(long, default_value = "lxc-info", num_args = 1.., value_delimiter = ' ')]
    workload_status_cmd: Vec<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity<clap_verbosity_flag::InfoLevel>,
}

/// Placeholder for the metrics pipeline rebuilt on endpoint changes
struct MetricsReset;

impl DependentClient for MetricsReset {
    fn reset(&self) {
        debug!("Dependent clients reset for new management endpoint");
    }
}

fn verbosity_level(filter: clap_verbosity_flag::VerbosityFilter) -> tracing::Level {
    use clap_verbosity_flag::VerbosityFilter;
    use tracing::Level;
    match filter {
        VerbosityFilter::Off | VerbosityFilter::Error => Level::ERROR,
        VerbosityFilter::Warn => Level::WARN,
        VerbosityFilter::Info => Level::INFO,
        VerbosityFilter::Debug => Level::DEBUG,
        VerbosityFilter::Trace => Level::TRACE,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    // Priority: RUST_LOG env var > CLI -v flags > default (INFO)
    use tracing_subscriber::EnvFilter;

    let env_filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(verbosity_level(cli.verbose.filter()).as_str())
    };

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = ConfigHandle::new(ManagementConfig {
        fingerprint: cli.fingerprint,
        host: cli.host,
        port: cli.port,
        public_key_path: cli.public_key_path,
        allow_insecure: cli.allow_insecure,
        gpg_user: String::new(),
    });

    let (status_program, status_args) = cli
        .workload_status_cmd
        .split_first()
        .map(|(program, args)| (program.clone(), args.to_vec()))
        .unwrap_or_else(|| ("lxc-info".to_string(), Vec::new()));

    let agent = Arc::new(Agent::new(
        config,
        Arc::new(SsdpDiscovery),
        Arc::new(FileStore::new(cli.store_dir)),
        Arc::new(CommandRuntime::new(status_program, status_args)),
        Arc::new(GpgKeyring),
        Arc::new(MetricsReset),
    ));

    agent.run().await;
    Ok(())
}

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

//! Local workload state
//!
//! The role monitor asks the container runtime whether the management
//! workload runs on this node. Only the running/not-running answer matters
//! here.

use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Trait for querying local workload state
#[async_trait]
pub trait WorkloadState: Send + Sync {
    /// Whether the named workload is currently running
    async fn is_running(&self, workload: &str) -> bool;
}

/// Workload state read from a container-runtime status command
///
/// Runs `<program> <args..> <workload>` and treats a successful exit with
/// `RUNNING` in stdout as active, the way LXC-style runtimes report state.
pub struct CommandRuntime {
    program: String,
    args: Vec<String>,
}

impl CommandRuntime {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

#[async_trait]
impl WorkloadState for CommandRuntime {
    async fn is_running(&self, workload: &str) -> bool {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(workload)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .await;

        match output {
            Ok(output) if output.status.success() => {
                String::from_utf8_lossy(&output.stdout).contains("RUNNING")
            }
            Ok(output) => {
                debug!("Workload status command exited with {}", output.status);
                false
            }
            Err(e) => {
                debug!("Workload status command failed: {e}");
                false
            }
        }
    }
}

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

//! Keyring service interface
//!
//! The key exchange hands fetched public-key material to a keyring and
//! records the derived key identifier. The production implementation
//! drives the `gpg` binary.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Trait for importing public keys and deriving their identifiers
#[async_trait]
pub trait Keyring: Send + Sync {
    /// Import raw public-key material into the keyring
    async fn import(&self, key: &[u8]) -> Result<()>;

    /// Derive the key identifier naming this key material
    async fn key_id(&self, key: &[u8]) -> Result<String>;
}

/// Keyring backed by the system `gpg` binary
pub struct GpgKeyring;

impl GpgKeyring {
    async fn run_with_stdin(args: &[&str], input: &[u8]) -> Result<Vec<u8>> {
        let mut child = Command::new("gpg")
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .context("spawning gpg")?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(input).await.context("writing key to gpg")?;
        }

        let output = child.wait_with_output().await.context("waiting for gpg")?;
        if !output.status.success() {
            bail!("gpg {:?} exited with {}", args, output.status);
        }
        Ok(output.stdout)
    }
}

#[async_trait]
impl Keyring for GpgKeyring {
    async fn import(&self, key: &[u8]) -> Result<()> {
        Self::run_with_stdin(&["--batch", "--import"], key).await?;
        Ok(())
    }

    async fn key_id(&self, key: &[u8]) -> Result<String> {
        let output = Self::run_with_stdin(&["--with-colons", "--show-keys"], key).await?;
        let text = String::from_utf8(output).context("parsing gpg output")?;
        parse_key_id(&text).context("no key id in gpg output")
    }
}

/// Extract the first fingerprint from `gpg --with-colons` output
fn parse_key_id(colons: &str) -> Option<String> {
    colons.lines().find_map(|line| {
        let mut fields = line.split(':');
        if fields.next() != Some("fpr") {
            return None;
        }
        // fpr records carry the fingerprint in field 10
        line.split(':').nth(9).map(str::to_string)
    })
}

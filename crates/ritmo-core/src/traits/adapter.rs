// SPDX-FileCopyrightText: 2026 Ritmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base trait shared by all port implementations.

use async_trait::async_trait;

use crate::error::RitmoError;
use crate::types::{AdapterType, HealthStatus};

/// The base trait every concrete backend implements.
///
/// Provides identity, lifecycle, and health check capabilities so the
/// binary can report on its wired adapters uniformly.
#[async_trait]
pub trait Adapter: Send + Sync + 'static {
    /// Returns the human-readable name of this adapter instance.
    fn name(&self) -> &str;

    /// Returns the semantic version of this adapter.
    fn version(&self) -> semver::Version;

    /// Returns the type of port this adapter backs.
    fn adapter_type(&self) -> AdapterType;

    /// Performs a health check and returns the adapter's current status.
    async fn health_check(&self) -> Result<HealthStatus, RitmoError>;

    /// Gracefully shuts down the adapter, releasing any held resources.
    async fn shutdown(&self) -> Result<(), RitmoError> {
        Ok(())
    }
}

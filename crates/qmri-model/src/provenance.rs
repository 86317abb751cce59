//! Provenance stamping for audit records.
//!
//! Environment facts are supplied through an injected capability rather
//! than read ad hoc, so tests can stamp deterministic records.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Injected source of environment facts.
pub trait EnvironmentInfo {
    /// Version string of the runtime the model executes under.
    fn runtime_version(&self) -> String;
    /// Operating system / platform description.
    fn platform(&self) -> String;
}

/// Environment facts of the running process.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostEnvironment;

impl EnvironmentInfo for HostEnvironment {
    fn runtime_version(&self) -> String {
        format!("rustc {}", option_env!("CARGO_PKG_RUST_VERSION").unwrap_or("unknown"))
    }

    fn platform(&self) -> String {
        format!("{} {}", std::env::consts::OS, std::env::consts::ARCH)
    }
}

/// Metadata merged into any audit record produced around a model run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvenanceStamp {
    /// The model's schema version at stamping time.
    pub model_version: String,
    /// RFC 3339 timestamp of the stamp.
    pub created_at: String,
    pub runtime_version: String,
    pub platform: String,
}

impl ProvenanceStamp {
    /// Collect a stamp from the injected environment.
    pub fn collect(env: &dyn EnvironmentInfo, model_version: impl Into<String>) -> Self {
        Self {
            model_version: model_version.into(),
            created_at: Utc::now().to_rfc3339(),
            runtime_version: env.runtime_version(),
            platform: env.platform(),
        }
    }
}

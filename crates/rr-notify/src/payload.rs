// payload.rs — NotificationPayload and the pure builder.
//
// build() is deterministic: same RunContext, same extracted fields, same
// instant → byte-identical JSON. The metadata map is a BTreeMap so key
// order never depends on insertion order.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::context::RunContext;

/// Sentinel recorded when the run did not report a container identifier.
const NO_CONTAINER: &str = "none";

/// The wire entity: serialized exactly once and delivered exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationPayload {
    /// The run's output location with exactly one trailing separator —
    /// consumers treat it as a prefix to enumerate under.
    pub source_prefix: String,

    /// Union of RunContext-derived static fields and extracted `wrroc_*`
    /// provenance fields. Absent values are omitted, never null.
    pub metadata: BTreeMap<String, Value>,

    /// Fixed human-readable sentence describing the delivery.
    pub commit_message: String,
}

impl NotificationPayload {
    /// Compact JSON string for the queue message body.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Compose the payload for one completed run.
///
/// Pure: no I/O, no randomness. Both embedded timestamps derive from the
/// supplied `now`, so callers control determinism.
pub fn build(
    context: &RunContext,
    extracted: &BTreeMap<String, Value>,
    now: DateTime<Utc>,
) -> NotificationPayload {
    let mut metadata = BTreeMap::new();

    let mut put_opt = |key: &str, value: &Option<String>| {
        if let Some(value) = value {
            metadata.insert(key.to_string(), Value::String(value.clone()));
        }
    };
    put_opt("nextflow_version", &context.tool_version);
    put_opt("run_name", &context.run_name);
    put_opt("run_id", &context.run_id);
    put_opt("session_id", &context.session_id);

    metadata.insert(
        "container".to_string(),
        Value::String(
            context
                .container
                .clone()
                .unwrap_or_else(|| NO_CONTAINER.to_string()),
        ),
    );
    metadata.insert("success".to_string(), Value::Bool(context.success));
    metadata.insert(
        "timestamp".to_string(),
        Value::String(now.to_rfc3339_opts(SecondsFormat::Secs, true)),
    );

    // Provenance fields overlay the static map. Key namespaces are disjoint
    // by the wrroc_ prefix convention.
    for (key, value) in extracted {
        metadata.insert(key.clone(), value.clone());
    }

    NotificationPayload {
        source_prefix: format!("{}/", context.outdir.trim_end_matches('/')),
        metadata,
        commit_message: format!(
            "Workflow run completed at {} UTC",
            now.format("%Y-%m-%d %H:%M:%S")
        ),
    }
}

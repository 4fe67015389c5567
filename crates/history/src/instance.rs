use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Timestamp format used by the engine's history API, e.g.
/// `2024-03-01T12:30:45.000+0100`.
///
/// The same format is used when parsing `endTime` fields and when
/// building `finishedBefore` query parameters.
pub const ENGINE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

/// Snapshot of one historic workflow process instance as reported by
/// the engine.
///
/// Only `id` and `end_time` participate in cleanup decisions; the
/// remaining fields are carried so that callers logging or exporting
/// instances see the familiar shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProcessInstance {
    /// Unique instance id.
    pub id: String,
    /// Completion timestamp in [`ENGINE_TIME_FORMAT`]. `None` while the
    /// instance is still running; may hold an unparsable value if the
    /// engine emitted malformed data.
    pub end_time: Option<String>,
    /// Start timestamp.
    pub start_time: Option<String>,
    /// Key of the process definition this instance was started from.
    pub process_definition_key: Option<String>,
    /// Full id of the process definition.
    pub process_definition_id: Option<String>,
    /// Business key assigned at start, if any.
    pub business_key: Option<String>,
    /// Tenant the instance belongs to, if any.
    pub tenant_id: Option<String>,
    /// Engine-reported state, e.g. `COMPLETED`.
    pub state: Option<String>,
    /// Runtime duration in milliseconds.
    pub duration_in_millis: Option<f64>,
}

impl ProcessInstance {
    /// Parse `end_time` using the engine's timestamp format.
    ///
    /// Returns `None` when the field is absent or does not conform to
    /// [`ENGINE_TIME_FORMAT`]; callers decide whether that is a warning
    /// (client-side filtering) or irrelevant (server-side filtering).
    pub fn end_time_parsed(&self) -> Option<DateTime<FixedOffset>> {
        let raw = self.end_time.as_deref()?;
        DateTime::parse_from_str(raw, ENGINE_TIME_FORMAT).ok()
    }
}

/// Wire shape of the history count endpoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct InstanceCount {
    /// Number of matching instances.
    pub count: i64,
}

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::checklist::Checklist;
use crate::dates;
use crate::errors::TrackerError;
use crate::rms::{self, RmsRecordType};
use crate::status::Status;

/// The metric fields offered on the intake form.
pub const METRIC_KEYS: &[&str] = &[
    "# Rooms/Sets",
    "# of Videos",
    "# Angles",
    "FPS",
    "Codec",
    "Shutter Speed",
    "Est. Capture Hrs",
    "HD File Size Limit",
];

/// Free-text metric values keyed by metric name.
pub type Metrics = BTreeMap<String, String>;

/// The opaque identifier of a production record.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        RecordId(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId(s.to_owned())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        RecordId(s)
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Priority {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Priority::ALL
            .iter()
            .copied()
            .find(|p| p.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TrackerError::UnknownPriority(s.to_owned()))
    }
}

/// A single recording/editing job tracked by the team.
///
/// Snapshots use camelCase keys and leave out absent optional fields.
/// The RMS URL is derived on demand by [`ProductionRecord::rms_url`] and
/// is never stored.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionRecord {
    /// The ID of the record. Set once, when the draft is created.
    pub id: RecordId,

    /// The team's external project code, e.g. `P-001`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(serialize_with = "dates::serialize_option", deserialize_with = "dates::deserialize_option")]
    pub event_date: Option<Date>,

    /// The date the deliverables are due.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(serialize_with = "dates::serialize_option", deserialize_with = "dates::deserialize_option")]
    pub deliverables_date: Option<Date>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_lead: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera_op: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor: Option<String>,

    /// Whether the job needs a recording crew. Drafts start out `true`;
    /// a snapshot entry without the key reads as `false`.
    #[serde(default)]
    pub recording_required: bool,

    /// Free text such as "Audio", "Multi-cam" or "Livestream".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recording_type: Option<String>,

    #[serde(default)]
    pub capture_plan: Checklist,

    pub status: Status,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_tech: Option<String>,

    /// Where the media lives (ShareFile, Drive, Dropbox...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_link: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rms_record_type: Option<RmsRecordType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rms_id_or_slug: Option<String>,

    /// Scope or description of the final product.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    #[serde(default)]
    pub use_of_final_video: Checklist,

    #[serde(default)]
    pub deliverable_form: Checklist,

    #[serde(default)]
    pub integrated_content: Checklist,

    #[serde(default)]
    pub edit_services: Checklist,

    #[serde(default)]
    pub layout_format: Checklist,

    #[serde(default)]
    pub gear: Checklist,

    #[serde(default)]
    pub metrics: Metrics,

    /// Creation time in milliseconds since the Unix epoch.
    pub created_at: i64,
}

impl ProductionRecord {
    /// Creates a draft stamped with the current time.
    pub fn draft() -> Self {
        Self::draft_at(epoch_millis(OffsetDateTime::now_utc()))
    }

    /// Creates a draft with a fresh ID, status `Intake`, recording
    /// required and every checklist empty.
    pub fn draft_at(created_at: i64) -> Self {
        ProductionRecord {
            id: RecordId::generate(),
            project_id: None,
            client_name: None,
            event_name: None,
            venue: None,
            event_date: None,
            deliverables_date: None,
            priority: None,
            project_lead: None,
            camera_op: None,
            editor: None,
            recording_required: true,
            recording_type: None,
            capture_plan: Checklist::new(),
            status: Status::default(),
            assigned_tech: None,
            file_link: None,
            notes: None,
            rms_record_type: None,
            rms_id_or_slug: None,
            scope: None,
            use_of_final_video: Checklist::new(),
            deliverable_form: Checklist::new(),
            integrated_content: Checklist::new(),
            edit_services: Checklist::new(),
            layout_format: Checklist::new(),
            gear: Checklist::new(),
            metrics: Metrics::new(),
            created_at,
        }
    }

    /// Moves the record one step along the workflow.
    pub fn advance(mut self) -> Self {
        self.status = self.status.next();
        self
    }

    /// Replaces the value of one metric. An empty value clears it.
    pub fn set_metric(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let value = value.into();

        if value.is_empty() {
            self.metrics.remove(&key.into());
        } else {
            self.metrics.insert(key.into(), value);
        }
    }

    /// The record's link into the RMS, or an empty string when either
    /// half of the pair is missing.
    pub fn rms_url(&self) -> String {
        rms::resolve_url(self.rms_record_type, self.rms_id_or_slug.as_deref())
    }
}

/// Converts an instant to milliseconds since the Unix epoch.
pub fn epoch_millis(at: OffsetDateTime) -> i64 {
    (at.unix_timestamp_nanos() / 1_000_000) as i64
}

#[cfg(test)]
mod tests {
    use time::macros::{date, datetime};

    use super::*;
    use crate::checklist::ChecklistField;

    #[test]
    fn drafts_start_with_defaults() {
        let draft = ProductionRecord::draft_at(1_720_000_000_000);

        assert_eq!(draft.status, Status::Intake);
        assert!(draft.recording_required);
        assert!(draft.metrics.is_empty());
        assert_eq!(draft.created_at, 1_720_000_000_000);
        for field in ChecklistField::ALL.iter() {
            assert!(field.get(&draft).is_empty());
        }
    }

    #[test]
    fn advance_walks_the_workflow_and_stops_at_archived() {
        let mut record = ProductionRecord::draft_at(0);
        let mut seen = vec![record.status];

        for _ in 0..8 {
            record = record.advance();
            seen.push(record.status);
        }

        assert_eq!(record.status, Status::Archived);
        assert_eq!(&seen[..8], &Status::ALL[..]);

        let id = record.id.clone();
        let record = record.advance();
        assert_eq!(record.status, Status::Archived);
        assert_eq!(record.id, id);
    }

    #[test]
    fn drafts_get_distinct_ids() {
        let a = ProductionRecord::draft();
        let b = ProductionRecord::draft();

        assert_ne!(a.id, b.id);
        assert_eq!(a.id.as_str().len(), 32);
    }

    #[test]
    fn snapshot_form_uses_camel_case_and_omits_absent_fields() {
        let mut record = ProductionRecord::draft_at(5);
        record.client_name = Some("Acme".to_owned());
        record.event_date = Some(date!(2025-05-04));
        record.status = Status::InEditing;
        record.rms_record_type = Some(RmsRecordType::Orders);
        record.rms_id_or_slug = Some("42".to_owned());

        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["clientName"], "Acme");
        assert_eq!(value["eventDate"], "2025-05-04");
        assert_eq!(value["status"], "In Editing");
        assert_eq!(value["rmsRecordType"], "orders");
        assert_eq!(value["recordingRequired"], true);
        assert_eq!(value["createdAt"], 5);
        assert!(value.get("venue").is_none());
        assert!(value.get("rmsUrl").is_none());
        assert_eq!(value["gear"], serde_json::json!([]));
    }

    #[test]
    fn sparse_entries_load_with_defaults() {
        let record: ProductionRecord =
            serde_json::from_str(r#"{"id":"k2j4","status":"Review","createdAt":17,"priority":"High"}"#).unwrap();

        assert_eq!(record.id.as_str(), "k2j4");
        assert_eq!(record.priority, Some(Priority::High));
        assert!(!record.recording_required);
        assert!(record.gear.is_empty());
    }

    #[test]
    fn metrics_are_replaced_whole() {
        let mut record = ProductionRecord::draft_at(0);
        record.set_metric("FPS", "30");
        record.set_metric("FPS", "60");
        record.set_metric("Codec", "ProRes");
        record.set_metric("Codec", "");

        assert_eq!(record.metrics.len(), 1);
        assert_eq!(record.metrics["FPS"], "60");
    }

    #[test]
    fn epoch_millis_truncates_to_milliseconds() {
        assert_eq!(epoch_millis(datetime!(1970-01-01 0:00:01.0025 UTC)), 1002);
    }

    #[test]
    fn priorities_parse_case_insensitively() {
        assert_eq!("medium".parse::<Priority>().unwrap(), Priority::Medium);
        assert!("urgent".parse::<Priority>().is_err());
    }
}

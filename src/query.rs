use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use time::{Duration, OffsetDateTime};

use crate::dates::start_of;
use crate::environment::Clock;
use crate::errors::TrackerError;
use crate::record::ProductionRecord;
use crate::rms::RmsLinks;
use crate::status::Status;

/// How far ahead an event counts as upcoming.
const UPCOMING_WINDOW_DAYS: i64 = 7;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StatusFilter {
    All,
    Only(Status),
}

impl Default for StatusFilter {
    fn default() -> Self {
        StatusFilter::All
    }
}

impl StatusFilter {
    pub fn matches(self, status: Status) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => wanted == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(StatusFilter::All)
        } else {
            s.parse().map(StatusFilter::Only)
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RecordingFilter {
    All,
    Required,
    NotRequired,
}

impl Default for RecordingFilter {
    fn default() -> Self {
        RecordingFilter::All
    }
}

impl RecordingFilter {
    pub fn matches(self, recording_required: bool) -> bool {
        match self {
            RecordingFilter::All => true,
            RecordingFilter::Required => recording_required,
            RecordingFilter::NotRequired => !recording_required,
        }
    }
}

impl FromStr for RecordingFilter {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(RecordingFilter::All),
            "yes" | "required" => Ok(RecordingFilter::Required),
            "no" | "none" => Ok(RecordingFilter::NotRequired),
            _ => Err(TrackerError::UnknownRecordingFilter(s.to_owned())),
        }
    }
}

impl fmt::Display for RecordingFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RecordingFilter::All => "all",
            RecordingFilter::Required => "yes",
            RecordingFilter::NotRequired => "no",
        })
    }
}

/// The tracker's search box and selectors.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Filter {
    /// Case-insensitive text looked for in the client, event, venue and
    /// project code.
    pub text: String,
    pub status: StatusFilter,
    pub recording: RecordingFilter,
}

impl Filter {
    pub fn matches(&self, record: &ProductionRecord) -> bool {
        self.matches_text(record)
            && self.status.matches(record.status)
            && self.recording.matches(record.recording_required)
    }

    fn matches_text(&self, record: &ProductionRecord) -> bool {
        if self.text.is_empty() {
            return true;
        }

        let needle = self.text.to_lowercase();

        [
            &record.client_name,
            &record.event_name,
            &record.venue,
            &record.project_id,
        ]
        .iter()
        .any(|field| {
            field
                .as_deref()
                .unwrap_or("")
                .to_lowercase()
                .contains(&needle)
        })
    }
}

/// One row of the tracker, with the flags derived at evaluation time.
#[derive(Clone, Debug, PartialEq)]
pub struct View<'a> {
    pub record: &'a ProductionRecord,
    /// Deliverables were due before now and the job is not delivered.
    pub overdue: bool,
    /// Recording is required and the event starts within the week.
    pub upcoming: bool,
    pub rms_url: String,
}

/// Evaluates filters over records. Never touches the records, and reads
/// the time from its clock on every call.
pub struct Query {
    clock: Arc<Clock>,
    links: RmsLinks,
}

impl Query {
    pub fn new(clock: Arc<Clock>, links: RmsLinks) -> Self {
        Query { clock, links }
    }

    /// The records matching `filter`, in their original order.
    pub fn view<'a, I>(&self, records: I, filter: &Filter) -> Vec<View<'a>>
    where I: IntoIterator<Item = &'a ProductionRecord> {
        let now = (self.clock)();

        records
            .into_iter()
            .filter(|record| filter.matches(record))
            .map(|record| View {
                record,
                overdue: is_overdue(record, now),
                upcoming: is_upcoming(record, now),
                rms_url: self
                    .links
                    .resolve(record.rms_record_type, record.rms_id_or_slug.as_deref()),
            })
            .collect()
    }
}

pub fn is_overdue(record: &ProductionRecord, now: OffsetDateTime) -> bool {
    record.status != Status::Delivered
        && record
            .deliverables_date
            .map_or(false, |due| start_of(due) < now)
}

pub fn is_upcoming(record: &ProductionRecord, now: OffsetDateTime) -> bool {
    let horizon = now + Duration::days(UPCOMING_WINDOW_DAYS);

    record.recording_required
        && record.event_date.map_or(false, |date| {
            let starts = start_of(date);
            starts >= now && starts <= horizon
        })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use time::macros::{date, datetime};

    use super::*;

    fn fixed_clock() -> Arc<Clock> {
        Arc::new(|| datetime!(2025-03-10 12:00 UTC))
    }

    fn record(client: &str, status: Status, recording_required: bool) -> ProductionRecord {
        let mut record = ProductionRecord::draft_at(0);
        record.client_name = Some(client.to_owned());
        record.status = status;
        record.recording_required = recording_required;
        record
    }

    fn clients(views: &[View<'_>]) -> Vec<String> {
        views
            .iter()
            .map(|v| v.record.client_name.clone().unwrap_or_default())
            .collect()
    }

    #[test]
    fn filters_combine_text_status_and_recording() {
        let records = vec![
            record("Acme", Status::Intake, true),
            record("Zen", Status::Delivered, false),
        ];
        let query = Query::new(fixed_clock(), RmsLinks::default());

        let by_text = Filter {
            text: "acme".to_owned(),
            ..Filter::default()
        };
        let by_status = Filter {
            status: StatusFilter::Only(Status::Delivered),
            ..Filter::default()
        };
        let by_recording = Filter {
            recording: RecordingFilter::Required,
            ..Filter::default()
        };

        assert_eq!(clients(&query.view(&records, &by_text)), vec!["Acme"]);
        assert_eq!(clients(&query.view(&records, &by_status)), vec!["Zen"]);
        assert_eq!(clients(&query.view(&records, &by_recording)), vec!["Acme"]);
        assert_eq!(query.view(&records, &Filter::default()).len(), 2);
    }

    #[test]
    fn text_matches_any_searchable_field() {
        let mut r = record("Client", Status::Intake, true);
        r.project_id = Some("P-042".to_owned());
        r.venue = Some("Grand Ballroom".to_owned());

        let matches = |text: &str| {
            Filter {
                text: text.to_owned(),
                ..Filter::default()
            }
            .matches(&r)
        };

        assert!(matches("p-04"));
        assert!(matches("BALLROOM"));
        assert!(!matches("notes"));
    }

    #[test]
    fn overdue_needs_a_past_due_date_and_undelivered_status() {
        let now = datetime!(2025-03-10 12:00 UTC);
        let mut r = record("x", Status::Review, true);

        assert!(!is_overdue(&r, now));

        r.deliverables_date = Some(date!(2025-03-10));
        assert!(is_overdue(&r, now));

        r.deliverables_date = Some(date!(2025-03-11));
        assert!(!is_overdue(&r, now));

        r.deliverables_date = Some(date!(2025-01-01));
        r.status = Status::Delivered;
        assert!(!is_overdue(&r, now));
    }

    #[test]
    fn upcoming_covers_the_next_seven_days() {
        let now = datetime!(2025-03-10 0:00 UTC);
        let mut r = record("x", Status::Scheduled, true);

        r.event_date = Some(date!(2025-03-10));
        assert!(is_upcoming(&r, now));

        r.event_date = Some(date!(2025-03-17));
        assert!(is_upcoming(&r, now));

        r.event_date = Some(date!(2025-03-18));
        assert!(!is_upcoming(&r, now));

        r.event_date = Some(date!(2025-03-09));
        assert!(!is_upcoming(&r, now));

        r.event_date = Some(date!(2025-03-12));
        r.recording_required = false;
        assert!(!is_upcoming(&r, now));
    }

    #[test]
    fn flags_follow_the_clock() {
        let mut r = record("x", Status::Intake, true);
        r.deliverables_date = Some(date!(2025-03-12));
        let records = vec![r];

        let early = Query::new(fixed_clock(), RmsLinks::default());
        let late = Query::new(Arc::new(|| datetime!(2025-04-01 0:00 UTC)), RmsLinks::default());

        assert!(!early.view(&records, &Filter::default())[0].overdue);
        assert!(late.view(&records, &Filter::default())[0].overdue);
    }

    #[test]
    fn selectors_parse() {
        assert_eq!("All".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!("review".parse::<StatusFilter>().unwrap(), StatusFilter::Only(Status::Review));
        assert_eq!("no".parse::<RecordingFilter>().unwrap(), RecordingFilter::NotRequired);
        assert!("maybe".parse::<RecordingFilter>().is_err());
    }
}

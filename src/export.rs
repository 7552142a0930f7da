//! Flat-file export of the whole collection.
//!
//! Every field is quoted, embedded quotes are doubled and rows are
//! joined with `\n`. Line breaks inside any field become spaces so that
//! each project stays on one line.

use std::fs;
use std::path::Path;

use crate::errors::TrackerError;
use crate::record::ProductionRecord;
use crate::rms::RmsLinks;

/// Name the export is offered under.
pub const EXPORT_FILE_NAME: &str = "headlight_av_projects.csv";

pub const HEADERS: [&str; 19] = [
    "Project ID",
    "Client",
    "Event",
    "Venue",
    "Event Date",
    "Deliverables Date",
    "Priority",
    "Project Lead",
    "Camera Op",
    "Editor",
    "Recording Required",
    "Recording Type",
    "Status",
    "Assigned Tech",
    "File Link",
    "Notes",
    "RMS Type",
    "RMS ID",
    "RMS URL",
];

/// Renders `records` as CSV text, header first.
pub fn to_csv<'a, I>(records: I, links: &RmsLinks) -> String
where I: IntoIterator<Item = &'a ProductionRecord> {
    let header = join(HEADERS.iter().map(|h| h.to_string()));

    std::iter::once(header)
        .chain(records.into_iter().map(|r| join(row(r, links))))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Writes the CSV for `records` to `path`.
pub fn write_csv<'a, I>(path: impl AsRef<Path>, records: I, links: &RmsLinks) -> Result<(), TrackerError>
where I: IntoIterator<Item = &'a ProductionRecord> {
    fs::write(path, to_csv(records, links))?;

    Ok(())
}

/// The cells of one record, in [`HEADERS`] order.
pub fn row(record: &ProductionRecord, links: &RmsLinks) -> Vec<String> {
    fn text(value: &Option<String>) -> String {
        value.clone().unwrap_or_default()
    }

    fn shown<T: ToString>(value: Option<T>) -> String {
        value.map(|v| v.to_string()).unwrap_or_default()
    }

    vec![
        text(&record.project_id),
        text(&record.client_name),
        text(&record.event_name),
        text(&record.venue),
        shown(record.event_date.map(crate::dates::format_date)),
        shown(record.deliverables_date.map(crate::dates::format_date)),
        shown(record.priority),
        text(&record.project_lead),
        text(&record.camera_op),
        text(&record.editor),
        (if record.recording_required { "Yes" } else { "No" }).to_owned(),
        text(&record.recording_type),
        record.status.label().to_owned(),
        text(&record.assigned_tech),
        text(&record.file_link),
        text(&record.notes),
        shown(record.rms_record_type),
        text(&record.rms_id_or_slug),
        links.resolve(record.rms_record_type, record.rms_id_or_slug.as_deref()),
    ]
}

/// Quotes a single field.
///
/// ```
/// use tracker::export::quote;
/// assert_eq!(quote(r#"Ann "AJ" Jones"#), r#""Ann ""AJ"" Jones""#);
/// ```
pub fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn join<I>(fields: I) -> String
where I: IntoIterator<Item = String> {
    fields
        .into_iter()
        .map(|f| quote(&flatten_lines(&f)))
        .collect::<Vec<_>>()
        .join(",")
}

fn flatten_lines(s: &str) -> String {
    s.replace("\r\n", " ").replace(|c: char| c == '\n' || c == '\r', " ")
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use time::macros::date;

    use super::*;
    use crate::record::Priority;
    use crate::rms::RmsRecordType;
    use crate::status::Status;

    #[test]
    fn empty_collection_is_just_the_header() {
        let csv = to_csv(std::iter::empty(), &RmsLinks::default());

        assert_eq!(csv.lines().count(), 1);
        assert!(csv.starts_with("\"Project ID\",\"Client\","));
        assert!(csv.ends_with("\"RMS URL\""));
    }

    #[test]
    fn full_row_in_column_order() {
        let mut record = ProductionRecord::draft_at(0);
        record.project_id = Some("P-001".to_owned());
        record.client_name = Some(r#"Ann "AJ" Jones"#.to_owned());
        record.event_date = Some(date!(2025-09-01));
        record.priority = Some(Priority::High);
        record.status = Status::InEditing;
        record.notes = Some("line one\nline two\r\nline three".to_owned());
        record.rms_record_type = Some(RmsRecordType::Projects);
        record.rms_id_or_slug = Some("881".to_owned());

        let csv = to_csv(vec![&record], &RmsLinks::default());
        let lines: Vec<_> = csv.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1],
            concat!(
                r#""P-001","Ann ""AJ"" Jones","","","2025-09-01","","High","","","","Yes","","In Editing","","","#,
                r#""line one line two line three","projects","881","https://headlight.current-rms.com/projects/881""#
            )
        );
    }

    #[test]
    fn line_breaks_in_any_field_stay_on_one_row() {
        let mut record = ProductionRecord::draft_at(0);
        record.client_name = Some("Acme\nLabs".to_owned());
        record.venue = Some("Hall A\r\nLevel 2".to_owned());
        record.project_lead = Some("Sam\rLee".to_owned());

        let csv = to_csv(vec![&record], &RmsLinks::default());
        let lines: Vec<_> = csv.split('\n').collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with(r#""","Acme Labs","","Hall A Level 2","#));
        assert!(lines[1].contains(r#""Sam Lee""#));
    }

    #[test]
    fn missing_rms_half_leaves_url_blank() {
        let mut record = ProductionRecord::draft_at(0);
        record.rms_id_or_slug = Some("881".to_owned());
        record.recording_required = false;

        let cells = row(&record, &RmsLinks::default());

        assert_eq!(cells.len(), HEADERS.len());
        assert_eq!(cells[10], "No");
        assert_eq!(cells[18], "");
    }

    proptest! {
        #[test]
        fn one_line_per_record(texts in proptest::collection::vec("(.|\r|\n)*", 0..20)) {
            let records: Vec<ProductionRecord> = texts
                .iter()
                .map(|t| {
                    let mut r = ProductionRecord::draft_at(0);
                    r.client_name = Some(t.clone());
                    r.event_name = Some(t.clone());
                    r.venue = Some(t.clone());
                    r.file_link = Some(t.clone());
                    r.rms_record_type = Some(RmsRecordType::Orders);
                    r.rms_id_or_slug = Some(t.clone());
                    r.notes = Some(t.clone());
                    r
                })
                .collect();

            let csv = to_csv(&records, &RmsLinks::default());

            prop_assert_eq!(csv.split('\n').count(), records.len() + 1);
        }

        #[test]
        fn quoting_round_trips_through_unescaping(field in ".*") {
            let quoted = quote(&field);
            let inner = &quoted[1..quoted.len() - 1];

            prop_assert_eq!(inner.replace("\"\"", "\""), field);
        }
    }
}

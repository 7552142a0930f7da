use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::TrackerError;

/// The canonical workflow states of a project, in order.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Status {
    Intake,
    Scheduled,
    Recording,
    Ingested,
    #[serde(rename = "In Editing")]
    InEditing,
    Review,
    Delivered,
    Archived,
}

impl Status {
    /// Every status in workflow order.
    pub const ALL: [Status; 8] = [
        Status::Intake,
        Status::Scheduled,
        Status::Recording,
        Status::Ingested,
        Status::InEditing,
        Status::Review,
        Status::Delivered,
        Status::Archived,
    ];

    /// Returns the display label, which is also the serialized form.
    pub fn label(self) -> &'static str {
        match self {
            Status::Intake => "Intake",
            Status::Scheduled => "Scheduled",
            Status::Recording => "Recording",
            Status::Ingested => "Ingested",
            Status::InEditing => "In Editing",
            Status::Review => "Review",
            Status::Delivered => "Delivered",
            Status::Archived => "Archived",
        }
    }

    /// Returns the following status. `Archived` is terminal and maps
    /// to itself.
    pub fn next(self) -> Status {
        let index = Status::ALL
            .iter()
            .position(|s| *s == self)
            .unwrap_or(Status::ALL.len() - 1);

        Status::ALL[(index + 1).min(Status::ALL.len() - 1)]
    }

    pub fn is_terminal(self) -> bool {
        self == Status::Archived
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::Intake
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Status {
    type Err = TrackerError;

    /// Accepts the display label in any case. Spaces, hyphens and
    /// underscores are interchangeable, so `in-editing` works on a
    /// command line.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = fold(s);

        Status::ALL
            .iter()
            .copied()
            .find(|status| fold(status.label()) == wanted)
            .ok_or_else(|| TrackerError::UnknownStatus(s.to_owned()))
    }
}

fn fold(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| match c {
            '-' | '_' => ' ',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::Status;

    #[test]
    fn advancing_walks_the_workflow_and_stops_at_archived() {
        let mut status = Status::Intake;
        let mut seen = vec![status];

        for _ in 0..7 {
            status = status.next();
            seen.push(status);
        }

        assert_eq!(seen, Status::ALL.to_vec());
        assert_eq!(status, Status::Archived);
        assert_eq!(status.next(), Status::Archived);
        assert!(status.is_terminal());
    }

    #[test]
    fn labels_parse_back() {
        for status in Status::ALL.iter() {
            assert_eq!(status.label().parse::<Status>().unwrap(), *status);
        }

        assert_eq!("in-editing".parse::<Status>().unwrap(), Status::InEditing);
        assert!("Cancelled".parse::<Status>().is_err());
    }

    #[test]
    fn serializes_as_label() {
        let json = serde_json::to_string(&Status::InEditing).unwrap();
        assert_eq!(json, "\"In Editing\"");

        let status: Status = serde_json::from_str("\"Review\"").unwrap();
        assert_eq!(status, Status::Review);
    }
}

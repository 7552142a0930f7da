use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::TrackerError;

/// The RMS instance the team books jobs in.
pub const DEFAULT_BASE_URL: &str = "https://headlight.current-rms.com";

/// The kinds of RMS record a project can point at. Each one is also
/// the path segment of its URL.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RmsRecordType {
    Opportunities,
    Projects,
    Orders,
}

impl RmsRecordType {
    pub const ALL: [RmsRecordType; 3] = [
        RmsRecordType::Opportunities,
        RmsRecordType::Projects,
        RmsRecordType::Orders,
    ];

    pub fn segment(self) -> &'static str {
        match self {
            RmsRecordType::Opportunities => "opportunities",
            RmsRecordType::Projects => "projects",
            RmsRecordType::Orders => "orders",
        }
    }
}

impl fmt::Display for RmsRecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.segment())
    }
}

impl FromStr for RmsRecordType {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RmsRecordType::ALL
            .iter()
            .copied()
            .find(|t| t.segment().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TrackerError::UnknownRecordType(s.to_owned()))
    }
}

/// Builds links into the RMS. The identifier is pasted in verbatim:
/// these are display links, not validated URIs.
#[derive(Clone, Debug)]
pub struct RmsLinks {
    /// Origin of the RMS, without trailing slash.
    base: String,
}

impl RmsLinks {
    pub fn new(base: &Url) -> Self {
        RmsLinks {
            base: base.as_str().trim_end_matches('/').to_owned(),
        }
    }

    /// The RMS landing page.
    pub fn home(&self) -> &str {
        &self.base
    }

    /// Returns `<base>/<type>/<id>`, or an empty string when either the
    /// type or the identifier is missing.
    pub fn resolve(&self, record_type: Option<RmsRecordType>, id: Option<&str>) -> String {
        match (record_type, id) {
            (Some(record_type), Some(id)) if !id.is_empty() => {
                format!("{}/{}/{}", self.base, record_type.segment(), id)
            }
            _ => String::new(),
        }
    }
}

impl Default for RmsLinks {
    fn default() -> Self {
        RmsLinks {
            base: DEFAULT_BASE_URL.to_owned(),
        }
    }
}

/// Resolves against [`DEFAULT_BASE_URL`].
///
/// ```
/// use tracker::rms::{resolve_url, RmsRecordType};
/// assert_eq!(
///     resolve_url(Some(RmsRecordType::Projects), Some("1234")),
///     "https://headlight.current-rms.com/projects/1234"
/// );
/// assert_eq!(resolve_url(None, Some("1234")), "");
/// ```
pub fn resolve_url(record_type: Option<RmsRecordType>, id: Option<&str>) -> String {
    RmsLinks::default().resolve(record_type, id)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use proptest::sample::select;

    use super::*;

    #[test]
    fn missing_halves_give_empty_string() {
        assert_eq!(resolve_url(None, None), "");
        assert_eq!(resolve_url(Some(RmsRecordType::Orders), None), "");
        assert_eq!(resolve_url(Some(RmsRecordType::Orders), Some("")), "");
    }

    #[test]
    fn identifiers_are_not_escaped() {
        assert_eq!(
            resolve_url(Some(RmsRecordType::Opportunities), Some("gala dinner/2024?x")),
            "https://headlight.current-rms.com/opportunities/gala dinner/2024?x"
        );
    }

    #[test]
    fn configured_base_drops_trailing_slash() {
        let links = RmsLinks::new(&Url::parse("https://rms.example.com/").unwrap());

        assert_eq!(links.home(), "https://rms.example.com");
        assert_eq!(links.resolve(Some(RmsRecordType::Projects), Some("7")), "https://rms.example.com/projects/7");
    }

    #[test]
    fn record_types_parse_from_segments() {
        assert_eq!("orders".parse::<RmsRecordType>().unwrap(), RmsRecordType::Orders);
        assert!("invoices".parse::<RmsRecordType>().is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 2000, ..ProptestConfig::default()
        })]

        #[test]
        fn resolution_is_empty_iff_a_half_is_missing(
            record_type in proptest::option::of(select(RmsRecordType::ALL.to_vec())),
            id in proptest::option::of(".{0,16}"),
        ) {
            let url = resolve_url(record_type, id.as_deref());

            match (record_type, id.as_deref()) {
                (Some(t), Some(i)) if !i.is_empty() => {
                    prop_assert_eq!(url, format!("{}/{}/{}", DEFAULT_BASE_URL, t.segment(), i));
                }
                _ => prop_assert!(url.is_empty()),
            }
        }
    }
}

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::errors::TrackerError;
use crate::record::ProductionRecord;

/// The selected members of one checklist. Membership is all that
/// matters, so duplicates collapse and order is not kept.
pub type Checklist = BTreeSet<String>;

pub const USE_OF_FINAL_VIDEO: &[&str] = &[
    "No re-broadcast – archive only",
    "Segmented for social media",
    "Departmental training / multi-link",
    "Embedded on website/platform",
    "Ticketed streaming",
    "Launch date required",
];

pub const DELIVERABLE_FORM: &[&str] = &[
    "ShareFile folder (downloadable)",
    "RAW via card/drive (purchase)",
    "Segmented clips",
    "Full show",
    "Raw footage upload",
    "Audio-only export",
    "Platform upload",
];

pub const CAPTURE_SHOT_PLAN: &[&str] = &[
    "Content recorder (BMVA/PIX)",
    "Podium close-up",
    "Stage wide",
    "Room wide",
    "Multi-cam (2+)",
    "Roving cam",
    "Zoom call in/out",
];

pub const INTEGRATED_CONTENT: &[&str] = &[
    "Presenter PPT",
    "Pre-produced video",
    "Live screen share demo",
    "Sponsor deck",
    "Logo",
    "Title slide",
    "YouTube link (go/slides)",
];

pub const EDIT_SERVICES: &[&str] = &[
    "Single session basic",
    "Raw feed upload",
    "Basic + graphics",
    "Raw series upload",
    "Event series pro",
    "Custom",
];

pub const LAYOUT_FORMAT: &[&str] = &[
    "Auto ATEM (16:9x16:9)",
    "Premium PIP",
    "Closed captions (CC)",
    "Post composite: slides+crop+cam+gfx",
    "Single screen over GFX",
    "Live display program mix",
    "Content-only capture",
    "Fullscreen + PIP",
    "Fullscreen",
];

pub const GEAR_ITEMS: &[&str] = &[
    "PTZs",
    "Panasonic",
    "JVC",
    "Marshalls",
    "Hand held mics",
    "Lavs to board",
    "Lav headset",
    "Portable lav kit",
    "Boom",
    "Choir mic",
    "Boundary mic",
    "OWL",
    "Lekos",
    "Studio light",
    "Panel light",
    "BMVideo Assist",
    "LUMIX",
    "HAN REC",
    "Canon VIXIA",
    "Canon XA",
    "Roland",
    "ATEM",
];

/// Names one of the set-valued fields of a [`ProductionRecord`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ChecklistField {
    UseOfFinalVideo,
    DeliverableForm,
    CapturePlan,
    IntegratedContent,
    EditServices,
    LayoutFormat,
    Gear,
}

impl ChecklistField {
    pub const ALL: [ChecklistField; 7] = [
        ChecklistField::UseOfFinalVideo,
        ChecklistField::DeliverableForm,
        ChecklistField::CapturePlan,
        ChecklistField::IntegratedContent,
        ChecklistField::EditServices,
        ChecklistField::LayoutFormat,
        ChecklistField::Gear,
    ];

    /// The snapshot key of the field, which doubles as its name on the
    /// command line.
    pub fn key(self) -> &'static str {
        match self {
            ChecklistField::UseOfFinalVideo => "useOfFinalVideo",
            ChecklistField::DeliverableForm => "deliverableForm",
            ChecklistField::CapturePlan => "capturePlan",
            ChecklistField::IntegratedContent => "integratedContent",
            ChecklistField::EditServices => "editServices",
            ChecklistField::LayoutFormat => "layoutFormat",
            ChecklistField::Gear => "gear",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ChecklistField::UseOfFinalVideo => "Use of Final Video",
            ChecklistField::DeliverableForm => "Deliverable Form",
            ChecklistField::CapturePlan => "Capture / Shot Plan",
            ChecklistField::IntegratedContent => "Integrated Content",
            ChecklistField::EditServices => "Edit Services",
            ChecklistField::LayoutFormat => "Layout Format",
            ChecklistField::Gear => "Gear",
        }
    }

    /// The fixed list of choices offered for this field.
    pub fn vocabulary(self) -> &'static [&'static str] {
        match self {
            ChecklistField::UseOfFinalVideo => USE_OF_FINAL_VIDEO,
            ChecklistField::DeliverableForm => DELIVERABLE_FORM,
            ChecklistField::CapturePlan => CAPTURE_SHOT_PLAN,
            ChecklistField::IntegratedContent => INTEGRATED_CONTENT,
            ChecklistField::EditServices => EDIT_SERVICES,
            ChecklistField::LayoutFormat => LAYOUT_FORMAT,
            ChecklistField::Gear => GEAR_ITEMS,
        }
    }

    /// Whether `value` is one of the offered choices. Records may still
    /// hold values outside the vocabulary.
    pub fn offers(self, value: &str) -> bool {
        self.vocabulary().contains(&value)
    }

    pub fn get(self, record: &ProductionRecord) -> &Checklist {
        match self {
            ChecklistField::UseOfFinalVideo => &record.use_of_final_video,
            ChecklistField::DeliverableForm => &record.deliverable_form,
            ChecklistField::CapturePlan => &record.capture_plan,
            ChecklistField::IntegratedContent => &record.integrated_content,
            ChecklistField::EditServices => &record.edit_services,
            ChecklistField::LayoutFormat => &record.layout_format,
            ChecklistField::Gear => &record.gear,
        }
    }

    pub fn get_mut(self, record: &mut ProductionRecord) -> &mut Checklist {
        match self {
            ChecklistField::UseOfFinalVideo => &mut record.use_of_final_video,
            ChecklistField::DeliverableForm => &mut record.deliverable_form,
            ChecklistField::CapturePlan => &mut record.capture_plan,
            ChecklistField::IntegratedContent => &mut record.integrated_content,
            ChecklistField::EditServices => &mut record.edit_services,
            ChecklistField::LayoutFormat => &mut record.layout_format,
            ChecklistField::Gear => &mut record.gear,
        }
    }
}

impl fmt::Display for ChecklistField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ChecklistField {
    type Err = TrackerError;

    /// Accepts the snapshot key (`editServices`) or a kebab/snake
    /// spelling of it (`edit-services`, `edit_services`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();

        ChecklistField::ALL
            .iter()
            .copied()
            .find(|field| field.key().to_ascii_lowercase() == wanted)
            .ok_or_else(|| TrackerError::UnknownField(s.to_owned()))
    }
}

/// Flips membership of `value` in the named checklist of `record`,
/// leaving every other field alone. Applying it twice restores the
/// original set.
pub fn toggle(mut record: ProductionRecord, field: ChecklistField, value: &str) -> ProductionRecord {
    toggle_in_place(&mut record, field, value);
    record
}

/// In-place form of [`toggle`]. Returns whether `value` is now selected.
pub fn toggle_in_place(record: &mut ProductionRecord, field: ChecklistField, value: &str) -> bool {
    let set = field.get_mut(record);

    if set.remove(value) {
        false
    } else {
        set.insert(value.to_owned())
    }
}

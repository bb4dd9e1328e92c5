//! Jurisdiction types for multi-level applicability checks
//!
//! Rules are issued in a "Layer Cake":
//! - Federal (baseline): applies nationwide
//! - State: statutory requirements per state
//! - Local: municipal and county ordinances

use serde::{Deserialize, Serialize};

/// US states plus the District of Columbia
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum State {
    AL,
    AK,
    AZ,
    AR,
    CA,
    CO,
    CT,
    DE,
    FL,
    GA,
    HI,
    ID,
    IL,
    IN,
    IA,
    KS,
    KY,
    LA,
    ME,
    MD,
    MA,
    MI,
    MN,
    MS,
    MO,
    MT,
    NE,
    NV,
    NH,
    NJ,
    NM,
    NY,
    NC,
    ND,
    OH,
    OK,
    OR,
    PA,
    RI,
    SC,
    SD,
    TN,
    TX,
    UT,
    VT,
    VA,
    WA,
    WV,
    WI,
    WY,
    DC,
}

const ALL_STATES: [State; 51] = [
    State::AL,
    State::AK,
    State::AZ,
    State::AR,
    State::CA,
    State::CO,
    State::CT,
    State::DE,
    State::FL,
    State::GA,
    State::HI,
    State::ID,
    State::IL,
    State::IN,
    State::IA,
    State::KS,
    State::KY,
    State::LA,
    State::ME,
    State::MD,
    State::MA,
    State::MI,
    State::MN,
    State::MS,
    State::MO,
    State::MT,
    State::NE,
    State::NV,
    State::NH,
    State::NJ,
    State::NM,
    State::NY,
    State::NC,
    State::ND,
    State::OH,
    State::OK,
    State::OR,
    State::PA,
    State::RI,
    State::SC,
    State::SD,
    State::TN,
    State::TX,
    State::UT,
    State::VT,
    State::VA,
    State::WA,
    State::WV,
    State::WI,
    State::WY,
    State::DC,
];

/// Labels used for rules that apply across the whole country
const NATIONAL_LABELS: &[&str] = &["us", "usa", "u.s.", "united states", "federal", "nationwide"];

impl State {
    /// Get the full state name
    pub fn name(&self) -> &'static str {
        match self {
            State::AL => "Alabama",
            State::AK => "Alaska",
            State::AZ => "Arizona",
            State::AR => "Arkansas",
            State::CA => "California",
            State::CO => "Colorado",
            State::CT => "Connecticut",
            State::DE => "Delaware",
            State::FL => "Florida",
            State::GA => "Georgia",
            State::HI => "Hawaii",
            State::ID => "Idaho",
            State::IL => "Illinois",
            State::IN => "Indiana",
            State::IA => "Iowa",
            State::KS => "Kansas",
            State::KY => "Kentucky",
            State::LA => "Louisiana",
            State::ME => "Maine",
            State::MD => "Maryland",
            State::MA => "Massachusetts",
            State::MI => "Michigan",
            State::MN => "Minnesota",
            State::MS => "Mississippi",
            State::MO => "Missouri",
            State::MT => "Montana",
            State::NE => "Nebraska",
            State::NV => "Nevada",
            State::NH => "New Hampshire",
            State::NJ => "New Jersey",
            State::NM => "New Mexico",
            State::NY => "New York",
            State::NC => "North Carolina",
            State::ND => "North Dakota",
            State::OH => "Ohio",
            State::OK => "Oklahoma",
            State::OR => "Oregon",
            State::PA => "Pennsylvania",
            State::RI => "Rhode Island",
            State::SC => "South Carolina",
            State::SD => "South Dakota",
            State::TN => "Tennessee",
            State::TX => "Texas",
            State::UT => "Utah",
            State::VT => "Vermont",
            State::VA => "Virginia",
            State::WA => "Washington",
            State::WV => "West Virginia",
            State::WI => "Wisconsin",
            State::WY => "Wyoming",
            State::DC => "District of Columbia",
        }
    }

    /// Two-letter postal code
    pub fn code(&self) -> String {
        self.to_string()
    }

    /// Parse from state code or name (case-insensitive, whitespace-tolerant)
    pub fn parse_code(s: &str) -> Option<Self> {
        let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ");
        if normalized.is_empty() {
            return None;
        }
        ALL_STATES.iter().copied().find(|state| {
            state.code().eq_ignore_ascii_case(&normalized)
                || state.name().eq_ignore_ascii_case(&normalized)
        })
    }

    pub fn all() -> &'static [State] {
        &ALL_STATES
    }
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// True for labels like "US" or "Federal" that denote national scope
pub fn is_national(label: &str) -> bool {
    let label = label.trim().to_lowercase();
    NATIONAL_LABELS.contains(&label.as_str())
}

/// Compare two state references ("CA", "california", "California").
///
/// Recognized states compare by identity; anything else falls back to a
/// case-insensitive comparison of the trimmed text.
pub fn states_match(a: &str, b: &str) -> bool {
    match (State::parse_code(a), State::parse_code(b)) {
        (Some(x), Some(y)) => x == y,
        (None, None) => {
            let (a, b) = (a.trim(), b.trim());
            !a.is_empty() && a.eq_ignore_ascii_case(b)
        }
        _ => false,
    }
}

/// Resolve a free-form state reference to its display name when recognized
pub fn display_state(s: &str) -> String {
    State::parse_code(s)
        .map(|state| state.name().to_string())
        .unwrap_or_else(|| s.trim().to_string())
}

//! Static search profiles: which place types to ask for and how to rank them.

use serde::Serialize;

const DEFAULT_TYPES: &[&str] = &["event_venue", "night_club"];

const EXPANDED_TYPES: &[&str] = &[
    "event_venue",
    "night_club",
    "bar",
    "concert_hall",
    "performing_arts_theater",
    "amphitheatre",
    "opera_house",
    "stadium",
    "arena",
    "community_center",
    "sports_activity_location",
];

const UNRESTRICTED_TYPES: &[&str] = &[];

/// How the provider orders its results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RankPreference {
    Distance,
    Popularity,
}

impl RankPreference {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Distance => "DISTANCE",
            Self::Popularity => "POPULARITY",
        }
    }
}

/// Named search mode selected by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SearchType {
    /// Music venues and night clubs, nearest first.
    #[default]
    Default,
    /// Any venue that could host a live event, most popular first.
    Expanded,
    /// No type filter, nearest first.
    Unrestricted,
}

/// Place-type filter plus ranking strategy for one search mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchProfile {
    pub included_types: &'static [&'static str],
    pub rank_preference: RankPreference,
}

impl SearchType {
    /// Resolves the search mode to its fixed profile.
    #[must_use]
    pub fn profile(self) -> SearchProfile {
        match self {
            Self::Default => SearchProfile {
                included_types: DEFAULT_TYPES,
                rank_preference: RankPreference::Distance,
            },
            Self::Expanded => SearchProfile {
                included_types: EXPANDED_TYPES,
                rank_preference: RankPreference::Popularity,
            },
            Self::Unrestricted => SearchProfile {
                included_types: UNRESTRICTED_TYPES,
                rank_preference: RankPreference::Distance,
            },
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Default => "DEFAULT",
            Self::Expanded => "EXPANDED",
            Self::Unrestricted => "UNRESTRICTED",
        }
    }

    /// Parses a free-text search mode from a query string or CLI flag.
    ///
    /// `None` (or an empty string) selects [`SearchType::Default`]. Matching is
    /// case-insensitive. Anything that is not `default` or `expanded` falls
    /// through to [`SearchType::Unrestricted`] rather than being rejected.
    #[must_use]
    pub fn from_query(raw: Option<&str>) -> Self {
        let Some(value) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
            return Self::Default;
        };

        if value.eq_ignore_ascii_case("default") {
            Self::Default
        } else if value.eq_ignore_ascii_case("expanded") {
            Self::Expanded
        } else {
            if !value.eq_ignore_ascii_case("unrestricted") {
                tracing::debug!(
                    search_type = value,
                    "unrecognized search type, using UNRESTRICTED"
                );
            }
            Self::Unrestricted
        }
    }
}

impl std::fmt::Display for SearchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

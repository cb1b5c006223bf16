//! Station records and their identity.

use std::fmt::{Display, Formatter, Result as FmtResult};

use {
    serde::{Deserialize, Serialize},
    url::Url,
};

/// Opaque, stable station identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationId(u32);

impl StationId {
    /// Creates a station identity from its raw value.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw identity value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl Display for StationId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "#{}", self.0)
    }
}

/// Coarse region tag used to partition the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StationCategory {
    /// Stations broadcasting from the Kingdom.
    #[default]
    Saudi,
    /// Everything else.
    International,
}

impl StationCategory {
    /// Human readable label, also used as the now-playing subtitle
    /// when a station carries no localized name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Saudi => "Saudi",
            Self::International => "International",
        }
    }
}

/// A live radio station.
///
/// Stations are immutable once constructed; all fields are exposed
/// through getters only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    id: StationId,
    primary_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    secondary_name: Option<String>,
    stream_url: Url,
    icon: String,
    category: StationCategory,
}

impl Station {
    /// Creates a new station record.
    ///
    /// # Arguments
    ///
    /// * `id` - Stable identity of the station.
    /// * `primary_name` - Display name.
    /// * `secondary_name` - Localized display name, if any.
    /// * `stream_url` - Primary live stream address.
    /// * `icon` - Artwork or symbol reference.
    /// * `category` - Region tag.
    #[must_use]
    pub fn new(
        id: StationId,
        primary_name: impl Into<String>,
        secondary_name: Option<String>,
        stream_url: Url,
        icon: impl Into<String>,
        category: StationCategory,
    ) -> Self {
        Self {
            id,
            primary_name: primary_name.into(),
            secondary_name,
            stream_url,
            icon: icon.into(),
            category,
        }
    }

    #[must_use]
    pub const fn id(&self) -> StationId {
        self.id
    }

    #[must_use]
    pub fn primary_name(&self) -> &str {
        &self.primary_name
    }

    #[must_use]
    pub fn secondary_name(&self) -> Option<&str> {
        self.secondary_name.as_deref()
    }

    #[must_use]
    pub const fn stream_url(&self) -> &Url {
        &self.stream_url
    }

    #[must_use]
    pub fn icon(&self) -> &str {
        &self.icon
    }

    #[must_use]
    pub const fn category(&self) -> StationCategory {
        self.category
    }

    /// Case-insensitive match of `query` against either display name.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        self.primary_name.to_lowercase().contains(&needle)
            || self
                .secondary_name
                .as_ref()
                .is_some_and(|name| name.to_lowercase().contains(&needle))
    }
}

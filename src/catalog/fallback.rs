//! Alternate stream addresses consulted when a primary stream fails.

use std::collections::{BTreeMap, HashMap};

use {tracing::warn, url::Url};

use crate::catalog::station::StationId;

/// Built-in alternates, keyed by the identities used in the built-in catalog.
const BUILTIN_FALLBACKS: &[(u32, &str)] = &[
    (
        1,
        "https://mbcfm-riyadh-prod-dub.shahid.net/out/v1/69c8a03f507e422f99cf5c07291c9e3a/index_1.m3u8",
    ),
    (2, "https://alifalifjobs.com/radio/8100/AlifAlifLive.mp3"),
    (4, "https://stream.radiojar.com/0tpy1h0kxtzuv_backup"),
    (
        5,
        "https://stream.live.vc.bbcmedia.co.uk/bbc_world_service_west_africa",
    ),
    (
        9,
        "https://live-hls-audio-aje-ak.getaj.net/VOICE-AJE/index.m3u8",
    ),
];

/// Static mapping from station identity to an alternate stream address.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FallbackTable {
    entries: HashMap<StationId, Url>,
}

impl FallbackTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The alternates shipped with the built-in catalog.
    #[must_use]
    pub fn builtin() -> Self {
        let mut table = Self::new();
        for (id, address) in BUILTIN_FALLBACKS {
            match Url::parse(address) {
                Ok(url) => table.insert(StationId::new(*id), url),
                Err(e) => warn!("FallbackTable: skipping built-in entry {id}: {e}"),
            }
        }
        table
    }

    /// Registers (or replaces) the alternate for a station.
    pub fn insert(&mut self, station: StationId, url: Url) {
        self.entries.insert(station, url);
    }

    /// Overlays `overrides` on top of this table.
    #[must_use]
    pub fn merged_with(mut self, overrides: &BTreeMap<StationId, Url>) -> Self {
        for (id, url) in overrides {
            self.insert(*id, url.clone());
        }
        self
    }

    /// Looks up the alternate address for a station.
    #[must_use]
    pub fn lookup(&self, station: StationId) -> Option<&Url> {
        self.entries.get(&station)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(StationId, Url)> for FallbackTable {
    fn from_iter<I: IntoIterator<Item = (StationId, Url)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use url::Url;

    use crate::catalog::{
        fallback::{BUILTIN_FALLBACKS, FallbackTable},
        station::StationId,
        stations::Catalog,
    };

    #[test]
    fn test_builtin_table_covers_only_catalog_stations() {
        let table = FallbackTable::builtin();
        let catalog = Catalog::builtin();
        assert_eq!(table.len(), BUILTIN_FALLBACKS.len());

        for (id, _) in BUILTIN_FALLBACKS {
            assert!(catalog.get(StationId::new(*id)).is_some());
        }
    }

    #[test]
    fn test_lookup_missing_station() {
        let table = FallbackTable::builtin();
        assert!(table.lookup(StationId::new(13)).is_none());
        assert!(FallbackTable::new().is_empty());
    }

    #[test]
    fn test_overrides_replace_and_extend() {
        let replacement = Url::parse("http://backup.example.com/mbc").unwrap();
        let extra = Url::parse("http://backup.example.com/npr").unwrap();
        let mut overrides = BTreeMap::new();
        overrides.insert(StationId::new(1), replacement.clone());
        overrides.insert(StationId::new(13), extra.clone());

        let table = FallbackTable::builtin().merged_with(&overrides);
        assert_eq!(table.lookup(StationId::new(1)), Some(&replacement));
        assert_eq!(table.lookup(StationId::new(13)), Some(&extra));
        assert_eq!(table.len(), BUILTIN_FALLBACKS.len() + 1);
    }

    #[test]
    fn test_collect_into_table() {
        let url = Url::parse("http://backup.example.com/a").unwrap();
        let table: FallbackTable = vec![(StationId::new(7), url.clone())].into_iter().collect();
        assert_eq!(table.lookup(StationId::new(7)), Some(&url));
    }
}

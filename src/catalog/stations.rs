//! The baked-in station catalog.

use std::collections::HashSet;

use {tracing::warn, url::Url};

use crate::{
    catalog::station::{
        Station,
        StationCategory::{self, International, Saudi},
        StationId,
    },
    error::CatalogError,
};

/// Compile-time description of a built-in station.
struct StationSeed {
    id: u32,
    primary_name: &'static str,
    secondary_name: Option<&'static str>,
    stream_url: &'static str,
    icon: &'static str,
    category: StationCategory,
}

const BUILTIN_STATIONS: &[StationSeed] = &[
    StationSeed {
        id: 1,
        primary_name: "MBC FM",
        secondary_name: Some("إم بي سي إف إم"),
        stream_url: "https://mbcfm-riyadh-prod-dub.shahid.net/out/v1/69c8a03f507e422f99cf5c07291c9e3a/index.m3u8",
        icon: "antenna.radiowaves.left.and.right",
        category: Saudi,
    },
    StationSeed {
        id: 2,
        primary_name: "Alif Alif FM",
        secondary_name: Some("ألف ألف إف إم"),
        stream_url: "https://alifalifjobs.com/radio/8000/AlifAlifLive.mp3",
        icon: "building.columns",
        category: Saudi,
    },
    StationSeed {
        id: 4,
        primary_name: "Makkah Radio",
        secondary_name: Some("إذاعة مكة المكرمة"),
        stream_url: "https://stream.radiojar.com/0tpy1h0kxtzuv",
        icon: "book",
        category: Saudi,
    },
    StationSeed {
        id: 6,
        primary_name: "Riyadh Radio",
        secondary_name: Some("إذاعة الرياض"),
        stream_url: "https://live.kwikmotion.com/sbrksariyadhradiolive/srpksariyadhradio/playlist.m3u8",
        icon: "building.2",
        category: Saudi,
    },
    StationSeed {
        id: 7,
        primary_name: "Jeddah Radio",
        secondary_name: Some("إذاعة جدة"),
        stream_url: "https://live.kwikmotion.com/sbrksajeddahradiolive/srpksajeddahradio/playlist.m3u8",
        icon: "figure.wave",
        category: Saudi,
    },
    StationSeed {
        id: 10,
        primary_name: "Rotana FM",
        secondary_name: Some("روتانا اف ام"),
        stream_url: "http://stream.radiojar.com/zn4z2k7gmk8uv",
        icon: "music.note.radio.fill",
        category: Saudi,
    },
    StationSeed {
        id: 11,
        primary_name: "Quran Radio",
        secondary_name: Some("إذاعة القرآن الكريم"),
        stream_url: "http://live.mp3quran.net:9702/;",
        icon: "book.closed.fill",
        category: Saudi,
    },
    StationSeed {
        id: 12,
        primary_name: "UFM Radio",
        secondary_name: Some("اذاعة يو اف ام"),
        stream_url: "http://radio.ufmsa.com:8000/ufmrec",
        icon: "sportscourt.fill",
        category: Saudi,
    },
    StationSeed {
        id: 5,
        primary_name: "BBC World Service",
        secondary_name: Some("بي بي سي العالمية"),
        stream_url: "https://stream.live.vc.bbcmedia.co.uk/bbc_world_service",
        icon: "globe",
        category: International,
    },
    StationSeed {
        id: 9,
        primary_name: "Al Jazeera English",
        secondary_name: Some("الجزيرة الإنجليزية"),
        stream_url: "https://live-hls-audio-web-aje.getaj.net/VOICE-AJE/index.m3u8",
        icon: "newspaper",
        category: International,
    },
    StationSeed {
        id: 13,
        primary_name: "NPR",
        secondary_name: None,
        stream_url: "https://npr-ice.streamguys1.com/live.mp3",
        icon: "newspaper.fill",
        category: International,
    },
    StationSeed {
        id: 14,
        primary_name: "CNN Radio",
        secondary_name: None,
        stream_url: "http://tunein.streamguys1.com/cnnfree",
        icon: "play.tv.fill",
        category: International,
    },
];

impl StationSeed {
    fn build(&self) -> Result<Station, CatalogError> {
        let id = StationId::new(self.id);
        let stream_url =
            Url::parse(self.stream_url).map_err(|source| CatalogError::InvalidStreamUrl {
                station: id,
                url: self.stream_url.to_string(),
                source,
            })?;

        Ok(Station::new(
            id,
            self.primary_name,
            self.secondary_name.map(str::to_string),
            stream_url,
            self.icon,
            self.category,
        ))
    }
}

/// Ordered, read-only collection of stations.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    stations: Vec<Station>,
}

impl Catalog {
    /// Builds the catalog shipped with the application.
    ///
    /// Entries whose stream address does not parse are skipped and logged.
    #[must_use]
    pub fn builtin() -> Self {
        let stations = BUILTIN_STATIONS
            .iter()
            .filter_map(|seed| match seed.build() {
                Ok(station) => Some(station),
                Err(e) => {
                    warn!("Catalog: skipping built-in station: {e}");
                    None
                }
            })
            .collect();

        Self { stations }
    }

    /// Creates a catalog from an explicit list, preserving its order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateStation` if two stations share an id.
    pub fn from_stations(stations: Vec<Station>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(stations.len());
        for station in &stations {
            if !seen.insert(station.id()) {
                return Err(CatalogError::DuplicateStation(station.id()));
            }
        }

        Ok(Self { stations })
    }

    /// All stations in catalog order.
    #[must_use]
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Looks up a station by identity.
    #[must_use]
    pub fn get(&self, id: StationId) -> Option<&Station> {
        self.stations.iter().find(|station| station.id() == id)
    }

    /// Looks up a station by identity, failing if it is not in the catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::UnknownStation` if no station has this id.
    pub fn require(&self, id: StationId) -> Result<&Station, CatalogError> {
        self.get(id).ok_or(CatalogError::UnknownStation(id))
    }

    /// Stations carrying the given category tag, in catalog order.
    pub fn by_category(&self, category: StationCategory) -> impl Iterator<Item = &Station> {
        self.stations
            .iter()
            .filter(move |station| station.category() == category)
    }

    /// Applies the browse filter used by the station list.
    ///
    /// A non-empty `query` matches either display name case-insensitively and
    /// ignores `category`. An empty query narrows by `category` when one is
    /// selected and otherwise returns the whole catalog.
    #[must_use]
    pub fn filter(&self, query: &str, category: Option<StationCategory>) -> Vec<&Station> {
        let query = query.trim();
        if query.is_empty() {
            return match category {
                Some(category) => self.by_category(category).collect(),
                None => self.stations.iter().collect(),
            };
        }

        self.stations
            .iter()
            .filter(|station| station.matches(query))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use url::Url;

    use crate::{
        catalog::{
            station::{
                Station,
                StationCategory::{International, Saudi},
                StationId,
            },
            stations::{BUILTIN_STATIONS, Catalog},
        },
        error::CatalogError,
    };

    #[test]
    fn test_builtin_catalog_parses_every_seed() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), BUILTIN_STATIONS.len());
        assert!(!catalog.is_empty());
    }

    #[test]
    fn test_builtin_ids_are_unique() {
        let catalog = Catalog::builtin();
        let rebuilt = Catalog::from_stations(catalog.stations().to_vec());
        assert!(rebuilt.is_ok());
    }

    #[test]
    fn test_lookup_by_id() {
        let catalog = Catalog::builtin();
        let station = catalog.get(StationId::new(5)).unwrap();
        assert_eq!(station.primary_name(), "BBC World Service");
        assert_eq!(station.category(), International);

        assert!(catalog.get(StationId::new(3)).is_none());
        assert!(matches!(
            catalog.require(StationId::new(3)),
            Err(CatalogError::UnknownStation(id)) if id == StationId::new(3)
        ));
    }

    #[test]
    fn test_partition_by_category() {
        let catalog = Catalog::builtin();
        let saudi = catalog.by_category(Saudi).count();
        let international = catalog.by_category(International).count();
        assert_eq!(saudi + international, catalog.len());
        assert_eq!(international, 4);
    }

    #[test]
    fn test_filter_empty_query_uses_category() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.filter("", None).len(), catalog.len());
        assert!(
            catalog
                .filter("  ", Some(International))
                .iter()
                .all(|station| station.category() == International)
        );
    }

    #[test]
    fn test_filter_query_ignores_category() {
        let catalog = Catalog::builtin();
        let found = catalog.filter("radio", Some(International));
        let names: Vec<_> = found.iter().map(|station| station.primary_name()).collect();
        assert!(names.contains(&"Makkah Radio"));
        assert!(names.contains(&"CNN Radio"));
    }

    #[test]
    fn test_from_stations_rejects_duplicates() {
        let url = Url::parse("http://example.com/live").unwrap();
        let a = Station::new(StationId::new(1), "A", None, url.clone(), "a", Saudi);
        let b = Station::new(StationId::new(1), "B", None, url, "b", Saudi);

        let result = Catalog::from_stations(vec![a, b]);
        assert!(matches!(
            result,
            Err(CatalogError::DuplicateStation(id)) if id == StationId::new(1)
        ));
    }
}

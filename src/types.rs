//! Value types shared by the geo command builders and reply decoders.
//!
//! Everything here is a short-lived, immutable value constructed per call:
//! nothing persists across invocations or is shared between concurrent
//! callers.

use std::str::FromStr;

use crate::error::{Error, Result};
use crate::normalize::GeoNumber;

/// A longitude/latitude pair as stored in a Redis geospatial index.
///
/// Redis accepts longitudes in [-180, 180] and latitudes in
/// [-85.05112878, 85.05112878] (the Mercator projection limit). Values
/// outside that range are rejected by the server, not pre-validated here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoCoordinate {
    /// Longitude in degrees.
    pub longitude: f64,
    /// Latitude in degrees.
    pub latitude: f64,
}

impl GeoCoordinate {
    /// Create a coordinate from longitude and latitude, in that order
    /// (the order the wire protocol uses).
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }
}

/// Distance unit for geo queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoUnit {
    /// Meters
    Meters,
    /// Kilometers
    Kilometers,
    /// Miles
    Miles,
    /// Feet
    Feet,
}

impl GeoUnit {
    /// Convert to the unit token the wire protocol expects.
    pub fn as_str(&self) -> &'static str {
        match self {
            GeoUnit::Meters => "m",
            GeoUnit::Kilometers => "km",
            GeoUnit::Miles => "mi",
            GeoUnit::Feet => "ft",
        }
    }
}

impl FromStr for GeoUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "m" | "meters" => Ok(GeoUnit::Meters),
            "km" | "kilometers" => Ok(GeoUnit::Kilometers),
            "mi" | "miles" => Ok(GeoUnit::Miles),
            "ft" | "feet" => Ok(GeoUnit::Feet),
            _ => Err(Error::InvalidArgument(format!(
                "Invalid geo unit '{}'. Use: m, km, mi, ft",
                s
            ))),
        }
    }
}

/// Sort order for radius and search queries.
///
/// `None` in an option slot means unordered (the server's default).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoSort {
    /// Sort ascending (nearest first).
    Asc,
    /// Sort descending (farthest first).
    Desc,
}

impl GeoSort {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            GeoSort::Asc => "ASC",
            GeoSort::Desc => "DESC",
        }
    }
}

/// Add-mode modifier for GEOADD.
///
/// A single enum rather than two booleans, so the invalid NX+XX combination
/// cannot be expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddMode {
    /// Add new members and update existing ones (the server default).
    #[default]
    Upsert,
    /// NX: only add new members, never update existing ones.
    OnlyAdd,
    /// XX: only update existing members, never add new ones.
    OnlyUpdate,
}

impl AddMode {
    pub(crate) fn token(&self) -> Option<&'static str> {
        match self {
            AddMode::Upsert => None,
            AddMode::OnlyAdd => Some("NX"),
            AddMode::OnlyUpdate => Some("XX"),
        }
    }
}

/// Where a GEOSEARCH / GEOSEARCHSTORE query starts from.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchFrom {
    /// FROMMEMBER: center on an existing member of the index.
    Member(Vec<u8>),
    /// FROMLONLAT: center on an explicit coordinate.
    Position(GeoCoordinate),
}

impl SearchFrom {
    /// Center the search on an existing member.
    pub fn member(member: impl Into<Vec<u8>>) -> Self {
        SearchFrom::Member(member.into())
    }

    /// Center the search on a longitude/latitude pair.
    pub fn position(longitude: f64, latitude: f64) -> Self {
        SearchFrom::Position(GeoCoordinate::new(longitude, latitude))
    }
}

/// Search area for GEOSEARCH / GEOSEARCHSTORE: a circle or a box.
///
/// Magnitudes are normalized to canonical wire tokens at construction, so
/// building the command later cannot fail on them.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchBy {
    pub(crate) kind: ByKind,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ByKind {
    Radius { radius: String, unit: GeoUnit },
    Box { width: String, height: String, unit: GeoUnit },
}

impl SearchBy {
    /// BYRADIUS: a circular area of the given radius.
    pub fn radius<N: GeoNumber>(radius: N, unit: GeoUnit) -> Result<Self> {
        Ok(Self {
            kind: ByKind::Radius {
                radius: radius.to_token()?,
                unit,
            },
        })
    }

    /// BYBOX: an axis-aligned rectangle of the given width and height.
    pub fn bounding_box<N: GeoNumber>(width: N, height: N, unit: GeoUnit) -> Result<Self> {
        Ok(Self {
            kind: ByKind::Box {
                width: width.to_token()?,
                height: height.to_token()?,
                unit,
            },
        })
    }
}

/// Options controlling which per-member attributes a query reply carries,
/// how many rows come back, and in what order.
///
/// Defaults emit no tokens at all, matching the server's own defaults.
///
/// # Example
/// ```
/// use redis_geo::{GeoSort, SearchOptions};
///
/// let options = SearchOptions::new()
///     .with_dist(true)
///     .with_count(5)
///     .with_any(true)
///     .with_sort(GeoSort::Asc);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchOptions {
    pub(crate) with_coord: bool,
    pub(crate) with_dist: bool,
    pub(crate) with_hash: bool,
    pub(crate) count: Option<u64>,
    pub(crate) any: bool,
    pub(crate) sort: Option<GeoSort>,
}

impl SearchOptions {
    /// Options with every attribute at its server default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request each member's coordinate (WITHCOORD).
    pub fn with_coord(mut self, yes: bool) -> Self {
        self.with_coord = yes;
        self
    }

    /// Request each member's distance from the query center (WITHDIST).
    pub fn with_dist(mut self, yes: bool) -> Self {
        self.with_dist = yes;
        self
    }

    /// Request each member's raw geohash score (WITHHASH).
    pub fn with_hash(mut self, yes: bool) -> Self {
        self.with_hash = yes;
        self
    }

    /// Limit the number of results (COUNT).
    ///
    /// `0` means unbounded and clears the limit; no COUNT token is emitted,
    /// which is what the server expects (`COUNT 0` is a server error).
    pub fn with_count(mut self, count: u64) -> Self {
        self.count = if count == 0 { None } else { Some(count) };
        self
    }

    /// Allow the server to return any `count` matches instead of the
    /// nearest ones (ANY).
    ///
    /// Only meaningful together with a count limit; without one the flag is
    /// silently dropped to match server expectations.
    pub fn with_any(mut self, yes: bool) -> Self {
        self.any = yes;
        self
    }

    /// Sort results by distance (ASC or DESC).
    pub fn with_sort(mut self, sort: GeoSort) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Whether any per-member attribute was requested.
    pub(crate) fn wants_attributes(&self) -> bool {
        self.with_coord || self.with_dist || self.with_hash
    }
}

/// Destination for a store-variant radius query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeoStore {
    /// STORE: write the matching members (with their geohash scores) to a key.
    Members(String),
    /// STOREDIST: write the members with their distances to a key.
    Distances(String),
}

impl GeoStore {
    /// Store matching members under `key`.
    pub fn members(key: impl Into<String>) -> Self {
        GeoStore::Members(key.into())
    }

    /// Store matching members with their distances under `key`.
    pub fn distances(key: impl Into<String>) -> Self {
        GeoStore::Distances(key.into())
    }
}

/// Conversion from the raw member bytes the server returns.
///
/// Member-returning operations are generic over this, so one decoder serves
/// both string and binary member identifiers.
pub trait FromMemberBytes: Sized {
    /// Convert raw member bytes into the caller's member type.
    fn from_member_bytes(bytes: Vec<u8>) -> Result<Self>;
}

impl FromMemberBytes for String {
    fn from_member_bytes(bytes: Vec<u8>) -> Result<Self> {
        String::from_utf8(bytes)
            .map_err(|e| Error::DecodeMismatch(format!("member is not valid UTF-8: {}", e)))
    }
}

impl FromMemberBytes for Vec<u8> {
    fn from_member_bytes(bytes: Vec<u8>) -> Result<Self> {
        Ok(bytes)
    }
}

/// One row of a radius or search reply.
///
/// Each optional field is `Some` if and only if the corresponding `with_*`
/// option was requested.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoMatch<M> {
    /// The member identifier.
    pub member: M,
    /// Distance from the query center, in the query's unit (WITHDIST).
    pub distance: Option<f64>,
    /// The member's coordinate (WITHCOORD).
    pub coordinate: Option<GeoCoordinate>,
    /// The member's raw geohash score (WITHHASH).
    pub hash: Option<u64>,
}

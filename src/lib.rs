//! # redis-geo
//!
//! Typed access to the Redis GEO* command family: command construction and
//! reply decoding over the [`redis`](https://docs.rs/redis) crate's
//! transport.
//!
//! Numeric inputs of any primitive type are normalized to the canonical
//! tokens the wire protocol expects, optional flags are emitted in the exact
//! order each command mandates, and replies — whose shape varies with which
//! flags were set — decode into strongly typed results instead of generic
//! value trees.
//!
//! ## Supported Commands
//!
//! | Command | Operation | Result |
//! |---------|-----------|--------|
//! | GEOADD | [`geo_add`] | added/changed count |
//! | GEODIST | [`geo_dist`] | `Option<f64>` |
//! | GEOHASH | [`geo_hash`] | `Vec<Option<String>>` |
//! | GEOPOS | [`geo_pos`] | `Vec<Option<GeoCoordinate>>` |
//! | GEORADIUS[_RO] | [`geo_radius`], [`geo_radius_ro`], [`geo_radius_store`] | `Vec<GeoMatch>` / count |
//! | GEORADIUSBYMEMBER[_RO] | [`geo_radius_by_member`], [`geo_radius_by_member_ro`], [`geo_radius_by_member_store`] | `Vec<GeoMatch>` / count |
//! | GEOSEARCH | [`geo_search`] | `Vec<GeoMatch>` |
//! | GEOSEARCHSTORE | [`geo_search_store`] | count |
//!
//! Every operation also has an `_async` twin with identical semantics that
//! takes an established [`redis::aio::MultiplexedConnection`] and an
//! optional [`tokio_util::sync::CancellationToken`].
//!
//! ## Quick Start
//!
//! ```no_run
//! use redis_geo::{
//!     geo_add, geo_search, AddMode, GeoMatch, GeoUnit, SearchBy, SearchFrom, SearchOptions,
//! };
//!
//! # fn main() -> redis_geo::Result<()> {
//! let url = "redis://localhost:6379";
//!
//! geo_add(
//!     url,
//!     "Sicily",
//!     &[
//!         ("Palermo", 13.361389, 38.115556),
//!         ("Catania", 15.087269, 37.502669),
//!     ],
//!     AddMode::Upsert,
//!     false,
//! )?;
//!
//! let nearby: Vec<GeoMatch<String>> = geo_search(
//!     url,
//!     "Sicily",
//!     &SearchFrom::position(15.0, 37.0),
//!     &SearchBy::radius(200.0, GeoUnit::Kilometers)?,
//!     &SearchOptions::new().with_coord(true).with_dist(true),
//! )?;
//!
//! for m in nearby {
//!     println!("{} at {:?}, {:?} km away", m.member, m.coordinate, m.distance);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Absent Values
//!
//! Unknown keys and members decode to explicit absent values (`None`, empty
//! vectors), never to errors. A reply whose shape disagrees with the options
//! that built the command fails fast with [`Error::DecodeMismatch`].

// Module organization:
// - normalize/command : numeric normalization and token-sequence building
// - reply             : reply shapes and decoding
// - transport         : packed command send + cancellation
// - geo               : public sync/async operations
// - (top-level)       : shared infrastructure (connection, error, types)

mod command;
mod connection;
mod error;
pub mod geo;
mod normalize;
mod reply;
mod transport;
pub mod types;

// Connection
pub use connection::RedisConnection;

// Error handling
pub use error::{Error, Result};

// Geo operations
pub use geo::{
    geo_add, geo_add_async, geo_dist, geo_dist_async, geo_hash, geo_hash_async, geo_pos,
    geo_pos_async, geo_radius, geo_radius_async, geo_radius_by_member,
    geo_radius_by_member_async, geo_radius_by_member_ro, geo_radius_by_member_ro_async,
    geo_radius_by_member_store, geo_radius_by_member_store_async, geo_radius_ro,
    geo_radius_ro_async, geo_radius_store, geo_radius_store_async, geo_search, geo_search_async,
    geo_search_store, geo_search_store_async,
};

// Numeric normalization
pub use normalize::GeoNumber;

// Value types
pub use types::{
    AddMode, FromMemberBytes, GeoCoordinate, GeoMatch, GeoSort, GeoStore, GeoUnit, SearchBy,
    SearchFrom, SearchOptions,
};

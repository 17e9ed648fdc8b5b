//! Typed operations for the Redis GEO* command family.
//!
//! Every operation exists in a blocking form (taking a connection URL, the
//! way the rest of this crate's API works) and an `_async` twin taking an
//! established connection plus an optional cancellation token. Both forms
//! share the same validation, command construction, and reply decoding; the
//! only difference is how control returns while awaiting the server.
//!
//! # Add Locations
//!
//! ```ignore
//! use redis_geo::{geo_add, AddMode};
//!
//! let added = geo_add(
//!     "redis://localhost:6379",
//!     "places",
//!     &[("office", -122.4, 37.7), ("cafe", -122.5, 37.8)],
//!     AddMode::Upsert,
//!     false,
//! )?;
//! ```
//!
//! # Search Around a Point
//!
//! ```ignore
//! use redis_geo::{geo_search, GeoMatch, GeoUnit, SearchBy, SearchFrom, SearchOptions};
//!
//! let nearby: Vec<GeoMatch<String>> = geo_search(
//!     "redis://localhost:6379",
//!     "places",
//!     &SearchFrom::position(-122.4, 37.7),
//!     &SearchBy::radius(10.0, GeoUnit::Kilometers)?,
//!     &SearchOptions::new().with_coord(true).with_dist(true),
//! )?;
//! ```
//!
//! # Distance Between Members
//!
//! ```ignore
//! use redis_geo::{geo_dist, GeoUnit};
//!
//! let distance = geo_dist(
//!     "redis://localhost:6379",
//!     "places",
//!     "office",
//!     "cafe",
//!     Some(GeoUnit::Kilometers),
//! )?;
//! // None if either member doesn't exist.
//! ```

use redis::aio::MultiplexedConnection;
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

use crate::command;
use crate::connection::RedisConnection;
use crate::error::{Error, Result};
use crate::normalize::GeoNumber;
use crate::reply::{self, ReplyShape};
use crate::transport;
use crate::types::{
    AddMode, FromMemberBytes, GeoCoordinate, GeoMatch, GeoStore, GeoUnit, SearchBy, SearchFrom,
    SearchOptions,
};

fn new_runtime() -> Result<Runtime> {
    Runtime::new().map_err(|e| Error::Runtime(format!("Failed to create runtime: {}", e)))
}

/// Add members to a geospatial index.
///
/// # Arguments
/// * `url` - Redis connection URL
/// * `key` - Key holding the geospatial index
/// * `entries` - (member, longitude, latitude) tuples
/// * `mode` - Add new, update existing, or both
/// * `report_changed` - Emit CH so the reply counts changed members instead
///   of only added ones
///
/// # Returns
/// The number of members added (or changed, with `report_changed`).
pub fn geo_add<M, N>(
    url: &str,
    key: &str,
    entries: &[(M, N, N)],
    mode: AddMode,
    report_changed: bool,
) -> Result<u64>
where
    M: AsRef<[u8]>,
    N: GeoNumber,
{
    let runtime = new_runtime()?;
    let connection = RedisConnection::new(url)?;

    runtime.block_on(async {
        let mut conn = connection.get_async_connection().await?;
        geo_add_async(&mut conn, key, entries, mode, report_changed, None).await
    })
}

/// Async form of [`geo_add`].
pub async fn geo_add_async<M, N>(
    conn: &mut MultiplexedConnection,
    key: &str,
    entries: &[(M, N, N)],
    mode: AddMode,
    report_changed: bool,
    cancel: Option<&CancellationToken>,
) -> Result<u64>
where
    M: AsRef<[u8]>,
    N: GeoNumber,
{
    if entries.is_empty() {
        return Ok(0);
    }
    let tokens = command::geo_add(key, entries, mode, report_changed)?;
    let value = transport::send(conn, tokens, cancel).await?;
    reply::decode_count(value)
}

/// Get the distance between two members.
///
/// # Arguments
/// * `unit` - Distance unit; `None` leaves the unit token out and the
///   server reports meters
///
/// # Returns
/// The distance, or `None` if either member doesn't exist.
pub fn geo_dist<M: AsRef<[u8]>>(
    url: &str,
    key: &str,
    member1: M,
    member2: M,
    unit: Option<GeoUnit>,
) -> Result<Option<f64>> {
    let runtime = new_runtime()?;
    let connection = RedisConnection::new(url)?;

    runtime.block_on(async {
        let mut conn = connection.get_async_connection().await?;
        geo_dist_async(&mut conn, key, member1, member2, unit, None).await
    })
}

/// Async form of [`geo_dist`].
pub async fn geo_dist_async<M: AsRef<[u8]>>(
    conn: &mut MultiplexedConnection,
    key: &str,
    member1: M,
    member2: M,
    unit: Option<GeoUnit>,
    cancel: Option<&CancellationToken>,
) -> Result<Option<f64>> {
    let tokens = command::geo_dist(key, member1, member2, unit);
    let value = transport::send(conn, tokens, cancel).await?;
    reply::decode_distance(value)
}

/// Get the geohash strings of members.
///
/// # Returns
/// One entry per requested member, `None` where the member doesn't exist.
pub fn geo_hash<M: AsRef<[u8]>>(
    url: &str,
    key: &str,
    members: &[M],
) -> Result<Vec<Option<String>>> {
    let runtime = new_runtime()?;
    let connection = RedisConnection::new(url)?;

    runtime.block_on(async {
        let mut conn = connection.get_async_connection().await?;
        geo_hash_async(&mut conn, key, members, None).await
    })
}

/// Async form of [`geo_hash`].
pub async fn geo_hash_async<M: AsRef<[u8]>>(
    conn: &mut MultiplexedConnection,
    key: &str,
    members: &[M],
    cancel: Option<&CancellationToken>,
) -> Result<Vec<Option<String>>> {
    if members.is_empty() {
        return Ok(Vec::new());
    }
    let tokens = command::geo_hash(key, members);
    let value = transport::send(conn, tokens, cancel).await?;
    reply::decode_hashes(value)
}

/// Get the positions of members.
///
/// # Returns
/// One entry per requested member, `None` where the member doesn't exist.
pub fn geo_pos<M: AsRef<[u8]>>(
    url: &str,
    key: &str,
    members: &[M],
) -> Result<Vec<Option<GeoCoordinate>>> {
    let runtime = new_runtime()?;
    let connection = RedisConnection::new(url)?;

    runtime.block_on(async {
        let mut conn = connection.get_async_connection().await?;
        geo_pos_async(&mut conn, key, members, None).await
    })
}

/// Async form of [`geo_pos`].
pub async fn geo_pos_async<M: AsRef<[u8]>>(
    conn: &mut MultiplexedConnection,
    key: &str,
    members: &[M],
    cancel: Option<&CancellationToken>,
) -> Result<Vec<Option<GeoCoordinate>>> {
    if members.is_empty() {
        return Ok(Vec::new());
    }
    let tokens = command::geo_pos(key, members);
    let value = transport::send(conn, tokens, cancel).await?;
    reply::decode_positions(value)
}

/// Query members within a radius of a coordinate (GEORADIUS).
///
/// # Arguments
/// * `options` - Attribute, count and ordering options; each reply row
///   carries exactly the attributes requested here
pub fn geo_radius<M, N>(
    url: &str,
    key: &str,
    longitude: N,
    latitude: N,
    radius: N,
    unit: GeoUnit,
    options: &SearchOptions,
) -> Result<Vec<GeoMatch<M>>>
where
    M: FromMemberBytes,
    N: GeoNumber,
{
    let runtime = new_runtime()?;
    let connection = RedisConnection::new(url)?;

    runtime.block_on(async {
        let mut conn = connection.get_async_connection().await?;
        geo_radius_async(&mut conn, key, longitude, latitude, radius, unit, options, None).await
    })
}

/// Async form of [`geo_radius`].
#[allow(clippy::too_many_arguments)]
pub async fn geo_radius_async<M, N>(
    conn: &mut MultiplexedConnection,
    key: &str,
    longitude: N,
    latitude: N,
    radius: N,
    unit: GeoUnit,
    options: &SearchOptions,
    cancel: Option<&CancellationToken>,
) -> Result<Vec<GeoMatch<M>>>
where
    M: FromMemberBytes,
    N: GeoNumber,
{
    let shape = ReplyShape::of(options);
    let tokens = command::geo_radius(key, longitude, latitude, radius, unit, options, None, false)?;
    let value = transport::send(conn, tokens, cancel).await?;
    reply::decode_matches(shape, value)
}

/// Read-only form of [`geo_radius`] (GEORADIUS_RO), usable on replicas.
pub fn geo_radius_ro<M, N>(
    url: &str,
    key: &str,
    longitude: N,
    latitude: N,
    radius: N,
    unit: GeoUnit,
    options: &SearchOptions,
) -> Result<Vec<GeoMatch<M>>>
where
    M: FromMemberBytes,
    N: GeoNumber,
{
    let runtime = new_runtime()?;
    let connection = RedisConnection::new(url)?;

    runtime.block_on(async {
        let mut conn = connection.get_async_connection().await?;
        geo_radius_ro_async(&mut conn, key, longitude, latitude, radius, unit, options, None)
            .await
    })
}

/// Async form of [`geo_radius_ro`].
#[allow(clippy::too_many_arguments)]
pub async fn geo_radius_ro_async<M, N>(
    conn: &mut MultiplexedConnection,
    key: &str,
    longitude: N,
    latitude: N,
    radius: N,
    unit: GeoUnit,
    options: &SearchOptions,
    cancel: Option<&CancellationToken>,
) -> Result<Vec<GeoMatch<M>>>
where
    M: FromMemberBytes,
    N: GeoNumber,
{
    let shape = ReplyShape::of(options);
    let tokens = command::geo_radius(key, longitude, latitude, radius, unit, options, None, true)?;
    let value = transport::send(conn, tokens, cancel).await?;
    reply::decode_matches(shape, value)
}

/// Radius query that stores its result in another key instead of returning
/// rows (GEORADIUS with STORE or STOREDIST).
///
/// Attribute options are rejected with
/// [`Error::UnsupportedOption`](crate::Error::UnsupportedOption): the server
/// cannot combine STORE with WITHCOORD/WITHDIST/WITHHASH.
///
/// # Returns
/// The number of members written to the destination key.
#[allow(clippy::too_many_arguments)]
pub fn geo_radius_store<N: GeoNumber>(
    url: &str,
    key: &str,
    longitude: N,
    latitude: N,
    radius: N,
    unit: GeoUnit,
    options: &SearchOptions,
    store: &GeoStore,
) -> Result<u64> {
    let runtime = new_runtime()?;
    let connection = RedisConnection::new(url)?;

    runtime.block_on(async {
        let mut conn = connection.get_async_connection().await?;
        geo_radius_store_async(
            &mut conn, key, longitude, latitude, radius, unit, options, store, None,
        )
        .await
    })
}

/// Async form of [`geo_radius_store`].
#[allow(clippy::too_many_arguments)]
pub async fn geo_radius_store_async<N: GeoNumber>(
    conn: &mut MultiplexedConnection,
    key: &str,
    longitude: N,
    latitude: N,
    radius: N,
    unit: GeoUnit,
    options: &SearchOptions,
    store: &GeoStore,
    cancel: Option<&CancellationToken>,
) -> Result<u64> {
    let tokens = command::geo_radius(
        key,
        longitude,
        latitude,
        radius,
        unit,
        options,
        Some(store),
        false,
    )?;
    let value = transport::send(conn, tokens, cancel).await?;
    reply::decode_count(value)
}

/// Query members within a radius of another member (GEORADIUSBYMEMBER).
pub fn geo_radius_by_member<M, R, N>(
    url: &str,
    key: &str,
    member: R,
    radius: N,
    unit: GeoUnit,
    options: &SearchOptions,
) -> Result<Vec<GeoMatch<M>>>
where
    M: FromMemberBytes,
    R: AsRef<[u8]>,
    N: GeoNumber,
{
    let runtime = new_runtime()?;
    let connection = RedisConnection::new(url)?;

    runtime.block_on(async {
        let mut conn = connection.get_async_connection().await?;
        geo_radius_by_member_async(&mut conn, key, member, radius, unit, options, None).await
    })
}

/// Async form of [`geo_radius_by_member`].
pub async fn geo_radius_by_member_async<M, R, N>(
    conn: &mut MultiplexedConnection,
    key: &str,
    member: R,
    radius: N,
    unit: GeoUnit,
    options: &SearchOptions,
    cancel: Option<&CancellationToken>,
) -> Result<Vec<GeoMatch<M>>>
where
    M: FromMemberBytes,
    R: AsRef<[u8]>,
    N: GeoNumber,
{
    let shape = ReplyShape::of(options);
    let tokens = command::geo_radius_by_member(key, member, radius, unit, options, None, false)?;
    let value = transport::send(conn, tokens, cancel).await?;
    reply::decode_matches(shape, value)
}

/// Read-only form of [`geo_radius_by_member`] (GEORADIUSBYMEMBER_RO).
pub fn geo_radius_by_member_ro<M, R, N>(
    url: &str,
    key: &str,
    member: R,
    radius: N,
    unit: GeoUnit,
    options: &SearchOptions,
) -> Result<Vec<GeoMatch<M>>>
where
    M: FromMemberBytes,
    R: AsRef<[u8]>,
    N: GeoNumber,
{
    let runtime = new_runtime()?;
    let connection = RedisConnection::new(url)?;

    runtime.block_on(async {
        let mut conn = connection.get_async_connection().await?;
        geo_radius_by_member_ro_async(&mut conn, key, member, radius, unit, options, None).await
    })
}

/// Async form of [`geo_radius_by_member_ro`].
pub async fn geo_radius_by_member_ro_async<M, R, N>(
    conn: &mut MultiplexedConnection,
    key: &str,
    member: R,
    radius: N,
    unit: GeoUnit,
    options: &SearchOptions,
    cancel: Option<&CancellationToken>,
) -> Result<Vec<GeoMatch<M>>>
where
    M: FromMemberBytes,
    R: AsRef<[u8]>,
    N: GeoNumber,
{
    let shape = ReplyShape::of(options);
    let tokens = command::geo_radius_by_member(key, member, radius, unit, options, None, true)?;
    let value = transport::send(conn, tokens, cancel).await?;
    reply::decode_matches(shape, value)
}

/// By-member radius query that stores its result in another key
/// (GEORADIUSBYMEMBER with STORE or STOREDIST).
///
/// # Returns
/// The number of members written to the destination key.
pub fn geo_radius_by_member_store<R, N>(
    url: &str,
    key: &str,
    member: R,
    radius: N,
    unit: GeoUnit,
    options: &SearchOptions,
    store: &GeoStore,
) -> Result<u64>
where
    R: AsRef<[u8]>,
    N: GeoNumber,
{
    let runtime = new_runtime()?;
    let connection = RedisConnection::new(url)?;

    runtime.block_on(async {
        let mut conn = connection.get_async_connection().await?;
        geo_radius_by_member_store_async(&mut conn, key, member, radius, unit, options, store, None)
            .await
    })
}

/// Async form of [`geo_radius_by_member_store`].
#[allow(clippy::too_many_arguments)]
pub async fn geo_radius_by_member_store_async<R, N>(
    conn: &mut MultiplexedConnection,
    key: &str,
    member: R,
    radius: N,
    unit: GeoUnit,
    options: &SearchOptions,
    store: &GeoStore,
    cancel: Option<&CancellationToken>,
) -> Result<u64>
where
    R: AsRef<[u8]>,
    N: GeoNumber,
{
    let tokens =
        command::geo_radius_by_member(key, member, radius, unit, options, Some(store), false)?;
    let value = transport::send(conn, tokens, cancel).await?;
    reply::decode_count(value)
}

/// Search a geospatial index within a circle or box (GEOSEARCH).
///
/// # Arguments
/// * `from` - Search center: an existing member or an explicit coordinate
/// * `by` - Search area: circle (BYRADIUS) or box (BYBOX)
pub fn geo_search<M: FromMemberBytes>(
    url: &str,
    key: &str,
    from: &SearchFrom,
    by: &SearchBy,
    options: &SearchOptions,
) -> Result<Vec<GeoMatch<M>>> {
    let runtime = new_runtime()?;
    let connection = RedisConnection::new(url)?;

    runtime.block_on(async {
        let mut conn = connection.get_async_connection().await?;
        geo_search_async(&mut conn, key, from, by, options, None).await
    })
}

/// Async form of [`geo_search`].
pub async fn geo_search_async<M: FromMemberBytes>(
    conn: &mut MultiplexedConnection,
    key: &str,
    from: &SearchFrom,
    by: &SearchBy,
    options: &SearchOptions,
    cancel: Option<&CancellationToken>,
) -> Result<Vec<GeoMatch<M>>> {
    let shape = ReplyShape::of(options);
    let tokens = command::geo_search(key, from, by, options)?;
    let value = transport::send(conn, tokens, cancel).await?;
    reply::decode_matches(shape, value)
}

/// Search a geospatial index and store the result in another key
/// (GEOSEARCHSTORE).
///
/// # Arguments
/// * `store_dist` - Emit STOREDIST so the destination holds distances
///   instead of geohash scores
///
/// # Returns
/// The number of members written to the destination key.
pub fn geo_search_store(
    url: &str,
    destination: &str,
    source: &str,
    from: &SearchFrom,
    by: &SearchBy,
    options: &SearchOptions,
    store_dist: bool,
) -> Result<u64> {
    let runtime = new_runtime()?;
    let connection = RedisConnection::new(url)?;

    runtime.block_on(async {
        let mut conn = connection.get_async_connection().await?;
        geo_search_store_async(&mut conn, destination, source, from, by, options, store_dist, None)
            .await
    })
}

/// Async form of [`geo_search_store`].
#[allow(clippy::too_many_arguments)]
pub async fn geo_search_store_async(
    conn: &mut MultiplexedConnection,
    destination: &str,
    source: &str,
    from: &SearchFrom,
    by: &SearchBy,
    options: &SearchOptions,
    store_dist: bool,
    cancel: Option<&CancellationToken>,
) -> Result<u64> {
    let tokens = command::geo_search_store(destination, source, from, by, options, store_dist)?;
    let value = transport::send(conn, tokens, cancel).await?;
    reply::decode_count(value)
}

//! Reply shapes and decoding over the generic `redis::Value` tree.
//!
//! The shape of a radius/search reply depends on which `with_*` options
//! shaped the command. [`ReplyShape`] captures that decision once, before
//! the request is sent, and the decoder walks the reply against it. A reply
//! that disagrees with the shape fails fast with
//! [`Error::DecodeMismatch`](crate::Error::DecodeMismatch) rather than being
//! truncated or padded.
//!
//! Absent entities (missing key, unknown member) decode to explicit `None`
//! or empty values, never to errors.

use redis::Value;

use crate::error::{Error, Result};
use crate::types::{FromMemberBytes, GeoCoordinate, GeoMatch, SearchOptions};

/// Which optional attributes each reply row carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReplyShape {
    /// Rows are bare member identifiers.
    Members,
    /// Rows are `[member, distance?, coordinate?, hash?]`, the requested
    /// fields always in that order regardless of how the caller set the
    /// flags, because that is the order the server emits them.
    Composite { dist: bool, coord: bool, hash: bool },
}

impl ReplyShape {
    /// Compute the expected shape from the options that shaped the command.
    pub(crate) fn of(options: &SearchOptions) -> Self {
        if options.wants_attributes() {
            ReplyShape::Composite {
                dist: options.with_dist,
                coord: options.with_coord,
                hash: options.with_hash,
            }
        } else {
            ReplyShape::Members
        }
    }

    fn row_len(&self) -> usize {
        match self {
            ReplyShape::Members => 1,
            ReplyShape::Composite { dist, coord, hash } => {
                1 + usize::from(*dist) + usize::from(*coord) + usize::from(*hash)
            },
        }
    }
}

/// Decode a radius/search reply into typed rows.
pub(crate) fn decode_matches<M: FromMemberBytes>(
    shape: ReplyShape,
    reply: Value,
) -> Result<Vec<GeoMatch<M>>> {
    let rows = match reply {
        Value::Nil => return Ok(Vec::new()),
        Value::Array(rows) => rows,
        other => return Err(mismatch("array of matches", &other)),
    };
    rows.into_iter()
        .map(|row| decode_row(shape, row))
        .collect()
}

fn decode_row<M: FromMemberBytes>(shape: ReplyShape, row: Value) -> Result<GeoMatch<M>> {
    match shape {
        ReplyShape::Members => Ok(GeoMatch {
            member: M::from_member_bytes(member_bytes(row)?)?,
            distance: None,
            coordinate: None,
            hash: None,
        }),
        ReplyShape::Composite { dist, coord, hash } => {
            let parts = match row {
                Value::Array(parts) => parts,
                other => return Err(mismatch("array row", &other)),
            };
            if parts.len() != shape.row_len() {
                return Err(Error::DecodeMismatch(format!(
                    "expected {} elements per row, server sent {}",
                    shape.row_len(),
                    parts.len()
                )));
            }
            let mut parts = parts.into_iter();
            let member = M::from_member_bytes(member_bytes(next_part(&mut parts)?)?)?;
            let distance = if dist {
                Some(parse_float(next_part(&mut parts)?)?)
            } else {
                None
            };
            let coordinate = if coord {
                Some(parse_coordinate(next_part(&mut parts)?)?)
            } else {
                None
            };
            let hash = if hash {
                Some(parse_hash(next_part(&mut parts)?)?)
            } else {
                None
            };
            Ok(GeoMatch {
                member,
                distance,
                coordinate,
                hash,
            })
        },
    }
}

/// Decode a GEOPOS reply: one nullable coordinate per requested member.
pub(crate) fn decode_positions(reply: Value) -> Result<Vec<Option<GeoCoordinate>>> {
    let items = match reply {
        Value::Nil => return Ok(Vec::new()),
        Value::Array(items) => items,
        other => return Err(mismatch("array of positions", &other)),
    };
    items
        .into_iter()
        .map(|item| match item {
            Value::Nil => Ok(None),
            item => parse_coordinate(item).map(Some),
        })
        .collect()
}

/// Decode a GEOHASH reply: one nullable geohash string per requested member.
pub(crate) fn decode_hashes(reply: Value) -> Result<Vec<Option<String>>> {
    let items = match reply {
        Value::Nil => return Ok(Vec::new()),
        Value::Array(items) => items,
        other => return Err(mismatch("array of geohashes", &other)),
    };
    items
        .into_iter()
        .map(|item| match item {
            Value::Nil => Ok(None),
            item => {
                let bytes = member_bytes(item)?;
                String::from_utf8(bytes)
                    .map(Some)
                    .map_err(|e| Error::DecodeMismatch(format!("geohash is not UTF-8: {}", e)))
            },
        })
        .collect()
}

/// Decode a GEODIST reply: the distance, or `None` if either member is
/// absent.
pub(crate) fn decode_distance(reply: Value) -> Result<Option<f64>> {
    match reply {
        Value::Nil => Ok(None),
        reply => parse_float(reply).map(Some),
    }
}

/// Decode an integer reply (GEOADD, store variants).
pub(crate) fn decode_count(reply: Value) -> Result<u64> {
    match reply {
        Value::Int(n) => u64::try_from(n)
            .map_err(|_| Error::DecodeMismatch(format!("negative count {}", n))),
        other => Err(mismatch("integer count", &other)),
    }
}

fn next_part(parts: &mut std::vec::IntoIter<Value>) -> Result<Value> {
    parts
        .next()
        .ok_or_else(|| Error::DecodeMismatch("reply row ended early".to_string()))
}

fn member_bytes(value: Value) -> Result<Vec<u8>> {
    match value {
        Value::BulkString(bytes) => Ok(bytes),
        Value::SimpleString(s) => Ok(s.into_bytes()),
        other => Err(mismatch("member bytes", &other)),
    }
}

fn parse_float(value: Value) -> Result<f64> {
    match value {
        Value::BulkString(bytes) => {
            let s = String::from_utf8_lossy(&bytes);
            s.parse()
                .map_err(|_| Error::DecodeMismatch(format!("'{}' is not a number", s)))
        },
        Value::Double(d) => Ok(d),
        other => Err(mismatch("numeric string", &other)),
    }
}

fn parse_coordinate(value: Value) -> Result<GeoCoordinate> {
    match value {
        Value::Array(coords) if coords.len() == 2 => {
            let mut coords = coords.into_iter();
            let longitude = parse_float(next_part(&mut coords)?)?;
            let latitude = parse_float(next_part(&mut coords)?)?;
            Ok(GeoCoordinate::new(longitude, latitude))
        },
        other => Err(mismatch("2-element coordinate array", &other)),
    }
}

fn parse_hash(value: Value) -> Result<u64> {
    match value {
        Value::Int(n) => {
            u64::try_from(n).map_err(|_| Error::DecodeMismatch(format!("negative hash {}", n)))
        },
        Value::BulkString(bytes) => {
            let s = String::from_utf8_lossy(&bytes);
            s.parse()
                .map_err(|_| Error::DecodeMismatch(format!("'{}' is not a geohash score", s)))
        },
        other => Err(mismatch("geohash score", &other)),
    }
}

fn mismatch(expected: &str, got: &Value) -> Error {
    Error::DecodeMismatch(format!("expected {}, server sent {}", expected, kind_of(got)))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Nil => "nil",
        Value::Int(_) => "integer",
        Value::BulkString(_) => "bulk string",
        Value::SimpleString(_) => "simple string",
        Value::Array(_) => "array",
        Value::Double(_) => "double",
        _ => "other",
    }
}

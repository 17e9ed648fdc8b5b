//! Token-sequence builders for the GEO* command family.
//!
//! Each builder returns the ordered argument list the wire protocol
//! mandates, as raw byte tokens ready for the transport. Options left at
//! their default contribute no tokens, mirroring server-side defaults.
//! Combinations the server would reject are refused here with
//! [`Error::UnsupportedOption`] instead of a round trip.

use crate::error::{Error, Result};
use crate::normalize::GeoNumber;
use crate::types::{AddMode, ByKind, GeoStore, GeoUnit, SearchBy, SearchFrom, SearchOptions};

/// Ordered wire tokens for a single command.
pub(crate) type Tokens = Vec<Vec<u8>>;

fn push(tokens: &mut Tokens, token: impl AsRef<[u8]>) {
    tokens.push(token.as_ref().to_vec());
}

/// GEOADD key [NX|XX] [CH] longitude latitude member [...]
pub(crate) fn geo_add<M, N>(
    key: &str,
    entries: &[(M, N, N)],
    mode: AddMode,
    report_changed: bool,
) -> Result<Tokens>
where
    M: AsRef<[u8]>,
    N: GeoNumber,
{
    let mut tokens = Tokens::new();
    push(&mut tokens, "GEOADD");
    push(&mut tokens, key);
    if let Some(mode_token) = mode.token() {
        push(&mut tokens, mode_token);
    }
    if report_changed {
        push(&mut tokens, "CH");
    }
    for (member, longitude, latitude) in entries {
        push(&mut tokens, longitude.to_token()?);
        push(&mut tokens, latitude.to_token()?);
        push(&mut tokens, member);
    }
    Ok(tokens)
}

/// GEODIST key member1 member2 [unit]
pub(crate) fn geo_dist<M: AsRef<[u8]>>(
    key: &str,
    member1: M,
    member2: M,
    unit: Option<GeoUnit>,
) -> Tokens {
    let mut tokens = Tokens::new();
    push(&mut tokens, "GEODIST");
    push(&mut tokens, key);
    push(&mut tokens, member1);
    push(&mut tokens, member2);
    if let Some(unit) = unit {
        push(&mut tokens, unit.as_str());
    }
    tokens
}

/// GEOHASH key member [...]
pub(crate) fn geo_hash<M: AsRef<[u8]>>(key: &str, members: &[M]) -> Tokens {
    members_command("GEOHASH", key, members)
}

/// GEOPOS key member [...]
pub(crate) fn geo_pos<M: AsRef<[u8]>>(key: &str, members: &[M]) -> Tokens {
    members_command("GEOPOS", key, members)
}

fn members_command<M: AsRef<[u8]>>(name: &str, key: &str, members: &[M]) -> Tokens {
    let mut tokens = Tokens::new();
    push(&mut tokens, name);
    push(&mut tokens, key);
    for member in members {
        push(&mut tokens, member);
    }
    tokens
}

/// GEORADIUS[_RO] key longitude latitude radius unit [WITHCOORD] [WITHDIST]
/// [WITHHASH] [COUNT count [ANY]] [ASC|DESC] [STORE key | STOREDIST key]
#[allow(clippy::too_many_arguments)]
pub(crate) fn geo_radius<N: GeoNumber>(
    key: &str,
    longitude: N,
    latitude: N,
    radius: N,
    unit: GeoUnit,
    options: &SearchOptions,
    store: Option<&GeoStore>,
    read_only: bool,
) -> Result<Tokens> {
    let mut tokens = Tokens::new();
    push(&mut tokens, radius_command_name(read_only, false, store)?);
    push(&mut tokens, key);
    push(&mut tokens, longitude.to_token()?);
    push(&mut tokens, latitude.to_token()?);
    push(&mut tokens, radius.to_token()?);
    push(&mut tokens, unit.as_str());
    push_radius_tail(&mut tokens, options, store)?;
    Ok(tokens)
}

/// GEORADIUSBYMEMBER[_RO] key member radius unit [WITHCOORD] [WITHDIST]
/// [WITHHASH] [COUNT count [ANY]] [ASC|DESC] [STORE key | STOREDIST key]
pub(crate) fn geo_radius_by_member<M, N>(
    key: &str,
    member: M,
    radius: N,
    unit: GeoUnit,
    options: &SearchOptions,
    store: Option<&GeoStore>,
    read_only: bool,
) -> Result<Tokens>
where
    M: AsRef<[u8]>,
    N: GeoNumber,
{
    let mut tokens = Tokens::new();
    push(&mut tokens, radius_command_name(read_only, true, store)?);
    push(&mut tokens, key);
    push(&mut tokens, member);
    push(&mut tokens, radius.to_token()?);
    push(&mut tokens, unit.as_str());
    push_radius_tail(&mut tokens, options, store)?;
    Ok(tokens)
}

fn radius_command_name(
    read_only: bool,
    by_member: bool,
    store: Option<&GeoStore>,
) -> Result<&'static str> {
    if read_only && store.is_some() {
        return Err(Error::UnsupportedOption(
            "read-only radius commands cannot store results".to_string(),
        ));
    }
    Ok(match (by_member, read_only) {
        (false, false) => "GEORADIUS",
        (false, true) => "GEORADIUS_RO",
        (true, false) => "GEORADIUSBYMEMBER",
        (true, true) => "GEORADIUSBYMEMBER_RO",
    })
}

/// Flag tail shared by the radius commands, in the order the protocol
/// mandates: WITHCOORD WITHDIST WITHHASH, COUNT n [ANY], ASC|DESC,
/// STORE|STOREDIST key.
fn push_radius_tail(
    tokens: &mut Tokens,
    options: &SearchOptions,
    store: Option<&GeoStore>,
) -> Result<()> {
    if store.is_some() && options.wants_attributes() {
        return Err(Error::UnsupportedOption(
            "STORE/STOREDIST cannot be combined with WITHCOORD, WITHDIST or WITHHASH".to_string(),
        ));
    }
    push_attribute_flags(tokens, options);
    push_count(tokens, options);
    push_sort(tokens, options);
    if let Some(store) = store {
        match store {
            GeoStore::Members(key) => {
                push(tokens, "STORE");
                push(tokens, key);
            },
            GeoStore::Distances(key) => {
                push(tokens, "STOREDIST");
                push(tokens, key);
            },
        }
    }
    Ok(())
}

/// GEOSEARCH key (FROMMEMBER member | FROMLONLAT lon lat)
/// (BYRADIUS radius unit | BYBOX width height unit)
/// [ASC|DESC] [COUNT count [ANY]] [WITHCOORD] [WITHDIST] [WITHHASH]
pub(crate) fn geo_search(
    key: &str,
    from: &SearchFrom,
    by: &SearchBy,
    options: &SearchOptions,
) -> Result<Tokens> {
    let mut tokens = Tokens::new();
    push(&mut tokens, "GEOSEARCH");
    push(&mut tokens, key);
    push_from(&mut tokens, from)?;
    push_by(&mut tokens, by);
    push_sort(&mut tokens, options);
    push_count(&mut tokens, options);
    push_attribute_flags(&mut tokens, options);
    Ok(tokens)
}

/// GEOSEARCHSTORE destination source (FROMMEMBER member | FROMLONLAT lon lat)
/// (BYRADIUS radius unit | BYBOX width height unit)
/// [ASC|DESC] [COUNT count [ANY]] [STOREDIST]
pub(crate) fn geo_search_store(
    destination: &str,
    source: &str,
    from: &SearchFrom,
    by: &SearchBy,
    options: &SearchOptions,
    store_dist: bool,
) -> Result<Tokens> {
    if options.wants_attributes() {
        return Err(Error::UnsupportedOption(
            "GEOSEARCHSTORE stores members, it cannot return WITHCOORD, WITHDIST or WITHHASH"
                .to_string(),
        ));
    }
    let mut tokens = Tokens::new();
    push(&mut tokens, "GEOSEARCHSTORE");
    push(&mut tokens, destination);
    push(&mut tokens, source);
    push_from(&mut tokens, from)?;
    push_by(&mut tokens, by);
    push_sort(&mut tokens, options);
    push_count(&mut tokens, options);
    if store_dist {
        push(&mut tokens, "STOREDIST");
    }
    Ok(tokens)
}

fn push_from(tokens: &mut Tokens, from: &SearchFrom) -> Result<()> {
    match from {
        SearchFrom::Member(member) => {
            push(tokens, "FROMMEMBER");
            push(tokens, member);
        },
        SearchFrom::Position(coordinate) => {
            push(tokens, "FROMLONLAT");
            push(tokens, coordinate.longitude.to_token()?);
            push(tokens, coordinate.latitude.to_token()?);
        },
    }
    Ok(())
}

fn push_by(tokens: &mut Tokens, by: &SearchBy) {
    match &by.kind {
        ByKind::Radius { radius, unit } => {
            push(tokens, "BYRADIUS");
            push(tokens, radius);
            push(tokens, unit.as_str());
        },
        ByKind::Box {
            width,
            height,
            unit,
        } => {
            push(tokens, "BYBOX");
            push(tokens, width);
            push(tokens, height);
            push(tokens, unit.as_str());
        },
    }
}

fn push_attribute_flags(tokens: &mut Tokens, options: &SearchOptions) {
    if options.with_coord {
        push(tokens, "WITHCOORD");
    }
    if options.with_dist {
        push(tokens, "WITHDIST");
    }
    if options.with_hash {
        push(tokens, "WITHHASH");
    }
}

/// COUNT n [ANY]. No limit means no token at all; ANY without a limit is
/// dropped since the server only accepts it after COUNT.
fn push_count(tokens: &mut Tokens, options: &SearchOptions) {
    if let Some(count) = options.count {
        push(tokens, "COUNT");
        push(tokens, count.to_string());
        if options.any {
            push(tokens, "ANY");
        }
    }
}

fn push_sort(tokens: &mut Tokens, options: &SearchOptions) {
    if let Some(sort) = options.sort {
        push(tokens, sort.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GeoSort;

    fn strings(tokens: &Tokens) -> Vec<String> {
        tokens
            .iter()
            .map(|t| String::from_utf8_lossy(t).to_string())
            .collect()
    }

    #[test]
    fn test_geo_add_plain() {
        let tokens = geo_add(
            "geo",
            &[("Palermo", 13.361389f64, 38.115556f64)],
            AddMode::Upsert,
            false,
        )
        .unwrap();
        assert_eq!(
            strings(&tokens),
            vec!["GEOADD", "geo", "13.361389", "38.115556", "Palermo"]
        );
    }

    #[test]
    fn test_geo_add_modifier_order() {
        let tokens = geo_add(
            "geo",
            &[("Catania", 15.087269f64, 37.502669f64)],
            AddMode::OnlyAdd,
            true,
        )
        .unwrap();
        assert_eq!(
            strings(&tokens),
            vec![
                "GEOADD",
                "geo",
                "NX",
                "CH",
                "15.087269",
                "37.502669",
                "Catania"
            ]
        );
    }

    #[test]
    fn test_geo_add_multiple_entries() {
        let tokens = geo_add(
            "geo",
            &[("a", 1.0f64, 2.0f64), ("b", 3.5f64, -4.5f64)],
            AddMode::OnlyUpdate,
            false,
        )
        .unwrap();
        assert_eq!(
            strings(&tokens),
            vec!["GEOADD", "geo", "XX", "1", "2", "a", "3.5", "-4.5", "b"]
        );
    }

    #[test]
    fn test_geo_add_rejects_non_finite() {
        let result = geo_add("geo", &[("x", f64::NAN, 1.0)], AddMode::Upsert, false);
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_geo_dist_unit_optional() {
        let tokens = geo_dist("geo", "a", "b", None);
        assert_eq!(strings(&tokens), vec!["GEODIST", "geo", "a", "b"]);

        let tokens = geo_dist("geo", "a", "b", Some(GeoUnit::Kilometers));
        assert_eq!(strings(&tokens), vec!["GEODIST", "geo", "a", "b", "km"]);
    }

    #[test]
    fn test_geo_hash_and_pos() {
        let tokens = geo_hash("geo", &["a", "b"]);
        assert_eq!(strings(&tokens), vec!["GEOHASH", "geo", "a", "b"]);

        let tokens = geo_pos("geo", &["a"]);
        assert_eq!(strings(&tokens), vec!["GEOPOS", "geo", "a"]);
    }

    #[test]
    fn test_geo_radius_flag_order() {
        let options = SearchOptions::new()
            .with_sort(GeoSort::Asc)
            .with_any(true)
            .with_count(5)
            .with_dist(true);
        let tokens = geo_radius(
            "geo",
            15.0f64,
            37.0f64,
            200.0f64,
            GeoUnit::Kilometers,
            &options,
            None,
            false,
        )
        .unwrap();
        // Fixed wire order regardless of the order options were set.
        assert_eq!(
            strings(&tokens),
            vec![
                "GEORADIUS", "geo", "15", "37", "200", "km", "WITHDIST", "COUNT", "5", "ANY",
                "ASC"
            ]
        );
    }

    #[test]
    fn test_geo_radius_all_attribute_flags_in_order() {
        let options = SearchOptions::new()
            .with_hash(true)
            .with_coord(true)
            .with_dist(true);
        let tokens = geo_radius(
            "geo",
            0i32,
            0i32,
            100i32,
            GeoUnit::Meters,
            &options,
            None,
            false,
        )
        .unwrap();
        assert_eq!(
            strings(&tokens),
            vec![
                "GEORADIUS",
                "geo",
                "0",
                "0",
                "100",
                "m",
                "WITHCOORD",
                "WITHDIST",
                "WITHHASH"
            ]
        );
    }

    #[test]
    fn test_count_zero_emits_no_count_and_drops_any() {
        let options = SearchOptions::new().with_count(0).with_any(true);
        let tokens = geo_radius(
            "geo",
            1.0f64,
            2.0f64,
            3.0f64,
            GeoUnit::Meters,
            &options,
            None,
            false,
        )
        .unwrap();
        let tokens = strings(&tokens);
        assert!(!tokens.contains(&"COUNT".to_string()));
        assert!(!tokens.contains(&"ANY".to_string()));
    }

    #[test]
    fn test_count_without_any() {
        let options = SearchOptions::new().with_count(3);
        let tokens = geo_radius(
            "geo",
            1.0f64,
            2.0f64,
            3.0f64,
            GeoUnit::Meters,
            &options,
            None,
            false,
        )
        .unwrap();
        let tokens = strings(&tokens);
        let count_at = tokens.iter().position(|t| t == "COUNT").unwrap();
        assert_eq!(tokens[count_at + 1], "3");
        assert!(!tokens.contains(&"ANY".to_string()));
    }

    #[test]
    fn test_build_is_idempotent() {
        let options = SearchOptions::new().with_coord(true).with_count(2);
        let build = || {
            geo_radius(
                "geo",
                13.361389f64,
                38.115556f64,
                100.0f64,
                GeoUnit::Kilometers,
                &options,
                None,
                false,
            )
            .unwrap()
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn test_geo_radius_read_only_name() {
        let options = SearchOptions::new();
        let tokens = geo_radius(
            "geo",
            1.0f64,
            2.0f64,
            3.0f64,
            GeoUnit::Meters,
            &options,
            None,
            true,
        )
        .unwrap();
        assert_eq!(strings(&tokens)[0], "GEORADIUS_RO");
    }

    #[test]
    fn test_geo_radius_store_tail() {
        let options = SearchOptions::new().with_sort(GeoSort::Desc);
        let store = GeoStore::distances("dest");
        let tokens = geo_radius(
            "geo",
            1.0f64,
            2.0f64,
            3.0f64,
            GeoUnit::Meters,
            &options,
            Some(&store),
            false,
        )
        .unwrap();
        assert_eq!(
            strings(&tokens),
            vec![
                "GEORADIUS",
                "geo",
                "1",
                "2",
                "3",
                "m",
                "DESC",
                "STOREDIST",
                "dest"
            ]
        );
    }

    #[test]
    fn test_store_with_attributes_is_unsupported() {
        let options = SearchOptions::new().with_dist(true);
        let store = GeoStore::members("dest");
        let result = geo_radius(
            "geo",
            1.0f64,
            2.0f64,
            3.0f64,
            GeoUnit::Meters,
            &options,
            Some(&store),
            false,
        );
        assert!(matches!(result, Err(Error::UnsupportedOption(_))));
    }

    #[test]
    fn test_read_only_store_is_unsupported() {
        let options = SearchOptions::new();
        let store = GeoStore::members("dest");
        let result = geo_radius(
            "geo",
            1.0f64,
            2.0f64,
            3.0f64,
            GeoUnit::Meters,
            &options,
            Some(&store),
            true,
        );
        assert!(matches!(result, Err(Error::UnsupportedOption(_))));
    }

    #[test]
    fn test_geo_radius_by_member() {
        let options = SearchOptions::new().with_coord(true);
        let tokens = geo_radius_by_member(
            "geo",
            "Palermo",
            200i64,
            GeoUnit::Kilometers,
            &options,
            None,
            false,
        )
        .unwrap();
        assert_eq!(
            strings(&tokens),
            vec![
                "GEORADIUSBYMEMBER",
                "geo",
                "Palermo",
                "200",
                "km",
                "WITHCOORD"
            ]
        );
    }

    #[test]
    fn test_geo_radius_by_member_read_only_name() {
        let options = SearchOptions::new();
        let tokens = geo_radius_by_member(
            "geo",
            "Palermo",
            200i64,
            GeoUnit::Kilometers,
            &options,
            None,
            true,
        )
        .unwrap();
        assert_eq!(strings(&tokens)[0], "GEORADIUSBYMEMBER_RO");
    }

    #[test]
    fn test_geo_search_grammar_order() {
        let options = SearchOptions::new()
            .with_coord(true)
            .with_dist(true)
            .with_count(10)
            .with_sort(GeoSort::Asc);
        let by = SearchBy::radius(200.0f64, GeoUnit::Kilometers).unwrap();
        let tokens = geo_search("geo", &SearchFrom::member("Palermo"), &by, &options).unwrap();
        // GEOSEARCH puts sort and count before the attribute flags.
        assert_eq!(
            strings(&tokens),
            vec![
                "GEOSEARCH",
                "geo",
                "FROMMEMBER",
                "Palermo",
                "BYRADIUS",
                "200",
                "km",
                "ASC",
                "COUNT",
                "10",
                "WITHCOORD",
                "WITHDIST"
            ]
        );
    }

    #[test]
    fn test_geo_search_from_position_by_box() {
        let by = SearchBy::bounding_box(400.0f64, 300.0f64, GeoUnit::Kilometers).unwrap();
        let tokens = geo_search(
            "geo",
            &SearchFrom::position(15.0, 37.0),
            &by,
            &SearchOptions::new(),
        )
        .unwrap();
        assert_eq!(
            strings(&tokens),
            vec![
                "GEOSEARCH",
                "geo",
                "FROMLONLAT",
                "15",
                "37",
                "BYBOX",
                "400",
                "300",
                "km"
            ]
        );
    }

    #[test]
    fn test_geo_search_store() {
        let by = SearchBy::radius(100.0f64, GeoUnit::Meters).unwrap();
        let options = SearchOptions::new().with_count(4).with_any(true);
        let tokens = geo_search_store(
            "dest",
            "src",
            &SearchFrom::position(1.5, 2.5),
            &by,
            &options,
            true,
        )
        .unwrap();
        assert_eq!(
            strings(&tokens),
            vec![
                "GEOSEARCHSTORE",
                "dest",
                "src",
                "FROMLONLAT",
                "1.5",
                "2.5",
                "BYRADIUS",
                "100",
                "m",
                "COUNT",
                "4",
                "ANY",
                "STOREDIST"
            ]
        );
    }

    #[test]
    fn test_geo_search_store_rejects_attributes() {
        let by = SearchBy::radius(100.0f64, GeoUnit::Meters).unwrap();
        let options = SearchOptions::new().with_hash(true);
        let result = geo_search_store(
            "dest",
            "src",
            &SearchFrom::member("a"),
            &by,
            &options,
            false,
        );
        assert!(matches!(result, Err(Error::UnsupportedOption(_))));
    }
}

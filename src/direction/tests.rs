// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::{fs::File, io::Write};

use approx::assert_abs_diff_eq;
use indoc::indoc;
use tempfile::TempDir;

use super::*;
use crate::array::Site;

fn epoch() -> Epoch {
    Epoch::from_gregorian_utc_hms(2023, 11, 4, 4, 0, 0)
}

#[test]
fn test_normalise_hour_angle() {
    assert_abs_diff_eq!(normalise_hour_angle(7.0), 7.0 - TAU);
    assert_abs_diff_eq!(normalise_hour_angle(-7.0), -7.0 + TAU);
    // Only one turn is ever removed.
    assert_abs_diff_eq!(normalise_hour_angle(15.0), 15.0 - TAU);
    // Magnitudes between pi and 2pi are left alone.
    assert_abs_diff_eq!(normalise_hour_angle(4.0), 4.0);
    assert_abs_diff_eq!(normalise_hour_angle(-4.0), -4.0);
    assert_abs_diff_eq!(normalise_hour_angle(TAU), TAU);
    assert_abs_diff_eq!(normalise_hour_angle(-TAU), -TAU);
    assert_abs_diff_eq!(normalise_hour_angle(0.5), 0.5);
}

#[test]
fn test_site_hour_angle_matches_lst_minus_ra() {
    let longitude = Site::Veritas.position().longitude_rad;
    for i in 0..50 {
        let lst = i as f64 * 0.13;
        let ra = (i as f64 * 0.71).rem_euclid(TAU);
        let ha = site_hour_angle(longitude, lst, ra);
        assert_abs_diff_eq!(ha.sin(), (lst - ra).sin(), epsilon = 1e-10);
        assert_abs_diff_eq!(ha.cos(), (lst - ra).cos(), epsilon = 1e-10);
        assert!(ha <= longitude + 1e-12);
        assert!(ha > longitude - TAU - 1e-12);
    }
}

#[test]
fn test_site_hour_angle_can_exceed_a_turn() {
    // The VERITAS longitude is about -1.94 rad, so some sources have hour
    // angles below -2pi before normalisation.
    let longitude = Site::Veritas.position().longitude_rad;
    let lst = 0.0;
    let ra = 0.65;
    let ha = site_hour_angle(longitude, lst, ra);
    assert!(ha < -TAU);
    let normalised = normalise_hour_angle(ha);
    assert!(normalised.abs() <= TAU);
    assert_abs_diff_eq!(normalised.sin(), (lst - ra).sin(), epsilon = 1e-10);
    assert_abs_diff_eq!(normalised.cos(), (lst - ra).cos(), epsilon = 1e-10);
}

#[test]
fn test_fixed_direction() {
    let hadec = HADec { ha: 0.5, dec: -0.25 };
    let resolver = FixedDirection {
        hadec,
        latitude_rad: 0.553,
    };
    let expected = ResolvedDirection {
        hadec,
        latitude_rad: 0.553,
    };
    assert_eq!(resolver.resolve(epoch()), expected);
    assert_eq!(
        resolver.resolve(epoch() + Duration::from_seconds(1000.0)),
        expected
    );
}

#[test]
fn test_sidereal_resolver_source_on_meridian() {
    let array_position = Site::Veritas.position();
    let lst = get_lmst(array_position.longitude_rad, epoch(), Duration::default());
    let source = RADec { ra: lst, dec: 0.3 };
    let resolver = SiderealResolver::new(source, array_position, Duration::default(), false);
    assert_abs_diff_eq!(resolver.lst(epoch()), lst);

    let resolved = resolver.resolve(epoch());
    assert_abs_diff_eq!(resolved.latitude_rad, array_position.latitude_rad);
    let hadec = resolved.hadec;
    assert_abs_diff_eq!(hadec.dec, 0.3);
    assert_abs_diff_eq!(hadec.ha.sin(), 0.0, epsilon = 1e-10);
    assert_abs_diff_eq!(hadec.ha.cos(), 1.0, epsilon = 1e-10);
}

#[test]
fn test_sidereal_resolver_hour_angle_advances() {
    let array_position = Site::Veritas.position();
    let source = RADec::from_degrees(279.234735, 38.783689);
    let resolver = SiderealResolver::new(source, array_position, Duration::default(), false);

    let ha1 = resolver.resolve(epoch()).hadec.ha;
    let ha2 = resolver.resolve(epoch() + Duration::from_seconds(3600.0)).hadec.ha;
    let diff = (ha2 - ha1).rem_euclid(TAU);
    // One solar hour is slightly more than one sidereal hour.
    assert_abs_diff_eq!(diff, 1.002_737_909 * TAU / 24.0, epsilon = 1e-6);
}

#[test]
fn test_precession_is_a_small_correction() {
    let array_position = Site::Veritas.position();
    let source = RADec::from_degrees(279.234735, 38.783689);
    let precessed = SiderealResolver::new(source, array_position, Duration::default(), true);
    let not_precessed = SiderealResolver::new(source, array_position, Duration::default(), false);

    let ha_p = precessed.resolve(epoch()).hadec.ha;
    let ha_np = not_precessed.resolve(epoch()).hadec.ha;
    let diff = (ha_p - ha_np).sin().abs();
    // 23 years of precession is well under a degree.
    assert!(diff < 1.0_f64.to_radians(), "{diff}");
    assert!(diff > 0.0);
}

#[test]
fn test_precessed_latitude_matches_precessed_lst() {
    let array_position = Site::Veritas.position();
    let source = RADec::from_degrees(14.177215, 60.716740);
    let epoch = Epoch::from_gregorian_utc_hms(2023, 11, 4, 4, 30, 0);
    let precessed = SiderealResolver::new(source, array_position, Duration::default(), true);
    let not_precessed = SiderealResolver::new(source, array_position, Duration::default(), false);

    let info = precess_time(
        array_position.longitude_rad,
        array_position.latitude_rad,
        source,
        epoch,
        Duration::default(),
    );
    let resolved = precessed.resolve(epoch);
    assert_abs_diff_eq!(resolved.latitude_rad, info.array_latitude_j2000);
    assert_abs_diff_eq!(precessed.lst(epoch), info.lmst_j2000);
    // The J2000 latitude differs from the geographic one by about 0.13°.
    let lat_diff = (resolved.latitude_rad - array_position.latitude_rad).to_degrees();
    assert!(lat_diff.abs() > 0.05 && lat_diff.abs() < 0.5, "{lat_diff}");

    // Without precession, the geographic latitude is used.
    assert_abs_diff_eq!(
        not_precessed.resolve(epoch).latitude_rad,
        array_position.latitude_rad
    );
}

#[test]
fn test_builtin_catalogue_lookup() {
    let catalogue = Catalogue::builtin();
    let vega = catalogue.lookup("Vega").unwrap();
    assert_eq!(vega.name, "Vega");
    assert_eq!(catalogue.lookup("alpha lyr").unwrap(), vega);
    assert_eq!(catalogue.lookup("  ALF   Lyr ").unwrap(), vega);

    let gam_cas = catalogue.lookup("gamma Cas").unwrap();
    assert_eq!(gam_cas.name, "Navi");
    let radec = gam_cas.radec();
    assert_abs_diff_eq!(radec.ra, 14.177215_f64.to_radians());
    assert_abs_diff_eq!(radec.dec, 60.716740_f64.to_radians());

    assert!(matches!(
        catalogue.lookup("Crab Nebula"),
        Err(CatalogueError::NotFound { .. })
    ));
}

#[test]
fn test_builtin_catalogue_names_are_reachable() {
    let catalogue = Catalogue::builtin();
    for entry in catalogue.entries() {
        for name in std::iter::once(&entry.name).chain(entry.aliases.iter()) {
            assert_eq!(catalogue.lookup(name).unwrap().name, entry.name);
        }
    }
    assert_eq!(catalogue.lookup("eta uma").unwrap().name, "Alkaid");
    assert_eq!(catalogue.lookup("Benetnasch").unwrap().name, "Alkaid");
}

#[test]
fn test_alias_repeating_its_own_source_is_allowed() {
    let tmp_dir = TempDir::new().unwrap();
    let path = tmp_dir.path().join("sources.json");
    std::fs::write(
        &path,
        r#"{"sources": [{"name": "Eta Star", "aliases": ["eta star", "ETA  Star"], "ra_deg": 1.0, "dec_deg": 1.0}]}"#,
    )
    .unwrap();
    let catalogue = Catalogue::read_file(&path).unwrap();
    assert_eq!(catalogue.lookup("eta star").unwrap().name, "Eta Star");
}

#[test]
fn test_read_yaml_catalogue() {
    let tmp_dir = TempDir::new().unwrap();
    let path = tmp_dir.path().join("sources.yaml");
    let mut f = File::create(&path).unwrap();
    write!(
        f,
        "{}",
        indoc! {"
            sources:
              - name: Test Star
                aliases: [tst Star]
                ra_deg: 10.5
                dec_deg: -45.0
              - name: Other
                ra_deg: 350.0
                dec_deg: 80.0
        "}
    )
    .unwrap();
    drop(f);

    let catalogue = Catalogue::read_file(&path).unwrap();
    assert_eq!(catalogue.entries().len(), 2);
    let entry = catalogue.lookup("TST star").unwrap();
    assert_eq!(entry.name, "Test Star");
    assert_abs_diff_eq!(entry.ra_deg, 10.5);
    assert_abs_diff_eq!(entry.dec_deg, -45.0);
    assert!(catalogue.lookup("other").unwrap().aliases.is_empty());
}

#[test]
fn test_read_json_and_toml_catalogues() {
    let tmp_dir = TempDir::new().unwrap();

    let json = tmp_dir.path().join("sources.json");
    std::fs::write(
        &json,
        r#"{"sources": [{"name": "Json Star", "ra_deg": 1.0, "dec_deg": 2.0}]}"#,
    )
    .unwrap();
    let catalogue = Catalogue::read_file(&json).unwrap();
    assert_abs_diff_eq!(catalogue.lookup("json star").unwrap().dec_deg, 2.0);

    let toml = tmp_dir.path().join("sources.toml");
    std::fs::write(
        &toml,
        indoc! {r#"
            [[sources]]
            name = "Toml Star"
            aliases = ["TS"]
            ra_deg = 3.0
            dec_deg = 4.0
        "#},
    )
    .unwrap();
    let catalogue = Catalogue::read_file(&toml).unwrap();
    assert_abs_diff_eq!(catalogue.lookup("ts").unwrap().ra_deg, 3.0);
}

#[test]
fn test_bad_catalogues() {
    let tmp_dir = TempDir::new().unwrap();

    let path = tmp_dir.path().join("sources.txt");
    std::fs::write(&path, "Vega 279.2 38.8").unwrap();
    assert!(matches!(
        Catalogue::read_file(&path),
        Err(CatalogueError::UnsupportedExt { .. })
    ));

    let path = tmp_dir.path().join("bad_dec.json");
    std::fs::write(
        &path,
        r#"{"sources": [{"name": "Bad", "ra_deg": 1.0, "dec_deg": 91.0}]}"#,
    )
    .unwrap();
    assert!(matches!(
        Catalogue::read_file(&path),
        Err(CatalogueError::DecInvalid { .. })
    ));

    let path = tmp_dir.path().join("dupe.json");
    std::fs::write(
        &path,
        r#"{"sources": [{"name": "A", "ra_deg": 1.0, "dec_deg": 1.0}, {"name": "B", "aliases": ["a"], "ra_deg": 2.0, "dec_deg": 2.0}]}"#,
    )
    .unwrap();
    assert!(matches!(
        Catalogue::read_file(&path),
        Err(CatalogueError::Duplicate { .. })
    ));

    let path = tmp_dir.path().join("garbage.yaml");
    std::fs::write(&path, "sources: 5").unwrap();
    assert!(matches!(
        Catalogue::read_file(&path),
        Err(CatalogueError::Parse { .. })
    ));

    let path = tmp_dir.path().join("missing.yaml");
    assert!(matches!(
        Catalogue::read_file(&path),
        Err(CatalogueError::IO(_))
    ));
}

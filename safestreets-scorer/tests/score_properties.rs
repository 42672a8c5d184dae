//! Property tests for recency decay, score bounds and the attribution radius.

use chrono::{DateTime, TimeZone, Utc};
use geo::Coord;
use proptest::prelude::*;
use safestreets_core::geometry::{centroid, distance_km};
use safestreets_core::test_support::{LinearStreetLookup, square_street};
use safestreets_core::{CrimeEvent, StreetIndex};
use safestreets_scorer::{
    AttributionConfig, CancelSignal, RecencyDecay, ScoringPolicy, attribute_crimes,
};

fn reference_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0)
        .single()
        .expect("valid reference time")
}

proptest! {
    #[test]
    fn recency_multiplier_stays_in_unit_interval(
        rate in 0.0_f64..5.0,
        age in -1_000.0_f64..100_000.0,
    ) {
        let decay = RecencyDecay::new(rate).expect("non-negative rate");
        let multiplier = decay.multiplier(age);
        prop_assert!((0.0..=1.0).contains(&multiplier));
    }

    #[test]
    fn recency_multiplier_never_grows_with_age(
        rate in 0.0_f64..1.0,
        younger in 0.0_f64..10_000.0,
        gap in 0.0_f64..10_000.0,
    ) {
        let decay = RecencyDecay::new(rate).expect("non-negative rate");
        prop_assert!(decay.multiplier(younger + gap) <= decay.multiplier(younger));
    }

    #[test]
    fn scores_stay_bounded_for_any_weight(
        total in proptest::num::f64::ANY,
        count in 0_usize..10_000,
    ) {
        for policy in [ScoringPolicy::MeanWeight, ScoringPolicy::TotalWeight] {
            let score = policy.score(total, count).value();
            prop_assert!((0.0..=10.0).contains(&score), "{policy:?} gave {score}");
        }
    }

    #[test]
    fn events_beyond_the_threshold_are_never_credited(
        dlon in -0.05_f64..0.05,
        dlat in -0.05_f64..0.05,
    ) {
        let street = square_street("only", -77.0, 38.9, 0.001);
        let centre = centroid(street.ring()).expect("square has a centroid");
        let location = Coord { x: centre.x + dlon, y: centre.y + dlat };
        let config = AttributionConfig::default();
        let event = CrimeEvent::new(
            Some(location),
            Some("HOMICIDE".into()),
            Some("2024-06-01T00:00:00Z".into()),
        );
        let index = StreetIndex::build(vec![street]).expect("one valid street");
        let run = attribute_crimes(
            &[event],
            &index,
            &config,
            reference_time(),
            &CancelSignal::new(),
        );
        let credited = run.stats.attributed == 1;
        let within = distance_km(location, centre) < config.distance_threshold_km();
        prop_assert_eq!(credited, within);
    }

    #[test]
    fn index_and_linear_scan_credit_the_same_streets(
        offsets in proptest::collection::vec((0.0_f64..0.01, 0.0_f64..0.01), 1..40),
    ) {
        let streets: Vec<_> = (0..5_u32)
            .flat_map(|row| (0..5_u32).map(move |col| (row, col)))
            .map(|(row, col)| {
                square_street(
                    &format!("{row}-{col}"),
                    -77.0 + f64::from(col) * 0.002,
                    38.9 + f64::from(row) * 0.002,
                    0.002,
                )
            })
            .collect();
        let events: Vec<_> = offsets
            .iter()
            .map(|&(dx, dy)| {
                CrimeEvent::new(
                    Some(Coord { x: -77.0 + dx, y: 38.9 + dy }),
                    Some("ROBBERY".into()),
                    Some("2024/05/01 12:00:00+00".into()),
                )
            })
            .collect();
        let config = AttributionConfig::default();
        let now = reference_time();
        let index = StreetIndex::build(streets.clone()).expect("valid grid");
        let linear = LinearStreetLookup::new(streets);
        let indexed = attribute_crimes(&events, &index, &config, now, &CancelSignal::new());
        let scanned = attribute_crimes(&events, &linear, &config, now, &CancelSignal::new());
        prop_assert_eq!(indexed, scanned);
    }
}

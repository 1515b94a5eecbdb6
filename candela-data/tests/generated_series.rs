use candela_core::SeriesPoint;
use candela_data::{GeneratorSettings, SeriesGenerator};
use chrono::NaiveDate;
use proptest::prelude::*;

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
}

proptest! {
    #[test]
    fn walk_times_strictly_increase(count in 1usize..400, seed in any::<u64>()) {
        let mut generator = SeriesGenerator::new(GeneratorSettings::default(), Some(seed)).unwrap();
        let walk = generator.random_walk(count, start()).unwrap();
        prop_assert_eq!(walk.len(), count);
        for pair in walk.windows(2) {
            prop_assert_eq!(pair[1].time - pair[0].time, 86_400);
        }
        prop_assert!(walk.iter().all(|p| p.value >= 10.0 && p.value.is_finite()));
    }

    #[test]
    fn candles_hold_ohlc_invariant(count in 1usize..400, seed in any::<u64>()) {
        let mut generator = SeriesGenerator::new(GeneratorSettings::default(), Some(seed)).unwrap();
        let bars = generator.ohlc(count, start()).unwrap();
        prop_assert_eq!(bars.len(), count);
        for bar in bars.iter() {
            prop_assert!(bar.low <= bar.open.min(bar.close));
            prop_assert!(bar.high >= bar.open.max(bar.close));
            prop_assert!(bar.is_well_formed());
        }
        for pair in bars.windows(2) {
            prop_assert!(pair[0].time < pair[1].time);
        }
    }
}

#[test]
fn generated_series_round_trip_through_json() {
    let mut generator = SeriesGenerator::new(GeneratorSettings::default(), Some(99)).unwrap();
    let bars = generator.ohlc(12, start()).unwrap();
    let json = serde_json::to_string(&bars).unwrap();
    let parsed: candela_core::Series<candela_core::OhlcPoint> =
        serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.len(), bars.len());
    assert_eq!(parsed.last().unwrap().time, bars.last().unwrap().time);
}

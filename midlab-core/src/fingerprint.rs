//! Content fingerprints for reproducibility checks.
//!
//! Two runs over the same input with the same configuration must produce
//! byte-identical derived series. The hashes here make that checkable:
//! they walk every numeric field through its IEEE-754 bit pattern, so
//! NaN sentinels and signed zeros hash stably.

use blake3::Hasher;

use crate::domain::{Bar, EnrichedBar, StarColor};

fn put_f64(hasher: &mut Hasher, v: f64) {
    hasher.update(&v.to_bits().to_le_bytes());
}

fn put_bar(hasher: &mut Hasher, bar: &Bar) {
    hasher.update(bar.date.to_string().as_bytes());
    put_f64(hasher, bar.open);
    put_f64(hasher, bar.high);
    put_f64(hasher, bar.low);
    put_f64(hasher, bar.close);
    hasher.update(&bar.volume.to_le_bytes());
    put_f64(hasher, bar.amount.unwrap_or(f64::NAN));
}

/// Hash of an ingested bar series.
pub fn dataset_hash(bars: &[Bar]) -> blake3::Hash {
    let mut hasher = Hasher::new();
    hasher.update(&(bars.len() as u64).to_le_bytes());
    for bar in bars {
        put_bar(&mut hasher, bar);
    }
    hasher.finalize()
}

/// Hash of an enriched series, covering every derived field.
pub fn enriched_hash(series: &[EnrichedBar]) -> blake3::Hash {
    let mut hasher = Hasher::new();
    hasher.update(&(series.len() as u64).to_le_bytes());
    for eb in series {
        put_bar(&mut hasher, &eb.bar);
        for v in [
            eb.mid_price,
            eb.amplitude,
            eb.rel_amplitude,
            eb.open_mid_diff,
            eb.mid_upper,
            eb.mid_lower,
            eb.amplitude_ma,
            eb.true_range,
            eb.atr,
            eb.atr_change,
            eb.amplitude_percentile,
            eb.amplitude_p20,
            eb.amplitude_p50,
            eb.amplitude_p80,
            eb.amplitude_zscore,
            eb.open_mid_diff_ma,
            eb.open_mid_diff_cum,
            eb.open_mid_diff_percentile,
            eb.open_mid_diff_p20,
            eb.open_mid_diff_p50,
            eb.open_mid_diff_p80,
            eb.open_mid_diff_zscore,
            eb.mpmi_line,
            eb.mpmi_signal,
            eb.mpmi_hist,
        ] {
            put_f64(&mut hasher, v);
        }
        let flags = [
            eb.price_breakout,
            eb.golden_cross,
            eb.death_cross,
        ];
        for flag in flags {
            hasher.update(&[flag as u8]);
        }
        let star = match eb.star {
            None => 0u8,
            Some(StarColor::Red) => 1,
            Some(StarColor::Green) => 2,
            Some(StarColor::Yellow) => 3,
        };
        hasher.update(&[star]);
        put_f64(&mut hasher, eb.fund_flow.unwrap_or(f64::NAN));
    }
    hasher.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{enrich, EngineConfig};
    use crate::indicators::make_bars;

    #[test]
    fn dataset_hash_is_stable() {
        let bars = make_bars(&[100.0, 101.0, 99.5]);
        assert_eq!(dataset_hash(&bars), dataset_hash(&bars));
    }

    #[test]
    fn dataset_hash_sees_every_bar() {
        let a = make_bars(&[100.0, 101.0, 99.5]);
        let mut b = a.clone();
        b[2].close += 0.01;
        assert_ne!(dataset_hash(&a), dataset_hash(&b));
    }

    #[test]
    fn empty_and_singleton_differ() {
        let one = make_bars(&[100.0]);
        assert_ne!(dataset_hash(&[]), dataset_hash(&one));
    }

    #[test]
    fn enriched_hash_is_deterministic_across_runs() {
        let bars = make_bars(&[100.0, 102.0, 101.0, 103.0, 99.0, 100.5]);
        let cfg = EngineConfig::default();
        let first = enrich(&bars, &cfg).unwrap();
        let second = enrich(&bars, &cfg).unwrap();
        assert_eq!(enriched_hash(&first), enriched_hash(&second));
    }

    #[test]
    fn enriched_hash_distinguishes_configs() {
        let bars = make_bars(&[100.0, 102.0, 101.0, 103.0, 99.0, 100.5, 101.5]);
        let a = enrich(&bars, &EngineConfig::default()).unwrap();
        let cfg = EngineConfig {
            channel_upper_pct: 0.02,
            ..Default::default()
        };
        let b = enrich(&bars, &cfg).unwrap();
        assert_ne!(enriched_hash(&a), enriched_hash(&b));
    }
}

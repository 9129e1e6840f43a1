//! Long/flat strategy rules: positions, trade signals and the latest
//! recommendation.
//!
//! Positions are evaluated point by point with memory: a point that
//! neither enters nor exits keeps the previous position.

use serde::{Deserialize, Serialize};

use crate::domain::SentimentRegime;
use crate::signal::SignalKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Position {
    #[default]
    Flat,
    Long,
}

impl Position {
    /// Exposure multiplier applied to the next period's return.
    pub fn exposure(self) -> f64 {
        match self {
            Position::Flat => 0.0,
            Position::Long => 1.0,
        }
    }
}

/// Per-point strategy inputs, all of equal length.
#[derive(Debug, Clone, Copy)]
pub struct StrategyInputs<'a> {
    pub sma_short: &'a [Option<f64>],
    pub sma_long: &'a [Option<f64>],
    pub trend: &'a [f64],
    pub regimes: &'a [SentimentRegime],
}

impl StrategyInputs<'_> {
    pub fn len(&self) -> usize {
        self.trend.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trend.is_empty()
    }
}

/// `a > b`, false while either average is still warming up.
fn above(a: Option<f64>, b: Option<f64>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a > b)
}

/// Long/flat position per point.
///
/// Enter when the short average is above the long one, the trend is
/// positive and sentiment is not Extreme Greed. Otherwise exit when the
/// short average is below the long one or sentiment is Extreme Fear.
pub fn generate_positions(inputs: &StrategyInputs<'_>) -> Vec<Position> {
    debug_assert_eq!(inputs.sma_short.len(), inputs.len());
    debug_assert_eq!(inputs.sma_long.len(), inputs.len());
    debug_assert_eq!(inputs.regimes.len(), inputs.len());

    let mut current = Position::Flat;
    (0..inputs.len())
        .map(|i| {
            let (short, long) = (inputs.sma_short[i], inputs.sma_long[i]);
            let regime = inputs.regimes[i];

            let enter = above(short, long)
                && inputs.trend[i] > 0.0
                && regime != SentimentRegime::ExtremeGreed;
            let exit = above(long, short) || regime == SentimentRegime::ExtremeFear;

            if enter {
                current = Position::Long;
            } else if exit {
                current = Position::Flat;
            }
            current
        })
        .collect()
}

/// Buy where the position turns Long, Sell where it turns Flat, Hold
/// elsewhere. The position before the first point is Flat.
pub fn generate_trade_signals(positions: &[Position]) -> Vec<SignalKind> {
    let mut previous = Position::Flat;
    positions
        .iter()
        .map(|&p| {
            let signal = match (previous, p) {
                (Position::Flat, Position::Long) => SignalKind::Buy,
                (Position::Long, Position::Flat) => SignalKind::Sell,
                _ => SignalKind::Hold,
            };
            previous = p;
            signal
        })
        .collect()
}

/// Ascending buy and sell index sets for a signal column.
pub fn signal_indices(signals: &[SignalKind]) -> (Vec<usize>, Vec<usize>) {
    let mut buys = Vec::new();
    let mut sells = Vec::new();
    for (i, s) in signals.iter().enumerate() {
        match s {
            SignalKind::Buy => buys.push(i),
            SignalKind::Sell => sells.push(i),
            SignalKind::Hold => {}
        }
    }
    (buys, sells)
}

/// The signal on the final point with the moving averages behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub signal: SignalKind,
    pub explanation: String,
}

fn fmt_average(v: Option<f64>) -> String {
    v.map(|x| format!("{x:.2}")).unwrap_or_else(|| "n/a".to_string())
}

/// `None` when there are no points.
pub fn latest_recommendation(
    signals: &[SignalKind],
    sma_short: &[Option<f64>],
    sma_long: &[Option<f64>],
) -> Option<Recommendation> {
    let signal = *signals.last()?;
    let short = sma_short.last().copied().flatten();
    let long = sma_long.last().copied().flatten();
    Some(Recommendation {
        signal,
        explanation: format!(
            "Short SMA ({}) vs Long SMA ({}).",
            fmt_average(short),
            fmt_average(long)
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SentimentRegime::*;

    fn some(xs: &[f64]) -> Vec<Option<f64>> {
        xs.iter().copied().map(Some).collect()
    }

    #[test]
    fn long_when_conditions_met() {
        let short = some(&[100.0, 101.0, 102.0, 103.0, 104.0]);
        let long = some(&[100.0; 5]);
        let trend = [0.1, 0.2, 0.3, 0.1, 0.2];
        let regimes = [Neutral; 5];
        let positions = generate_positions(&StrategyInputs {
            sma_short: &short,
            sma_long: &long,
            trend: &trend,
            regimes: &regimes,
        });
        assert_eq!(positions[0], Position::Flat);
        assert_eq!(positions[4], Position::Long);
    }

    #[test]
    fn buy_then_sell_when_short_average_drops() {
        let short = some(&[100.0, 101.0, 102.0, 103.0, 90.0]);
        let long = some(&[100.0; 5]);
        let trend = [0.1, 0.2, 0.3, 0.1, 0.2];
        let regimes = [Neutral; 5];
        let positions = generate_positions(&StrategyInputs {
            sma_short: &short,
            sma_long: &long,
            trend: &trend,
            regimes: &regimes,
        });
        let signals = generate_trade_signals(&positions);
        assert_eq!(
            signals,
            vec![SignalKind::Hold, SignalKind::Buy, SignalKind::Hold, SignalKind::Hold, SignalKind::Sell]
        );
        assert_eq!(signal_indices(&signals), (vec![1], vec![4]));
    }

    #[test]
    fn extreme_greed_blocks_entry_but_keeps_position() {
        let short = some(&[110.0; 4]);
        let long = some(&[100.0; 4]);
        let trend = [1.0; 4];
        let regimes = [ExtremeGreed, Greed, ExtremeGreed, ExtremeFear];
        let positions = generate_positions(&StrategyInputs {
            sma_short: &short,
            sma_long: &long,
            trend: &trend,
            regimes: &regimes,
        });
        // Extreme Greed neither enters nor exits, so the position carries.
        // Extreme Fear is not Extreme Greed, so the entry rule wins there.
        assert_eq!(
            positions,
            vec![Position::Flat, Position::Long, Position::Long, Position::Long]
        );
    }

    #[test]
    fn extreme_fear_exits_when_averages_are_flat() {
        let short = some(&[110.0, 100.0]);
        let long = some(&[100.0, 100.0]);
        let trend = [1.0, 1.0];
        let regimes = [Neutral, ExtremeFear];
        let positions = generate_positions(&StrategyInputs {
            sma_short: &short,
            sma_long: &long,
            trend: &trend,
            regimes: &regimes,
        });
        assert_eq!(positions, vec![Position::Long, Position::Flat]);
    }

    #[test]
    fn warming_averages_never_enter() {
        let short = vec![None, Some(105.0)];
        let long = vec![None, None];
        let trend = [1.0, 1.0];
        let regimes = [Neutral; 2];
        let positions = generate_positions(&StrategyInputs {
            sma_short: &short,
            sma_long: &long,
            trend: &trend,
            regimes: &regimes,
        });
        assert_eq!(positions, vec![Position::Flat; 2]);
    }

    #[test]
    fn long_on_first_point_is_a_buy() {
        let signals = generate_trade_signals(&[Position::Long, Position::Long]);
        assert_eq!(signals, vec![SignalKind::Buy, SignalKind::Hold]);
    }

    #[test]
    fn recommendation_formats_averages() {
        let rec = latest_recommendation(
            &[SignalKind::Hold, SignalKind::Buy],
            &[None, Some(101.234)],
            &[None, Some(99.5)],
        )
        .unwrap();
        assert_eq!(rec.signal, SignalKind::Buy);
        assert_eq!(rec.explanation, "Short SMA (101.23) vs Long SMA (99.50).");
    }

    #[test]
    fn recommendation_with_warming_average() {
        let rec = latest_recommendation(&[SignalKind::Hold], &[Some(1.0)], &[None]).unwrap();
        assert_eq!(rec.explanation, "Short SMA (1.00) vs Long SMA (n/a).");
    }

    #[test]
    fn recommendation_empty() {
        assert!(latest_recommendation(&[], &[], &[]).is_none());
    }
}

use crate::indicator::TABuilder;
use crate::indicator::utils::moving_average;
use crate::model::{Candle, close_prices};
use serde::Serialize;
use std::fmt::Display;

/// 단순이동평균
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SMA {
    pub period: usize,
    /// 최근 `period`개 종가의 평균 (데이터 부족 시 0)
    pub value: f64,
}

impl Display for SMA {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SMA({}: {:.2})", self.period, self.value)
    }
}

/// 캔들별로 정렬된 SMA 시계열
///
/// 윈도우가 채워지기 전 인덱스는 `None`입니다. 차트 라인 표시용입니다.
pub fn calculate_sma_series(values: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; values.len()];
    }

    let mut series = Vec::with_capacity(values.len());
    let mut window_sum = 0.0;

    for (i, &value) in values.iter().enumerate() {
        window_sum += value;
        if i >= period {
            window_sum -= values[i - period];
        }

        if i + 1 >= period {
            series.push(Some(window_sum / period as f64));
        } else {
            series.push(None);
        }
    }

    series
}

#[derive(Debug, Clone, Copy)]
pub struct SMABuilder {
    period: usize,
}

impl SMABuilder {
    pub fn new(period: usize) -> Self {
        SMABuilder { period }
    }

    pub fn build_from_closes(&self, closes: &[f64]) -> SMA {
        SMA {
            period: self.period,
            value: moving_average::calculate_sma(closes, self.period),
        }
    }
}

impl<C: Candle> TABuilder<SMA, C> for SMABuilder {
    fn build(&self, data: &[C]) -> SMA {
        self.build_from_closes(&close_prices(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sma_value() {
        let sma = SMABuilder::new(3).build_from_closes(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(sma.value, 4.0);
        assert_eq!(format!("{}", sma), "SMA(3: 4.00)");
    }

    #[test]
    fn test_sma_insufficient_data_is_zero() {
        let sma = SMABuilder::new(5).build_from_closes(&[1.0, 2.0]);
        assert_eq!(sma.value, 0.0);
    }

    #[test]
    fn test_sma_series_alignment() {
        let series = calculate_sma_series(&[1.0, 2.0, 3.0, 4.0], 2);
        assert_eq!(series, vec![None, Some(1.5), Some(2.5), Some(3.5)]);
    }

    #[test]
    fn test_sma_series_matches_trailing_value() {
        let values: Vec<f64> = (0..30).map(|i| (i * 7 % 11) as f64).collect();
        let series = calculate_sma_series(&values, 5);
        let last = series.last().copied().flatten().unwrap();
        assert!((last - moving_average::calculate_sma(&values, 5)).abs() < 1e-9);
        assert!(series[..4].iter().all(Option::is_none));
    }
}

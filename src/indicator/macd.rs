use crate::indicator::TABuilder;
use crate::indicator::utils::moving_average;
use crate::model::{Candle, close_prices};
use serde::Serialize;
use std::fmt::Display;

/// MACD 추세 방향
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MacdTrend {
    /// MACD 라인이 시그널 라인 위
    Bullish,
    /// MACD 라인이 시그널 라인 아래 (또는 같음)
    Bearish,
}

impl MacdTrend {
    pub fn label(&self) -> &'static str {
        match self {
            MacdTrend::Bullish => "상승 우위",
            MacdTrend::Bearish => "하락 우위",
        }
    }
}

/// MACD(Moving Average Convergence Divergence) 기술적 지표
///
/// MACD는 추세 추종 모멘텀 지표로, 추세의 방향과 강도를 나타냅니다.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MACD {
    /// MACD 라인 (빠른 EMA - 느린 EMA)
    pub macd: f64,
    /// 시그널 라인 (MACD의 EMA)
    pub signal: f64,
    /// 히스토그램 (MACD - 시그널)
    pub histogram: f64,
    pub trend: MacdTrend,
}

impl MACD {
    /// 데이터 부족 시 결과 (모두 0, 하락 우위)
    pub fn empty() -> Self {
        MACD {
            macd: 0.0,
            signal: 0.0,
            histogram: 0.0,
            trend: MacdTrend::Bearish,
        }
    }

    pub fn is_bullish(&self) -> bool {
        self.trend == MacdTrend::Bullish
    }
}

impl Display for MACD {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MACD({:.2}, {:.2}, {:.2})",
            self.macd, self.signal, self.histogram
        )
    }
}

/// MACD 계산 함수
///
/// 빠른/느린 EMA는 첫 종가로 초기화합니다. MACD 라인은 느린 EMA가 한 기간을 모두 소화한
/// 지점(`slow_period - 1`)부터 정의되며, 시그널 라인은 그 구간의 MACD 값에 대한 EMA입니다.
/// `slow_period + signal_period`개 미만의 종가면 [`MACD::empty`]를 반환합니다.
pub fn calculate_macd(
    values: &[f64],
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
) -> MACD {
    if fast_period == 0
        || slow_period == 0
        || signal_period == 0
        || values.len() < slow_period.saturating_add(signal_period)
    {
        return MACD::empty();
    }

    let fast_ema = moving_average::calculate_ema_series(values, fast_period);
    let slow_ema = moving_average::calculate_ema_series(values, slow_period);

    let macd_lines: Vec<f64> = fast_ema
        .iter()
        .zip(slow_ema.iter())
        .skip(slow_period - 1)
        .map(|(fast, slow)| fast - slow)
        .collect();

    let signal_lines = moving_average::calculate_ema_series(&macd_lines, signal_period);

    let (Some(&macd), Some(&signal)) = (macd_lines.last(), signal_lines.last()) else {
        return MACD::empty();
    };

    MACD {
        macd,
        signal,
        histogram: macd - signal,
        trend: if macd > signal {
            MacdTrend::Bullish
        } else {
            MacdTrend::Bearish
        },
    }
}

/// MACD 계산을 위한 빌더
#[derive(Debug, Clone, Copy)]
pub struct MACDBuilder {
    /// 빠른 EMA 기간 (일반적으로 12)
    fast_period: usize,
    /// 느린 EMA 기간 (일반적으로 26)
    slow_period: usize,
    /// 시그널 라인 기간 (일반적으로 9)
    signal_period: usize,
}

impl MACDBuilder {
    pub fn new(fast_period: usize, slow_period: usize, signal_period: usize) -> Self {
        Self {
            fast_period,
            slow_period,
            signal_period,
        }
    }

    pub fn build_from_closes(&self, closes: &[f64]) -> MACD {
        calculate_macd(
            closes,
            self.fast_period,
            self.slow_period,
            self.signal_period,
        )
    }
}

impl Default for MACDBuilder {
    fn default() -> Self {
        Self::new(12, 26, 9)
    }
}

impl<C: Candle> TABuilder<MACD, C> for MACDBuilder {
    fn build(&self, data: &[C]) -> MACD {
        self.build_from_closes(&close_prices(data))
    }
}

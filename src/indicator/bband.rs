use crate::indicator::TABuilder;
use crate::indicator::utils::moving_average;
use crate::model::{Candle, close_prices};
use serde::Serialize;
use std::fmt::{Debug, Display};

/// 마지막 종가의 밴드 내 위치
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BandPosition {
    Above,
    Inside,
    Below,
}

impl BandPosition {
    pub fn label(&self) -> &'static str {
        match self {
            BandPosition::Above => "상단 밴드 돌파",
            BandPosition::Inside => "밴드 내부",
            BandPosition::Below => "하단 밴드 이탈",
        }
    }
}

/// 표준편차 계산 함수 (모집단 표준편차, 최근 `period`개)
fn calculate_standard_deviation(values: &[f64], period: usize) -> f64 {
    if period == 0 || values.len() < period {
        return 0.0;
    }

    let slice = &values[values.len() - period..];
    let mean = slice.iter().sum::<f64>() / period as f64;

    let variance = slice
        .iter()
        .map(|&x| {
            let diff = x - mean;
            diff * diff
        })
        .sum::<f64>()
        / period as f64;

    variance.sqrt()
}

/// 볼린저 밴드 기술적 지표
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BollingerBands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
    pub position: BandPosition,
}

impl BollingerBands {
    /// 데이터 부족 시 결과 (모두 0, 밴드 내부)
    pub fn empty() -> Self {
        BollingerBands {
            upper: 0.0,
            middle: 0.0,
            lower: 0.0,
            position: BandPosition::Inside,
        }
    }

    /// 밴드 폭 (상단 - 하단)
    pub fn band_width(&self) -> f64 {
        self.upper - self.lower
    }
}

impl Display for BollingerBands {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BBand({:.2}, {:.2}, {:.2})",
            self.upper, self.middle, self.lower
        )
    }
}

/// 볼린저 밴드 계산
///
/// 최근 `period`개 종가의 단순 평균과 모집단 표준편차를 사용합니다.
/// 종가가 `period`개 미만이면 [`BollingerBands::empty`]를 반환합니다.
pub fn calculate_bollinger_bands(values: &[f64], period: usize, multiplier: f64) -> BollingerBands {
    let Some(&last) = values.last() else {
        return BollingerBands::empty();
    };
    if period == 0 || values.len() < period {
        return BollingerBands::empty();
    }

    let middle = moving_average::calculate_sma(values, period);
    let std_dev = calculate_standard_deviation(values, period);

    let upper = middle + std_dev * multiplier;
    let lower = middle - std_dev * multiplier;

    let position = if last > upper {
        BandPosition::Above
    } else if last < lower {
        BandPosition::Below
    } else {
        BandPosition::Inside
    };

    BollingerBands {
        upper,
        middle,
        lower,
        position,
    }
}

/// 볼린저 밴드 계산 빌더
#[derive(Debug, Clone, Copy)]
pub struct BollingerBandsBuilder {
    period: usize,
    multiplier: f64,
}

impl BollingerBandsBuilder {
    /// # Arguments
    /// * `period` - 이동평균 기간 (일반적으로 20)
    /// * `multiplier` - 표준편차 배수 (일반적으로 2.0)
    pub fn new(period: usize, multiplier: f64) -> Self {
        Self { period, multiplier }
    }

    pub fn build_from_closes(&self, closes: &[f64]) -> BollingerBands {
        calculate_bollinger_bands(closes, self.period, self.multiplier)
    }
}

impl<C: Candle> TABuilder<BollingerBands, C> for BollingerBandsBuilder {
    fn build(&self, data: &[C]) -> BollingerBands {
        self.build_from_closes(&close_prices(data))
    }
}

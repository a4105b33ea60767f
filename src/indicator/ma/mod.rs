pub mod sma;

use crate::indicator::{TAs, TAsBuilder};
use crate::model::Candle;
use serde::Serialize;
use sma::{SMA, SMABuilder, calculate_sma_series};

/// 분석 결과에 포함되는 이동평균 기간 (단기, 중기, 장기)
pub const MA_PERIODS: [usize; 3] = [5, 20, 60];

/// 여러 기간의 이동평균 컬렉션 타입
pub type SMAs = TAs<usize, SMA>;

/// 여러 기간의 이동평균 빌더 타입
pub type SMAsBuilder<C> = TAsBuilder<usize, SMA, C>;

/// 이동평균 컬렉션 빌더 팩토리
pub struct SMAsBuilderFactory;

impl SMAsBuilderFactory {
    /// 여러 기간의 이동평균 빌더 생성
    ///
    /// 기간 목록은 오름차순이어야 배열(정배열/역배열) 판정이 의미를 가집니다.
    pub fn build<C: Candle + 'static>(periods: &[usize]) -> SMAsBuilder<C> {
        SMAsBuilder::new("smas".to_owned(), periods, |period| {
            Box::new(SMABuilder::new(*period))
        })
    }

    /// 5, 20, 60 기간 빌더
    pub fn build_default<C: Candle + 'static>() -> SMAsBuilder<C> {
        Self::build(&MA_PERIODS)
    }
}

/// 이동평균 배열 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MAArrangement {
    /// 단기 > 중기 > 장기
    Regular,
    /// 단기 < 중기 < 장기
    Reverse,
    /// 그 외
    Mixed,
    /// 가장 긴 기간보다 종가가 적음
    Insufficient,
}

impl MAArrangement {
    /// 이동평균 컬렉션에서 배열 상태 판정
    pub fn from_smas(smas: &SMAs, data_len: usize) -> Self {
        let longest = smas.get_keys().iter().copied().max().unwrap_or(0);
        if data_len < longest {
            MAArrangement::Insufficient
        } else if smas.is_regular_arrangement(|sma| sma.value) {
            MAArrangement::Regular
        } else if smas.is_reverse_arrangement(|sma| sma.value) {
            MAArrangement::Reverse
        } else {
            MAArrangement::Mixed
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MAArrangement::Regular => "정배열",
            MAArrangement::Reverse => "역배열",
            MAArrangement::Mixed => "혼조",
            MAArrangement::Insufficient => "데이터 부족",
        }
    }
}

/// 차트 표시용 이동평균 시계열
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MASeries {
    pub period: usize,
    /// 캔들별 값 (윈도우가 채워지기 전은 `None`)
    pub values: Vec<Option<f64>>,
}

impl MASeries {
    pub fn from_closes(closes: &[f64], period: usize) -> Self {
        MASeries {
            period,
            values: calculate_sma_series(closes, period),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OhlcvCandle;

    fn candles_from_closes(closes: &[f64]) -> Vec<OhlcvCandle> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| OhlcvCandle::new(i as i64, c, c, c, c, 0))
            .collect()
    }

    #[test]
    fn test_regular_arrangement_in_uptrend() {
        let closes: Vec<f64> = (0..80).map(|i| 100.0 + i as f64).collect();
        let candles = candles_from_closes(&closes);
        let smas = SMAsBuilderFactory::build_default::<OhlcvCandle>().build(&candles);
        assert_eq!(
            MAArrangement::from_smas(&smas, candles.len()),
            MAArrangement::Regular
        );
        assert_eq!(MAArrangement::Regular.label(), "정배열");
    }

    #[test]
    fn test_reverse_arrangement_in_downtrend() {
        let closes: Vec<f64> = (0..80).map(|i| 500.0 - i as f64).collect();
        let candles = candles_from_closes(&closes);
        let smas = SMAsBuilderFactory::build_default::<OhlcvCandle>().build(&candles);
        assert_eq!(
            MAArrangement::from_smas(&smas, candles.len()),
            MAArrangement::Reverse
        );
    }

    #[test]
    fn test_insufficient_for_longest_period() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let candles = candles_from_closes(&closes);
        let smas = SMAsBuilderFactory::build_default::<OhlcvCandle>().build(&candles);
        assert_eq!(
            MAArrangement::from_smas(&smas, candles.len()),
            MAArrangement::Insufficient
        );
        assert_eq!(smas.get(&60).map(|sma| sma.value), Some(0.0));
    }
}

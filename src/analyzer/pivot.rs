use crate::model::{Candle, Pivot, PivotKind};
use log::trace;

/// 짧은 시계열(50개 이하) 피벗 윈도우
pub const SHORT_SERIES_WINDOW: usize = 3;
/// 중간 시계열(51~100개) 피벗 윈도우
pub const MEDIUM_SERIES_WINDOW: usize = 5;
/// 긴 시계열(100개 초과) 피벗 윈도우
pub const LONG_SERIES_WINDOW: usize = 7;

/// 고점/저점 피벗 집합
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pivots {
    pub highs: Vec<Pivot>,
    pub lows: Vec<Pivot>,
}

/// 시계열 길이에 따른 피벗 윈도우 크기
///
/// 길이가 길수록 넓은 윈도우를 사용해 잡음성 피벗을 줄입니다.
pub fn window_size_for(len: usize) -> usize {
    match len {
        0..=50 => SHORT_SERIES_WINDOW,
        51..=100 => MEDIUM_SERIES_WINDOW,
        _ => LONG_SERIES_WINDOW,
    }
}

/// 윈도우 극값 검사로 피벗 고점/저점 탐지
///
/// 인덱스 `i`의 고가가 `[i - window, i + window]` 구간의 다른 모든 고가보다 엄격히 크면
/// 고점 피벗입니다 (저점은 저가 기준으로 대칭). 처음과 마지막 `window`개 캔들은 검사하지 않으며,
/// `2 * window + 1`개 미만의 시계열은 빈 결과를 반환합니다.
pub fn detect_pivots<C: Candle>(candles: &[C], window: usize) -> Pivots {
    let mut pivots = Pivots::default();

    if window == 0 || candles.len() < window.saturating_mul(2).saturating_add(1) {
        return pivots;
    }

    for i in window..candles.len() - window {
        let neighbors = (i - window..=i + window).filter(|&j| j != i);
        let current = &candles[i];

        let high = current.high_price();
        if neighbors.clone().all(|j| candles[j].high_price() < high) {
            trace!("피벗 고점: index={}, price={}", i, high);
            pivots.highs.push(Pivot {
                index: i,
                time: current.timestamp(),
                price: high,
                kind: PivotKind::High,
            });
        }

        let low = current.low_price();
        if neighbors.clone().all(|j| candles[j].low_price() > low) {
            trace!("피벗 저점: index={}, price={}", i, low);
            pivots.lows.push(Pivot {
                index: i,
                time: current.timestamp(),
                price: low,
                kind: PivotKind::Low,
            });
        }
    }

    pivots
}

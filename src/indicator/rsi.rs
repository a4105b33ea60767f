use crate::indicator::TABuilder;
use crate::model::{Candle, close_prices};
use serde::Serialize;
use std::fmt::Display;

/// 데이터 부족 시 반환하는 중립 RSI
pub const NEUTRAL_RSI: f64 = 50.0;

/// RSI 계산 함수
///
/// 첫 `period`개 변화량의 단순 평균으로 시작한 뒤, 이후 변화량은 와일더 방식으로 평활화합니다.
/// `period + 1`개 미만의 값이면 중립값 50을 반환하고, 평균 손실이 0이면 100을 반환합니다.
pub fn calculate_rsi(values: &[f64], period: usize) -> f64 {
    if period == 0 || values.len() < period.saturating_add(1) {
        return NEUTRAL_RSI;
    }

    let (gains, losses): (Vec<f64>, Vec<f64>) = values
        .windows(2)
        .map(|pair| {
            let change = pair[1] - pair[0];
            (change.max(0.0), (-change).max(0.0))
        })
        .unzip();

    // 첫 번째 평균 게인/로스 계산
    let mut avg_gain = gains[..period].iter().sum::<f64>() / period as f64;
    let mut avg_loss = losses[..period].iter().sum::<f64>() / period as f64;

    // 나머지 변화량은 와일더 평활화
    for i in period..gains.len() {
        avg_gain = (avg_gain * (period - 1) as f64 + gains[i]) / period as f64;
        avg_loss = (avg_loss * (period - 1) as f64 + losses[i]) / period as f64;
    }

    if avg_loss == 0.0 {
        return 100.0;
    }

    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}

/// 상대강도지수(RSI) 기술적 지표
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RSI {
    /// RSI 계산 기간
    pub period: usize,
    /// RSI 값 (0-100)
    pub value: f64,
}

impl Display for RSI {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RSI({}: {:.2})", self.period, self.value)
    }
}

impl RSI {
    /// RSI가 과매수 상태인지 확인 (일반적으로 70 이상)
    pub fn is_overbought(&self, threshold: Option<f64>) -> bool {
        self.value >= threshold.unwrap_or(70.0)
    }

    /// RSI가 과매도 상태인지 확인 (일반적으로 30 이하)
    pub fn is_oversold(&self, threshold: Option<f64>) -> bool {
        self.value <= threshold.unwrap_or(30.0)
    }

    /// 요약 문구용 구간 라벨
    pub fn zone_label(&self) -> &'static str {
        if self.is_overbought(None) {
            "과매수"
        } else if self.is_oversold(None) {
            "과매도"
        } else {
            "중립"
        }
    }
}

/// 상대강도지수(RSI) 기술적 지표 빌더
#[derive(Debug, Clone, Copy)]
pub struct RSIBuilder {
    period: usize,
}

impl RSIBuilder {
    /// 새 RSI 빌더 생성 (기간 0은 중립값만 반환)
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    /// 종가 시계열에서 RSI 계산
    pub fn build_from_closes(&self, closes: &[f64]) -> RSI {
        RSI {
            period: self.period,
            value: calculate_rsi(closes, self.period),
        }
    }
}

impl<C: Candle> TABuilder<RSI, C> for RSIBuilder {
    fn build(&self, data: &[C]) -> RSI {
        self.build_from_closes(&close_prices(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsi_insufficient_data_is_neutral() {
        let values: Vec<f64> = (0..14).map(|i| i as f64).collect();
        assert_eq!(calculate_rsi(&values, 14), 50.0);
        assert_eq!(calculate_rsi(&[], 14), 50.0);
        assert_eq!(calculate_rsi(&values, usize::MAX), 50.0);
    }

    #[test]
    fn test_rsi_all_gains_is_exactly_100() {
        let values: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let rsi = calculate_rsi(&values, 14);
        assert_eq!(rsi, 100.0);
        assert!(rsi.is_finite());
    }

    #[test]
    fn test_rsi_all_losses_is_zero() {
        let values: Vec<f64> = (0..20).map(|i| 100.0 - i as f64).collect();
        assert_eq!(calculate_rsi(&values, 14), 0.0);
    }

    #[test]
    fn test_rsi_balanced_moves() {
        // +1, -1 반복이면 평균 게인과 로스가 거의 같음
        let values: Vec<f64> = (0..30)
            .map(|i| if i % 2 == 0 { 100.0 } else { 101.0 })
            .collect();
        let rsi = calculate_rsi(&values, 14);
        assert!((rsi - 50.0).abs() < 5.0, "rsi = {}", rsi);
    }

    #[test]
    fn test_rsi_wilder_smoothing_step() {
        // 첫 2개 변화량: +2, -1 => avg_gain 1.0, avg_loss 0.5
        // 세 번째 변화량 +1 => avg_gain (1.0 + 1)/2 = 1.0, avg_loss (0.5 + 0)/2 = 0.25
        let rsi = calculate_rsi(&[10.0, 12.0, 11.0, 12.0], 2);
        let expected = 100.0 - 100.0 / (1.0 + 1.0 / 0.25);
        assert!((rsi - expected).abs() < 1e-9);
    }

    #[test]
    fn test_rsi_zone_label() {
        let rsi = RSI {
            period: 14,
            value: 75.0,
        };
        assert!(rsi.is_overbought(None));
        assert_eq!(rsi.zone_label(), "과매수");

        let rsi = RSI {
            period: 14,
            value: 25.0,
        };
        assert!(rsi.is_oversold(None));
        assert_eq!(rsi.zone_label(), "과매도");
        assert_eq!(format!("{}", rsi), "RSI(14: 25.00)");
    }
}

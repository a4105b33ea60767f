/// 공통 이동평균 계산 함수들
pub mod moving_average {
    /// 단순이동평균(SMA) 계산
    ///
    /// # Arguments
    /// * `values` - 가격 데이터 배열
    /// * `period` - 계산 기간
    ///
    /// # Returns
    /// * `f64` - 최근 `period`개 값의 평균 (데이터가 부족하거나 period가 0이면 0.0 반환)
    pub fn calculate_sma(values: &[f64], period: usize) -> f64 {
        if period == 0 || values.len() < period {
            return 0.0;
        }

        let start_idx = values.len() - period;
        values[start_idx..].iter().sum::<f64>() / period as f64
    }

    /// 지수이동평균(EMA) 계산을 위한 알파값 계산
    ///
    /// # Arguments
    /// * `period` - EMA 기간
    ///
    /// # Returns
    /// * `f64` - 알파값 (평활화 계수 2/(n+1))
    pub fn calculate_ema_alpha(period: usize) -> f64 {
        2.0 / (period as f64 + 1.0)
    }

    /// 지수이동평균(EMA) 한 스텝 계산
    ///
    /// # Arguments
    /// * `current_price` - 현재 가격
    /// * `previous_ema` - 이전 EMA 값
    /// * `alpha` - 평활화 계수
    ///
    /// # Returns
    /// * `f64` - 계산된 EMA 값
    pub fn calculate_ema_step(current_price: f64, previous_ema: f64, alpha: f64) -> f64 {
        alpha * current_price + (1.0 - alpha) * previous_ema
    }

    /// 전체 EMA 시계열 계산
    ///
    /// 첫 번째 값을 초기값으로 사용합니다 (SMA 초기화가 아님).
    /// 입력과 같은 길이의 벡터를 반환합니다.
    pub fn calculate_ema_series(values: &[f64], period: usize) -> Vec<f64> {
        let Some(&first) = values.first() else {
            return Vec::new();
        };

        let alpha = calculate_ema_alpha(period);
        let mut ema = first;
        let mut series = Vec::with_capacity(values.len());
        series.push(ema);

        for &price in &values[1..] {
            ema = calculate_ema_step(price, ema, alpha);
            series.push(ema);
        }

        series
    }
}

#[cfg(test)]
mod tests {
    use super::moving_average::*;

    #[test]
    fn test_calculate_sma() {
        assert_eq!(calculate_sma(&[1.0, 2.0, 3.0, 4.0], 2), 3.5);
        assert_eq!(calculate_sma(&[1.0, 2.0], 3), 0.0);
        assert_eq!(calculate_sma(&[1.0, 2.0], 0), 0.0);
    }

    #[test]
    fn test_ema_series_seeded_by_first_value() {
        let series = calculate_ema_series(&[10.0, 20.0, 20.0], 3);
        assert_eq!(series.len(), 3);
        assert_eq!(series[0], 10.0);
        // alpha = 0.5
        assert!((series[1] - 15.0).abs() < 1e-12);
        assert!((series[2] - 17.5).abs() < 1e-12);
    }

    #[test]
    fn test_ema_series_empty() {
        assert!(calculate_ema_series(&[], 12).is_empty());
    }
}

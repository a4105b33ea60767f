use crate::config_loader::{ConfigError, ConfigResult, ConfigValidation};
use serde::{Deserialize, Serialize};

/// 분석에 필요한 최소 캔들 수
pub const MIN_CANDLES: usize = 15;
/// 추세 판정 기울기 임계값 (캔들 한 칸당 가격 변화)
pub const TREND_SLOPE_THRESHOLD: f64 = 0.5;
/// 지지/저항 전환 상대 허용 오차
pub const SR_FLIP_TOLERANCE: f64 = 0.03;
/// 표시할 지지/저항 전환 라인 최대 개수
pub const MAX_FLIP_LINES: usize = 2;
/// 전환 라인을 마지막 재테스트 이후로 연장할 캔들 수
pub const FLIP_EXTENSION: usize = 5;
/// 3-3 법칙의 한쪽 최소 피벗 수
pub const CONFIRMATION_PIVOTS: usize = 3;
/// 지표 기간 상한
pub const MAX_INDICATOR_PERIOD: usize = 1_000;
/// 전환 라인 연장 상한
pub const MAX_FLIP_EXTENSION: usize = 1_000;

/// 차트 분석 설정
///
/// 모든 필드는 기본값을 가지므로 설정 파일에는 바꾸려는 값만 적으면 됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub min_candles: usize,
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bband_period: usize,
    pub bband_multiplier: f64,
    pub trend_slope_threshold: f64,
    pub sr_flip_tolerance: f64,
    pub max_flip_lines: usize,
    pub flip_extension: usize,
    pub confirmation_pivots: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            min_candles: MIN_CANDLES,
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bband_period: 20,
            bband_multiplier: 2.0,
            trend_slope_threshold: TREND_SLOPE_THRESHOLD,
            sr_flip_tolerance: SR_FLIP_TOLERANCE,
            max_flip_lines: MAX_FLIP_LINES,
            flip_extension: FLIP_EXTENSION,
            confirmation_pivots: CONFIRMATION_PIVOTS,
        }
    }
}

impl ConfigValidation for AnalysisConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.min_candles < 3 {
            return Err(ConfigError::ValidationError(format!(
                "최소 캔들 수는 3 이상이어야 합니다: {}",
                self.min_candles
            )));
        }

        let periods = [
            ("rsi_period", self.rsi_period),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_signal", self.macd_signal),
            ("bband_period", self.bband_period),
        ];
        if let Some((name, _)) = periods.iter().find(|(_, period)| *period == 0) {
            return Err(ConfigError::ValidationError(format!(
                "{}는 0보다 커야 합니다",
                name
            )));
        }
        if let Some((name, period)) = periods
            .iter()
            .find(|(_, period)| *period > MAX_INDICATOR_PERIOD)
        {
            return Err(ConfigError::ValidationError(format!(
                "{}는 {} 이하여야 합니다: {}",
                name, MAX_INDICATOR_PERIOD, period
            )));
        }

        if self.flip_extension > MAX_FLIP_EXTENSION {
            return Err(ConfigError::ValidationError(format!(
                "전환 라인 연장은 {} 이하여야 합니다: {}",
                MAX_FLIP_EXTENSION, self.flip_extension
            )));
        }

        if self.macd_fast >= self.macd_slow {
            return Err(ConfigError::ValidationError(format!(
                "MACD 빠른 기간({})은 느린 기간({})보다 작아야 합니다",
                self.macd_fast, self.macd_slow
            )));
        }

        if self.bband_multiplier <= 0.0 {
            return Err(ConfigError::ValidationError(
                "볼린저 밴드 배수는 0보다 커야 합니다".to_string(),
            ));
        }

        if self.sr_flip_tolerance <= 0.0 {
            return Err(ConfigError::ValidationError(
                "지지/저항 전환 허용 오차는 0보다 커야 합니다".to_string(),
            ));
        }

        if self.trend_slope_threshold < 0.0 {
            return Err(ConfigError::ValidationError(
                "추세 기울기 임계값은 음수일 수 없습니다".to_string(),
            ));
        }

        Ok(())
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display};

/// 캔들 데이터 접근 인터페이스
///
/// 분석 엔진은 이 트레이트만으로 캔들 값을 읽으며, 입력 캔들을 변경하지 않습니다.
pub trait Candle: Debug {
    /// 캔들 시작 시각 (유닉스 타임스탬프, 초)
    fn timestamp(&self) -> i64;
    /// 시가
    fn open_price(&self) -> f64;
    /// 고가
    fn high_price(&self) -> f64;
    /// 저가
    fn low_price(&self) -> f64;
    /// 종가
    fn close_price(&self) -> f64;
    /// 거래량
    fn volume(&self) -> u64;

    /// 타임스탬프를 UTC 시각으로 변환
    ///
    /// 범위를 벗어난 타임스탬프는 유닉스 기준 시각으로 대체됩니다.
    fn datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.timestamp(), 0).unwrap_or_default()
    }
}

/// 기본 OHLCV 캔들
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OhlcvCandle {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl OhlcvCandle {
    pub fn new(time: i64, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Self {
        OhlcvCandle {
            time,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

impl Display for OhlcvCandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Candle(t={}, o={}, h={}, l={}, c={}, v={})",
            self.time, self.open, self.high, self.low, self.close, self.volume
        )
    }
}

impl Candle for OhlcvCandle {
    fn timestamp(&self) -> i64 {
        self.time
    }
    fn open_price(&self) -> f64 {
        self.open
    }
    fn high_price(&self) -> f64 {
        self.high
    }
    fn low_price(&self) -> f64 {
        self.low
    }
    fn close_price(&self) -> f64 {
        self.close
    }
    fn volume(&self) -> u64 {
        self.volume
    }
}

/// 피벗 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PivotKind {
    /// 국소 고점
    High,
    /// 국소 저점
    Low,
}

/// 캔들 시퀀스 내의 국소 극값
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pivot {
    /// 캔들 시퀀스 내 위치
    pub index: usize,
    pub time: i64,
    pub price: f64,
    pub kind: PivotKind,
}

/// 종가 시계열 추출
pub fn close_prices<C: Candle>(candles: &[C]) -> Vec<f64> {
    candles.iter().map(|candle| candle.close_price()).collect()
}

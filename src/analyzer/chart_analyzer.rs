use crate::analyzer::channel::{
    Channel, ChannelBound, ChannelLine, ChannelLineKind, ChannelPosition, build_channel,
    channel_lines,
};
use crate::analyzer::config::AnalysisConfig;
use crate::analyzer::pivot::{Pivots, detect_pivots, window_size_for};
use crate::analyzer::regression;
use crate::analyzer::sr_flip::find_flips;
use crate::indicator::IndicatorBundle;
use crate::indicator::ma::{MA_PERIODS, MASeries};
use crate::model::{Candle, Pivot, close_prices};
use log::debug;
use serde::Serialize;

/// 데이터 부족 결과의 고정 요약 문구
pub const INSUFFICIENT_DATA_SUMMARY: &str = "데이터 부족: 차트 패턴을 분석하기에 캔들 수가 충분하지 않습니다.";

/// 추세 방향
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Up,
    Down,
    Flat,
}

impl TrendDirection {
    /// 기울기가 `threshold`보다 크면 상승, `-threshold`보다 작으면 하락
    pub fn from_slope(slope: f64, threshold: f64) -> Self {
        if slope > threshold {
            TrendDirection::Up
        } else if slope < -threshold {
            TrendDirection::Down
        } else {
            TrendDirection::Flat
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TrendDirection::Up => "상승",
            TrendDirection::Down => "하락",
            TrendDirection::Flat => "횡보",
        }
    }
}

/// 추세 기울기의 출처
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendSource {
    /// 채널 기울기
    Channel,
    /// 채널이 없을 때 종가 회귀 기울기
    CloseRegression,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Trend {
    pub direction: TrendDirection,
    /// 캔들 한 칸당 가격 변화
    pub slope: f64,
    pub source: TrendSource,
}

/// 3-3 법칙 (고점 3개, 저점 3개 이상이면 신뢰도 높은 채널)
///
/// 채널 생성 여부에는 영향을 주지 않는 참고용 판정입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThreeThreeRule {
    pub high_count: usize,
    pub low_count: usize,
    pub highs_satisfied: bool,
    pub lows_satisfied: bool,
}

impl ThreeThreeRule {
    pub fn new(high_count: usize, low_count: usize, required: usize) -> Self {
        ThreeThreeRule {
            high_count,
            low_count,
            highs_satisfied: high_count >= required,
            lows_satisfied: low_count >= required,
        }
    }

    pub fn is_satisfied(&self) -> bool {
        self.highs_satisfied && self.lows_satisfied
    }
}

/// 차트 분석 결과
///
/// 차트 오버레이 렌더러와 서술 생성기에 전달되는 유일한 출력입니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    /// 캔들이 부족해 분석을 생략했는지 여부
    pub insufficient_data: bool,
    /// 사용한 피벗 윈도우 크기 (데이터 부족 시 0)
    pub window_size: usize,
    pub highs: Vec<Pivot>,
    pub lows: Vec<Pivot>,
    pub channel: Option<Channel>,
    /// 채널 라인(상단, 하단, 중심선) 뒤에 지지/저항 전환 라인
    pub lines: Vec<ChannelLine>,
    pub indicators: Option<IndicatorBundle>,
    pub trend: Option<Trend>,
    /// 마지막 종가의 채널 내 위치
    pub position: Option<ChannelPosition>,
    pub three_three_rule: Option<ThreeThreeRule>,
    /// 차트 표시용 이동평균 시계열
    pub ma_series: Vec<MASeries>,
    pub summary: String,
}

impl AnalysisResult {
    /// 데이터 부족 결과
    pub fn insufficient() -> Self {
        AnalysisResult {
            insufficient_data: true,
            window_size: 0,
            highs: Vec::new(),
            lows: Vec::new(),
            channel: None,
            lines: Vec::new(),
            indicators: None,
            trend: None,
            position: None,
            three_three_rule: None,
            ma_series: Vec::new(),
            summary: INSUFFICIENT_DATA_SUMMARY.to_string(),
        }
    }

    /// 특정 종류의 라인 목록
    pub fn lines_of(&self, kind: ChannelLineKind) -> impl Iterator<Item = &ChannelLine> {
        self.lines.iter().filter(move |line| line.kind == kind)
    }
}

/// 캔들 시퀀스에서 피벗, 추세 채널, 지지/저항 전환, 기술적 지표를 계산하는 분석기
///
/// 상태를 갖지 않으므로 여러 스레드에서 동시에 사용할 수 있습니다.
#[derive(Debug, Clone, Default)]
pub struct ChartAnalyzer {
    config: AnalysisConfig,
}

impl ChartAnalyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        ChartAnalyzer { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// 캔들 시퀀스 분석
    ///
    /// 캔들이 `min_candles`개 미만이면 [`AnalysisResult::insufficient`]를 반환합니다.
    /// 채널을 만들 수 없어도 지표와 지지/저항 전환은 계산합니다.
    pub fn analyze<C: Candle + 'static>(&self, candles: &[C]) -> AnalysisResult {
        let config = &self.config;
        if candles.is_empty() || candles.len() < config.min_candles {
            debug!(
                "데이터 부족: 캔들 {}개 (최소 {}개)",
                candles.len(),
                config.min_candles
            );
            return AnalysisResult::insufficient();
        }

        let window_size = window_size_for(candles.len());
        let Pivots { highs, lows } = detect_pivots(candles, window_size);
        debug!(
            "피벗 탐지: window={}, highs={}, lows={}",
            window_size,
            highs.len(),
            lows.len()
        );

        // 피벗이 더 많은 쪽을 기준으로 (같으면 고점)
        let base_is_upper = highs.len() >= lows.len();
        let channel = if base_is_upper {
            build_channel(&highs, &lows, true)
        } else {
            build_channel(&lows, &highs, false)
        };
        match &channel {
            Some(c) => debug!(
                "채널 생성: base={:?}, slope={:.4}, offset={:.4}, r2={:.4}",
                c.base, c.slope, c.offset, c.r_squared
            ),
            None => debug!("채널 생성 불가: 기준 피벗 부족"),
        }

        let mut lines = channel
            .as_ref()
            .map(|c| channel_lines(candles, c))
            .unwrap_or_default();

        let mut flips = find_flips(
            candles,
            &highs,
            &lows,
            config.sr_flip_tolerance,
            config.flip_extension,
        );
        debug!("지지/저항 전환: {}개 탐지", flips.len());
        flips.truncate(config.max_flip_lines);
        lines.extend(flips);

        let indicators = IndicatorBundle::build(candles, config);

        let closes = close_prices(candles);
        let last_index = candles.len() - 1;
        let last_close = closes[last_index];

        let trend = match &channel {
            Some(c) => Trend {
                direction: TrendDirection::from_slope(c.slope, config.trend_slope_threshold),
                slope: c.slope,
                source: TrendSource::Channel,
            },
            None => {
                let points: Vec<(f64, f64)> = closes
                    .iter()
                    .enumerate()
                    .map(|(i, &close)| (i as f64, close))
                    .collect();
                let slope = regression::fit(&points).slope;
                Trend {
                    direction: TrendDirection::from_slope(slope, config.trend_slope_threshold),
                    slope,
                    source: TrendSource::CloseRegression,
                }
            }
        };

        let position = channel.map(|c| c.position_of(last_index, last_close));
        let three_three_rule =
            ThreeThreeRule::new(highs.len(), lows.len(), config.confirmation_pivots);

        let ma_series = MA_PERIODS
            .iter()
            .map(|&period| MASeries::from_closes(&closes, period))
            .collect();

        let mut result = AnalysisResult {
            insufficient_data: false,
            window_size,
            highs,
            lows,
            channel,
            lines,
            indicators: Some(indicators),
            trend: Some(trend),
            position,
            three_three_rule: Some(three_three_rule),
            ma_series,
            summary: String::new(),
        };
        result.summary = compose_summary(candles, &result);
        result
    }
}

/// 기본 설정으로 캔들 시퀀스 분석
pub fn analyze<C: Candle + 'static>(candles: &[C]) -> AnalysisResult {
    ChartAnalyzer::default().analyze(candles)
}

fn satisfied_label(satisfied: bool) -> &'static str {
    if satisfied { "충족" } else { "미충족" }
}

/// 서술 생성기에 전달할 요약 문구 작성
fn compose_summary<C: Candle>(candles: &[C], result: &AnalysisResult) -> String {
    let (Some(first), Some(last)) = (candles.first(), candles.last()) else {
        return INSUFFICIENT_DATA_SUMMARY.to_string();
    };
    let last_index = candles.len() - 1;
    let last_close = last.close_price();

    let mut lines = vec![format!(
        "[차트 분석] 캔들 {}개 ({} ~ {})",
        candles.len(),
        first.datetime().format("%Y-%m-%d"),
        last.datetime().format("%Y-%m-%d")
    )];

    if let Some(trend) = &result.trend {
        let source = match trend.source {
            TrendSource::Channel => "채널 기준",
            TrendSource::CloseRegression => "종가 회귀 기준",
        };
        lines.push(format!(
            "추세: {} (기울기 {:+.2}/캔들, {})",
            trend.direction.label(),
            trend.slope,
            source
        ));
    }

    lines.push(match (&result.channel, &result.position) {
        (Some(channel), Some(position)) => format!(
            "채널: {}, 상단 {:.0} / 중심 {:.0} / 하단 {:.0}, 현재가 {:.0} ({})",
            channel.base.label(),
            channel.value_at(ChannelBound::Top, last_index),
            channel.value_at(ChannelBound::Mid, last_index),
            channel.value_at(ChannelBound::Bottom, last_index),
            last_close,
            position
        ),
        _ => "채널: 형성되지 않음 (피벗 부족)".to_string(),
    });

    if let Some(rule) = &result.three_three_rule {
        lines.push(format!(
            "3-3 법칙: 고점 {}개 ({}), 저점 {}개 ({})",
            rule.high_count,
            satisfied_label(rule.highs_satisfied),
            rule.low_count,
            satisfied_label(rule.lows_satisfied)
        ));
    }

    let flip_count = result
        .lines_of(ChannelLineKind::SupportResistanceFlip)
        .count();
    lines.push(format!("지지/저항 전환: {}개", flip_count));

    if let Some(indicators) = &result.indicators {
        let rsi = &indicators.rsi;
        lines.push(format!(
            "RSI({}): {:.2} ({})",
            rsi.period,
            rsi.value,
            rsi.zone_label()
        ));

        let macd = &indicators.macd;
        lines.push(format!(
            "MACD: {:.2} / 시그널 {:.2} / 히스토그램 {:.2} ({})",
            macd.macd,
            macd.signal,
            macd.histogram,
            macd.trend.label()
        ));

        let bands = &indicators.bollinger;
        lines.push(format!(
            "볼린저밴드: 상단 {:.2} / 중심 {:.2} / 하단 {:.2} ({})",
            bands.upper,
            bands.middle,
            bands.lower,
            bands.position.label()
        ));

        lines.push(format!(
            "이동평균: MA5 {:.2} / MA20 {:.2} / MA60 {:.2} ({})",
            indicators.ma5,
            indicators.ma20,
            indicators.ma60,
            indicators.ma_arrangement.label()
        ));
    }

    lines.join("\n")
}

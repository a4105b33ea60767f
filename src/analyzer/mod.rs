// 차트 패턴 분석 모듈
// 피벗 탐지, 회귀 채널, 지지/저항 전환, 분석 결과 조립을 제공합니다.

pub mod channel;
pub mod chart_analyzer;
pub mod config;
pub mod pivot;
pub mod regression;
pub mod sr_flip;

pub use channel::{
    Channel, ChannelBase, ChannelBound, ChannelLine, ChannelLineKind, ChannelPosition, ChartPoint,
    LineStyle, build_channel, channel_lines,
};
pub use chart_analyzer::{
    AnalysisResult, ChartAnalyzer, INSUFFICIENT_DATA_SUMMARY, ThreeThreeRule, Trend,
    TrendDirection, TrendSource, analyze,
};
pub use config::AnalysisConfig;
pub use pivot::{Pivots, detect_pivots, window_size_for};
pub use regression::LinearFit;
pub use sr_flip::find_flips;

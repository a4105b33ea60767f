pub mod analyzer;
pub mod indicator;
pub mod model;

/// 설정 로더
pub mod config_loader;

pub use analyzer::{AnalysisConfig, AnalysisResult, ChartAnalyzer, analyze};
pub use model::{Candle, OhlcvCandle, Pivot, PivotKind};

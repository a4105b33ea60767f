use crate::analyzer::regression::{self, LinearFit};
use crate::model::{Candle, Pivot};
use serde::Serialize;
use std::fmt::Display;

/// 차트 오버레이 라인 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelLineKind {
    ChannelTop,
    ChannelBottom,
    Midline,
    SupportResistanceFlip,
}

/// 라인 스타일
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    Solid,
    Dashed,
}

/// 라인 위의 한 점 (캔들 시각, 가격)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartPoint {
    pub time: i64,
    pub value: f64,
}

/// 차트 렌더러와 서술 생성기가 사용하는 라인
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelLine {
    pub kind: ChannelLineKind,
    pub label: String,
    pub style: LineStyle,
    /// 시간 순서의 점 목록
    pub points: Vec<ChartPoint>,
}

/// 채널을 이루는 세 직선
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelBound {
    Top,
    Bottom,
    Mid,
}

/// 채널의 기준이 된 피벗 집합
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelBase {
    /// 고점 회귀선이 상단 (저항선 기준)
    Resistance,
    /// 저점 회귀선이 하단 (지지선 기준)
    Support,
}

impl ChannelBase {
    pub fn label(&self) -> &'static str {
        match self {
            ChannelBase::Resistance => "저항선 기준",
            ChannelBase::Support => "지지선 기준",
        }
    }
}

/// 현재가의 채널 내 위치
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelPosition {
    AboveTop,
    UpperHalf,
    LowerHalf,
    BelowBottom,
}

impl ChannelPosition {
    pub fn label(&self) -> &'static str {
        match self {
            ChannelPosition::AboveTop => "채널 상단 돌파",
            ChannelPosition::UpperHalf => "채널 상단 절반",
            ChannelPosition::LowerHalf => "채널 하단 절반",
            ChannelPosition::BelowBottom => "채널 하단 이탈",
        }
    }
}

impl Display for ChannelPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 평행 추세 채널
///
/// 세 직선(상단, 하단, 중심선)은 같은 기울기를 공유하며 절편만 다릅니다.
/// 기울기 단위는 캔들 한 칸당 가격 변화입니다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Channel {
    pub base: ChannelBase,
    pub slope: f64,
    /// 기준 피벗 회귀선 절편
    pub base_intercept: f64,
    /// 반대편 피벗을 모두 포함하도록 이동한 평행선 절편
    pub parallel_intercept: f64,
    /// 기준선과 평행선 사이 거리 (0 이상)
    pub offset: f64,
    /// 기준 피벗 회귀의 결정계수
    pub r_squared: f64,
}

impl Channel {
    pub fn top_intercept(&self) -> f64 {
        match self.base {
            ChannelBase::Resistance => self.base_intercept,
            ChannelBase::Support => self.parallel_intercept,
        }
    }

    pub fn bottom_intercept(&self) -> f64 {
        match self.base {
            ChannelBase::Resistance => self.parallel_intercept,
            ChannelBase::Support => self.base_intercept,
        }
    }

    /// 중심선 절편 (상단/하단 절편의 평균)
    pub fn mid_intercept(&self) -> f64 {
        (self.top_intercept() + self.bottom_intercept()) / 2.0
    }

    /// 캔들 인덱스에서의 라인 값
    pub fn value_at(&self, bound: ChannelBound, index: usize) -> f64 {
        let intercept = match bound {
            ChannelBound::Top => self.top_intercept(),
            ChannelBound::Bottom => self.bottom_intercept(),
            ChannelBound::Mid => self.mid_intercept(),
        };
        self.slope * index as f64 + intercept
    }

    /// 인덱스 위치의 가격이 채널 어디에 있는지 판정
    pub fn position_of(&self, index: usize, price: f64) -> ChannelPosition {
        let top = self.value_at(ChannelBound::Top, index);
        let bottom = self.value_at(ChannelBound::Bottom, index);
        let mid = self.value_at(ChannelBound::Mid, index);

        if price > top {
            ChannelPosition::AboveTop
        } else if price < bottom {
            ChannelPosition::BelowBottom
        } else if price >= mid {
            ChannelPosition::UpperHalf
        } else {
            ChannelPosition::LowerHalf
        }
    }
}

/// 피벗 목록을 (인덱스, 가격) 점으로 변환
fn pivot_points(pivots: &[Pivot]) -> Vec<(f64, f64)> {
    pivots.iter().map(|p| (p.index as f64, p.price)).collect()
}

/// 기준 피벗 회귀선과 반대편 피벗을 감싸는 평행선으로 채널 구성
///
/// 기준 피벗이 2개 미만이면 `None`을 반환합니다. 평행선은 기준선에서 반대편 피벗까지의
/// 최대 수직 거리만큼 이동하며, 기준선의 잘못된 쪽에 있는 피벗은 거리 0으로 취급합니다.
pub fn build_channel(base_pivots: &[Pivot], opposite_pivots: &[Pivot], base_is_upper: bool) -> Option<Channel> {
    if base_pivots.len() < 2 {
        return None;
    }

    let LinearFit {
        slope,
        intercept,
        r_squared,
    } = regression::fit(&pivot_points(base_pivots));

    let offset = opposite_pivots
        .iter()
        .map(|pivot| {
            let line_value = slope * pivot.index as f64 + intercept;
            if base_is_upper {
                line_value - pivot.price
            } else {
                pivot.price - line_value
            }
        })
        .fold(0.0_f64, f64::max);

    let (base, parallel_intercept) = if base_is_upper {
        (ChannelBase::Resistance, intercept - offset)
    } else {
        (ChannelBase::Support, intercept + offset)
    };

    Some(Channel {
        base,
        slope,
        base_intercept: intercept,
        parallel_intercept,
        offset,
        r_squared,
    })
}

/// 라인 표시용 대표 인덱스 (처음, 가운데, 마지막)
fn canonical_indices(len: usize) -> Vec<usize> {
    if len == 0 {
        return Vec::new();
    }
    let last = len - 1;
    let mut indices = vec![0, last / 2, last];
    indices.dedup();
    indices
}

/// 직선의 대표 인덱스 값 (반올림)
///
/// `slope * index + intercept`를 반올림한 (인덱스, 값) 목록을 반환합니다.
pub fn line_values(slope: f64, intercept: f64, len: usize) -> Vec<(usize, f64)> {
    canonical_indices(len)
        .into_iter()
        .map(|index| (index, (slope * index as f64 + intercept).round()))
        .collect()
}

/// 채널을 상단/하단/중심선 라인으로 렌더링
///
/// 중심선의 각 점은 같은 인덱스의 반올림된 상단/하단 값의 평균이므로,
/// 렌더링된 점에서도 중심선 = (상단 + 하단) / 2 가 정확히 성립합니다.
pub fn channel_lines<C: Candle>(candles: &[C], channel: &Channel) -> Vec<ChannelLine> {
    let top = line_values(channel.slope, channel.top_intercept(), candles.len());
    let bottom = line_values(channel.slope, channel.bottom_intercept(), candles.len());

    let to_points = |values: &[(usize, f64)]| {
        values
            .iter()
            .map(|&(index, value)| ChartPoint {
                time: candles[index].timestamp(),
                value,
            })
            .collect::<Vec<_>>()
    };

    let mid: Vec<(usize, f64)> = top
        .iter()
        .zip(bottom.iter())
        .map(|(&(index, top_value), &(_, bottom_value))| (index, (top_value + bottom_value) / 2.0))
        .collect();

    vec![
        ChannelLine {
            kind: ChannelLineKind::ChannelTop,
            label: "채널 상단".to_string(),
            style: LineStyle::Solid,
            points: to_points(&top),
        },
        ChannelLine {
            kind: ChannelLineKind::ChannelBottom,
            label: "채널 하단".to_string(),
            style: LineStyle::Solid,
            points: to_points(&bottom),
        },
        ChannelLine {
            kind: ChannelLineKind::Midline,
            label: "채널 중심선".to_string(),
            style: LineStyle::Dashed,
            points: to_points(&mid),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OhlcvCandle, PivotKind};

    fn pivot(index: usize, price: f64, kind: PivotKind) -> Pivot {
        Pivot {
            index,
            time: index as i64,
            price,
            kind,
        }
    }

    #[test]
    fn test_requires_two_base_pivots() {
        let highs = [pivot(5, 110.0, PivotKind::High)];
        let lows = [pivot(8, 90.0, PivotKind::Low), pivot(12, 91.0, PivotKind::Low)];
        assert!(build_channel(&highs, &lows, true).is_none());
        assert!(build_channel(&[], &lows, true).is_none());
    }

    #[test]
    fn test_resistance_anchored_channel() {
        // 고점: y = 100 + 0.5x
        let highs = [
            pivot(10, 105.0, PivotKind::High),
            pivot(30, 115.0, PivotKind::High),
            pivot(50, 125.0, PivotKind::High),
        ];
        // 기준선까지 저점 거리: 10, 20 (최대), 5
        let lows = [
            pivot(20, 100.0, PivotKind::Low),
            pivot(40, 100.0, PivotKind::Low),
            pivot(45, 117.5, PivotKind::Low),
        ];
        let channel = build_channel(&highs, &lows, true).unwrap();

        assert_eq!(channel.base, ChannelBase::Resistance);
        assert!((channel.slope - 0.5).abs() < 1e-12);
        assert!((channel.base_intercept - 100.0).abs() < 1e-9);
        assert!((channel.offset - 20.0).abs() < 1e-9);
        assert!((channel.parallel_intercept - 80.0).abs() < 1e-9);
        assert!((channel.top_intercept() - 100.0).abs() < 1e-9);
        assert!((channel.bottom_intercept() - 80.0).abs() < 1e-9);
        assert!((channel.mid_intercept() - 90.0).abs() < 1e-9);
        assert!((channel.r_squared - 1.0).abs() < 1e-12);

        // 모든 저점이 하단선 위 또는 선 위에 있음
        for low in &lows {
            assert!(low.price >= channel.value_at(ChannelBound::Bottom, low.index) - 1e-9);
        }
    }

    #[test]
    fn test_support_anchored_channel() {
        let lows = [
            pivot(0, 50.0, PivotKind::Low),
            pivot(10, 50.0, PivotKind::Low),
            pivot(20, 50.0, PivotKind::Low),
        ];
        let highs = [pivot(5, 58.0, PivotKind::High), pivot(15, 62.0, PivotKind::High)];
        let channel = build_channel(&lows, &highs, false).unwrap();

        assert_eq!(channel.base, ChannelBase::Support);
        assert_eq!(channel.slope, 0.0);
        assert_eq!(channel.bottom_intercept(), 50.0);
        assert_eq!(channel.top_intercept(), 62.0);
        assert_eq!(channel.offset, 12.0);
    }

    #[test]
    fn test_offset_never_negative() {
        // 반대편 피벗이 모두 기준선의 잘못된 쪽에 있음
        let highs = [pivot(0, 100.0, PivotKind::High), pivot(10, 100.0, PivotKind::High)];
        let lows = [pivot(5, 120.0, PivotKind::Low)];
        let channel = build_channel(&highs, &lows, true).unwrap();
        assert_eq!(channel.offset, 0.0);
        assert_eq!(channel.top_intercept(), channel.bottom_intercept());

        let channel = build_channel(&highs, &[], true).unwrap();
        assert_eq!(channel.offset, 0.0);
    }

    #[test]
    fn test_position_of() {
        let channel = Channel {
            base: ChannelBase::Resistance,
            slope: 1.0,
            base_intercept: 110.0,
            parallel_intercept: 90.0,
            offset: 20.0,
            r_squared: 1.0,
        };
        // 인덱스 10: 상단 120, 중심 110, 하단 100
        assert_eq!(channel.position_of(10, 121.0), ChannelPosition::AboveTop);
        assert_eq!(channel.position_of(10, 115.0), ChannelPosition::UpperHalf);
        assert_eq!(channel.position_of(10, 110.0), ChannelPosition::UpperHalf);
        assert_eq!(channel.position_of(10, 105.0), ChannelPosition::LowerHalf);
        assert_eq!(channel.position_of(10, 99.0), ChannelPosition::BelowBottom);
    }

    #[test]
    fn test_value_at_bounds() {
        let channel = Channel {
            base: ChannelBase::Support,
            slope: -0.5,
            base_intercept: 40.0,
            parallel_intercept: 60.0,
            offset: 20.0,
            r_squared: 1.0,
        };
        assert_eq!(channel.value_at(ChannelBound::Top, 20), 50.0);
        assert_eq!(channel.value_at(ChannelBound::Bottom, 20), 30.0);
        assert_eq!(channel.value_at(ChannelBound::Mid, 20), 40.0);
    }

    #[test]
    fn test_line_values_canonical_points() {
        let values = line_values(0.25, 10.2, 11);
        assert_eq!(values, vec![(0, 10.0), (5, 11.0), (10, 13.0)]);
        assert_eq!(line_values(1.0, 0.0, 2), vec![(0, 0.0), (1, 1.0)]);
        assert!(line_values(1.0, 0.0, 0).is_empty());
    }

    #[test]
    fn test_rendered_midline_is_mean_of_top_and_bottom() {
        let candles: Vec<OhlcvCandle> = (0..31)
            .map(|i| OhlcvCandle::new(1000 + i, 1.0, 1.0, 1.0, 1.0, 0))
            .collect();
        let channel = Channel {
            base: ChannelBase::Support,
            slope: 0.37,
            base_intercept: 9.4,
            parallel_intercept: 20.9,
            offset: 11.5,
            r_squared: 0.8,
        };
        let lines = channel_lines(&candles, &channel);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].kind, ChannelLineKind::ChannelTop);
        assert_eq!(lines[1].kind, ChannelLineKind::ChannelBottom);
        assert_eq!(lines[2].kind, ChannelLineKind::Midline);
        assert_eq!(lines[2].style, LineStyle::Dashed);

        let times: Vec<i64> = lines[0].points.iter().map(|p| p.time).collect();
        assert_eq!(times, vec![1000, 1015, 1030]);

        for i in 0..3 {
            let top = lines[0].points[i].value;
            let bottom = lines[1].points[i].value;
            assert_eq!(lines[2].points[i].value, (top + bottom) / 2.0);
        }
    }
}

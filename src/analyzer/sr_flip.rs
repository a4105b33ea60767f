use crate::analyzer::channel::{ChannelLine, ChannelLineKind, ChartPoint, LineStyle};
use crate::model::{Candle, Pivot};
use log::trace;

/// 저항 → 지지 전환 라인 탐지
///
/// 각 고점 피벗에 대해, 이후에 나온 저점 피벗 중 가격이 고점 가격의 상대 허용 오차
/// (`|저점 - 고점| / 고점 < tolerance`) 이내인 것을 찾습니다. 하나 이상 있으면 고점 시각에서
/// 마지막 해당 저점 인덱스 + `extension` 캔들(시계열 끝으로 제한)까지 고점 가격의 수평선을 만듭니다.
///
/// 결과는 탐지 순서(고점 순서)이며 개수 제한이 없습니다. 표시 개수 제한은 호출자가 적용합니다.
pub fn find_flips<C: Candle>(
    candles: &[C],
    highs: &[Pivot],
    lows: &[Pivot],
    tolerance: f64,
    extension: usize,
) -> Vec<ChannelLine> {
    let Some(last_index) = candles.len().checked_sub(1) else {
        return Vec::new();
    };

    highs
        .iter()
        .filter(|high| high.price != 0.0)
        .filter_map(|high| {
            let last_retest = lows
                .iter()
                .filter(|low| {
                    low.index > high.index
                        && ((low.price - high.price) / high.price).abs() < tolerance
                })
                .map(|low| low.index)
                .last()?;

            let end_index = last_retest.saturating_add(extension).min(last_index);
            let start_index = high.index.min(last_index);
            trace!(
                "지지/저항 전환: price={}, start={}, end={}",
                high.price, start_index, end_index
            );

            Some(ChannelLine {
                kind: ChannelLineKind::SupportResistanceFlip,
                label: format!("지지/저항 전환 {:.0}", high.price),
                style: LineStyle::Dashed,
                points: vec![
                    ChartPoint {
                        time: candles[start_index].timestamp(),
                        value: high.price,
                    },
                    ChartPoint {
                        time: candles[end_index].timestamp(),
                        value: high.price,
                    },
                ],
            })
        })
        .collect()
}

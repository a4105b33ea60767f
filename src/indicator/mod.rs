// 기술적 지표 모듈
// 종가 시계열에 대한 RSI, MACD, 볼린저 밴드, 이동평균을 제공합니다.

pub mod bband;
pub mod ma;
pub mod macd;
pub mod rsi;
pub mod utils;

use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;

use crate::analyzer::config::AnalysisConfig;
use crate::model::{Candle, close_prices};
use bband::{BollingerBands, BollingerBandsBuilder};
use ma::{MA_PERIODS, MAArrangement, SMAsBuilderFactory};
use macd::{MACD, MACDBuilder};
use rsi::{RSI, RSIBuilder};
use serde::Serialize;

/// 기술적 지표(TA)의 컬렉션을 관리하는 구조체
///
/// 여러 기술적 지표를 키-값 쌍으로 저장하고, 키 순서를 유지합니다.
#[derive(Debug)]
pub struct TAs<K, T>
where
    K: PartialEq + Eq + Hash + Debug,
{
    /// 이 컬렉션의 이름
    name: String,
    /// 순서가 유지되는 키 목록
    keys: Vec<K>,
    /// 키-값 쌍으로 저장된 기술적 지표
    data: HashMap<K, T>,
}

impl<K, T> Display for TAs<K, T>
where
    K: PartialEq + Eq + Hash + Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TAs({})", self.name)
    }
}

/// 값들의 배열 정렬 여부를 확인하는 내부 함수
fn is_arrangement(values: Vec<f64>, init: f64, cmp: impl Fn(f64, f64) -> bool) -> bool {
    let mut prev = init;
    for value in values {
        if !cmp(value, prev) {
            return false;
        }
        prev = value;
    }

    true
}

/// 값들이 (엄격한) 내림차순인지 확인
fn is_regular_arrangement(values: Vec<f64>) -> bool {
    is_arrangement(values, f64::MAX, |current, prev| current < prev)
}

/// 값들이 (엄격한) 오름차순인지 확인
fn is_reverse_arrangement(values: Vec<f64>) -> bool {
    is_arrangement(values, f64::MIN, |current, prev| current > prev)
}

impl<K, T> TAs<K, T>
where
    K: PartialEq + Eq + Hash + Debug,
{
    pub fn new(name: String, keys: Vec<K>, data: HashMap<K, T>) -> TAs<K, T> {
        TAs { name, keys, data }
    }

    /// 키 목록 참조 반환
    pub fn get_keys(&self) -> &[K] {
        &self.keys
    }

    /// 지정된 키에 해당하는 값 참조 반환
    pub fn get(&self, key: &K) -> Option<&T> {
        self.data.get(key)
    }

    /// 키 순서대로 모든 값의 참조 반환
    pub fn get_all(&self) -> Vec<&T> {
        self.keys.iter().filter_map(|key| self.get(key)).collect()
    }

    /// 값들이 키 순서대로 내림차순인지 확인 (이동평균의 정배열)
    pub fn is_regular_arrangement(&self, get_value: impl Fn(&T) -> f64) -> bool {
        let values = self.get_all().into_iter().map(get_value).collect::<Vec<_>>();
        is_regular_arrangement(values)
    }

    /// 값들이 키 순서대로 오름차순인지 확인 (이동평균의 역배열)
    pub fn is_reverse_arrangement(&self, get_value: impl Fn(&T) -> f64) -> bool {
        let values = self.get_all().into_iter().map(get_value).collect::<Vec<_>>();
        is_reverse_arrangement(values)
    }
}

/// 기술적 지표 생성 인터페이스
///
/// 캔들 슬라이스에서 지표 값을 계산합니다. 입력을 변경하지 않으며 내부 상태도 갖지 않습니다.
pub trait TABuilder<T, C: Candle>: Debug {
    fn build(&self, data: &[C]) -> T;
}

/// 여러 기술적 지표 빌더를 관리하는 구조체
pub struct TAsBuilder<K, T, C: Candle> {
    name: String,
    keys: Vec<K>,
    builders: HashMap<K, Box<dyn TABuilder<T, C>>>,
}

impl<K, T, C> TAsBuilder<K, T, C>
where
    K: PartialEq + Eq + Hash + Clone + Debug,
    C: Candle,
{
    /// # Arguments
    /// * `name` - 빌더 이름
    /// * `keys` - 키 목록
    /// * `gen_builder` - 각 키에 대한 빌더 생성 함수
    pub fn new(
        name: String,
        keys: &[K],
        gen_builder: impl Fn(&K) -> Box<dyn TABuilder<T, C>>,
    ) -> TAsBuilder<K, T, C> {
        let builders = keys
            .iter()
            .map(|key| (key.clone(), gen_builder(key)))
            .collect();

        TAsBuilder {
            name,
            keys: keys.to_vec(),
            builders,
        }
    }

    /// 캔들 데이터에서 기술적 지표 컬렉션 생성
    pub fn build(&self, data: &[C]) -> TAs<K, T> {
        let tas = self
            .builders
            .iter()
            .map(|(key, builder)| (key.clone(), builder.build(data)))
            .collect();

        TAs::new(self.name.to_owned(), self.keys.clone(), tas)
    }
}

impl<K: Debug, T, C: Candle> Debug for TAsBuilder<K, T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TAsBuilder")
            .field("name", &self.name)
            .field("keys", &self.keys)
            .field("builders", &format!("<{} builders>", self.builders.len()))
            .finish()
    }
}

/// 분석 결과에 포함되는 지표 묶음
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndicatorBundle {
    pub rsi: RSI,
    pub macd: MACD,
    pub bollinger: BollingerBands,
    pub ma5: f64,
    pub ma20: f64,
    pub ma60: f64,
    pub ma_arrangement: MAArrangement,
}

impl IndicatorBundle {
    /// 캔들 데이터에서 모든 지표 계산
    pub fn build<C: Candle + 'static>(candles: &[C], config: &AnalysisConfig) -> Self {
        let closes = close_prices(candles);

        let rsi = RSIBuilder::new(config.rsi_period).build_from_closes(&closes);
        let macd = MACDBuilder::new(config.macd_fast, config.macd_slow, config.macd_signal)
            .build_from_closes(&closes);
        let bollinger = BollingerBandsBuilder::new(config.bband_period, config.bband_multiplier)
            .build_from_closes(&closes);

        let smas = SMAsBuilderFactory::build_default::<C>().build(candles);
        let ma_value = |period: usize| smas.get(&period).map_or(0.0, |sma| sma.value);

        IndicatorBundle {
            rsi,
            macd,
            bollinger,
            ma5: ma_value(MA_PERIODS[0]),
            ma20: ma_value(MA_PERIODS[1]),
            ma60: ma_value(MA_PERIODS[2]),
            ma_arrangement: MAArrangement::from_smas(&smas, candles.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OhlcvCandle;

    #[test]
    fn test_is_regular_arrangement() {
        assert!(is_regular_arrangement(vec![3.0, 2.0, 1.0]));
        assert!(!is_regular_arrangement(vec![1.0, 2.0, 3.0]));
        assert!(!is_regular_arrangement(vec![3.0, 1.0, 2.0]));
        assert!(!is_regular_arrangement(vec![3.0, 2.0, 2.0]));

        // 빈 벡터는 항상 정렬되어 있음
        assert!(is_regular_arrangement(vec![]));
    }

    #[test]
    fn test_is_reverse_arrangement() {
        assert!(is_reverse_arrangement(vec![1.0, 2.0, 3.0]));
        assert!(!is_reverse_arrangement(vec![3.0, 2.0, 1.0]));
        assert!(!is_reverse_arrangement(vec![1.0, 2.0, 2.0]));
        assert!(is_reverse_arrangement(vec![]));
    }

    #[test]
    fn test_tas_keeps_key_order() {
        let tas = TAs::new(
            "test".to_owned(),
            vec![1, 2, 3],
            HashMap::from([(1, 3.0), (2, 2.0), (3, 1.0)]),
        );
        assert!(tas.is_regular_arrangement(|value| *value));
        assert_eq!(tas.get_all(), vec![&3.0, &2.0, &1.0]);
        assert_eq!(tas.get(&4), None);
        assert_eq!(format!("{}", tas), "TAs(test)");
    }

    #[test]
    fn test_indicator_bundle_uptrend() {
        let candles: Vec<OhlcvCandle> = (0..120)
            .map(|i| {
                let close = 100.0 + i as f64;
                OhlcvCandle::new(i, close - 0.5, close + 0.5, close - 1.0, close, 1000)
            })
            .collect();
        let bundle = IndicatorBundle::build(&candles, &AnalysisConfig::default());

        assert_eq!(bundle.rsi.value, 100.0);
        assert!(bundle.macd.is_bullish());
        assert_eq!(bundle.ma5, 217.0);
        assert_eq!(bundle.ma20, 209.5);
        assert_eq!(bundle.ma60, 189.5);
        assert_eq!(bundle.ma_arrangement, MAArrangement::Regular);
    }
}

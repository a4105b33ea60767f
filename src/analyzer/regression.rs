use serde::Serialize;

/// 최소제곱 직선 적합 결과
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// 결정계수 (0~1)
    pub r_squared: f64,
}

impl LinearFit {
    /// x 위치에서 직선 값
    pub fn value_at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// (x, y) 점들에 대한 최소제곱 선형 회귀
///
/// 퇴화 입력은 오류 없이 정의된 값을 반환합니다.
/// * 점이 2개 미만: 기울기 0, 절편 `y[0]` (없으면 0), 결정계수 0
/// * 모든 x가 같음: 기울기 0, 절편 `mean(y)`, 결정계수 0
/// * 모든 y가 같음 (총제곱합 0): 결정계수 1
pub fn fit(points: &[(f64, f64)]) -> LinearFit {
    if points.len() < 2 {
        return LinearFit {
            slope: 0.0,
            intercept: points.first().map_or(0.0, |&(_, y)| y),
            r_squared: 0.0,
        };
    }

    let n = points.len() as f64;
    let (sum_x, sum_y, sum_xy, sum_xx) = points.iter().fold(
        (0.0, 0.0, 0.0, 0.0),
        |(sx, sy, sxy, sxx), &(x, y)| (sx + x, sy + y, sxy + x * y, sxx + x * x),
    );
    let mean_y = sum_y / n;

    let denominator = n * sum_xx - sum_x * sum_x;
    if denominator == 0.0 {
        return LinearFit {
            slope: 0.0,
            intercept: mean_y,
            r_squared: 0.0,
        };
    }

    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;

    let (ss_res, ss_tot) = points.iter().fold((0.0, 0.0), |(res, tot), &(x, y)| {
        let predicted = slope * x + intercept;
        (res + (y - predicted).powi(2), tot + (y - mean_y).powi(2))
    });

    let r_squared = if ss_tot == 0.0 {
        1.0
    } else {
        1.0 - ss_res / ss_tot
    };

    LinearFit {
        slope,
        intercept,
        r_squared,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_line() {
        let points: Vec<(f64, f64)> = (0..10).map(|i| (i as f64, 2.0 * i as f64 + 1.0)).collect();
        let result = fit(&points);
        assert!((result.slope - 2.0).abs() < 1e-12);
        assert!((result.intercept - 1.0).abs() < 1e-12);
        assert!((result.r_squared - 1.0).abs() < 1e-12);
        assert!((result.value_at(20.0) - 41.0).abs() < 1e-9);
    }

    #[test]
    fn test_noisy_line_has_partial_r_squared() {
        let points = [(0.0, 1.0), (1.0, 3.0), (2.0, 2.0), (3.0, 5.0), (4.0, 4.0)];
        let result = fit(&points);
        // slope = 0.8, intercept = 1.4
        assert!((result.slope - 0.8).abs() < 1e-12);
        assert!((result.intercept - 1.4).abs() < 1e-12);
        assert!(result.r_squared > 0.0 && result.r_squared < 1.0);
    }

    #[test]
    fn test_fewer_than_two_points() {
        assert_eq!(
            fit(&[]),
            LinearFit {
                slope: 0.0,
                intercept: 0.0,
                r_squared: 0.0
            }
        );
        assert_eq!(
            fit(&[(3.0, 7.5)]),
            LinearFit {
                slope: 0.0,
                intercept: 7.5,
                r_squared: 0.0
            }
        );
    }

    #[test]
    fn test_identical_x_does_not_divide_by_zero() {
        let result = fit(&[(5.0, 1.0), (5.0, 3.0), (5.0, 8.0)]);
        assert_eq!(result.slope, 0.0);
        assert_eq!(result.intercept, 4.0);
        assert_eq!(result.r_squared, 0.0);
    }

    #[test]
    fn test_flat_y_has_full_r_squared() {
        let result = fit(&[(0.0, 10.0), (4.0, 10.0), (9.0, 10.0)]);
        assert_eq!(result.slope, 0.0);
        assert_eq!(result.intercept, 10.0);
        assert_eq!(result.r_squared, 1.0);
    }
}

//! ピクセル空間の2D幾何

/// ユークリッド距離
pub fn distance(a: [f64; 2], b: [f64; 2]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    (dx * dx + dy * dy).sqrt()
}

/// 中点（整数座標でも丸めない）
pub fn midpoint(a: [f64; 2], b: [f64; 2]) -> [f64; 2] {
    [(a[0] + b[0]) / 2.0, (a[1] + b[1]) / 2.0]
}

/// 左右ペアの距離の平均
pub fn mean_distance(left: ([f64; 2], [f64; 2]), right: ([f64; 2], [f64; 2])) -> f64 {
    (distance(left.0, left.1) + distance(right.0, right.1)) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() < eps
    }

    #[test]
    fn test_distance_345() {
        assert!(approx_eq(distance([0.0, 0.0], [3.0, 4.0]), 5.0, 1e-12));
        assert!(approx_eq(distance([3.0, 4.0], [0.0, 0.0]), 5.0, 1e-12));
    }

    #[test]
    fn test_distance_same_point_is_zero() {
        assert_eq!(distance([7.0, -2.0], [7.0, -2.0]), 0.0);
    }

    #[test]
    fn test_midpoint_keeps_fraction() {
        assert_eq!(midpoint([0.0, 0.0], [1.0, 3.0]), [0.5, 1.5]);
    }

    #[test]
    fn test_mean_distance() {
        let left = ([0.0, 0.0], [0.0, 10.0]);
        let right = ([0.0, 0.0], [0.0, 20.0]);
        assert!(approx_eq(mean_distance(left, right), 15.0, 1e-12));
    }
}

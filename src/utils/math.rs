//! Dense vector helpers used by the weighted models

/// ドット積
///
/// # Arguments
/// * `a` - 左辺ベクトル
/// * `b` - 右辺ベクトル (同じ長さ)
///
/// # Returns
/// * `f64` - 内積
#[inline]
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len(), "Vectors must be of the same length to compute dot product.");
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// L2ノルム
#[inline]
pub fn l2_norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// 単位L2ノルムに正規化する
/// ノルムが0のベクトルはそのまま
///
/// # Returns
/// * `f64` - 正規化前のノルム
pub fn normalize(v: &mut [f64]) -> f64 {
    let norm = l2_norm(v);
    if norm > 0.0 {
        let inv = 1.0 / norm;
        v.iter_mut().for_each(|x| *x *= inv);
    }
    norm
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_unit_and_zero() {
        let mut v = vec![3.0, 4.0];
        assert_eq!(normalize(&mut v), 5.0);
        assert!((l2_norm(&v) - 1.0).abs() < 1e-12);

        let mut zero = vec![0.0, 0.0];
        assert_eq!(normalize(&mut zero), 0.0);
        assert_eq!(zero, vec![0.0, 0.0]);
    }

    #[test]
    fn dot_product() {
        assert_eq!(dot(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]), 32.0);
        assert_eq!(dot(&[], &[]), 0.0);
    }
}

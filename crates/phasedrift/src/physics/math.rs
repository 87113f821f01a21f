/// Scalar type for physics calculations (f64 for precision)
pub type Scalar = f64;

/// 3D vector type for positions handed to the viewer
pub type Vector = bevy::math::DVec3;

/// Fixed-size state of an `N`-dimensional system
pub type StateVector<const N: usize> = [Scalar; N];

/// `base + delta * scale`, componentwise
#[inline]
pub fn add_scaled<const N: usize>(
    base: &StateVector<N>,
    delta: &StateVector<N>,
    scale: Scalar,
) -> StateVector<N> {
    std::array::from_fn(|i| base[i] + delta[i] * scale)
}

/// Euclidean norm
#[inline]
pub fn norm(components: &[Scalar]) -> Scalar {
    libm::sqrt(components.iter().map(|c| c * c).sum())
}

#[inline]
pub fn all_finite(components: &[Scalar]) -> bool {
    components.iter().all(|c| c.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_scaled() {
        let base = [1.0, 2.0, 3.0];
        let delta = [2.0, -4.0, 0.5];
        assert_eq!(add_scaled(&base, &delta, 0.5), [2.0, 0.0, 3.25]);
    }

    #[test]
    fn test_norm() {
        assert_eq!(norm(&[3.0, 4.0]), 5.0);
        assert_eq!(norm(&[0.0, 0.0, 0.0]), 0.0);
        assert_eq!(norm(&[]), 0.0);
    }

    #[test]
    fn test_all_finite() {
        assert!(all_finite(&[1.0, -1e300, 0.0]));
        assert!(!all_finite(&[1.0, Scalar::NAN]));
        assert!(!all_finite(&[Scalar::INFINITY, 0.0, 0.0]));
        assert!(!all_finite(&[0.0, 0.0, Scalar::NEG_INFINITY]));
    }
}

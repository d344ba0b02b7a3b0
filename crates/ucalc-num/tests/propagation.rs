use proptest::prelude::*;
use ucalc_num::prelude::*;

fn finite() -> impl Strategy<Value = f64> { -1.0e3..1.0e3f64 }
fn positive() -> impl Strategy<Value = f64> { 1.0e-3..10.0f64 }

proptest! {
    #[test]
    fn prop_independent_sum_adds_variances(x in finite(), y in finite(), ux in positive(), uy in positive()) {
        let s = ops::add(&ureal(x, ux).unwrap(), &ureal(y, uy).unwrap()).unwrap();
        let v = f64::try_from(s.variance()).unwrap();
        prop_assert!((v - (ux * ux + uy * uy)).abs() <= 1e-9 * (ux * ux + uy * uy));
    }

    #[test]
    fn prop_self_difference_is_exact(x in finite(), u in positive()) {
        let a = ureal(x, u).unwrap();
        let d = ops::subtract(&a, &a).unwrap();
        prop_assert_eq!(d.uncertainty(), Uncertainty::Real(0.0));
    }

    #[test]
    fn prop_plain_ops_ignore_uncertainty(x in finite(), y in finite()) {
        let (a, b) = (Number::Real(x), Number::Real(y));
        prop_assert_eq!(ops::multiply(&a, &b).unwrap(), Number::Real(x * y));
        prop_assert_eq!(ops::maximum(&a, &b).unwrap(), Number::Real(x.max(y)));
    }

    #[test]
    fn prop_scaling_scales_uncertainty(x in finite(), u in positive(), k in 1.0..5.0f64) {
        let p = ops::multiply(&ureal(x, u).unwrap(), &Number::Real(k)).unwrap();
        let up = f64::try_from(p.uncertainty()).unwrap();
        prop_assert!((up - k * u).abs() <= 1e-9 * k * u);
    }
}

#[test]
fn ucomplex_conjugate_product_is_real() {
    let z = ucomplex(num_complex::Complex64::new(1.0, 2.0), (0.1, 0.1)).unwrap();
    let p = ops::multiply(&z, &ops::conjugate(&z).unwrap()).unwrap();
    assert_eq!(p.value(), Number::complex(5.0, 0.0));
}

use proptest::prelude::*;
use ucalc_array::prelude::*;

/// Shapes of rank 0..=3 with small axes, some of them unit.
fn shape() -> impl Strategy<Value = Vec<usize>> { proptest::collection::vec(1usize..4, 0..=3) }

/// A pair of shapes that broadcast: the second is the first with some axes
/// collapsed to 1 and possibly some leading axes dropped.
fn compatible_shapes() -> impl Strategy<Value = (Vec<usize>, Vec<usize>)> {
    shape().prop_flat_map(|s| {
        let n = s.len();
        (Just(s), proptest::collection::vec(any::<bool>(), n), 0..=n)
    }).prop_map(|(s, unit, drop)| {
        let other: Vec<usize> = s.iter().zip(&unit).map(|(&d, &u)| if u { 1 } else { d }).skip(drop).collect();
        (s, other)
    })
}

fn filled(shape: &[usize], start: i64) -> UncertainArray {
    let n: usize = shape.iter().product();
    UncertainArray::from_shape_vec(shape, (start..start + n as i64).map(Number::Int).collect()).unwrap()
}

fn finite() -> impl Strategy<Value = f64> { -1.0e3..1.0e3f64 }
fn positive() -> impl Strategy<Value = f64> { 1.0e-3..10.0f64 }

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_add_has_broadcast_shape((lhs, rhs) in compatible_shapes()) {
        let (a, b) = (filled(&lhs, 0), filled(&rhs, 100));
        let expected = co_broadcast(&lhs, &rhs).unwrap();
        let out = a.add(&b).unwrap();
        prop_assert_eq!(out.shape(), expected.as_slice());
    }

    #[test]
    fn prop_add_is_elementwise_sum_of_broadcast_elements((lhs, rhs) in compatible_shapes()) {
        let (a, b) = (filled(&lhs, 0), filled(&rhs, 100));
        let shape = co_broadcast(&lhs, &rhs).unwrap();
        let dim = ndarray::IxDyn(&shape);
        let (x, y) = (a.data().broadcast(dim.clone()).unwrap(), b.data().broadcast(dim).unwrap());
        let expected: Vec<Number> = x.iter().zip(y.iter()).map(|(p, q)| ops::add(p, q).unwrap()).collect();
        let got: Vec<Number> = match a.add(&b).unwrap() {
            Output::Scalar(n) => vec![n],
            Output::Array(arr) => arr.iter().cloned().collect(),
            other => return Err(TestCaseError::fail(format!("unexpected output {}", other))),
        };
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_broadcast_is_symmetric((lhs, rhs) in compatible_shapes()) {
        prop_assert_eq!(co_broadcast(&lhs, &rhs).unwrap(), co_broadcast(&rhs, &lhs).unwrap());
    }

    #[test]
    fn prop_zero_dim_equals_scalar_op(x in finite(), u in positive(), k in finite()) {
        let n = ureal(x, u).unwrap();
        let a = UncertainArray::scalar(n.clone());
        prop_assert_eq!(a.negative().unwrap(), Output::Scalar(ops::negative(&n).unwrap()));
        prop_assert_eq!(a.add(k).unwrap(), Output::Scalar(ops::add(&n, &Number::Real(k)).unwrap()));
        prop_assert_eq!(a.exp().unwrap(), Output::Scalar(n.exp()));
        prop_assert_eq!(a.less(k).unwrap(), Output::Bool(ops::less(&n, &Number::Real(k)).unwrap()));
        prop_assert_eq!(a.uncertainty().unwrap(), Outcome::Scalar(n.uncertainty()));
        prop_assert_eq!(a.dof().unwrap(), Outcome::Scalar(n.dof()));
    }

    #[test]
    fn prop_copy_is_equal_and_independent(s in shape(), label in "[a-z]{1,8}") {
        let a = filled(&s, 0).with_label(label.clone());
        let b = a.copy();
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(b.label(), Some(label.as_str()));
        let mut data = b.into_data();
        data.iter_mut().for_each(|n| *n = Number::Int(-1));
        prop_assert!(a.iter().all(|n| *n != Number::Int(-1)));
    }

    #[test]
    fn prop_sum_matches_fold(values in proptest::collection::vec(-1000i64..1000, 1..20)) {
        let a = UncertainArray::from_vec(values.iter().copied().map(Number::Int).collect());
        prop_assert_eq!(a.sum(None).unwrap(), Outcome::Scalar(Number::Int(values.iter().sum())));
    }
}

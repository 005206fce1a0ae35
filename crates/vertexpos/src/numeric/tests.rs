use super::*;
use proptest::prelude::*;

const EPS_DISC: f64 = 1e-20;

fn dd(v: f64) -> DoubleDouble {
    DoubleDouble::from(v)
}

#[test]
fn dd_keeps_bits_lost_by_f64() {
    // 1 + 2^-60 is not representable in f64; the low word carries it.
    let tiny = 2f64.powi(-60);
    let s = dd(1.0) + dd(tiny);
    assert_eq!(s.hi, 1.0);
    assert_eq!(s.lo, tiny);
    let back = s - dd(1.0);
    assert_eq!(back.to_f64(), tiny);
}

#[test]
fn dd_product_is_exact_for_split_operands() {
    // (2^27 + 1)^2 = 2^54 + 2^28 + 1 needs 55 bits.
    let a = dd(134_217_729.0);
    let p = a * a;
    let expected_hi = 18_014_398_777_917_440.0; // 2^54 + 2^28
    assert_eq!(p.hi, expected_hi);
    assert_eq!(p.lo, 1.0);
    assert_eq!(a.sqr(), p);
}

#[test]
fn dd_division_and_sqrt() {
    let third = dd(1.0) / dd(3.0);
    let back = third * 3.0;
    assert!((back - dd(1.0)).abs().hi < 1e-30);

    let r2 = dd(2.0).sqrt();
    let err = r2.sqr() - dd(2.0);
    assert!(err.abs().hi < 1e-30);
    assert!(dd(-1.0).sqrt().hi.is_nan());
    assert!(dd(0.0).sqrt().is_zero());
}

#[test]
fn dd_ordering_uses_low_word() {
    let a = DoubleDouble::new(1.0, 1e-20);
    let b = DoubleDouble::new(1.0, -1e-20);
    assert!(a > b);
    assert_eq!(a.max(b), a);
    assert_eq!((-a).signum(), -1.0);
    assert_eq!(DoubleDouble::ZERO.signum(), 0.0);
}

#[test]
fn quadratic_two_roots_sorted() {
    // (u - 1)(u - 3) = u² - 4u + 3
    let r = quadratic_roots(dd(1.0), dd(-4.0), dd(3.0), EPS_DISC);
    match r {
        Roots::Two(r1, r2) => {
            assert!((r1.to_f64() - 1.0).abs() < 1e-15);
            assert!((r2.to_f64() - 3.0).abs() < 1e-15);
        }
        other => panic!("expected two roots, got {other:?}"),
    }
    assert_eq!(r.len(), 2);
    assert_eq!(r.iter().count(), 2);
}

#[test]
fn quadratic_zero_discriminant_gives_single_root() {
    // (u - 0.375)^2 = u² - 0.75u + 0.140625, all dyadic.
    let r = quadratic_roots(dd(2.0), dd(-1.5), dd(0.28125), EPS_DISC);
    match r {
        Roots::One(u) => assert_eq!(u.to_f64(), 0.375),
        other => panic!("expected one root, got {other:?}"),
    }
    let r = quadratic_roots(dd(1.0), dd(-2.0), dd(1.0), EPS_DISC);
    assert_eq!(r, Roots::One(dd(1.0)));
}

#[test]
fn quadratic_negative_discriminant_gives_none() {
    let r = quadratic_roots(dd(1.0), dd(0.0), dd(1.0), EPS_DISC);
    assert!(r.is_empty());
}

#[test]
fn quadratic_zero_leading_coefficient_is_linear() {
    let r = quadratic_roots(dd(0.0), dd(2.0), dd(-4.0), EPS_DISC);
    assert_eq!(r, Roots::One(dd(2.0)));
    // Fully degenerate: no equation left.
    let r = quadratic_roots(dd(0.0), dd(0.0), dd(5.0), EPS_DISC);
    assert!(r.is_empty());
}

#[test]
fn quadratic_tiny_leading_coefficient_keeps_finite_root() {
    // 1e-30·u² + 2u − 4: one root near 2, the other near −2e30.
    let r = quadratic_roots(dd(1e-30), dd(2.0), dd(-4.0), EPS_DISC);
    match r {
        Roots::Two(far, near) => {
            assert!((near.to_f64() - 2.0).abs() < 1e-15);
            assert!(far.to_f64() < -1e30);
        }
        other => panic!("expected two roots, got {other:?}"),
    }
}

#[test]
fn quadratic_far_from_origin_keeps_both_roots() {
    // (u − 2e6)² − 0.75: large linear and constant terms, well-posed roots.
    let r = quadratic_roots(dd(1.0), dd(-4e6), dd(4e12 - 0.75), EPS_DISC);
    match r {
        Roots::Two(r1, r2) => {
            assert!((r1.to_f64() - (2e6 - 0.75f64.sqrt())).abs() < 1e-9);
            assert!((r2.to_f64() - (2e6 + 0.75f64.sqrt())).abs() < 1e-9);
        }
        other => panic!("expected two roots, got {other:?}"),
    }
}

#[test]
fn quadratic_stable_small_root() {
    // u² - 1e8 u + 1: naive formula loses the small root 1e-8 to cancellation.
    let r = quadratic_roots(dd(1.0), dd(-1e8), dd(1.0), EPS_DISC);
    match r {
        Roots::Two(small, big) => {
            assert!((small.to_f64() - 1e-8).abs() < 1e-22);
            assert!((big.to_f64() - 1e8).abs() < 1e-6);
        }
        other => panic!("expected two roots, got {other:?}"),
    }
}

proptest! {
    #[test]
    fn quadratic_roots_satisfy_equation(
        r1 in -100.0f64..100.0,
        gap in 1e-3f64..50.0,
        lead in prop_oneof![-10.0f64..-0.1, 0.1f64..10.0],
    ) {
        let r2 = r1 + gap;
        let a = dd(lead);
        let b = dd(-lead) * (dd(r1) + dd(r2));
        let c = dd(lead) * dd(r1) * dd(r2);
        let roots = quadratic_roots(a, b, c, EPS_DISC);
        prop_assert_eq!(roots.len(), 2);
        for u in roots.iter() {
            let res = (a * u.sqr() + b * u + c).abs().to_f64();
            let scale = lead.abs() * (1.0 + r1.abs() + r2.abs()).powi(2);
            prop_assert!(res <= 1e-20 * scale, "residual {res} too large");
        }
    }
}

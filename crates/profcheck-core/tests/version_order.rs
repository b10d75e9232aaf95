//! Total-order properties of `Version` comparison.

use profcheck_core::{compare, Version};
use proptest::prelude::*;
use std::cmp::Ordering;

fn version_string() -> impl Strategy<Value = String> {
    prop::collection::vec(0u64..20, 1..5).prop_map(|parts| {
        parts
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(".")
    })
}

proptest! {
    #[test]
    fn compare_is_antisymmetric(a in version_string(), b in version_string()) {
        let va = Version::parse(&a).unwrap();
        let vb = Version::parse(&b).unwrap();
        prop_assert_eq!(compare(&va, &vb), compare(&vb, &va).reverse());
    }

    #[test]
    fn compare_is_transitive(
        a in version_string(),
        b in version_string(),
        c in version_string(),
    ) {
        let va = Version::parse(&a).unwrap();
        let vb = Version::parse(&b).unwrap();
        let vc = Version::parse(&c).unwrap();
        if compare(&va, &vb) != Ordering::Greater && compare(&vb, &vc) != Ordering::Greater {
            prop_assert_ne!(compare(&va, &vc), Ordering::Greater);
        }
    }

    #[test]
    fn trailing_zeros_do_not_change_order(a in version_string(), zeros in 1usize..4) {
        let padded = format!("{}{}", a, ".0".repeat(zeros));
        let va = Version::parse(&a).unwrap();
        let vp = Version::parse(&padded).unwrap();
        prop_assert_eq!(compare(&va, &vp), Ordering::Equal);
    }

    #[test]
    fn parse_never_panics(s in ".{0,24}") {
        let _ = Version::parse(&s);
    }
}

#[test]
fn patch_padding_examples() {
    let v = |s: &str| Version::parse(s).unwrap();
    assert_eq!(compare(&v("3.4.6"), &v("3.4.0")), Ordering::Greater);
    assert_eq!(compare(&v("3.4"), &v("3.4.0")), Ordering::Equal);
}

/// Property-based tests for fixed-point money using proptest
///
/// These tests verify parsing, formatting and arithmetic across a wide range
/// of randomly generated amounts.
use proptest::prelude::*;
use wallet_ledger::Money;

// Strategy to generate a canonical two-decimal string, e.g. "-1234.05"
fn canonical_amount_strategy() -> impl Strategy<Value = String> {
    (any::<bool>(), 0u64..=9_999_999_999, 0u8..=99).prop_map(|(negative, major, minor)| {
        let sign = if negative && (major, minor) != (0, 0) { "-" } else { "" };
        format!("{sign}{major}.{minor:02}")
    })
}

// Strategy for minor-unit values whose pairwise sums cannot overflow
fn half_range_strategy() -> impl Strategy<Value = i64> {
    (i64::MIN / 2)..=(i64::MAX / 2)
}

proptest! {
    #[test]
    fn test_format_parse_round_trip(s in canonical_amount_strategy()) {
        let money: Money = s.parse().unwrap();
        prop_assert_eq!(money.to_string(), s);
    }

    #[test]
    fn test_parse_format_round_trip(raw in any::<i64>()) {
        let money = Money::from_minor(raw);
        let reparsed: Money = money.to_string().parse().unwrap();
        prop_assert_eq!(reparsed, money);
    }

    #[test]
    fn test_third_digit_rounds_half_up(major in 0i64..1_000_000, cents in 0i64..100, third in 0i64..10) {
        let s = format!("{major}.{cents:02}{third}");
        let money: Money = s.parse().unwrap();
        let expected = major * 100 + cents + i64::from(third >= 5);
        prop_assert_eq!(money.minor_units(), expected);
    }

    #[test]
    fn test_add_commutative(a in half_range_strategy(), b in half_range_strategy()) {
        let (a, b) = (Money::from_minor(a), Money::from_minor(b));
        prop_assert_eq!(a.add(b).unwrap(), b.add(a).unwrap());
    }

    #[test]
    fn test_add_then_sub_is_exact(a in half_range_strategy(), b in half_range_strategy()) {
        let (a, b) = (Money::from_minor(a), Money::from_minor(b));
        prop_assert_eq!(a.add(b).unwrap().sub(b).unwrap(), a);
    }

    #[test]
    fn test_checked_add_matches_i64(a in any::<i64>(), b in any::<i64>()) {
        let sum = Money::from_minor(a).checked_add(Money::from_minor(b));
        prop_assert_eq!(sum.map(Money::minor_units), a.checked_add(b));
    }

    #[test]
    fn test_ordering_matches_minor_units(a in any::<i64>(), b in any::<i64>()) {
        prop_assert_eq!(Money::from_minor(a).cmp(&Money::from_minor(b)), a.cmp(&b));
    }
}

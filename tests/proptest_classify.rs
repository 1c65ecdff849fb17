use bassboost_vts::effect::bass_boost::software_descriptor;
use bassboost_vts::effect::{BassBoost, BassBoostCapability, BassBoostEffect, Capability, Effect, Specific};
use bassboost_vts::validator::{check_set_and_get, classify, RangeClass};
use bassboost_vts::SuiteConfig;
use proptest::prelude::*;

fn capability() -> impl Strategy<Value = Capability> {
    prop_oneof![
        Just(Capability::None),
        any::<bool>().prop_map(|strength_supported| Capability::BassBoost(BassBoostCapability { strength_supported })),
    ]
}

proptest! {
    #[test]
    fn classify_is_deterministic(v in any::<i32>(), cap in capability()) {
        let param = Specific::BassBoost(BassBoost::StrengthPm(v));
        prop_assert_eq!(classify(&param, &cap), classify(&param, &cap));
    }

    #[test]
    fn classify_matches_documented_range(v in any::<i32>()) {
        let supported = Capability::BassBoost(BassBoostCapability { strength_supported: true });
        let param = Specific::BassBoost(BassBoost::StrengthPm(v));
        let expected = if (0..=1000).contains(&v) { RangeClass::InRange } else { RangeClass::OutOfRange };
        prop_assert_eq!(classify(&param, &supported), expected);
    }

    #[test]
    fn unsupported_strength_is_never_in_range(v in any::<i32>()) {
        let unsupported = Capability::BassBoost(BassBoostCapability { strength_supported: false });
        let param = Specific::BassBoost(BassBoost::StrengthPm(v));
        prop_assert_eq!(classify(&param, &unsupported), RangeClass::OutOfRange);
    }

    #[test]
    fn software_bass_boost_conforms(v in prop_oneof![any::<i32>(), -10i32..1010]) {
        let mut effect = BassBoostEffect::new(software_descriptor());
        effect.open(SuiteConfig::default().common(), None).unwrap();
        let outcome = check_set_and_get(&mut effect, BassBoost::StrengthPm(v));
        prop_assert!(outcome.passed(), "{:?}", outcome.failures);
    }
}

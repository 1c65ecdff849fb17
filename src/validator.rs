use log::debug;
use serde::{Deserialize, Serialize};

use crate::effect::{BassBoost, Capability, Effect, EffectError, Parameter, ParameterId, Specific};

/// Whether a candidate value lies inside the range an implementation publishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RangeClass {
    InRange,
    OutOfRange,
}

/// Status a call is expected to return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpectedStatus {
    /// Call succeeds
    None,
    IllegalArgument,
}

impl ExpectedStatus {
    pub fn name(&self) -> &'static str {
        match self {
            ExpectedStatus::None => "NONE",
            ExpectedStatus::IllegalArgument => "ILLEGAL_ARGUMENT",
        }
    }

    fn matches<T>(&self, result: &Result<T, EffectError>) -> bool {
        matches!(
            (self, result),
            (ExpectedStatus::None, Ok(_)) | (ExpectedStatus::IllegalArgument, Err(EffectError::IllegalArgument(_)))
        )
    }
}

impl From<RangeClass> for ExpectedStatus {
    fn from(class: RangeClass) -> Self {
        match class {
            RangeClass::InRange => ExpectedStatus::None,
            RangeClass::OutOfRange => ExpectedStatus::IllegalArgument,
        }
    }
}

fn status_name<T>(result: &Result<T, EffectError>) -> &'static str {
    match result {
        Ok(_) => "NONE",
        Err(e) => e.status_name(),
    }
}

/// Classify a specific parameter against an implementation's capability
///
/// Pure function of its inputs. Anything not explicitly modelled as in range is
/// out of range, including a capability that belongs to another effect kind.
pub fn classify(param: &Specific, capability: &Capability) -> RangeClass {
    let in_range = match (param, capability) {
        (Specific::BassBoost(BassBoost::StrengthPm(strength)), Capability::BassBoost(cap)) => {
            cap.strength_supported
                && (BassBoost::MIN_PER_MILLE_STRENGTH..=BassBoost::MAX_PER_MILLE_STRENGTH).contains(strength)
        }
        (Specific::BassBoost(_), Capability::None) => false,
    };
    if in_range {
        RangeClass::InRange
    } else {
        RangeClass::OutOfRange
    }
}

/// Which call an assertion was made on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Step {
    Setup,
    Describe,
    Set,
    Get,
    RoundTrip,
    Teardown,
    /// The implementation panicked
    Panic,
}

/// One failed assertion
///
/// A fatal failure ends the case body; a non-fatal one is recorded and the case continues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionFailure {
    pub step: Step,
    pub fatal: bool,
    pub message: String,
}

impl AssertionFailure {
    pub fn fatal(step: Step, message: impl Into<String>) -> Self {
        Self { step, fatal: true, message: message.into() }
    }

    pub fn non_fatal(step: Step, message: impl Into<String>) -> Self {
        Self { step, fatal: false, message: message.into() }
    }
}

/// Result of one set-and-get check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutcome {
    /// `None` when the descriptor could not be fetched
    pub class: Option<RangeClass>,
    pub failures: Vec<AssertionFailure>,
}

impl CheckOutcome {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Set a bass boost parameter and, when it should be accepted, read it back
///
/// 1. Fetch the descriptor and classify the value (fatal on failure).
/// 2. `set_parameter` must return NONE in range and ILLEGAL_ARGUMENT out of range.
/// 3. Only when NONE was expected: `get_parameter` for the same tag must succeed
///    and return exactly the parameter that was set.
pub fn check_set_and_get(effect: &mut dyn Effect, bb: BassBoost) -> CheckOutcome {
    let mut failures = Vec::new();

    let descriptor = match effect.descriptor() {
        Ok(descriptor) => descriptor,
        Err(e) => {
            failures.push(AssertionFailure::fatal(Step::Describe, format!("expected NONE, got {}", e)));
            return CheckOutcome { class: None, failures };
        }
    };

    let specific = Specific::BassBoost(bb);
    let class = classify(&specific, &descriptor.capability);
    let expected = ExpectedStatus::from(class);

    let param = Parameter::Specific(specific);
    let result = effect.set_parameter(param);
    debug!("set {:?}: expected {}, got {}", param, expected.name(), status_name(&result));
    if !expected.matches(&result) {
        failures.push(AssertionFailure::non_fatal(
            Step::Set,
            format!("{:?}: expected {}, got {}", param, expected.name(), status_name(&result)),
        ));
    }

    if expected == ExpectedStatus::None {
        let got = effect.get_parameter(ParameterId::BassBoost(bb.tag()));
        if !expected.matches(&got) {
            failures.push(AssertionFailure::non_fatal(
                Step::Get,
                format!("get {:?}: expected NONE, got {}", bb.tag(), status_name(&got)),
            ));
        }
        if got.as_ref().ok() != Some(&param) {
            failures.push(AssertionFailure::non_fatal(
                Step::RoundTrip,
                format!("set {:?}, got back {:?}", param, got),
            ));
        }
    }

    CheckOutcome { class: Some(class), failures }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::BassBoostCapability;

    const SUPPORTED: Capability = Capability::BassBoost(BassBoostCapability { strength_supported: true });
    const UNSUPPORTED: Capability = Capability::BassBoost(BassBoostCapability { strength_supported: false });

    fn strength(v: i32) -> Specific {
        Specific::BassBoost(BassBoost::StrengthPm(v))
    }

    #[test]
    fn test_documented_bounds() {
        assert_eq!(classify(&strength(0), &SUPPORTED), RangeClass::InRange);
        assert_eq!(classify(&strength(500), &SUPPORTED), RangeClass::InRange);
        assert_eq!(classify(&strength(1000), &SUPPORTED), RangeClass::InRange);
        assert_eq!(classify(&strength(-1), &SUPPORTED), RangeClass::OutOfRange);
        assert_eq!(classify(&strength(1001), &SUPPORTED), RangeClass::OutOfRange);
        assert_eq!(classify(&strength(i32::MIN), &SUPPORTED), RangeClass::OutOfRange);
        assert_eq!(classify(&strength(i32::MAX), &SUPPORTED), RangeClass::OutOfRange);
    }

    #[test]
    fn test_unsupported_capability_fails_closed() {
        assert_eq!(classify(&strength(500), &UNSUPPORTED), RangeClass::OutOfRange);
        assert_eq!(classify(&strength(500), &Capability::None), RangeClass::OutOfRange);
    }

    #[test]
    fn test_expected_status_matching() {
        let ok: Result<(), EffectError> = Ok(());
        let illegal: Result<(), EffectError> = Err(EffectError::IllegalArgument("x".into()));
        let state: Result<(), EffectError> = Err(EffectError::IllegalState("x".into()));

        assert!(ExpectedStatus::None.matches(&ok));
        assert!(!ExpectedStatus::None.matches(&illegal));
        assert!(ExpectedStatus::IllegalArgument.matches(&illegal));
        assert!(!ExpectedStatus::IllegalArgument.matches(&ok));
        assert!(!ExpectedStatus::IllegalArgument.matches(&state));
    }
}

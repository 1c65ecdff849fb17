use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::SuiteConfig;
use crate::effect::{BassBoost, Descriptor, Specific, BASS_BOOST_TYPE_UUID};
use crate::factory::{EffectFactory, FactoryRegistry};
use crate::validator::{check_set_and_get, AssertionFailure, RangeClass, Step};

/// Boundary values every implementation is tested with
pub const STRENGTH_VALUES: [i32; 7] = [
    i32::MIN,
    BassBoost::MIN_PER_MILLE_STRENGTH - 1,
    BassBoost::MIN_PER_MILLE_STRENGTH,
    (BassBoost::MIN_PER_MILLE_STRENGTH + BassBoost::MAX_PER_MILLE_STRENGTH) >> 1,
    BassBoost::MAX_PER_MILLE_STRENGTH,
    BassBoost::MAX_PER_MILLE_STRENGTH + 2,
    i32::MAX,
];

/// Boundary values followed by configured extras, without duplicates
pub fn strength_values(config: &SuiteConfig) -> Vec<i32> {
    let mut values = STRENGTH_VALUES.to_vec();
    for &v in &config.extra_strength_values {
        if !values.contains(&v) {
            values.push(v);
        }
    }
    values
}

/// One (implementation, strength) pair
#[derive(Clone)]
pub struct ParamCase {
    pub factory: Arc<dyn EffectFactory>,
    pub descriptor: Descriptor,
    pub strength: i32,
}

impl ParamCase {
    /// Stable case name, every character that is not alphanumeric replaced by `_`
    pub fn name(&self) -> String {
        let common = &self.descriptor.common;
        format!(
            "Implementor_{}_name_{}_UUID_{}_strength_{}",
            common.implementor, common.name, common.id.uuid, self.strength
        )
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
    }
}

/// Cartesian product of every enumerated bass boost implementation and every strength value
pub fn generate_cases(registry: &FactoryRegistry, config: &SuiteConfig) -> Vec<ParamCase> {
    let values = strength_values(config);
    registry
        .all_effect_descriptors(BASS_BOOST_TYPE_UUID)
        .into_iter()
        .flat_map(|(factory, descriptor)| {
            values.iter().map(move |&strength| ParamCase {
                factory: Arc::clone(&factory),
                descriptor: descriptor.clone(),
                strength,
            })
        })
        .collect()
}

/// Result of one case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseOutcome {
    pub name: String,
    pub implementor: String,
    pub effect_name: String,
    pub uuid: Uuid,
    pub strength: i32,
    /// `None` when the case never reached classification
    pub class: Option<RangeClass>,
    pub failures: Vec<AssertionFailure>,
}

impl CaseOutcome {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Run one case: create and open, check, close and destroy
///
/// Setup and teardown failures are fatal to this case only. A panic raised by the
/// implementation is caught and recorded against this case.
pub fn run_case(case: &ParamCase, config: &SuiteConfig) -> CaseOutcome {
    let mut failures = Vec::new();

    let result = panic::catch_unwind(AssertUnwindSafe(|| execute(case, config, &mut failures)));
    let class = match result {
        Ok(class) => class,
        Err(payload) => {
            failures.push(AssertionFailure::fatal(Step::Panic, panic_message(payload.as_ref())));
            None
        }
    };

    let common = &case.descriptor.common;
    let outcome = CaseOutcome {
        name: case.name(),
        implementor: common.implementor.clone(),
        effect_name: common.name.clone(),
        uuid: common.id.uuid,
        strength: case.strength,
        class,
        failures,
    };

    if outcome.passed() {
        debug!("PASS {}", outcome.name);
    } else {
        for failure in &outcome.failures {
            warn!("FAIL {} [{:?}]: {}", outcome.name, failure.step, failure.message);
        }
    }
    outcome
}

fn execute(case: &ParamCase, config: &SuiteConfig, failures: &mut Vec<AssertionFailure>) -> Option<RangeClass> {
    let uuid = case.descriptor.common.id.uuid;
    let mut effect = match case.factory.create_effect(&uuid) {
        Ok(effect) => effect,
        Err(e) => {
            failures.push(AssertionFailure::fatal(Step::Setup, format!("create_effect: {}", e)));
            return None;
        }
    };

    let default_specific = Specific::BassBoost(BassBoost::StrengthPm(BassBoost::MIN_PER_MILLE_STRENGTH));
    let mut class = None;
    match effect.open(config.common(), Some(default_specific)) {
        Ok(_) => {
            let outcome = check_set_and_get(&mut *effect, BassBoost::StrengthPm(case.strength));
            class = outcome.class;
            failures.extend(outcome.failures);

            if let Err(e) = effect.close() {
                failures.push(AssertionFailure::fatal(Step::Teardown, format!("close: {}", e)));
            }
        }
        Err(e) => failures.push(AssertionFailure::fatal(Step::Setup, format!("open: {}", e))),
    }

    if let Err(rejected) = case.factory.destroy_effect(effect) {
        failures.push(AssertionFailure::fatal(
            Step::Teardown,
            format!("destroy_effect: {}", rejected.error),
        ));
    }
    class
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {}", s)
    } else {
        "panicked".to_string()
    }
}

/// Outcomes of a full run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteReport {
    pub outcomes: Vec<CaseOutcome>,
    pub passed: usize,
    pub failed: usize,
}

impl SuiteReport {
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &CaseOutcome> {
        self.outcomes.iter().filter(|o| !o.passed())
    }
}

/// Run every generated case whose name contains `filter`
pub fn run_suite(registry: &FactoryRegistry, config: &SuiteConfig, filter: Option<&str>) -> SuiteReport {
    let cases = generate_cases(registry, config);
    if cases.is_empty() {
        warn!("no bass boost implementations registered");
    }

    let mut report = SuiteReport::default();
    for case in cases
        .iter()
        .filter(|case| filter.map_or(true, |f| case.name().contains(f)))
    {
        let outcome = run_case(case, config);
        if outcome.passed() {
            report.passed += 1;
        } else {
            report.failed += 1;
        }
        report.outcomes.push(outcome);
    }

    info!("{} passed, {} failed", report.passed, report.failed);
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::bass_boost::software_descriptor;
    use crate::factory::SoftwareFactory;

    #[test]
    fn test_strength_values() {
        assert_eq!(STRENGTH_VALUES, [i32::MIN, -1, 0, 500, 1000, 1002, i32::MAX]);

        let config = SuiteConfig {
            extra_strength_values: vec![250, 500, 250],
            ..SuiteConfig::default()
        };
        assert_eq!(strength_values(&config), vec![i32::MIN, -1, 0, 500, 1000, 1002, i32::MAX, 250]);
    }

    #[test]
    fn test_case_name_is_sanitized() {
        let case = ParamCase {
            factory: Arc::new(SoftwareFactory::with_defaults()),
            descriptor: software_descriptor(),
            strength: -1,
        };
        assert_eq!(
            case.name(),
            "Implementor_Lightningbeam_name_Bass_Boost__software__UUID_fa8181f2_588b_11ed_9b6a_0242ac120002_strength__1"
        );
    }

    #[test]
    fn test_generate_cases_is_cartesian() {
        let registry = FactoryRegistry::with_defaults();
        let cases = generate_cases(&registry, &SuiteConfig::default());
        assert_eq!(cases.len(), 2 * STRENGTH_VALUES.len());
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "panicked: boom");
        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "panicked: bang");
    }
}

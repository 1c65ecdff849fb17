// Bass Boost VTS - parameter range conformance
//
// Enumerates every bass boost implementation behind the effect interface and checks
// that the strength parameter is accepted inside [MIN, MAX] and rejected outside it.
// A software bass boost and its factory are included so the suite runs in-process.

pub mod config;
pub mod dsp;
pub mod effect;
pub mod factory;
pub mod suite;
pub mod validator;

// Re-export commonly used types
pub use config::{ConfigError, SuiteConfig};
pub use effect::{
    BassBoost, BassBoostCapability, BassBoostEffect, BassBoostTag, Capability, CommandId, CommonConfig,
    Descriptor, Effect, EffectError, EffectResult, Parameter, ParameterId, Specific, State,
};
pub use factory::{EffectFactory, FactoryRegistry, SoftwareFactory};
pub use suite::{run_suite, CaseOutcome, ParamCase, SuiteReport};
pub use validator::{classify, RangeClass};

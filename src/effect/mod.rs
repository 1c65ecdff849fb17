pub mod bass_boost;
pub mod effect_trait;
pub mod types;

pub use bass_boost::BassBoostEffect;
pub use effect_trait::Effect;
pub use types::{
    BassBoost, BassBoostCapability, BassBoostTag, Capability, CommandId, CommonConfig, Descriptor,
    DescriptorCommon, EffectError, EffectId, EffectResult, OpenEffectReturn, Parameter, ParameterId, Specific,
    State, BASS_BOOST_FIXED_UUID, BASS_BOOST_SW_UUID, BASS_BOOST_TYPE_UUID,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Type UUID shared by every bass boost implementation
pub const BASS_BOOST_TYPE_UUID: Uuid = Uuid::from_u128(0x0634f220_ddd4_11db_a0fc_0002a5d5c51b);

/// Implementation UUID of the software bass boost with adjustable strength
pub const BASS_BOOST_SW_UUID: Uuid = Uuid::from_u128(0xfa8181f2_588b_11ed_9b6a_0242ac120002);

/// Implementation UUID of the software bass boost with a fixed strength
pub const BASS_BOOST_FIXED_UUID: Uuid = Uuid::from_u128(0xfa8181f2_588b_11ed_9b6a_0242ac120003);

/// Status codes returned by effect calls
///
/// A call that succeeds returns `Ok`; every other status maps to one variant here.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum EffectError {
    #[error("illegal argument: {0}")]
    IllegalArgument(String),
    #[error("illegal state: {0}")]
    IllegalState(String),
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),
    #[error("null pointer: {0}")]
    NullPointer(String),
}

impl EffectError {
    /// Short status name, used in reports
    pub fn status_name(&self) -> &'static str {
        match self {
            EffectError::IllegalArgument(_) => "ILLEGAL_ARGUMENT",
            EffectError::IllegalState(_) => "ILLEGAL_STATE",
            EffectError::UnsupportedOperation(_) => "UNSUPPORTED_OPERATION",
            EffectError::NullPointer(_) => "NULL_POINTER",
        }
    }
}

pub type EffectResult<T> = Result<T, EffectError>;

/// Lifecycle state of an effect instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum State {
    /// Created or closed, no processing context
    Init,
    /// Opened, parameters may be changed
    Idle,
    /// Started, audio is being processed
    Processing,
}

/// Commands accepted by `Effect::command`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandId {
    Start,
    Stop,
    Reset,
}

/// Identity of an implementation: the effect type plus the implementation itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EffectId {
    pub type_uuid: Uuid,
    pub uuid: Uuid,
}

/// Fields shared by every effect descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptorCommon {
    pub id: EffectId,
    pub name: String,
    pub implementor: String,
}

/// Bass boost capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BassBoostCapability {
    pub strength_supported: bool,
}

/// Effect specific capability, one variant per effect kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Capability {
    /// Effect advertises nothing beyond the common descriptor
    None,
    BassBoost(BassBoostCapability),
}

/// Immutable metadata of an implementation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Descriptor {
    pub common: DescriptorCommon,
    pub capability: Capability,
}

/// Bass boost parameter, tag and value together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BassBoost {
    /// Strength in per mille, 0 to 1000 maps to 0 to 100.0%
    StrengthPm(i32),
}

impl BassBoost {
    pub const MIN_PER_MILLE_STRENGTH: i32 = 0;
    pub const MAX_PER_MILLE_STRENGTH: i32 = 1000;

    pub fn tag(&self) -> BassBoostTag {
        match self {
            BassBoost::StrengthPm(_) => BassBoostTag::StrengthPm,
        }
    }
}

/// Selects one bass boost parameter without a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BassBoostTag {
    StrengthPm,
}

/// Parameters specific to one effect kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Specific {
    BassBoost(BassBoost),
}

/// Processing context applied by `open` and readable as a common parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonConfig {
    pub session: i32,
    pub io_handle: i32,
    pub input_sample_rate: u32,
    pub output_sample_rate: u32,
    pub input_frame_count: u64,
    pub output_frame_count: u64,
}

impl CommonConfig {
    /// Largest frame count accepted for either direction
    pub const MAX_FRAME_COUNT: u64 = 1 << 24;

    pub fn validate(&self) -> EffectResult<()> {
        if self.input_sample_rate == 0 || self.output_sample_rate == 0 {
            return Err(EffectError::IllegalArgument(format!(
                "sample rates must be non-zero (in {}, out {})",
                self.input_sample_rate, self.output_sample_rate
            )));
        }
        if self.input_frame_count == 0 || self.output_frame_count == 0 {
            return Err(EffectError::IllegalArgument(format!(
                "frame counts must be non-zero (in {}, out {})",
                self.input_frame_count, self.output_frame_count
            )));
        }
        if self.input_frame_count > Self::MAX_FRAME_COUNT || self.output_frame_count > Self::MAX_FRAME_COUNT {
            return Err(EffectError::IllegalArgument(format!(
                "frame counts must not exceed {} (in {}, out {})",
                Self::MAX_FRAME_COUNT,
                self.input_frame_count,
                self.output_frame_count
            )));
        }
        Ok(())
    }
}

/// A parameter sent to or read from an effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Parameter {
    Common(CommonConfig),
    Specific(Specific),
}

impl Parameter {
    pub fn bass_boost(bb: BassBoost) -> Self {
        Parameter::Specific(Specific::BassBoost(bb))
    }
}

/// Identifies which parameter `get_parameter` should return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParameterId {
    Common,
    BassBoost(BassBoostTag),
}

/// Returned by a successful `open`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenEffectReturn {
    /// Input buffer capacity in samples
    pub input_buffer_size: usize,
    /// Output buffer capacity in samples
    pub output_buffer_size: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn common() -> CommonConfig {
        CommonConfig {
            session: 0,
            io_handle: 1,
            input_sample_rate: 44100,
            output_sample_rate: 44100,
            input_frame_count: 0x100,
            output_frame_count: 0x100,
        }
    }

    #[test]
    fn test_common_config_validation() {
        assert!(common().validate().is_ok());

        let zero_rate = CommonConfig { output_sample_rate: 0, ..common() };
        assert!(matches!(zero_rate.validate(), Err(EffectError::IllegalArgument(_))));

        let zero_frames = CommonConfig { input_frame_count: 0, ..common() };
        assert!(matches!(zero_frames.validate(), Err(EffectError::IllegalArgument(_))));

        let huge_frames = CommonConfig { output_frame_count: u64::MAX, ..common() };
        assert!(matches!(huge_frames.validate(), Err(EffectError::IllegalArgument(_))));

        let max_frames = CommonConfig { input_frame_count: CommonConfig::MAX_FRAME_COUNT, ..common() };
        assert!(max_frames.validate().is_ok());
    }

    #[test]
    fn test_bass_boost_tag() {
        assert_eq!(BassBoost::StrengthPm(500).tag(), BassBoostTag::StrengthPm);
    }

    #[test]
    fn test_type_uuid_format() {
        assert_eq!(BASS_BOOST_TYPE_UUID.to_string(), "0634f220-ddd4-11db-a0fc-0002a5d5c51b");
    }
}

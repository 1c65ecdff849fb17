use log::debug;

use super::types::{
    BassBoost, BassBoostCapability, BassBoostTag, Capability, CommandId, CommonConfig, Descriptor, DescriptorCommon,
    EffectError, EffectId, EffectResult, OpenEffectReturn, Parameter, ParameterId, Specific, State,
    BASS_BOOST_FIXED_UUID, BASS_BOOST_SW_UUID, BASS_BOOST_TYPE_UUID,
};
use super::Effect;
use crate::dsp::LowShelf;

/// Interleaved channel count processed by the software implementation
pub const CHANNELS: usize = 2;

/// Shelf corner frequency in Hz
const SHELF_FREQ: f32 = 100.0;
const SHELF_Q: f32 = 0.707;

/// Shelf gain reached at full strength
const MAX_BOOST_DB: f32 = 15.0;

/// Strength used by the fixed flavour, which cannot be adjusted
pub const FIXED_STRENGTH_PM: i32 = 500;

/// Descriptor of the software bass boost with adjustable strength
pub fn software_descriptor() -> Descriptor {
    Descriptor {
        common: DescriptorCommon {
            id: EffectId { type_uuid: BASS_BOOST_TYPE_UUID, uuid: BASS_BOOST_SW_UUID },
            name: "Bass Boost (software)".to_string(),
            implementor: "Lightningbeam".to_string(),
        },
        capability: Capability::BassBoost(BassBoostCapability { strength_supported: true }),
    }
}

/// Descriptor of the software bass boost with a fixed strength
pub fn fixed_descriptor() -> Descriptor {
    Descriptor {
        common: DescriptorCommon {
            id: EffectId { type_uuid: BASS_BOOST_TYPE_UUID, uuid: BASS_BOOST_FIXED_UUID },
            name: "Bass Boost (fixed)".to_string(),
            implementor: "Lightningbeam".to_string(),
        },
        capability: Capability::BassBoost(BassBoostCapability { strength_supported: false }),
    }
}

/// Software bass boost
///
/// Strength in per mille maps linearly onto a low-shelf gain of 0 to 15 dB at 100 Hz.
/// Values outside [MIN_PER_MILLE_STRENGTH, MAX_PER_MILLE_STRENGTH] are rejected, never clamped.
pub struct BassBoostEffect {
    descriptor: Descriptor,
    state: State,
    common: Option<CommonConfig>,
    strength_pm: i32,
    filter: LowShelf,
}

impl BassBoostEffect {
    /// Create an effect in `State::Init` for the given descriptor
    pub fn new(descriptor: Descriptor) -> Self {
        let strength_pm = if strength_supported(&descriptor) {
            BassBoost::MIN_PER_MILLE_STRENGTH
        } else {
            FIXED_STRENGTH_PM
        };
        Self {
            descriptor,
            state: State::Init,
            common: None,
            strength_pm,
            filter: LowShelf::new(CHANNELS),
        }
    }

    pub fn strength_pm(&self) -> i32 {
        self.strength_pm
    }

    fn set_strength(&mut self, strength: i32) -> EffectResult<()> {
        if !strength_supported(&self.descriptor) {
            return Err(EffectError::IllegalArgument(format!(
                "strength is fixed at {} by {}",
                self.strength_pm, self.descriptor.common.name
            )));
        }
        if !(BassBoost::MIN_PER_MILLE_STRENGTH..=BassBoost::MAX_PER_MILLE_STRENGTH).contains(&strength) {
            return Err(EffectError::IllegalArgument(format!(
                "strength {} outside [{}, {}]",
                strength,
                BassBoost::MIN_PER_MILLE_STRENGTH,
                BassBoost::MAX_PER_MILLE_STRENGTH
            )));
        }
        self.strength_pm = strength;
        self.update_filter();
        Ok(())
    }

    fn set_specific(&mut self, specific: Specific) -> EffectResult<()> {
        match specific {
            Specific::BassBoost(BassBoost::StrengthPm(strength)) => self.set_strength(strength),
        }
    }

    fn update_filter(&mut self) {
        if let Some(common) = &self.common {
            let gain_db = self.strength_pm as f32 / BassBoost::MAX_PER_MILLE_STRENGTH as f32 * MAX_BOOST_DB;
            self.filter
                .set_coefficients(SHELF_FREQ, SHELF_Q, gain_db, common.input_sample_rate as f32);
        }
    }

    /// Validate a processing context against what this implementation can run
    fn check_common(common: &CommonConfig) -> EffectResult<OpenEffectReturn> {
        common.validate()?;
        // The shelf corner must stay below Nyquist
        if common.input_sample_rate as f32 <= 2.0 * SHELF_FREQ {
            return Err(EffectError::IllegalArgument(format!(
                "input sample rate {} Hz too low for a {} Hz shelf",
                common.input_sample_rate, SHELF_FREQ
            )));
        }
        Ok(OpenEffectReturn {
            input_buffer_size: buffer_size(common.input_frame_count)?,
            output_buffer_size: buffer_size(common.output_frame_count)?,
        })
    }

    fn set_common(&mut self, common: CommonConfig) -> EffectResult<()> {
        Self::check_common(&common)?;
        if let Some(current) = &self.common {
            if current.session != common.session || current.io_handle != common.io_handle {
                return Err(EffectError::UnsupportedOperation(format!(
                    "session and io handle are fixed at open (session {}, io {})",
                    current.session, current.io_handle
                )));
            }
        }
        self.common = Some(common);
        self.update_filter();
        Ok(())
    }

    fn require_open(&self, call: &str) -> EffectResult<()> {
        if self.state == State::Init {
            return Err(EffectError::IllegalState(format!("{} called before open", call)));
        }
        Ok(())
    }
}

/// Interleaved buffer size in samples for a frame count
fn buffer_size(frames: u64) -> EffectResult<usize> {
    usize::try_from(frames)
        .ok()
        .and_then(|frames| frames.checked_mul(CHANNELS))
        .ok_or_else(|| EffectError::IllegalArgument(format!("frame count {} too large", frames)))
}

fn strength_supported(descriptor: &Descriptor) -> bool {
    matches!(
        descriptor.capability,
        Capability::BassBoost(BassBoostCapability { strength_supported: true })
    )
}

impl Effect for BassBoostEffect {
    fn open(&mut self, common: CommonConfig, specific: Option<Specific>) -> EffectResult<OpenEffectReturn> {
        if self.state != State::Init {
            return Err(EffectError::IllegalState(format!("open in state {:?}", self.state)));
        }
        let ret = Self::check_common(&common)?;

        self.common = Some(common);
        // A fixed-strength effect has nothing to apply from the initial parameter
        if let Some(specific) = specific.filter(|_| strength_supported(&self.descriptor)) {
            if let Err(e) = self.set_specific(specific) {
                self.common = None;
                return Err(e);
            }
        }
        self.update_filter();
        self.filter.reset();
        self.state = State::Idle;

        debug!(
            "{}: opened session {} io {} at {} Hz",
            self.descriptor.common.name, common.session, common.io_handle, common.input_sample_rate
        );

        Ok(ret)
    }

    fn close(&mut self) -> EffectResult<()> {
        match self.state {
            State::Init => Err(EffectError::IllegalState("close before open".to_string())),
            State::Idle | State::Processing => {
                self.filter.reset();
                self.common = None;
                self.state = State::Init;
                debug!("{}: closed", self.descriptor.common.name);
                Ok(())
            }
        }
    }

    fn descriptor(&self) -> EffectResult<Descriptor> {
        Ok(self.descriptor.clone())
    }

    fn set_parameter(&mut self, param: Parameter) -> EffectResult<()> {
        self.require_open("set_parameter")?;
        let result = match param {
            Parameter::Common(common) => self.set_common(common),
            Parameter::Specific(specific) => self.set_specific(specific),
        };
        if let Err(e) = &result {
            debug!("{}: rejected {:?}: {}", self.descriptor.common.name, param, e);
        }
        result
    }

    fn get_parameter(&self, id: ParameterId) -> EffectResult<Parameter> {
        self.require_open("get_parameter")?;
        match id {
            ParameterId::Common => self
                .common
                .map(Parameter::Common)
                .ok_or_else(|| EffectError::NullPointer("no common config".to_string())),
            ParameterId::BassBoost(BassBoostTag::StrengthPm) => {
                Ok(Parameter::bass_boost(BassBoost::StrengthPm(self.strength_pm)))
            }
        }
    }

    fn command(&mut self, command: CommandId) -> EffectResult<()> {
        let next = match (command, self.state) {
            (CommandId::Start, State::Idle) => State::Processing,
            (CommandId::Stop, State::Processing) => State::Idle,
            (CommandId::Reset, State::Idle | State::Processing) => {
                self.filter.reset();
                self.state
            }
            (command, state) => {
                return Err(EffectError::IllegalState(format!("{:?} in state {:?}", command, state)));
            }
        };
        debug!("{}: {:?} {:?} -> {:?}", self.descriptor.common.name, command, self.state, next);
        self.state = next;
        Ok(())
    }

    fn state(&self) -> State {
        self.state
    }

    fn process(&mut self, buffer: &mut [f32]) -> EffectResult<()> {
        if self.state != State::Processing {
            return Err(EffectError::IllegalState(format!("process in state {:?}", self.state)));
        }
        self.filter.process_buffer(buffer);
        Ok(())
    }
}

use super::types::{
    CommandId, CommonConfig, Descriptor, EffectResult, OpenEffectReturn, Parameter, ParameterId, Specific, State,
};

/// Effect interface, one instance per opened effect
///
/// All effects must be Send so a handle can move between the thread that creates it
/// and the thread that drives it. Every call is a blocking request/response.
pub trait Effect: Send {
    /// Open the processing context
    ///
    /// # Arguments
    /// * `common` - Session, io handle, sample rates and frame counts
    /// * `specific` - Optional initial effect specific parameter
    ///
    /// Only valid in `State::Init`. Moves the effect to `State::Idle`.
    fn open(&mut self, common: CommonConfig, specific: Option<Specific>) -> EffectResult<OpenEffectReturn>;

    /// Release the processing context and return to `State::Init`
    fn close(&mut self) -> EffectResult<()>;

    /// Get the implementation descriptor
    fn descriptor(&self) -> EffectResult<Descriptor>;

    /// Set a parameter
    ///
    /// # Returns
    /// `Ok` when the parameter was applied, `IllegalArgument` when the value is
    /// outside what the implementation supports
    fn set_parameter(&mut self, param: Parameter) -> EffectResult<()>;

    /// Get the current value of a parameter
    fn get_parameter(&self, id: ParameterId) -> EffectResult<Parameter>;

    /// Start, stop or reset processing
    fn command(&mut self, command: CommandId) -> EffectResult<()>;

    /// Current lifecycle state
    fn state(&self) -> State;

    /// Process interleaved audio in-place, only valid while processing
    fn process(&mut self, buffer: &mut [f32]) -> EffectResult<()>;
}

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use log::{debug, warn};
use parking_lot::Mutex;
use uuid::Uuid;

use crate::effect::bass_boost::{fixed_descriptor, software_descriptor};
use crate::effect::{BassBoostEffect, Descriptor, Effect, EffectError, EffectResult, State};

/// Interface name factories are registered under
pub const FACTORY_INTERFACE: &str = "IFactory";

/// Returned by `destroy_effect` when the factory refuses to destroy an effect
///
/// The effect is handed back so the caller can close it and try again.
pub struct DestroyRejected {
    pub error: EffectError,
    pub effect: Box<dyn Effect>,
}

impl fmt::Debug for DestroyRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DestroyRejected")
            .field("error", &self.error)
            .field("state", &self.effect.state())
            .finish()
    }
}

/// Creates and destroys effect instances
pub trait EffectFactory: Send + Sync {
    /// Descriptors of every implementation, optionally filtered by type and implementation uuid
    fn query_effects(&self, type_uuid: Option<Uuid>, impl_uuid: Option<Uuid>) -> EffectResult<Vec<Descriptor>>;

    /// Create an effect in `State::Init`
    fn create_effect(&self, impl_uuid: &Uuid) -> EffectResult<Box<dyn Effect>>;

    /// Destroy an effect created by this factory, which must be closed
    fn destroy_effect(&self, effect: Box<dyn Effect>) -> Result<(), DestroyRejected>;
}

type Constructor = Box<dyn Fn(Descriptor) -> Box<dyn Effect> + Send + Sync>;

struct Registration {
    descriptor: Descriptor,
    constructor: Constructor,
}

/// In-process factory backed by a table of constructors
pub struct SoftwareFactory {
    registrations: Vec<Registration>,
    /// Live instance count per implementation uuid
    live: Mutex<HashMap<Uuid, usize>>,
}

impl SoftwareFactory {
    /// Create a factory with no implementations
    pub fn new() -> Self {
        Self {
            registrations: Vec::new(),
            live: Mutex::new(HashMap::new()),
        }
    }

    /// Factory offering both software bass boost flavours
    pub fn with_defaults() -> Self {
        let mut factory = Self::new();
        factory.register(software_descriptor(), |d| Box::new(BassBoostEffect::new(d)));
        factory.register(fixed_descriptor(), |d| Box::new(BassBoostEffect::new(d)));
        factory
    }

    /// Add an implementation; a later registration with the same uuid replaces the earlier one
    pub fn register<F>(&mut self, descriptor: Descriptor, constructor: F)
    where
        F: Fn(Descriptor) -> Box<dyn Effect> + Send + Sync + 'static,
    {
        let uuid = descriptor.common.id.uuid;
        self.registrations.retain(|r| r.descriptor.common.id.uuid != uuid);
        self.registrations.push(Registration {
            descriptor,
            constructor: Box::new(constructor),
        });
    }

    /// Number of effects created and not yet destroyed
    pub fn live_count(&self) -> usize {
        self.live.lock().values().sum()
    }
}

impl EffectFactory for SoftwareFactory {
    fn query_effects(&self, type_uuid: Option<Uuid>, impl_uuid: Option<Uuid>) -> EffectResult<Vec<Descriptor>> {
        Ok(self
            .registrations
            .iter()
            .map(|r| &r.descriptor)
            .filter(|d| type_uuid.map_or(true, |t| d.common.id.type_uuid == t))
            .filter(|d| impl_uuid.map_or(true, |u| d.common.id.uuid == u))
            .cloned()
            .collect())
    }

    fn create_effect(&self, impl_uuid: &Uuid) -> EffectResult<Box<dyn Effect>> {
        let registration = self
            .registrations
            .iter()
            .find(|r| r.descriptor.common.id.uuid == *impl_uuid)
            .ok_or_else(|| EffectError::IllegalArgument(format!("no implementation {}", impl_uuid)))?;

        let effect = (registration.constructor)(registration.descriptor.clone());
        *self.live.lock().entry(*impl_uuid).or_insert(0) += 1;
        debug!("created {} ({})", registration.descriptor.common.name, impl_uuid);
        Ok(effect)
    }

    fn destroy_effect(&self, effect: Box<dyn Effect>) -> Result<(), DestroyRejected> {
        let uuid = match effect.descriptor() {
            Ok(descriptor) => descriptor.common.id.uuid,
            Err(error) => return Err(DestroyRejected { error, effect }),
        };

        if effect.state() != State::Init {
            let error = EffectError::IllegalState(format!("destroy in state {:?}", effect.state()));
            warn!("refusing to destroy {}: {}", uuid, error);
            return Err(DestroyRejected { error, effect });
        }

        let mut live = self.live.lock();
        match live.get_mut(&uuid) {
            Some(count) if *count > 0 => {
                *count -= 1;
                debug!("destroyed {}", uuid);
                Ok(())
            }
            _ => Err(DestroyRejected {
                error: EffectError::IllegalArgument(format!("{} was not created by this factory", uuid)),
                effect,
            }),
        }
    }
}

/// Named factories, the enumeration source for the suite
#[derive(Default)]
pub struct FactoryRegistry {
    factories: Vec<(String, Arc<dyn EffectFactory>)>,
}

impl FactoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the software factory as `IFactory/default`
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.add("default", Arc::new(SoftwareFactory::with_defaults()));
        registry
    }

    /// Register a factory instance; the full name is `IFactory/<instance>`
    pub fn add(&mut self, instance: &str, factory: Arc<dyn EffectFactory>) {
        let name = format!("{}/{}", FACTORY_INTERFACE, instance);
        self.factories.retain(|(n, _)| *n != name);
        self.factories.push((name, factory));
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn EffectFactory>> {
        self.factories.iter().find(|(n, _)| n == name).map(|(_, f)| Arc::clone(f))
    }

    pub fn names(&self) -> Vec<&str> {
        self.factories.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Every (factory, descriptor) pair whose descriptor has the given type
    ///
    /// A factory that fails to answer is skipped with a warning.
    pub fn all_effect_descriptors(&self, type_uuid: Uuid) -> Vec<(Arc<dyn EffectFactory>, Descriptor)> {
        let mut result = Vec::new();
        for (name, factory) in &self.factories {
            match factory.query_effects(Some(type_uuid), None) {
                Ok(descriptors) => {
                    result.extend(descriptors.into_iter().map(|d| (Arc::clone(factory), d)));
                }
                Err(e) => warn!("{}: query_effects failed: {}", name, e),
            }
        }
        result
    }
}

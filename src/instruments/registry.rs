// Instrument Registry - Fixed mapping from instrument name to trigger capability
// Built once at process start and passed into the conductor; read-only after
// construction, so it needs no locking.

use log::debug;

/// Error raised by a trigger invocation
#[derive(Debug, Clone, thiserror::Error)]
pub enum TriggerError {
    #[error("no instrument registered under '{0}'")]
    UnknownInstrument(String),

    #[error("trigger failed: {0}")]
    Failed(String),
}

/// A non-blocking trigger capability for one instrument
///
/// Implementations must return quickly enough not to perturb the tick
/// cadence; anything that could block belongs on the far side of a queue.
pub trait InstrumentTrigger: Send + Sync {
    fn trigger(&self) -> Result<(), TriggerError>;
}

/// Adapter turning a closure into a trigger; convenient for tests and wiring
pub struct FnTrigger<F>(F);

impl<F> FnTrigger<F>
where
    F: Fn() -> Result<(), TriggerError> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> InstrumentTrigger for FnTrigger<F>
where
    F: Fn() -> Result<(), TriggerError> + Send + Sync,
{
    fn trigger(&self) -> Result<(), TriggerError> {
        (self.0)()
    }
}

/// Trigger that only logs the hit, used by the demo binary
pub struct LogTrigger {
    name: String,
}

impl LogTrigger {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl InstrumentTrigger for LogTrigger {
    fn trigger(&self) -> Result<(), TriggerError> {
        debug!("trigger: {}", self.name);
        Ok(())
    }
}

/// Fixed mapping from instrument name to its trigger capability
pub struct InstrumentRegistry {
    // Insertion-ordered so names() listing is deterministic
    instruments: Vec<(String, Box<dyn InstrumentTrigger>)>,
}

impl InstrumentRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            instruments: Vec::new(),
        }
    }

    /// Register an instrument, replacing any existing entry with that name
    pub fn register(&mut self, name: impl Into<String>, trigger: Box<dyn InstrumentTrigger>) {
        let name = name.into();
        self.instruments.retain(|(n, _)| *n != name);
        self.instruments.push((name, trigger));
    }

    /// All registered instrument names, in registration order
    pub fn names(&self) -> Vec<String> {
        self.instruments.iter().map(|(n, _)| n.clone()).collect()
    }

    /// Check whether an instrument is registered
    pub fn contains(&self, name: &str) -> bool {
        self.instruments.iter().any(|(n, _)| n == name)
    }

    /// Number of registered instruments
    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    /// Fire one instrument's trigger
    pub fn trigger(&self, name: &str) -> Result<(), TriggerError> {
        let (_, trigger) = self
            .instruments
            .iter()
            .find(|(n, _)| n == name)
            .ok_or_else(|| TriggerError::UnknownInstrument(name.to_string()))?;
        trigger.trigger()
    }
}

impl Default for InstrumentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_trigger(counter: Arc<AtomicUsize>) -> Box<dyn InstrumentTrigger> {
        Box::new(FnTrigger::new(move || {
            counter.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }))
    }

    #[test]
    fn test_register_and_trigger() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut registry = InstrumentRegistry::new();
        registry.register("kick", counting_trigger(counter.clone()));

        assert!(registry.contains("kick"));
        registry.trigger("kick").unwrap();
        registry.trigger("kick").unwrap();
        assert_eq!(counter.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn test_unknown_instrument() {
        let registry = InstrumentRegistry::new();
        assert!(matches!(
            registry.trigger("cowbell"),
            Err(TriggerError::UnknownInstrument(_))
        ));
    }

    #[test]
    fn test_register_replaces_existing() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        let mut registry = InstrumentRegistry::new();
        registry.register("kick", counting_trigger(first.clone()));
        registry.register("kick", counting_trigger(second.clone()));

        assert_eq!(registry.len(), 1);
        registry.trigger("kick").unwrap();
        assert_eq!(first.load(Ordering::Relaxed), 0);
        assert_eq!(second.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_names_in_registration_order() {
        let mut registry = InstrumentRegistry::new();
        registry.register("kick", Box::new(LogTrigger::new("kick")));
        registry.register("snare", Box::new(LogTrigger::new("snare")));
        registry.register("hat", Box::new(LogTrigger::new("hat")));

        assert_eq!(registry.names(), vec!["kick", "snare", "hat"]);
    }

    #[test]
    fn test_failing_trigger_propagates() {
        let mut registry = InstrumentRegistry::new();
        registry.register(
            "broken",
            Box::new(FnTrigger::new(|| {
                Err(TriggerError::Failed("voice pool exhausted".to_string()))
            })),
        );

        assert!(matches!(
            registry.trigger("broken"),
            Err(TriggerError::Failed(_))
        ));
    }
}

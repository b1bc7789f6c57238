// Instruments module
// Registry of trigger capabilities consumed by the conductor

pub mod registry;

pub use registry::{FnTrigger, InstrumentRegistry, InstrumentTrigger, LogTrigger, TriggerError};

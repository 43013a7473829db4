pub mod backend;
pub mod simulated;

pub use backend::{
    Alternative, EngineError, EngineEvent, EngineEventSender, EngineEvents, EngineOptions,
    EngineProvider, RecognitionEngine, RecognitionResult, ResultBatch,
};
pub use simulated::{SimulatedEngine, SimulatedProvider, Utterance};

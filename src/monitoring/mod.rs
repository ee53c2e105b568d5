/*!
 * Monitoring Module
 * Engine event broadcast and tracing setup
 */

pub mod events;
pub mod tracer;

pub use events::{EngineEvent, EventBroadcaster};
pub use tracer::init_tracing;

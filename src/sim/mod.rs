//! Deterministic simulated game session
//!
//! Implements both consumed interfaces over an in-memory world so the
//! engine can run without a game: in tests, benchmarks and the demo binary.

pub mod scenario;
pub mod screen;
pub mod session;
pub mod world;

pub use scenario::{load_scenario, Scenario};
pub use session::{SimDriver, SimSession, SimSnapshot};
pub use world::{DriverCall, Faults, Relocation, SimEvent, SimState, UNSOCKET_SCROLL};

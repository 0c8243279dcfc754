//! Client-side core of the chess puzzle explorer: the view state, the
//! orchestrator driving the puzzle services, and the HTTP transport.

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod state;
pub mod transport;

pub use config::{load_settings, Settings};
pub use error::{Operation, RequestError};
pub use orchestrator::{Completion, Orchestrator};
pub use state::{ViewPhase, ViewState};
pub use transport::{HttpBackend, PuzzleBackend};

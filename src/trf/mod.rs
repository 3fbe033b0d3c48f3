//! TRF16 exchange with an external pairing program.

mod engine;
mod writer;

pub use engine::{ExternalPairer, parse_output};
pub use writer::{RoundEntry, TrfWriter};

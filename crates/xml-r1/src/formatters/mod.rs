//! Per-type formatters. Each one maps a single wire type name; the base
//! (ANY) formatter handles the fields every type shares.

pub mod any;
pub mod ed;
pub mod tel;

pub use any::AnyFormatter;
pub use ed::EdFormatter;
pub use tel::TelFormatter;

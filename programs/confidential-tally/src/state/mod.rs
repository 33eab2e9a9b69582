pub mod accumulator;
pub use accumulator::*;

pub mod batch;
pub use batch::*;

pub mod cooldown;
pub use cooldown::*;

pub mod decryption;
pub use decryption::*;

pub mod events;
pub use events::*;

pub mod registry;
pub use registry::*;

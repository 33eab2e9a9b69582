pub mod initialize;
pub use initialize::*;

pub mod governance;
pub use governance::*;

pub mod batch_lifecycle;
pub use batch_lifecycle::*;

pub mod submit_vote;
pub use submit_vote::*;

pub mod request_decryption;
pub use request_decryption::*;

pub mod fulfill_decryption;
pub use fulfill_decryption::*;

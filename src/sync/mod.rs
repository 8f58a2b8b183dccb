pub mod backfill;
pub mod resync;

pub use backfill::*;
pub use resync::*;

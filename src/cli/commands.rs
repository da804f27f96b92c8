pub mod diagnose;
pub mod orders;
pub mod snapshot;

pub use diagnose::diagnose;
pub use orders::orders;
pub use snapshot::snapshot;

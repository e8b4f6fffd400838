pub mod convert;
pub mod stats;

pub mod address;
pub mod range;
pub mod source;

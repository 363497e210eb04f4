pub mod comparison;
pub mod regular;
pub mod slabs;

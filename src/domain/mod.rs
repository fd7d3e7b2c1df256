pub mod aggregation;
pub mod entities;
pub mod ports;
pub mod rules;
pub mod value_objects;

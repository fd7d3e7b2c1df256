pub mod fixes;
pub mod scan;

pub mod classes;
pub mod detection;
pub mod errors;
pub mod model;

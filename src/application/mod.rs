pub mod audit;
pub mod authoring;
pub mod draft;
pub mod enrollment;
pub mod error;
pub mod quiz;
pub mod repos;

pub mod error;
pub mod validation;

pub mod iam;
pub mod resource;
pub mod track;

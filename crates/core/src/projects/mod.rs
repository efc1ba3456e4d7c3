mod projects_model;

pub use projects_model::*;

//! Shared test utilities

#![allow(dead_code)]

pub mod fixture;

pub use fixture::{RecipeTree, conandata, run_cli};

//! Associated Legendre functions `P(n,m)[cos ϕ]` and their first derivative
//! with respect to `ϕ`, for unnormalized, Schmidt quasi-normalized and fully
//! normalized conventions, with optional Condon-Shortley phase.

pub mod domain;
pub mod numerics;
pub mod regression;

pub use domain::{LegendreError, LegendreErrorCategory, LegendreResult};
pub use numerics::legendre::{
    LegendreInput, LegendreTable, Normalization, compute_derivative, compute_values,
    fill_derivative, fill_values, legendre_derivative, legendre_values,
};

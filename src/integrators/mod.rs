// Copyright @yucwang 2026

pub mod common;
pub mod modulation;
pub mod path;
pub mod tof;
pub mod tof_analytic;
pub mod transient;

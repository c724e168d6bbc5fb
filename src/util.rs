//! Shared utility modules used across lpq components.

pub mod simd;

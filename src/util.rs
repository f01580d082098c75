//! Shared utility modules used across mltk components.

pub mod float;

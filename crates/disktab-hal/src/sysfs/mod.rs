//! Readers for `/sys` attributes.

pub mod block;

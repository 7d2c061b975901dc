//! Game rule implementations.

pub mod connect_four;

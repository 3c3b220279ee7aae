//! Proxy builder modules
//!
//! Fluent configuration of the listen address, cache limits and upstream
//! behaviour, ending in a runnable [`Proxy`].

mod core;

pub use self::core::*;

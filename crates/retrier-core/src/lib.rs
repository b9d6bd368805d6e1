pub mod config;
pub mod logging;

// Engine modules
pub mod cancel;
pub mod classify;
pub mod error;
pub mod policy;
pub mod schedule;

// Demo domain: network fault taxonomy and the HEAD probe
pub mod net;
pub mod probe;

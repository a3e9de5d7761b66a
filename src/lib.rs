//! Hospital back-office data layer: a client-side cache view over a hosted
//! record store, with alias-tolerant row normalization and a local fallback
//! mirror for when the remote schema is unreachable.

pub mod api;
pub mod error;
pub mod local;
pub mod models;
pub mod normalize;
pub mod remote;
pub mod services;
pub mod state;
pub mod store;

//! API layers: REST transport and the native in-process client.

pub mod native;
pub mod rest;

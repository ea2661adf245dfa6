//! Endpoint modules, laid out by URL path below `/_matrix`.

pub mod client;

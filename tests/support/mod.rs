//! Test support utilities.

pub mod cri_server;

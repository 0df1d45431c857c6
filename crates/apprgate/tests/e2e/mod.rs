//! End-to-end tests of the approval protocol against scripted collaborators.

#[path = "../common/mod.rs"]
pub mod common;

pub mod initiator_flow_test;
pub mod rounds_test;
pub mod runner_test;

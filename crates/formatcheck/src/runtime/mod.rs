//! Runtime module — process lifecycle: boot and a single check.

pub mod boot;

//! Integration tests for fare-engine

mod config_test;
mod pricing_flow_test;
mod what_if_test;

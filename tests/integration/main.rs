//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for the origin site and the OCR API
//! and exercise the public crate surface end to end.

mod crawl_tests;
mod fetch_tests;

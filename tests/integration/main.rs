//! Integration tests for site-mirror

mod crawl_tests;

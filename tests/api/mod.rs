//! HTTP endpoint tests

mod health_tests;
mod page_tests;

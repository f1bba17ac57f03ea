//! Integration tests for xvideos-api
//!
//! `pipeline_tests` drive the scheduler with in-process collaborators;
//! `http_tests` use wiremock servers to exercise the HTTP stack end-to-end.

mod http_tests;
mod pipeline_tests;

//! End-to-end tests: real server on `127.0.0.1:0`, driven over HTTP with reqwest.

mod anchors;
mod common;
mod health;
mod vibe_score;

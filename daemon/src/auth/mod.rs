//! Auth module for the sign-up flow.

pub mod client;

pub use client::{interpret_response, AuthClient, AuthOutcome, Credentials};

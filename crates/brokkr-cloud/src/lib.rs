//! Cloud provisioning API boundary for Brokkr
//!
//! The provisioning core reaches the cloud exclusively through the
//! [`CloudApi`] trait defined here. This crate also ships the AWS adapter,
//! which drives the `aws` CLI the same way other Brokkr tooling drives
//! provider CLIs: build the request payload, shell out, parse the JSON.

pub mod aws;
pub mod traits;
mod utils;

pub use aws::AwsCloud;
pub use traits::CloudApi;

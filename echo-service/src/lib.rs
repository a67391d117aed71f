//! # Echo Service
//!
//! **INTERNAL USE ONLY**: This crate exists to exercise `stubbind-core` against a real
//! `tonic` service. It ships the pre-generated `echo.EchoService` bindings (regenerate them
//! with `cargo run --features gen-proto --bin generate-echo-service`), a blocking stub and the
//! service's [`EchoServiceDescriptor`].
//! It is not intended for production use.

pub mod blocking;
mod descriptor;

pub mod pb {
    include!("generated/echo.rs");
}

pub use blocking::EchoServiceBlockingClient;
pub use descriptor::EchoServiceDescriptor;
pub use pb::echo_service_client::EchoServiceClient;
pub use pb::echo_service_server::{EchoService, EchoServiceServer};

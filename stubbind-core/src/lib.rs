//! # Stubbind Core
//!
//! `stubbind-core` builds gRPC client stubs for *any* generated service without the binder
//! knowing the concrete service type at compile time.
//!
//! ## Key Components
//!
//! * **[`StubBinder`]:** The main entry point. Given an invocation mode, a service descriptor and
//!   either a connection or an [`Endpoint`], it produces a ready-to-use [`Stub`].
//! * **[`ServiceDescriptor`]:** The capability contract every generated service implements. It
//!   publishes one construction entry point per [`InvocationMode`].
//! * **[`ConnectionProvider`]:** The collaborator that turns an endpoint and a security flag
//!   into a reusable connection. The binder receives it at construction time.
//!
//! ## Default provider
//!
//! [`provider::channel::ChannelProvider`] is a [`ConnectionProvider`] over
//! `tonic::transport::Channel`. Channels are dialed lazily and cached per `(endpoint, secure)`
//! pair, and their transport settings come from a JSON [`provider::config::ChannelConfig`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use stubbind_core::{Endpoint, InvocationMode, StubBinder, provider::channel::ChannelProvider};
//!
//! let binder = StubBinder::new(ChannelProvider::default());
//! let endpoint: Endpoint = "localhost:50051".parse()?;
//!
//! let stub = binder.bind_by_endpoint(InvocationMode::NonBlocking, &MyServiceDescriptor, &endpoint, false)?;
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports `tonic` to ensure that generated services and the default provider
//! agree on the transport version.
pub mod binder;
pub mod descriptor;
pub mod endpoint;
pub mod provider;

pub use binder::{BindError, StubBinder, StubError};
pub use descriptor::{EntryPoint, InvocationMode, ServiceDescriptor, Stub};
pub use endpoint::{Endpoint, EndpointParseError};
pub use provider::ConnectionProvider;

// Re-exports
pub use tonic;

/// Type alias for the standard boxed error used by stub entry points.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

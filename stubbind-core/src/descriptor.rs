//! # Service Descriptors
//!
//! A [`ServiceDescriptor`] is the capability contract between the [`crate::StubBinder`] and a
//! generated gRPC service. Every generated service ships exactly one descriptor value, and that
//! descriptor publishes one construction [`EntryPoint`] per [`InvocationMode`].
//!
//! The binder only ever talks to this trait, so new services can be added without touching it.
//!
//! ## Example
//!
//! ```rust
//! use stubbind_core::{EntryPoint, ServiceDescriptor};
//!
//! #[derive(Clone)]
//! struct Connection;
//!
//! struct GreeterClient(Connection);
//! struct GreeterBlockingClient(Connection);
//!
//! struct GreeterDescriptor;
//!
//! impl ServiceDescriptor<Connection> for GreeterDescriptor {
//!     type BlockingStub = GreeterBlockingClient;
//!     type AsyncStub = GreeterClient;
//!
//!     fn service_name(&self) -> &'static str {
//!         "helloworld.Greeter"
//!     }
//!
//!     fn blocking_entry_point(&self) -> Option<EntryPoint<Connection, GreeterBlockingClient>> {
//!         Some(|connection| Ok(GreeterBlockingClient(connection)))
//!     }
//!
//!     fn async_entry_point(&self) -> Option<EntryPoint<Connection, GreeterClient>> {
//!         Some(|connection| Ok(GreeterClient(connection)))
//!     }
//! }
//! ```
use crate::BoxError;
use std::fmt;

/// How calls on a stub are driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvocationMode {
    /// Calls block the current thread until the response arrives.
    Blocking,
    /// Calls return futures.
    NonBlocking,
}

impl fmt::Display for InvocationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvocationMode::Blocking => f.write_str("blocking"),
            InvocationMode::NonBlocking => f.write_str("non-blocking"),
        }
    }
}

/// A construction entry point: builds a stub bound to the given connection.
pub type EntryPoint<C, S> = fn(C) -> Result<S, BoxError>;

/// Publishes the stub constructors of one generated service over connections of type `C`.
pub trait ServiceDescriptor<C> {
    type BlockingStub;
    type AsyncStub;

    /// Fully qualified service name (e.g. `echo.EchoService`).
    fn service_name(&self) -> &'static str;

    /// Constructor for the blocking stub, `None` if the service does not publish one.
    fn blocking_entry_point(&self) -> Option<EntryPoint<C, Self::BlockingStub>>;

    /// Constructor for the non-blocking stub, `None` if the service does not publish one.
    fn async_entry_point(&self) -> Option<EntryPoint<C, Self::AsyncStub>>;

    /// Whether an entry point exists for `mode`.
    fn supports(&self, mode: InvocationMode) -> bool {
        match mode {
            InvocationMode::Blocking => self.blocking_entry_point().is_some(),
            InvocationMode::NonBlocking => self.async_entry_point().is_some(),
        }
    }
}

impl<C, D> ServiceDescriptor<C> for &D
where
    D: ServiceDescriptor<C> + ?Sized,
{
    type BlockingStub = D::BlockingStub;
    type AsyncStub = D::AsyncStub;

    fn service_name(&self) -> &'static str {
        (**self).service_name()
    }

    fn blocking_entry_point(&self) -> Option<EntryPoint<C, Self::BlockingStub>> {
        (**self).blocking_entry_point()
    }

    fn async_entry_point(&self) -> Option<EntryPoint<C, Self::AsyncStub>> {
        (**self).async_entry_point()
    }
}

/// A client stub produced by the binder, tagged with the mode it was built for.
#[derive(Debug, Clone)]
pub enum Stub<B, A> {
    Blocking(B),
    NonBlocking(A),
}

impl<B, A> Stub<B, A> {
    pub fn mode(&self) -> InvocationMode {
        match self {
            Stub::Blocking(_) => InvocationMode::Blocking,
            Stub::NonBlocking(_) => InvocationMode::NonBlocking,
        }
    }

    /// Returns the inner blocking stub if this is a `Blocking` stub.
    pub fn as_blocking(&self) -> Option<&B> {
        match self {
            Stub::Blocking(stub) => Some(stub),
            Stub::NonBlocking(_) => None,
        }
    }

    /// Returns the inner non-blocking stub if this is a `NonBlocking` stub.
    pub fn as_non_blocking(&self) -> Option<&A> {
        match self {
            Stub::NonBlocking(stub) => Some(stub),
            Stub::Blocking(_) => None,
        }
    }

    pub fn into_blocking(self) -> Option<B> {
        match self {
            Stub::Blocking(stub) => Some(stub),
            Stub::NonBlocking(_) => None,
        }
    }

    pub fn into_non_blocking(self) -> Option<A> {
        match self {
            Stub::NonBlocking(stub) => Some(stub),
            Stub::Blocking(_) => None,
        }
    }
}

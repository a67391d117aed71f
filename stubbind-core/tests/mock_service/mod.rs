use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};
use stubbind_core::{ConnectionProvider, Endpoint, EntryPoint, ServiceDescriptor};

/// Shared state of a mock transport, observable from every clone of a [`MockConnection`].
#[derive(Debug, Default)]
pub struct ConnectionState {
    pub calls: AtomicUsize,
    pub closed: AtomicBool,
}

/// A connection handle that records what is done with it.
#[derive(Debug, Clone)]
pub struct MockConnection {
    pub endpoint: Endpoint,
    pub secure: bool,
    pub state: Arc<ConnectionState>,
}

impl MockConnection {
    pub fn new(endpoint: Endpoint, secure: bool) -> Self {
        Self {
            endpoint,
            secure,
            state: Arc::new(ConnectionState::default()),
        }
    }

    pub fn call(&self) {
        self.state.calls.fetch_add(1, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.state.calls.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.state.closed.load(Ordering::SeqCst)
    }
}

impl PartialEq for MockConnection {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("connection refused by {0}")]
pub struct ConnectionRefused(pub Endpoint);

/// Hands out one connection per `(endpoint, secure)` request and remembers them.
#[derive(Debug, Default)]
pub struct MockProvider {
    pub requests: AtomicUsize,
    pub refuse: bool,
    pub issued: parking_lot::Mutex<Vec<MockConnection>>,
}

impl MockProvider {
    pub fn refusing() -> Self {
        Self {
            refuse: true,
            ..Self::default()
        }
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn last_issued(&self) -> Option<MockConnection> {
        self.issued.lock().last().cloned()
    }
}

impl ConnectionProvider for MockProvider {
    type Connection = MockConnection;
    type Error = ConnectionRefused;

    fn connection(
        &self,
        endpoint: &Endpoint,
        secure: bool,
    ) -> Result<MockConnection, ConnectionRefused> {
        self.requests.fetch_add(1, Ordering::SeqCst);

        if self.refuse {
            return Err(ConnectionRefused(endpoint.clone()));
        }

        let connection = MockConnection::new(endpoint.clone(), secure);
        self.issued.lock().push(connection.clone());
        Ok(connection)
    }
}

#[derive(Debug)]
pub struct EchoBlockingStub {
    pub connection: MockConnection,
}

#[derive(Debug)]
pub struct EchoAsyncStub {
    pub connection: MockConnection,
}

/// Descriptor publishing both entry points.
pub struct EchoService;

impl ServiceDescriptor<MockConnection> for EchoService {
    type BlockingStub = EchoBlockingStub;
    type AsyncStub = EchoAsyncStub;

    fn service_name(&self) -> &'static str {
        "echo.EchoService"
    }

    fn blocking_entry_point(&self) -> Option<EntryPoint<MockConnection, EchoBlockingStub>> {
        Some(|connection| Ok(EchoBlockingStub { connection }))
    }

    fn async_entry_point(&self) -> Option<EntryPoint<MockConnection, EchoAsyncStub>> {
        Some(|connection| Ok(EchoAsyncStub { connection }))
    }
}

/// Descriptor of a service that was generated without a non-blocking stub.
pub struct BlockingOnlyService;

impl ServiceDescriptor<MockConnection> for BlockingOnlyService {
    type BlockingStub = EchoBlockingStub;
    type AsyncStub = EchoAsyncStub;

    fn service_name(&self) -> &'static str {
        "legacy.BlockingOnlyService"
    }

    fn blocking_entry_point(&self) -> Option<EntryPoint<MockConnection, EchoBlockingStub>> {
        Some(|connection| Ok(EchoBlockingStub { connection }))
    }

    fn async_entry_point(&self) -> Option<EntryPoint<MockConnection, EchoAsyncStub>> {
        None
    }
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("descriptor is malformed: {0}")]
pub struct MalformedDescriptor(pub &'static str);

/// Descriptor whose entry points always fail.
pub struct BrokenService;

impl ServiceDescriptor<MockConnection> for BrokenService {
    type BlockingStub = EchoBlockingStub;
    type AsyncStub = EchoAsyncStub;

    fn service_name(&self) -> &'static str {
        "broken.BrokenService"
    }

    fn blocking_entry_point(&self) -> Option<EntryPoint<MockConnection, EchoBlockingStub>> {
        Some(|_| Err(MalformedDescriptor("missing method table").into()))
    }

    fn async_entry_point(&self) -> Option<EntryPoint<MockConnection, EchoAsyncStub>> {
        Some(|_| Err(MalformedDescriptor("missing method table").into()))
    }
}

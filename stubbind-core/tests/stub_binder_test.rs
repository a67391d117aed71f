use mock_service::{
    BlockingOnlyService, BrokenService, ConnectionRefused, EchoService, MalformedDescriptor,
    MockConnection, MockProvider,
};
use std::{error::Error, sync::Arc};
use stubbind_core::{BindError, Endpoint, InvocationMode, Stub, StubBinder, StubError};

mod mock_service;

fn localhost() -> Endpoint {
    Endpoint::new("localhost", 50051)
}

#[test]
fn test_bind_by_endpoint_uses_provider_connection() {
    let binder = StubBinder::new(MockProvider::default());

    for secure in [false, true] {
        let stub = binder
            .bind_by_endpoint(InvocationMode::Blocking, &EchoService, &localhost(), secure)
            .expect("Failed to bind blocking stub");

        let issued = binder.provider().last_issued().unwrap();

        let Stub::Blocking(stub) = stub else {
            panic!("Expected a blocking stub");
        };

        assert_eq!(stub.connection, issued);
        assert_eq!(stub.connection.endpoint, localhost());
        assert_eq!(stub.connection.secure, secure);
    }

    assert_eq!(binder.provider().requests(), 2);
}

#[test]
fn test_echo_service_scenario() {
    let binder = StubBinder::new(MockProvider::default());
    let endpoint: Endpoint = "localhost:50051".parse().unwrap();

    let plaintext = binder
        .bind_by_endpoint(InvocationMode::Blocking, &EchoService, &endpoint, false)
        .unwrap();
    assert_eq!(plaintext.mode(), InvocationMode::Blocking);
    assert!(!plaintext.as_blocking().unwrap().connection.secure);

    let secure = binder
        .bind_by_endpoint(InvocationMode::Blocking, &EchoService, &endpoint, true)
        .unwrap();
    assert!(secure.as_blocking().unwrap().connection.secure);
}

#[test]
fn test_non_blocking_mode_builds_async_stub() {
    let binder = StubBinder::new(MockProvider::default());

    let stub = binder
        .bind_by_endpoint(InvocationMode::NonBlocking, &EchoService, &localhost(), false)
        .unwrap();

    assert_eq!(stub.mode(), InvocationMode::NonBlocking);
    let stub = stub.into_non_blocking().unwrap();
    assert_eq!(stub.connection, binder.provider().last_issued().unwrap());
}

#[test]
fn test_malformed_endpoint_never_reaches_provider() {
    let binder = StubBinder::new(MockProvider::default());
    let malformed = [
        Endpoint::new("", 50051),
        Endpoint::new("localhost", 0),
        Endpoint::new(" ", 80),
        Endpoint::new("[::1", 80),
        Endpoint::new("local host", 80),
    ];

    for endpoint in &malformed {
        for mode in [InvocationMode::Blocking, InvocationMode::NonBlocking] {
            for secure in [false, true] {
                let err = binder
                    .bind_by_endpoint(mode, &EchoService, endpoint, secure)
                    .unwrap_err();
                assert!(matches!(err, BindError::InvalidArgument(_)));

                let err = binder
                    .bind_by_endpoint(mode, &BrokenService, endpoint, secure)
                    .unwrap_err();
                assert!(matches!(err, BindError::InvalidArgument(_)));
            }
        }
    }

    assert!(binder.blocking_stub(&EchoService, &malformed[0], false).is_err());
    assert!(binder.async_stub(&EchoService, &malformed[1], true).is_err());
    assert_eq!(binder.provider().requests(), 0);
}

#[test]
fn test_bracketed_host_is_rejected_before_provider() {
    let binder = StubBinder::new(MockProvider::default());

    assert!("[::1:80".parse::<Endpoint>().is_err());

    let err = binder
        .bind_by_endpoint(
            InvocationMode::Blocking,
            &EchoService,
            &Endpoint::new("[::1", 80),
            false,
        )
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Invalid argument: endpoint host cannot contain brackets"
    );
    assert_eq!(binder.provider().requests(), 0);
}

#[test]
fn test_missing_entry_point_is_unsupported() {
    let binder = StubBinder::new(MockProvider::default());
    let connection = MockConnection::new(localhost(), false);

    let err = binder
        .bind_by_connection(InvocationMode::NonBlocking, &BlockingOnlyService, connection.clone())
        .unwrap_err();

    match err {
        StubError::UnsupportedServiceKind { service, mode } => {
            assert_eq!(service, "legacy.BlockingOnlyService");
            assert_eq!(mode, InvocationMode::NonBlocking);
        }
        err => panic!("Unexpected error: {err}"),
    }

    let stub = binder
        .bind_by_connection(InvocationMode::Blocking, &BlockingOnlyService, connection)
        .unwrap();
    assert_eq!(stub.mode(), InvocationMode::Blocking);
}

#[test]
fn test_failing_entry_point_preserves_cause() {
    let binder = StubBinder::new(MockProvider::default());

    for mode in [InvocationMode::Blocking, InvocationMode::NonBlocking] {
        let connection = MockConnection::new(localhost(), false);
        let err = binder
            .bind_by_connection(mode, &BrokenService, connection)
            .unwrap_err();

        let cause = err
            .source()
            .and_then(|source| source.downcast_ref::<MalformedDescriptor>());
        assert_eq!(cause, Some(&MalformedDescriptor("missing method table")));

        assert!(matches!(
            err,
            StubError::StubConstructionFailed { service: "broken.BrokenService", mode: m, .. } if m == mode
        ));
    }
}

#[test]
fn test_construction_failure_surfaces_through_endpoint_binding() {
    let binder = StubBinder::new(MockProvider::default());

    let err = binder
        .bind_by_endpoint(InvocationMode::Blocking, &BrokenService, &localhost(), false)
        .unwrap_err();

    assert!(matches!(
        err,
        BindError::Stub(StubError::StubConstructionFailed { .. })
    ));
    assert_eq!(binder.provider().requests(), 1);
}

#[test]
fn test_provider_errors_propagate_unchanged() {
    let binder = StubBinder::new(MockProvider::refusing());

    let err = binder
        .bind_by_endpoint(InvocationMode::Blocking, &EchoService, &localhost(), false)
        .unwrap_err();

    match err {
        BindError::Connection(err) => assert_eq!(err, ConnectionRefused(localhost())),
        err => panic!("Unexpected error: {err}"),
    }

    let err = binder
        .async_stub(&EchoService, &localhost(), true)
        .unwrap_err();
    assert_eq!(err.to_string(), "connection refused by localhost:50051");
}

#[test]
fn test_binding_leaves_connection_untouched() {
    let binder = StubBinder::new(MockProvider::default());
    let connection = MockConnection::new(localhost(), false);

    let first = binder
        .bind_by_connection(InvocationMode::Blocking, &EchoService, connection.clone())
        .unwrap()
        .into_blocking()
        .unwrap();
    let calls_between = connection.calls();

    let second = binder
        .bind_by_connection(InvocationMode::Blocking, &EchoService, connection.clone())
        .unwrap()
        .into_blocking()
        .unwrap();

    assert_eq!(calls_between, 0);
    assert_eq!(connection.calls(), 0);
    assert!(!connection.is_closed());
    assert_eq!(first.connection, second.connection);

    // Each stub drives the shared transport on its own
    first.connection.call();
    assert_eq!(second.connection.calls(), 1);
    assert_eq!(binder.provider().requests(), 0);
}

#[test]
fn test_typed_helpers_return_concrete_stubs() {
    let binder = StubBinder::new(MockProvider::default());

    let blocking = binder
        .blocking_stub(&EchoService, &localhost(), false)
        .unwrap();
    assert!(!blocking.connection.secure);

    let non_blocking = binder.async_stub(&EchoService, &localhost(), true).unwrap();
    assert!(non_blocking.connection.secure);

    let err = binder
        .async_stub(&BlockingOnlyService, &localhost(), false)
        .unwrap_err();
    assert!(matches!(
        err,
        BindError::Stub(StubError::UnsupportedServiceKind { .. })
    ));
}

#[test]
fn test_shared_provider_across_threads() {
    let provider = Arc::new(MockProvider::default());
    let binder = StubBinder::new(Arc::clone(&provider));

    std::thread::scope(|scope| {
        for port in 50051..50055 {
            let binder = &binder;
            scope.spawn(move || {
                let endpoint = Endpoint::new("localhost", port);
                let stub = binder
                    .async_stub(&EchoService, &endpoint, false)
                    .expect("Failed to bind async stub");
                assert_eq!(stub.connection.endpoint, endpoint);
            });
        }
    });

    assert_eq!(provider.requests(), 4);

    let borrowed = StubBinder::new(provider.as_ref());
    borrowed
        .blocking_stub(&EchoService, &localhost(), false)
        .unwrap();
    assert_eq!(provider.requests(), 5);
}

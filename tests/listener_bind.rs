// tests/listener_bind.rs

use std::error::Error;
use std::os::unix::fs::FileTypeExt;

use execod::errors::ExecodError;
use execod::listen;
use execod_test_utils::socket::TempSocket;

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn bind_creates_socket_file_and_close_removes_it() -> TestResult {
    let sock = TempSocket::new();

    let listener = listen::bind(sock.path())?;
    assert_eq!(listener.path(), sock.path());
    assert!(std::fs::metadata(sock.path())?.file_type().is_socket());

    listener.close();
    assert!(!sock.path().exists());
    Ok(())
}

#[tokio::test]
async fn dropping_the_listener_also_removes_the_socket_file() -> TestResult {
    let sock = TempSocket::new();

    {
        let _listener = listen::bind(sock.path())?;
        assert!(sock.path().exists());
    }

    assert!(!sock.path().exists());
    Ok(())
}

#[tokio::test]
async fn bind_fails_on_existing_path_and_leaves_it_alone() -> TestResult {
    let sock = TempSocket::new();
    std::fs::write(sock.path(), b"not a socket")?;

    match listen::bind(sock.path()) {
        Err(ExecodError::Bind { path, source }) => {
            assert_eq!(path, sock.path());
            assert_eq!(source.kind(), std::io::ErrorKind::AddrInUse);
        }
        Err(e) => panic!("Expected Bind error, got: {e:?}"),
        Ok(_) => panic!("Expected error, got Ok"),
    }

    assert_eq!(std::fs::read(sock.path())?, b"not a socket");
    Ok(())
}

#[tokio::test]
async fn second_bind_on_live_socket_fails_without_disturbing_the_first() -> TestResult {
    let sock = TempSocket::new();
    let first = listen::bind(sock.path())?;

    let err = listen::bind(sock.path()).unwrap_err();
    assert!(matches!(err, ExecodError::Bind { .. }), "got {err:?}");
    assert!(err.is_startup());

    // The first listener still accepts.
    let client = tokio::net::UnixStream::connect(sock.path()).await?;
    let accepted = first.accept().await?;
    drop((client, accepted));

    first.close();
    Ok(())
}

#[tokio::test]
async fn bind_fails_when_parent_directory_is_missing() {
    let sock = TempSocket::new();
    let path = sock.path().with_file_name("missing").join("execod.sock");

    let err = listen::bind(&path).unwrap_err();
    match err {
        ExecodError::Bind { source, .. } => {
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound)
        }
        other => panic!("Expected Bind error, got: {other:?}"),
    }
    assert!(!path.exists());
}

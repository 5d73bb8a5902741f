//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use ocap_web::Settings;
use tempfile::TempDir;
use tokio::net::TcpStream;

/// A scratch working directory with the marker and ammo folders populated.
pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("markers")).unwrap();
        std::fs::create_dir(dir.path().join("ammo")).unwrap();
        std::fs::write(dir.path().join("markers").join("flag.png"), b"flag-bytes").unwrap();
        std::fs::write(dir.path().join("ammo").join("shell.png"), b"shell-bytes").unwrap();
        Self { dir }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Plaintext settings pointing at this fixture.
    #[allow(dead_code)]
    pub fn settings(&self, listen: SocketAddr) -> Settings {
        Settings {
            listen: listen.to_string(),
            db: self.path("data.db").display().to_string(),
            markers: self.path("markers").display().to_string(),
            ammo: self.path("ammo").display().to_string(),
            ..Settings::default()
        }
    }
}

/// Wait until something accepts connections on `addr`.
#[allow(dead_code)]
pub async fn wait_for_listener(addr: SocketAddr) {
    for _ in 0..100 {
        if TcpStream::connect(addr).await.is_ok() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("nothing listening on {addr}");
}

/// Write a throwaway self-signed certificate and key for `localhost`.
#[allow(dead_code)]
pub fn self_signed(fixture: &Fixture) -> (PathBuf, PathBuf) {
    let generated = rcgen::generate_simple_self_signed(vec!["localhost".to_string()]).unwrap();
    let cert = fixture.path("cert.pem");
    let key = fixture.path("key.pem");
    std::fs::write(&cert, generated.cert.pem()).unwrap();
    std::fs::write(&key, generated.key_pair.serialize_pem()).unwrap();
    (cert, key)
}

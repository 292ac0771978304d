use std::net::SocketAddr;
use std::sync::{mpsc, Arc, OnceLock};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;

use cashcard_api::auth::UserDirectory;
use cashcard_api::state::AppState;
use cashcard_api::store::InMemoryCashCardStore;

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub base_url: String,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        let (addr_tx, addr_rx) = mpsc::channel::<SocketAddr>();

        // The server runs on its own runtime in a dedicated thread so it
        // outlives every per-test runtime in this binary.
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .worker_threads(2)
                .enable_all()
                .build()
                .expect("failed to build server runtime");

            runtime.block_on(async move {
                // Minimum bcrypt cost keeps test authentication fast
                let users = UserDirectory::builtin_users(4).expect("failed to build user directory");
                let store = Arc::new(InMemoryCashCardStore::new());
                let app = cashcard_api::app(AppState::new(store, Arc::new(users)));

                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("failed to bind test listener");
                let addr = listener.local_addr().expect("listener has no address");
                addr_tx.send(addr).expect("failed to report server address");

                axum::serve(listener, app).await.expect("test server exited");
            });
        });

        let addr = addr_rx
            .recv_timeout(Duration::from_secs(10))
            .context("test server did not start")?;

        Ok(Self {
            base_url: format!("http://{}", addr),
        })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!(
            "server did not become ready on {} within {:?}",
            self.base_url,
            timeout
        )
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    // Use stable get_or_init and convert init errors into a panic with context.
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to start test server"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

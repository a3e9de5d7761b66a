use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hospital_backend::api::router;
use hospital_backend::local::LocalStore;
use hospital_backend::remote::{
    HttpRemoteStore, MemoryRemoteStore, RemoteStore, RemoteStoreConfig,
};
use hospital_backend::services::ChangeListener;
use hospital_backend::state::AppState;
use hospital_backend::store::HospitalStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "hospital_backend=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://hospital.db?mode=rwc".to_string());
    let local = LocalStore::open(&database_url).await?;

    let remote: Arc<dyn RemoteStore> = match RemoteStoreConfig::new_from_env() {
        Ok(config) => Arc::new(HttpRemoteStore::new(config)?),
        Err(e) => {
            warn!("remote store not configured ({}), running in demo mode", e);
            Arc::new(MemoryRemoteStore::new())
        }
    };

    let store = Arc::new(HospitalStore::new(remote.clone(), local));
    store.refresh_forced().await;

    let change_listener = ChangeListener::new(store.clone(), remote);
    tokio::spawn(change_listener.start());

    let app = router(AppState { store });

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

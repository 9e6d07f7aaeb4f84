use sheetform::server::{
    config::Config,
    error::Error,
    model::{
        app::AppState,
        session::store::{BoundedMemoryStore, CLEANUP_INTERVAL, MAX_SESSIONS},
    },
    router, startup,
};

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenvy::dotenv().ok();
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    startup::init_tracing(&config);

    let oauth = startup::build_oauth_client(&config)?;
    let worksheet = startup::connect_to_worksheet(&config).await;
    let session_key = startup::session_key(&config)?;

    let session_store = BoundedMemoryStore::new(MAX_SESSIONS);
    tokio::spawn(session_store.clone().delete_expired_every(CLEANUP_INTERVAL));

    let app = router::app(
        AppState::new(oauth, worksheet),
        session_store,
        session_key,
        config.is_production(),
    );

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;

    tracing::info!("Starting server on port {}", config.port);

    axum::serve(listener, app).await?;

    Ok(())
}

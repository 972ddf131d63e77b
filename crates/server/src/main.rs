use wri_server::config::Config;

#[tokio::main]
async fn main() {
    if std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var("RUST_LOG", "wri_server=info,tower_http=info");
    }
    tracing_subscriber::fmt::init();

    let config = Config::from_env();
    let addr = config.bind_addr;
    let state = wri_server::default_state(config);
    let app = wri_server::app(state);

    tracing::info!(%addr, "listening");
    axum::Server::bind(&addr).serve(app.into_make_service()).await.expect("server exited unexpectedly");
}

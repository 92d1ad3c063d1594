// This main function is the entry point when running `cargo run -p web-server`.
// It loads configuration and data, then hands off to `run_server`.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = configuration::load_config(None)?;
    let _log_guard = configuration::init_tracing(&settings.logging)?;

    let state = web_server::AppState::load(&settings)?;
    let addr = settings.server.socket_addr()?;
    web_server::run_server(addr, state).await
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();
    let config = igamx_server::config::Config::from_env()?;
    igamx_server::web::start_web_server(config).await
}

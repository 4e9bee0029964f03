use clap::Parser;
use eyre::Result;
use oghttpd::config::Config;
use oghttpd::Server;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::parse();
    let server = Server::bind(config.addr.as_str(), &config.root)
        .await?
        .with_max_request_line(config.max_request_line);
    let result = server.start().await;
    server.close();
    Ok(result?)
}

use reloop_server::server::{run, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    run(Config::from_env()).await
}

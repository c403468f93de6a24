#[tokio::main]
async fn main() -> anyhow::Result<()> {
    moviesearch_server::start().await
}

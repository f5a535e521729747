#[tokio::main]
async fn main() -> anyhow::Result<()> {
    stockdash::run().await
}

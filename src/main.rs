#[tokio::main]
async fn main() -> anyhow::Result<()> {
    kibana_relay::run().await
}

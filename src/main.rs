#[tokio::main]
async fn main() -> anyhow::Result<()> {
    oee_tracker_lib::run().await
}

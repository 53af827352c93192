#[tokio::main]
async fn main() -> anyhow::Result<()> {
    classroom_backend::run().await
}

#[tokio::main]
async fn main() {
    er_compass::run().await;
}

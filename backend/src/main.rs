#[tokio::main]
async fn main() {
    perks::start_server().await;
}

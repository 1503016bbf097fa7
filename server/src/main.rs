#[tokio::main]
async fn main() {
    directory::start_server().await;
}

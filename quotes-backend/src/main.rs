#[tokio::main]
async fn main() {
    if let Err(e) = quotes_backend::run().await {
        log::error!("Backend exited with error: {}", e);
        std::process::exit(1);
    }
}

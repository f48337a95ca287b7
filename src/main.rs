use tracing::error;

#[tokio::main]
async fn main() {
    if let Err(err) = contract_billing::run().await {
        error!("Server exited with error: {}", err);
        std::process::exit(1);
    }
}

#[tokio::main]
async fn main() {
    if let Err(error) = mediagallery_lib::run_cli().await {
        eprintln!("{error}");
        std::process::exit(1);
    }
}

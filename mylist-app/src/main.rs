#[tokio::main]
async fn main() {
    if let Err(e) = mylist_app::run().await {
        eprintln!("mylist: {e}");
        std::process::exit(1);
    }
}

// Thin delegating binary.
//
// The actual server assembly lives in the `account-server` crate.
#[actix_rt::main]
async fn main() -> std::io::Result<()> {
    account_app::server::run().await
}

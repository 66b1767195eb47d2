// Drop the configured database and load the seed fixture.
//
// Run before an end-to-end suite, e.g.
// `ACCOUNT_DATABASE_URL=sqlite:e2e.db cargo run --bin seed-db`.
#[actix_rt::main]
async fn main() -> std::io::Result<()> {
    account_app::server::seed().await
}

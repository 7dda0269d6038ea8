// Thin delegating binary.
//
// The actual server assembly lives in the extracted `authcode-server` crate.
#[actix_rt::main]
async fn main() -> std::io::Result<()> {
    authcode_server::run().await
}

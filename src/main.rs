#[actix_web::main]
async fn main() -> std::io::Result<()> {
    passport_declaration_server::run().await
}

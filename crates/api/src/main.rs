mod application;
mod guards;
mod handlers;
mod state;


use std::io;

#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(err) = application::run().await {
        eprintln!("[contest-hub-api] failed to start: {err}");
        return Err(io::Error::other(err.to_string()));
    }

    Ok(())
}

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // A missing `.env` file is fine, the variables may come from the shell.
    dotenvy::dotenv().ok();
    deployer::start(std::env::args()).await
}

use ludo_session::logging::{LogFormat, init_logging};
use std::io;

fn main() {
    // LUDO_LOG=json|pretty turns on tracing output to stderr; RUST_LOG filters it
    if let Ok(value) = std::env::var("LUDO_LOG")
        && init_logging(LogFormat::from_env_value(&value)).is_err()
    {
        eprintln!("WARNING: logging already initialized");
    }
    let code = ludo_cli::run(std::env::args(), &mut io::stdout(), &mut io::stderr());
    std::process::exit(code);
}

#![forbid(unsafe_code)]

fn main() {
    let json = std::env::args().any(|arg| arg == "--log-json");
    if let Err(error) = vtodo_demo::run_from_env() {
        if json {
            eprintln!(
                "{}",
                serde_json::json!({
                    "status": "error",
                    "error": error.to_string(),
                    "exit_code": error.exit_code(),
                })
            );
        } else {
            eprintln!("{error}");
        }
        std::process::exit(error.exit_code());
    }
}

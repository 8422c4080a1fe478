//! Tires catalog API (default port 8000).
fn main() -> std::process::ExitCode {
    server::launch(server::ServiceKind::Tires)
}

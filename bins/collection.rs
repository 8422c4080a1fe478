//! Invoice collection API (default port 8001).
fn main() -> std::process::ExitCode {
    server::launch(server::ServiceKind::Collection)
}

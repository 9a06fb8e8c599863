fn main() {
    if let Err(e) = trellis_cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

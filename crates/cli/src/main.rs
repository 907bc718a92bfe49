fn main() {
    if let Err(e) = qbind_cli::run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn main() {
    if let Err(e) = loadsweep_cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

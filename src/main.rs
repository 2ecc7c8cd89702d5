use std::process;

fn main() {
    if let Err(e) = pagetask::cli::run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn main() {
    if let Err(err) = datacommons_nl::app::run() {
        eprintln!("datacommons-nl failed to start: {}", err);
        std::process::exit(1);
    }
}

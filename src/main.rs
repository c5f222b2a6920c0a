fn main() {
    if let Err(err) = article_triage::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

use clap::Parser;

fn main() {
    use kakehashi::util::cli::*;
    use kakehashi::util::config::init_tracing;

    dotenv::dotenv().ok();
    init_tracing();

    let opts = Options::parse();
    if let Err(e) = run_cli_action(opts) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

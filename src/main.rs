fn main() {
    if let Err(err) = h_gpt::cli::main() {
        eprintln!("❌ Error: {err}");
        std::process::exit(1);
    }
}

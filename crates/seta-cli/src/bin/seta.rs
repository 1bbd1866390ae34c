fn main() {
    seta_cli::set_version(env!("CARGO_PKG_VERSION"));
    std::process::exit(seta_cli::run_from_env());
}

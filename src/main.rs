mod chrome;
mod cli;
mod error;
mod host;
mod paths;
mod profile;

fn main() {
    if let Err(err) = cli::run() {
        eprintln!("error: {:#}", err);
        std::process::exit(error::exit_code_for(&err));
    }
}

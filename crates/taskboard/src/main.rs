/// CLI module - command-line interface for taskboard
mod cli;

fn main() {
    cli::run_cli();
}

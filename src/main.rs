use outcheck::cli;

fn main() {
    cli::run();
}

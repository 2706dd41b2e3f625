use pipeline_lens::cli;

pub fn main() {
    std::process::exit(cli::process_command());
}

use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();
    ExitCode::from(keepsake::cli::main_with_args(std::env::args_os()))
}

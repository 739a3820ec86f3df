use std::process::ExitCode;

fn main() -> ExitCode {
    let outcome = tcr::cli::run();
    ExitCode::from(outcome.exit_code())
}

use std::process::ExitCode;

fn main() -> ExitCode {
    match lightpackd::run_daemon() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("lightpackd: {error}");
            ExitCode::FAILURE
        }
    }
}

use std::process::ExitCode;

use io_impl::RealIo;
use statica_lib::{app::run, hashing};

fn main() -> ExitCode {
    hashing::initialize();
    match run(&RealIo()) {
        Ok(report) => {
            println!("{report}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("err {err}");
            ExitCode::FAILURE
        }
    }
}

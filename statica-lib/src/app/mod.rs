use io_trait::Io;
use std::io;

use crate::hashing::{self, HashingParameters};

/// One line describing the process hashing parameters.
pub fn report(p: &HashingParameters) -> String {
    format!(
        "seed0={:016x} seed1={:016x} deterministic={}",
        p.seed0, p.seed1, p.deterministic
    )
}

/// Usage: `statica [output]`. Writes the report to `output` when given.
pub fn run(io: &impl Io) -> io::Result<String> {
    let result = report(hashing::hashing_parameters());
    let mut a = io.args();
    a.next();
    if let Some(output) = a.next() {
        io.write(&output, result.as_bytes())?;
    }
    Ok(result)
}

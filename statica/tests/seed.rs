use std::{
    collections::HashSet,
    process::{Command, Output},
};

use statica_lib::hashing::DETERMINISTIC_HASHING_ENV;

fn statica(flag: Option<&str>) -> String {
    let mut command = Command::new(env!("CARGO_BIN_EXE_statica"));
    match flag {
        Some(value) => command.env(DETERMINISTIC_HASHING_ENV, value),
        None => command.env_remove(DETERMINISTIC_HASHING_ENV),
    };
    let Output { status, stdout, .. } = command.output().unwrap();
    assert!(status.success());
    String::from_utf8(stdout).unwrap().trim_end().to_string()
}

const ZERO: &str = "seed0=0000000000000000 seed1=0000000000000000 deterministic=true";

#[test]
fn test_deterministic() {
    for _ in 0..3 {
        assert_eq!(statica(Some("1")), ZERO);
    }
}

#[test]
fn test_not_exactly_one() {
    for flag in [None, Some("0"), Some(""), Some("true"), Some(" 1"), Some("11")] {
        let line = statica(flag);
        assert!(line.ends_with(" deterministic=false"), "{line}");
        assert!(!line.starts_with("seed0=0000000000000000 seed1=0000000000000000"));
    }
}

#[test]
fn test_unique_across_processes() {
    const N: usize = 1000;
    let seeds: HashSet<_> = (0..N).map(|_| statica(None)).collect();
    assert_eq!(seeds.len(), N);
}

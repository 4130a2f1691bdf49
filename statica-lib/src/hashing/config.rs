use std::{env, ffi::OsStr};

/// Setting this variable to exactly `1` disables randomized seeding so that
/// hash values repeat across runs. Any other value, or none, keeps the
/// random seed.
pub const DETERMINISTIC_HASHING_ENV: &str = "STATICA_DETERMINISTIC_HASHING";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HashingConfig {
    pub deterministic: bool,
}

impl HashingConfig {
    pub fn from_env() -> Self {
        Self::from_value(env::var_os(DETERMINISTIC_HASHING_ENV).as_deref())
    }
    pub fn from_value(value: Option<&OsStr>) -> Self {
        Self {
            deterministic: value == Some(OsStr::new("1")),
        }
    }
}

#[cfg(test)]
mod test {
    use std::ffi::OsStr;

    use wasm_bindgen_test::wasm_bindgen_test;

    use super::HashingConfig;

    fn deterministic(value: Option<&str>) -> bool {
        HashingConfig::from_value(value.map(OsStr::new)).deterministic
    }

    #[test]
    #[wasm_bindgen_test]
    fn test_value() {
        assert!(deterministic(Some("1")));
        assert!(!deterministic(None));
        assert!(!deterministic(Some("")));
        assert!(!deterministic(Some("0")));
        assert!(!deterministic(Some("true")));
        assert!(!deterministic(Some(" 1")));
        assert!(!deterministic(Some("1 ")));
        assert!(!deterministic(Some("11")));
    }
}

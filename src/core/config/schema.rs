//! core::config::schema
//!
//! Configuration schema types.
//!
//! # File
//!
//! `tcr.json` at the working-directory root:
//!
//! ```json
//! { "test": "cargo test --quiet" }
//! ```
//!
//! # Validation
//!
//! The `test` field is split on whitespace into an executable and its
//! arguments. Quoting is not supported. A command with no tokens is rejected.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Raw contents of `tcr.json`.
///
/// Fields other than `test` are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TcrConfig {
    /// Command line of the test suite.
    pub test: String,
}

impl TcrConfig {
    /// Tokenize the `test` field.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the field holds no tokens.
    pub fn test_command(&self) -> Result<TestCommand, ConfigError> {
        TestCommand::parse(&self.test)
    }
}

/// A non-empty test command: program followed by its arguments.
///
/// # Example
///
/// ```
/// use tcr::core::config::TestCommand;
///
/// let cmd = TestCommand::parse("./test.sh  one\ttwo").unwrap();
/// assert_eq!(cmd.program(), "./test.sh");
/// assert_eq!(cmd.args(), ["one", "two"]);
///
/// assert!(TestCommand::parse("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCommand {
    tokens: Vec<String>,
}

impl TestCommand {
    /// Split a command line on whitespace.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `line` contains no tokens.
    pub fn parse(line: &str) -> Result<Self, ConfigError> {
        let tokens: Vec<String> = line.split_whitespace().map(String::from).collect();
        if tokens.is_empty() {
            return Err(ConfigError::InvalidValue(
                "test command cannot be empty".to_string(),
            ));
        }
        Ok(Self { tokens })
    }

    /// The executable.
    pub fn program(&self) -> &str {
        // Non-empty by construction
        &self.tokens[0]
    }

    /// Arguments passed to the executable.
    pub fn args(&self) -> &[String] {
        &self.tokens[1..]
    }

    /// All tokens, program first.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
}

impl std::fmt::Display for TestCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tokens.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod tcr_config {
        use super::*;

        #[test]
        fn parse_minimal() {
            let config: TcrConfig = serde_json::from_str(r#"{"test": "./test.sh"}"#).unwrap();
            assert_eq!(config.test, "./test.sh");
            assert_eq!(config.test_command().unwrap().tokens(), ["./test.sh"]);
        }

        #[test]
        fn unknown_fields_ignored() {
            let config: TcrConfig =
                serde_json::from_str(r#"{"test": "make check", "watch": true}"#).unwrap();
            assert_eq!(config.test_command().unwrap().program(), "make");
        }

        #[test]
        fn missing_test_field_rejected() {
            assert!(serde_json::from_str::<TcrConfig>(r#"{"tests": "x"}"#).is_err());
        }

        #[test]
        fn wrong_type_rejected() {
            assert!(serde_json::from_str::<TcrConfig>(r#"{"test": ["a", "b"]}"#).is_err());
        }

        #[test]
        fn empty_command_invalid() {
            let config = TcrConfig {
                test: String::new(),
            };
            assert!(matches!(
                config.test_command(),
                Err(ConfigError::InvalidValue(_))
            ));
        }
    }

    mod test_command {
        use super::*;

        #[test]
        fn program_only() {
            let cmd = TestCommand::parse("pytest").unwrap();
            assert_eq!(cmd.program(), "pytest");
            assert!(cmd.args().is_empty());
        }

        #[test]
        fn arguments_in_order() {
            let cmd = TestCommand::parse("./test.sh argument1 argument2").unwrap();
            assert_eq!(cmd.program(), "./test.sh");
            assert_eq!(cmd.args(), ["argument1", "argument2"]);
        }

        #[test]
        fn repeated_whitespace_collapses() {
            let cmd = TestCommand::parse("  go   test\t./...  ").unwrap();
            assert_eq!(cmd.tokens(), ["go", "test", "./..."]);
        }

        #[test]
        fn quotes_are_not_interpreted() {
            let cmd = TestCommand::parse(r#"sh -c "exit 1""#).unwrap();
            assert_eq!(cmd.args(), ["-c", "\"exit", "1\""]);
        }

        #[test]
        fn display_joins_tokens() {
            let cmd = TestCommand::parse("cargo  test").unwrap();
            assert_eq!(cmd.to_string(), "cargo test");
        }
    }
}

// Command descriptor

use std::fmt;

/// An external command to run: program name (or path) plus its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    program: String,
    args: Vec<String>,
}

impl CommandSpec {
    /// Create a command with no arguments
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Add an argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    /// Human-readable form used in logs: `program arg1 arg2`
    pub fn display(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_without_args() {
        assert_eq!(CommandSpec::new("true").display(), "true");
    }

    #[test]
    fn test_display_joins_args_with_space() {
        let spec = CommandSpec::new("git").args(["log", "-n", "1"]);
        assert_eq!(spec.display(), "git log -n 1");
        assert_eq!(spec.to_string(), "git log -n 1");
    }

    #[test]
    fn test_builder_keeps_argument_order() {
        let spec = CommandSpec::new("sh").arg("-c").args(vec!["exit 3".to_string()]);
        assert_eq!(spec.program(), "sh");
        assert_eq!(spec.arguments(), &["-c".to_string(), "exit 3".to_string()]);
    }
}

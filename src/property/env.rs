use super::source::PropertySource;

/// Properties from `--NAME=value` command-line arguments.
///
/// The first matching argument wins. Everything after `--NAME=` is the value,
/// so values may themselves contain `=`.
#[derive(Debug, Clone)]
pub struct CommandLineSource {
    args: Vec<String>,
}

impl CommandLineSource {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Captures the arguments of the running process.
    ///
    /// Arguments that are not valid UTF-8 can never match a property and are skipped.
    pub fn from_process() -> Self {
        Self::new(
            std::env::args_os()
                .skip(1)
                .filter_map(|arg| arg.into_string().ok()),
        )
    }
}

impl PropertySource for CommandLineSource {
    fn name(&self) -> &str {
        "command-line"
    }

    fn lookup(&self, property: &str) -> Option<String> {
        let prefix = format!("--{property}=");
        self.args
            .iter()
            .find_map(|arg| arg.strip_prefix(&prefix))
            .map(str::to_string)
    }
}

/// Properties from process environment variables, read at lookup time.
#[derive(Debug, Clone, Default)]
pub struct EnvSource {
    prefix: String,
}

impl EnvSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up `{prefix}{NAME}` instead of `NAME`.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl PropertySource for EnvSource {
    fn name(&self) -> &str {
        "environment"
    }

    fn lookup(&self, property: &str) -> Option<String> {
        std::env::var(format!("{}{}", self.prefix, property)).ok()
    }
}

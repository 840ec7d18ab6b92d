use anyhow::Context;


#[derive(Debug, Clone)]
pub struct Config {
    /// The log group the daily delivery streams live in
    pub log_group: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let log_group = lookup("LOGS_DESTINATION")
            .filter(|group| !group.is_empty())
            .context("LOGS_DESTINATION must be provided")?;

        Ok(Config { log_group })
    }
}

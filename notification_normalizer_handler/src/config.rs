use anyhow::Context;
use ses_events::domain::models::Retention;


#[derive(Debug, Clone)]
pub struct Config {
    /// The table every notification is written to
    pub dynamodb_table: String,

    /// How long a record is kept before DynamoDB may expire it, `TTL_DAYS`, 30 days by default
    pub retention: Retention,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let dynamodb_table = lookup("DYNAMODB_TABLE").context("DYNAMODB_TABLE must be provided")?;

        let retention = match lookup("TTL_DAYS") {
            Some(days) => days
                .parse::<Retention>()
                .context("TTL_DAYS must be a positive number of days")?,
            None => Retention::default(),
        };

        Ok(Config {
            dynamodb_table,
            retention,
        })
    }
}

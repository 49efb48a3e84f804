use serde::{Deserialize, Serialize};
use std::fmt;

/// The SQL engines that write tables and read them back.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Engine {
    Hive,
    Impala,
    SparkSql,
}

impl Engine {
    pub const ALL: [Engine; 3] = [Engine::Hive, Engine::Impala, Engine::SparkSql];

    /// Upper-case identity used in table names and log lines.
    pub fn name(&self) -> &'static str {
        match self {
            Engine::Hive => "HIVE",
            Engine::Impala => "IMPALA",
            Engine::SparkSql => "SPARK_SQL",
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

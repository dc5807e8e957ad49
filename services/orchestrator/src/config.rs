use rocket::figment::{providers::Env, Figment};
use serde::Deserialize;

use orchestrator_client::Operation;

/// Simulated processing cost per operator in milliseconds, sourced from the
/// environment (`APP_TIMES_ADDITION_MS` and friends). Extraction fails at
/// startup when a value is missing or non-numeric.
#[derive(Debug, Deserialize, Clone)]
pub struct OperationTimes {
    pub addition_ms: u64,
    pub subtraction_ms: u64,
    pub multiplication_ms: u64,
    pub division_ms: u64,
}

impl OperationTimes {
    pub fn millis(&self, operation: Operation) -> u64 {
        match operation {
            Operation::Add => self.addition_ms,
            Operation::Sub => self.subtraction_ms,
            Operation::Mul => self.multiplication_ms,
            Operation::Div => self.division_ms,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub times: OperationTimes,
}

pub fn figment() -> Figment {
    rocket::Config::figment()
        .merge(Env::prefixed("APP_").map(|s| s.as_str().replacen('_', ".", 1).into()))
}

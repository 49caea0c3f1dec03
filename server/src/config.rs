use std::env::VarError;

use error_stack::{Report, ResultExt};
use time::Duration;

use kernel::KernelError;

static SERVER_PORT: &str = "SERVER_PORT";
static JWT_SECRET: &str = "JWT_SECRET";
static JWT_EXPIRATION_MINUTES: &str = "JWT_EXPIRATION_MINUTES";

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_EXPIRATION_MINUTES: i64 = 60;

/// Settings read from the environment (and `.env`). `POSTGRES_URL` is read by the driver.
#[derive(Debug, Clone)]
pub struct AppConfig {
    port: u16,
    jwt_secret: String,
    jwt_expiration: Duration,
}

impl AppConfig {
    pub fn from_env() -> error_stack::Result<Self, KernelError> {
        Self::from_lookup(|key| dotenvy::var(key))
    }

    fn from_lookup(
        lookup: impl Fn(&str) -> Result<String, dotenvy::Error>,
    ) -> error_stack::Result<Self, KernelError> {
        let port = match optional(&lookup, SERVER_PORT)? {
            Some(port) => port
                .parse::<u16>()
                .change_context(KernelError::Configuration)
                .attach_printable_lazy(|| format!("Invalid {SERVER_PORT}: {port}"))?,
            None => DEFAULT_PORT,
        };
        let jwt_secret = optional(&lookup, JWT_SECRET)?
            .filter(|secret| !secret.is_empty())
            .ok_or_else(|| {
                Report::new(KernelError::Configuration)
                    .attach_printable(format!("Missing environment variable: {JWT_SECRET}"))
            })?;
        let minutes = match optional(&lookup, JWT_EXPIRATION_MINUTES)? {
            Some(minutes) => minutes
                .parse::<i64>()
                .change_context(KernelError::Configuration)
                .attach_printable_lazy(|| {
                    format!("Invalid {JWT_EXPIRATION_MINUTES}: {minutes}")
                })?,
            None => DEFAULT_EXPIRATION_MINUTES,
        };
        Ok(Self {
            port,
            jwt_secret,
            jwt_expiration: Duration::minutes(minutes),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    pub fn jwt_expiration(&self) -> Duration {
        self.jwt_expiration
    }
}

fn optional(
    lookup: &impl Fn(&str) -> Result<String, dotenvy::Error>,
    key: &str,
) -> error_stack::Result<Option<String>, KernelError> {
    match lookup(key) {
        Ok(value) => Ok(Some(value)),
        Err(dotenvy::Error::EnvVar(VarError::NotPresent)) => Ok(None),
        Err(error) => Err(Report::new(error)
            .change_context(KernelError::Configuration)
            .attach_printable(format!("Failed to read environment variable: {key}"))),
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;
    use std::env::VarError;

    use time::Duration;

    use kernel::KernelError;

    use super::AppConfig;

    fn config(vars: &[(&str, &str)]) -> error_stack::Result<AppConfig, KernelError> {
        let vars = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect::<HashMap<_, _>>();
        AppConfig::from_lookup(|key| {
            vars.get(key)
                .cloned()
                .ok_or(dotenvy::Error::EnvVar(VarError::NotPresent))
        })
    }

    #[test]
    fn defaults_apply() {
        let config = config(&[("JWT_SECRET", "secret")]).unwrap();
        assert_eq!(config.port(), 8080);
        assert_eq!(config.jwt_expiration(), Duration::minutes(60));
        assert_eq!(config.jwt_secret(), "secret");
    }

    #[test]
    fn secret_is_required() {
        let error = config(&[]).unwrap_err();
        assert_eq!(error.current_context(), &KernelError::Configuration);
    }

    #[test]
    fn malformed_values_are_rejected() {
        let error = config(&[("JWT_SECRET", "secret"), ("SERVER_PORT", "http")]).unwrap_err();
        assert_eq!(error.current_context(), &KernelError::Configuration);
        let config = config(&[("JWT_SECRET", "secret"), ("JWT_EXPIRATION_MINUTES", "15")]).unwrap();
        assert_eq!(config.jwt_expiration(), Duration::minutes(15));
    }
}

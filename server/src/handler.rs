use std::ops::Deref;
use std::sync::Arc;

use vodca::References;

use driver::database::PostgresDatabase;
use kernel::KernelError;

use crate::auth::JwtIssuer;
use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppModule(Arc<Handler>);

impl AppModule {
    pub async fn new(config: &AppConfig) -> error_stack::Result<Self, KernelError> {
        Ok(Self(Arc::new(Handler::init(config).await?)))
    }
}

impl Deref for AppModule {
    type Target = Handler;
    fn deref(&self) -> &Self::Target {
        Deref::deref(&self.0)
    }
}

#[derive(References)]
pub struct Handler {
    pgpool: PostgresDatabase,
    jwt: JwtIssuer,
}

impl Handler {
    pub async fn init(config: &AppConfig) -> error_stack::Result<Self, KernelError> {
        let pgpool = PostgresDatabase::new().await?;
        let jwt = JwtIssuer::new(config.jwt_secret(), config.jwt_expiration());

        Ok(Self { pgpool, jwt })
    }
}

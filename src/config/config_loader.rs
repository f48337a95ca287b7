use anyhow::Result;
use uuid::Uuid;

use super::config_model::{Database, DotEnvyConfig, Server};

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let server = Server {
        port: std::env::var("SERVER_PORT")
            .expect("SERVER_PORT is invalid")
            .parse()?,
        body_limit: std::env::var("SERVER_BODY_LIMIT")
            .expect("SERVER_BODY_LIMIT is invalid")
            .parse()?,
        timeout: std::env::var("SERVER_TIMEOUT")
            .expect("SERVER_TIMEOUT is invalid")
            .parse()?,
    };

    let database = Database {
        url: std::env::var("DATABASE_URL").expect("DATABASE_URL is invalid"),
    };

    let demo_user_id = Uuid::parse_str(
        &std::env::var("DEMO_USER_ID").expect("DEMO_USER_ID is invalid"),
    )?;

    Ok(DotEnvyConfig {
        server,
        database,
        demo_user_id,
    })
}

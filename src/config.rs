use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_minutes: i64,
}

/// Fixed credential pair seeded when no admin exists yet. Operational
/// bootstrap only; rotate after first login.
#[derive(Debug, Clone, Deserialize)]
pub struct BootstrapAdmin {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub catalog_base_url: String,
    pub bootstrap_admin: BootstrapAdmin,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        // The signing secret has no default on purpose; a missing secret is a
        // startup failure, not a runtime one.
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
        };
        let catalog_base_url =
            std::env::var("CATALOG_BASE_URL").unwrap_or_else(|_| "https://swapi.dev/api".into());
        let bootstrap_admin = BootstrapAdmin {
            name: std::env::var("ADMIN_NAME").unwrap_or_else(|_| "Admin".into()),
            email: std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@admin.com.ar".into()),
            password: std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".into()),
        };
        Ok(Self {
            database_url,
            jwt,
            catalog_base_url,
            bootstrap_admin,
        })
    }
}

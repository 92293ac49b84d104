// src/config.rs - Configuration management: defaults, TOML file, environment
use anyhow::{Context, Result};
use rand::{distributions::Alphanumeric, thread_rng, Rng};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use strum::{AsRefStr, Display, EnumString};

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub app: AppConfig,
    pub security: SecurityConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
    pub keep_alive: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub bcrypt_cost: u32,
    /// Set when `jwt_secret` was generated for this run rather than configured.
    #[serde(skip)]
    pub generated_secret: bool,
}

/// Process-level settings the hosting environment hands us.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub mode: AppMode,
    pub admin_email: Option<String>,
    pub static_export: bool,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SecurityConfig {
    pub allowed_origins: Vec<String>,
    pub require_https: bool,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, EnumString, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AppMode {
    Development,
    Production,
}

impl AppMode {
    /// Anything other than `production` runs in development mode.
    pub fn from_node_env(value: &str) -> Self {
        if value == "production" {
            AppMode::Production
        } else {
            AppMode::Development
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            workers: None,
            keep_alive: 30,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:member_portal.db".to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout: 30,
        }
    }
}

// Dummy secret for tests; load_config replaces it from the environment
impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "dummy_32_chars_for_tests_only!!!".to_string(),
            bcrypt_cost: bcrypt::DEFAULT_COST,
            generated_secret: false,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mode: AppMode::Development,
            admin_email: None,
            static_export: false,
        }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
            require_https: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Cost bounds bcrypt accepts.
pub const BCRYPT_MIN_COST: u32 = 4;
pub const BCRYPT_MAX_COST: u32 = 31;

pub fn generate_jwt_secret() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

pub fn load_config() -> Result<Config> {
    load_env_file()?;

    let mut config = match env::var("CONFIG_FILE") {
        Ok(config_file) => read_config_file(Path::new(&config_file))?,
        Err(_) => Config::default(),
    };

    let secret_from_env = override_with_env(&mut config)?;

    ensure_jwt_secret(&mut config, secret_from_env)?;

    config.validate().context("Configuration validation failed")?;

    Ok(config)
}

/// Development runs without a configured secret get a random one; production refuses.
fn ensure_jwt_secret(config: &mut Config, secret_from_env: bool) -> Result<()> {
    if secret_from_env || !config.jwt_secret_is_placeholder() {
        return Ok(());
    }
    if config.is_production() {
        anyhow::bail!("JWT_SECRET must be set in production");
    }
    config.auth.jwt_secret = generate_jwt_secret();
    config.auth.generated_secret = true;
    Ok(())
}

fn read_config_file(path: &Path) -> Result<Config> {
    let config_str = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    toml::from_str(&config_str)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| anyhow::anyhow!("Invalid value for {}: '{}'", name, raw)),
        Err(_) => Ok(None),
    }
}

/// Applies environment overrides; returns whether `JWT_SECRET` was supplied.
fn override_with_env(config: &mut Config) -> Result<bool> {
    if let Ok(host) = env::var("BIND_ADDRESS") {
        config.server.host = host;
    }
    if let Some(port) = parse_env::<u16>("PORT")? {
        config.server.port = port;
    }
    if let Some(workers) = parse_env::<usize>("SERVER_WORKERS")? {
        config.server.workers = Some(workers);
    }
    if let Ok(node_env) = env::var("NODE_ENV") {
        config.app.mode = AppMode::from_node_env(&node_env);
    }
    if let Ok(admin_email) = env::var("ADMIN_EMAIL") {
        config.app.admin_email = Some(admin_email).filter(|email| !email.is_empty());
    }
    if let Ok(static_export) = env::var("STATIC_EXPORT") {
        config.app.static_export = static_export == "true";
    }
    if let Ok(url) = env::var("DATABASE_URL") {
        config.database.url = url;
    }
    if let Some(max_conn) = parse_env::<u32>("DATABASE_MAX_CONNECTIONS")? {
        config.database.max_connections = max_conn;
    }
    if let Some(min_conn) = parse_env::<u32>("DATABASE_MIN_CONNECTIONS")? {
        config.database.min_connections = min_conn;
    }
    if let Some(cost) = parse_env::<u32>("AUTH_BCRYPT_COST")? {
        config.auth.bcrypt_cost = cost;
    }
    if let Ok(origins_str) = env::var("ALLOWED_ORIGINS") {
        config.security.allowed_origins = origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }
    if let Ok(require_https) = env::var("REQUIRE_HTTPS") {
        config.security.require_https = require_https == "true";
    }
    if let Ok(level) = env::var("RUST_LOG") {
        config.logging.level = level;
    }

    match env::var("JWT_SECRET") {
        Ok(jwt_secret) => {
            config.auth.jwt_secret = jwt_secret;
            Ok(true)
        }
        Err(_) => Ok(false),
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.len() < 32 {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least 32 characters long (current: {})",
                self.auth.jwt_secret.len()
            ));
        }

        if !(BCRYPT_MIN_COST..=BCRYPT_MAX_COST).contains(&self.auth.bcrypt_cost) {
            return Err(anyhow::anyhow!(
                "bcrypt cost must be between {} and {} (current: {})",
                BCRYPT_MIN_COST,
                BCRYPT_MAX_COST,
                self.auth.bcrypt_cost
            ));
        }

        if self.database.max_connections < self.database.min_connections {
            return Err(anyhow::anyhow!(
                "max_connections ({}) must be >= min_connections ({})",
                self.database.max_connections,
                self.database.min_connections
            ));
        }

        if self.is_production() && self.security.allowed_origins.iter().any(|origin| origin == "*") {
            return Err(anyhow::anyhow!("Wildcard CORS origins not allowed in production"));
        }

        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.app.mode == AppMode::Production
    }

    fn jwt_secret_is_placeholder(&self) -> bool {
        self.auth.jwt_secret == AuthConfig::default().jwt_secret
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn print_startup_info(&self) {
        log::info!("Member portal starting in {} mode", self.app.mode);
        log::info!("Running at http://{}", self.bind_address());
        log::info!(
            "Database: {}",
            if self.database.url.starts_with("sqlite") { "SQLite" } else { "Unknown" }
        );
        log::info!(
            "Admin email: {}",
            self.app.admin_email.as_deref().unwrap_or("Not set")
        );
        log::info!(
            "Build output: {}",
            if self.app.static_export { "static export" } else { "server" }
        );
        log::info!("Logging: {} level", self.logging.level);

        if self.auth.generated_secret {
            log::warn!("JWT_SECRET not set; generated an ephemeral secret for this run");
        }

        if !self.is_production() {
            log::warn!("Running in development mode");
        } else if !self.security.require_https {
            log::warn!("HTTPS not required in production mode");
        }
    }
}

pub fn load_env_file() -> Result<()> {
    if let Ok(env_file) = env::var("ENV_FILE") {
        dotenvy::from_filename(&env_file)
            .with_context(|| format!("Failed to load environment file: {}", env_file))?;
    } else if Path::new(".env").exists() {
        dotenvy::dotenv().context("Failed to load .env file")?;
    }
    Ok(())
}

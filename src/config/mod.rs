// Configuration module entry point
// Layered loading: config.toml (optional), SERVER_* environment, code defaults

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{
    Config, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig, ViewsConfig,
};

impl Config {
    /// Load configuration from the default "config.toml" location
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from specified file path (without extension)
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("SERVER"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8081)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "users-server/0.1")?
            .set_default("http.max_body_size", 10_485_760)? // 10MB
            .set_default("views.dir", "views")?
            .set_default("views.index_file", "index.html")?
            .set_default("views.user_list_template", "UserList.html")?
            .build()?;

        settings.try_deserialize()
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_section() {
        let cfg = Config::load_from("does-not-exist").unwrap();
        assert_eq!(cfg.server.port, 8081);
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.logging.access_log_format, "combined");
        assert_eq!(cfg.views.dir, "views");
        assert_eq!(cfg.views.user_list_template, "UserList.html");
        assert_eq!(cfg.http.max_body_size, 10_485_760);
    }

    #[test]
    fn socket_addr_combines_host_and_port() {
        let cfg = Config::load_from("does-not-exist").unwrap();
        assert_eq!(cfg.socket_addr().unwrap().port(), 8081);
    }
}

/// 服务器配置 - 派单后端的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | DATABASE_PATH | dispatch.db | SQLite 数据库文件 |
/// | MAPS_BASE_URL | Google Directions API | 地图服务地址 |
/// | MAPS_API_KEY | (空) | 地图服务密钥 |
/// | MAPS_TIMEOUT_MS | 5000 | 地图请求超时(毫秒) |
/// | PAYMENT_BASE_URL | http://localhost:3100 | 支付服务地址 |
/// | PAYMENT_SECRET_KEY | (空) | 支付服务密钥 |
/// | PAYMENT_TIMEOUT_MS | 10000 | 支付请求超时(毫秒) |
/// | QUOTE_TTL_SECS | 600 | 报价缓存有效期(秒) |
/// | REPORTING_TZ | UTC | 高峰期判定时区 |
/// | ENVIRONMENT | development | 运行环境 |
///
/// # 示例
///
/// ```ignore
/// DATABASE_PATH=/data/dispatch.db HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API 服务端口
    pub http_port: u16,
    /// SQLite 数据库路径
    pub database_path: String,
    /// 地图服务 (Directions API) 地址
    pub maps_base_url: String,
    /// 地图服务密钥
    pub maps_api_key: String,
    /// 地图请求超时 (毫秒)
    pub maps_timeout_ms: u64,
    /// 支付服务地址
    pub payment_base_url: String,
    /// 支付服务密钥
    pub payment_secret_key: String,
    /// 支付请求超时 (毫秒)
    pub payment_timeout_ms: u64,
    /// 报价缓存有效期 (秒)
    pub quote_ttl_secs: u64,
    /// 高峰期判定使用的时区
    pub reporting_tz: chrono_tz::Tz,
    /// 运行环境: development | staging | production
    pub environment: String,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "dispatch.db".into()),
            maps_base_url: std::env::var("MAPS_BASE_URL").unwrap_or_else(|_| {
                "https://maps.googleapis.com/maps/api/directions/json".into()
            }),
            maps_api_key: std::env::var("MAPS_API_KEY").unwrap_or_default(),
            maps_timeout_ms: std::env::var("MAPS_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            payment_base_url: std::env::var("PAYMENT_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3100".into()),
            payment_secret_key: std::env::var("PAYMENT_SECRET_KEY").unwrap_or_default(),
            payment_timeout_ms: std::env::var("PAYMENT_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(10000),
            quote_ttl_secs: std::env::var("QUOTE_TTL_SECS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(600),
            reporting_tz: std::env::var("REPORTING_TZ")
                .ok()
                .and_then(|tz| tz.parse().ok())
                .unwrap_or(chrono_tz::UTC),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        // No env manipulation: just confirm parse fallbacks hold
        let config = Config::from_env();
        assert!(config.http_port > 0);
        assert!(config.quote_ttl_secs > 0);
        assert!(!config.maps_base_url.is_empty());
    }
}

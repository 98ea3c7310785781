use std::sync::Arc;
use std::time::Duration;

use crate::core::Config;
use crate::db::DbService;
use crate::logistics::{DirectionsClient, LogisticsService, MapsClient, QuoteCache};
use crate::orders::OrderService;
use crate::payment::{HttpPaymentClient, PaymentClient};
use crate::utils::AppResult;

/// 服务器状态 - 持有所有服务的单例引用
///
/// ServerState 是派单后端的核心数据结构，持有所有服务的共享引用。
/// 使用 Arc/连接池实现浅拷贝，所有权成本极低。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | DbService | SQLite 连接池 |
/// | quotes | Arc<QuoteCache> | 一次性报价缓存 |
/// | logistics | LogisticsService | 报价/机器/追踪服务 |
/// | orders | OrderService | 订单生命周期服务 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 数据库服务
    pub db: DbService,
    /// 一次性报价缓存 (进程内)
    pub quotes: Arc<QuoteCache>,
    /// 物流服务: 报价、机器注册、指派、追踪
    pub logistics: LogisticsService,
    /// 订单服务: 创建、支付、取消、查询
    pub orders: OrderService,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 数据库 (SQLite WAL + 迁移)
    /// 2. 外部客户端 (地图、支付)
    /// 3. 各服务 (QuoteCache, Logistics, Orders)
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        // 1. Database
        let db = DbService::new(&config.database_path).await?;

        // 2. External clients
        let maps: Arc<dyn MapsClient> = Arc::new(DirectionsClient::new(
            config.maps_base_url.clone(),
            config.maps_api_key.clone(),
            Duration::from_millis(config.maps_timeout_ms),
        ));
        let payment: Arc<dyn PaymentClient> = Arc::new(HttpPaymentClient::new(
            config.payment_base_url.clone(),
            config.payment_secret_key.clone(),
            Duration::from_millis(config.payment_timeout_ms),
        ));

        // 3. Services
        let quotes = Arc::new(QuoteCache::new(Duration::from_secs(config.quote_ttl_secs)));
        let logistics = LogisticsService::new(
            db.pool.clone(),
            maps,
            quotes.clone(),
            config.reporting_tz,
        );
        let orders = OrderService::new(db.pool.clone(), logistics.clone(), payment);

        tracing::info!(
            tz = %config.reporting_tz,
            quote_ttl_secs = config.quote_ttl_secs,
            "Server state initialized"
        );

        Ok(Self {
            config: config.clone(),
            db,
            quotes,
            logistics,
            orders,
        })
    }
}

use std::sync::Arc;

use crate::analytics::Aggregator;
use crate::core::Config;
use crate::db::{MemoryOrderStore, OrderStore};
use crate::live::DashboardHub;
use crate::recommend::{
    AiClient, FixedSignal, OpenWeatherSignal, RandomSignal, RecommendationMode,
    RecommendationProvider, Recommender, SeasonalSignal, WeatherKind,
};
use crate::services::OrderService;

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝，所有权成本极低。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | orders | Arc<OrderService> | 订单接收 / 分析 / 推荐管线 |
/// | hub | DashboardHub | 仪表盘连接 hub |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 订单管线服务
    pub orders: Arc<OrderService>,
    /// 仪表盘连接 hub (唯一的共享可变状态，启动时注入一次)
    pub hub: DashboardHub,
}

impl ServerState {
    /// 初始化服务器状态 (默认内存存储)
    pub fn initialize(config: &Config) -> Self {
        Self::with_store(config, Arc::new(MemoryOrderStore::new()))
    }

    /// 使用注入的存储实现初始化
    ///
    /// 测试或替换持久化后端时使用
    pub fn with_store(config: &Config, store: Arc<dyn OrderStore>) -> Self {
        let hub = DashboardHub::with_capacity(config.client_queue_capacity);
        let aggregator = Aggregator::new(store.clone(), config.momentum_window_secs);
        let recommender = Recommender::new(
            config.recommendation_mode,
            build_provider(config),
            build_signal(config),
        );

        let orders = Arc::new(OrderService::new(
            store,
            aggregator,
            recommender,
            hub.clone(),
        ));

        Self {
            config: config.clone(),
            orders,
            hub,
        }
    }
}

/// 按配置装配季节信号提供方
fn build_signal(config: &Config) -> Arc<dyn SeasonalSignal> {
    match config.weather_provider.as_str() {
        "openweather" => match &config.weather_api_key {
            Some(key) => Arc::new(OpenWeatherSignal::new(
                key.clone(),
                config.weather_city.clone(),
                config.weather_timeout_secs,
            )),
            None => {
                tracing::warn!("WEATHER_PROVIDER=openweather without WEATHER_API_KEY, using random signal");
                Arc::new(RandomSignal)
            }
        },
        "hot" => Arc::new(FixedSignal(WeatherKind::Hot)),
        "cold" => Arc::new(FixedSignal(WeatherKind::Cold)),
        "rainy" => Arc::new(FixedSignal(WeatherKind::Rainy)),
        "other" => Arc::new(FixedSignal(WeatherKind::Other)),
        _ => Arc::new(RandomSignal),
    }
}

/// 按配置装配 AI 提供方 (仅 ai / hybrid 模式需要)
fn build_provider(config: &Config) -> Option<Arc<dyn RecommendationProvider>> {
    if config.recommendation_mode == RecommendationMode::Rules {
        return None;
    }
    match &config.ai_api_key {
        Some(key) => Some(Arc::new(AiClient::new(
            config.ai_base_url.clone(),
            key.clone(),
            config.ai_model.clone(),
            config.ai_temperature,
            config.ai_max_tokens,
            config.ai_timeout_secs,
        ))),
        None => {
            tracing::warn!(
                mode = ?config.recommendation_mode,
                "AI mode configured without AI_API_KEY, rule catalog only"
            );
            None
        }
    }
}

use crate::recommend::RecommendationMode;

/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | HTTP_PORT | 8080 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | RECOMMENDATION_MODE | rules | 推荐来源: rules / ai / hybrid |
/// | AI_BASE_URL | https://api.openai.com/v1 | AI 服务地址 (OpenAI 兼容) |
/// | AI_API_KEY | - | AI 服务密钥 |
/// | AI_MODEL | gpt-4o-mini | AI 模型 |
/// | AI_TIMEOUT_SECS | 30 | AI 调用超时(秒) |
/// | WEATHER_PROVIDER | random | 季节信号: random / openweather / hot / cold / rainy / other |
/// | WEATHER_API_KEY | - | OpenWeather 密钥 |
/// | WEATHER_CITY | Cairo | OpenWeather 城市 |
/// | MOMENTUM_WINDOW_SECS | 60 | 营收动量窗口长度(秒) |
/// | CLIENT_QUEUE_CAPACITY | 64 | 每连接出站队列容量 |
///
/// # 示例
///
/// ```ignore
/// HTTP_PORT=9000 RECOMMENDATION_MODE=hybrid cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,

    // === 推荐引擎配置 ===
    /// 推荐来源策略
    pub recommendation_mode: RecommendationMode,
    /// AI 服务地址 (OpenAI 兼容)
    pub ai_base_url: String,
    /// AI 服务密钥 (未配置时 AI 模式退化为规则目录)
    pub ai_api_key: Option<String>,
    /// AI 模型名
    pub ai_model: String,
    /// AI 采样温度
    pub ai_temperature: f32,
    /// AI 最大生成 token 数
    pub ai_max_tokens: u32,
    /// AI 调用超时 (秒)
    pub ai_timeout_secs: u64,

    // === 季节信号配置 ===
    /// 信号来源: random | openweather | hot | cold | rainy | other
    pub weather_provider: String,
    /// OpenWeather 密钥
    pub weather_api_key: Option<String>,
    /// OpenWeather 城市
    pub weather_city: String,
    /// 天气调用超时 (秒)
    pub weather_timeout_secs: u64,

    // === 分析管线配置 ===
    /// 营收动量窗口长度 (秒)
    pub momentum_window_secs: i64,
    /// 每连接出站队列容量
    pub client_queue_capacity: usize,
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
                .unwrap_or(8080),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),

            recommendation_mode: std::env::var("RECOMMENDATION_MODE")
                .map(|m| RecommendationMode::parse(&m))
                .unwrap_or_default(),
            ai_base_url: std::env::var("AI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".into()),
            ai_api_key: std::env::var("AI_API_KEY").ok(),
            ai_model: std::env::var("AI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into()),
            ai_temperature: std::env::var("AI_TEMPERATURE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0.7),
            ai_max_tokens: std::env::var("AI_MAX_TOKENS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(512),
            ai_timeout_secs: std::env::var("AI_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),

            weather_provider: std::env::var("WEATHER_PROVIDER").unwrap_or_else(|_| "random".into()),
            weather_api_key: std::env::var("WEATHER_API_KEY").ok(),
            weather_city: std::env::var("WEATHER_CITY").unwrap_or_else(|_| "Cairo".into()),
            weather_timeout_secs: std::env::var("WEATHER_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),

            momentum_window_secs: std::env::var("MOMENTUM_WINDOW_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            client_queue_capacity: std::env::var("CLIENT_QUEUE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(64),
        }
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

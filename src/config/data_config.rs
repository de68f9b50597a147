//! 데이터 및 서버 설정 관리 모듈
//!
//! 서버, 저장소, 키-값 저장소, 메일, 오브젝트 스토리지, Rate Limiting 설정을 관리합니다.

use std::env;

use log::{error, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Development,
    Test,
    Staging,
    Production,
}

impl Environment {
    pub fn current() -> Self {
        Self::from_str(
            &env::var("ENVIRONMENT")
                .unwrap_or_else(|_| env::var("NODE_ENV").unwrap_or_else(|_| "production".to_string())),
        )
    }

    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" | "testing" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Production,
        }
    }
}

pub struct PasswordConfig;

impl PasswordConfig {
    /// `BCRYPT_COST` (4-15) 가 없으면 환경별 기본값을 사용합니다.
    pub fn bcrypt_cost() -> u32 {
        if let Ok(cost_str) = env::var("BCRYPT_COST") {
            if let Ok(cost) = cost_str.parse::<u32>() {
                if (4..=15).contains(&cost) {
                    return cost;
                }
            }
            warn!("BCRYPT_COST '{}' 무시됨 (4-15 범위 필요)", cost_str);
        }

        Self::bcrypt_cost_for_env(&Environment::current())
    }

    pub fn bcrypt_cost_for_env(env: &Environment) -> u32 {
        match env {
            Environment::Development => 4,
            Environment::Test => 4,
            Environment::Staging => 10,
            Environment::Production => 10,
        }
    }
}

pub struct ServerConfig;

impl ServerConfig {
    pub fn port() -> u16 {
        env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .unwrap_or(3000)
    }

    pub fn host() -> String {
        env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string())
    }

    pub fn workers() -> usize {
        env::var("WORKERS")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(4)
    }

    /// CORS 허용 Origin 목록 (`CORS_ORIGINS`, 쉼표 구분)
    pub fn cors_origins() -> Vec<String> {
        env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect()
    }
}

/// 영속 저장소 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Mongo,
    Memory,
}

impl StoreBackend {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "memory" | "mem" => StoreBackend::Memory,
            _ => StoreBackend::Mongo,
        }
    }
}

/// 키-값 저장소 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KvBackend {
    Redis,
    Memory,
}

impl KvBackend {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "memory" | "mem" => KvBackend::Memory,
            _ => KvBackend::Redis,
        }
    }
}

pub struct DatabaseConfig;

impl DatabaseConfig {
    pub fn backend() -> StoreBackend {
        StoreBackend::from_str(&env::var("STORE_BACKEND").unwrap_or_default())
    }

    pub fn uri() -> String {
        env::var("MONGODB_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string())
    }

    pub fn name() -> String {
        env::var("DATABASE_NAME").unwrap_or_else(|_| "login-and-board".to_string())
    }

    pub fn app_name() -> String {
        env::var("DATABASE_APP_NAME").unwrap_or_else(|_| "login_board_backend".to_string())
    }
}

pub struct RedisConfig;

impl RedisConfig {
    pub fn backend() -> KvBackend {
        KvBackend::from_str(&env::var("KV_BACKEND").unwrap_or_default())
    }

    pub fn url() -> String {
        env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string())
    }
}

pub struct MailConfig;

impl MailConfig {
    /// SMTP 호스트. 없으면 콘솔 메일러를 사용합니다.
    pub fn host() -> Option<String> {
        env::var("EMAIL_HOST").ok().filter(|host| !host.is_empty())
    }

    pub fn port() -> u16 {
        env::var("EMAIL_PORT")
            .ok()
            .and_then(|port| port.parse().ok())
            .unwrap_or(587)
    }

    pub fn username() -> String {
        env::var("EMAIL_HOST_USER").unwrap_or_default()
    }

    pub fn password() -> String {
        env::var("EMAIL_HOST_PASSWORD").unwrap_or_default()
    }

    pub fn from_address() -> String {
        env::var("EMAIL_FROM").unwrap_or_else(|_| Self::username())
    }
}

pub struct StorageConfig;

impl StorageConfig {
    /// 업로드 엔드포인트 (`PUT {endpoint}/{bucket}/{key}`)
    pub fn endpoint() -> Option<String> {
        env::var("STORAGE_ENDPOINT").ok().filter(|endpoint| !endpoint.is_empty())
    }

    pub fn bucket() -> String {
        env::var("BUCKET").unwrap_or_else(|_| "login-and-board".to_string())
    }

    /// 업로드된 객체의 공개 주소 접두사. 없으면 업로드 주소를 그대로 씁니다.
    pub fn public_url() -> Option<String> {
        env::var("STORAGE_PUBLIC_URL").ok().filter(|url| !url.is_empty())
    }

    pub fn token() -> Option<String> {
        env::var("STORAGE_TOKEN").ok().filter(|token| !token.is_empty())
    }
}

/// Rate Limiting 설정
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    pub per_second: u64,
    pub burst_size: u32,
}

impl RateLimitConfig {
    /// `RATE_LIMIT_PER_SECOND` (기본 100), `RATE_LIMIT_BURST_SIZE` (기본 200)
    pub fn load() -> Self {
        let per_second = env::var("RATE_LIMIT_PER_SECOND")
            .unwrap_or_else(|_| "100".to_string())
            .parse::<u64>()
            .unwrap_or_else(|e| {
                error!("RATE_LIMIT_PER_SECOND 파싱 실패: {}. 기본값 100 사용", e);
                100
            });

        let burst_size = env::var("RATE_LIMIT_BURST_SIZE")
            .unwrap_or_else(|_| "200".to_string())
            .parse::<u32>()
            .unwrap_or_else(|e| {
                error!("RATE_LIMIT_BURST_SIZE 파싱 실패: {}. 기본값 200 사용", e);
                200
            });

        Self {
            per_second,
            burst_size,
        }
    }
}

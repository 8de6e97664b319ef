/// 고정 CORS 헤더
/// 모든 응답(프리플라이트, 오류 포함)에 같은 네 개의 헤더를 붙인다.
/// 헤더로 표현할 수 없는 값은 건너뛰고 본문은 그대로 응답한다.
// region:    --- Imports
use crate::config::CorsConfig;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    ACCESS_CONTROL_MAX_AGE,
};
use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::{info, warn};
// endregion: --- Imports

/// 설정값 -> 헤더 목록 (잘못된 값은 제외)
pub fn cors_headers(config: &CorsConfig) -> Vec<(HeaderName, HeaderValue)> {
    if !config.enabled {
        info!("{:<12} --> CORS 헤더 비활성화", "Cors");
        return Vec::new();
    }

    [
        (ACCESS_CONTROL_ALLOW_ORIGIN, &config.allow_origin),
        (ACCESS_CONTROL_ALLOW_METHODS, &config.allow_methods),
        (ACCESS_CONTROL_ALLOW_HEADERS, &config.allow_headers),
        (ACCESS_CONTROL_MAX_AGE, &config.max_age),
    ]
    .into_iter()
    .filter_map(|(name, value)| match HeaderValue::from_str(value) {
        Ok(value) => Some((name, value)),
        Err(e) => {
            warn!(
                "{:<12} --> {} 헤더를 설정할 수 없어 생략: {}",
                "Cors", name, e
            );
            None
        }
    })
    .collect()
}

/// 라우터에 헤더 레이어 적용
pub fn with_cors_headers<S>(
    router: Router<S>,
    headers: Vec<(HeaderName, HeaderValue)>,
) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    headers.into_iter().fold(router, |router, (name, value)| {
        router.layer(SetResponseHeaderLayer::overriding(name, value))
    })
}

//! 리프레시 토큰 쿠키 처리.
//!
//! 리프레시 토큰은 오직 HTTP-only 쿠키로만 운반됩니다.
//!
//! # 쿠키 계약
//!
//! - 이름: `refreshToken`
//! - 플래그: `HttpOnly`, `SameSite=Strict`, 운영 환경에서 `Secure`
//! - 경로: `/` (API 전체)
//! - 수명: 30일 고정 - remember me 여부와 무관하게 쿠키 수명은 변하지 않고,
//!   내부 토큰의 수명만 달라집니다

use axum::http::header::COOKIE;
use axum::http::HeaderMap;

/// 리프레시 토큰 쿠키 이름.
pub const REFRESH_COOKIE_NAME: &str = "refreshToken";

/// 쿠키 수명 (30일, 초 단위).
pub const REFRESH_COOKIE_MAX_AGE_SECS: i64 = 30 * 24 * 60 * 60;

/// 요청 헤더에서 쿠키 값 추출.
pub fn get_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    let header = headers.get(COOKIE)?.to_str().ok()?;
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

/// 리프레시 토큰을 담는 Set-Cookie 값 생성.
pub fn refresh_cookie(token: &str, secure: bool) -> String {
    build_cookie(token, REFRESH_COOKIE_MAX_AGE_SECS, secure)
}

/// 리프레시 토큰 쿠키를 만료시키는 Set-Cookie 값 생성.
pub fn clear_refresh_cookie(secure: bool) -> String {
    build_cookie("", 0, secure)
}

fn build_cookie(value: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; HttpOnly; SameSite=Strict; Path=/; Max-Age={}",
        REFRESH_COOKIE_NAME, value, max_age_secs
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_get_cookie() {
        let headers = headers_with_cookie("refreshToken=abc.def.ghi; theme=dark");
        assert_eq!(
            get_cookie(&headers, REFRESH_COOKIE_NAME),
            Some("abc.def.ghi".to_string())
        );
        assert_eq!(get_cookie(&headers, "theme"), Some("dark".to_string()));
        assert_eq!(get_cookie(&headers, "missing"), None);
    }

    #[test]
    fn test_get_cookie_no_header() {
        let headers = HeaderMap::new();
        assert_eq!(get_cookie(&headers, REFRESH_COOKIE_NAME), None);
    }

    #[test]
    fn test_refresh_cookie_attributes() {
        let cookie = refresh_cookie("token123", false);
        assert!(cookie.starts_with("refreshToken=token123"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Strict"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("Max-Age=2592000"));
        assert!(!cookie.contains("Secure"));
    }

    #[test]
    fn test_refresh_cookie_secure_in_production() {
        let cookie = refresh_cookie("token123", true);
        assert!(cookie.contains("Secure"));
    }

    #[test]
    fn test_clear_cookie_expires_immediately() {
        let cookie = clear_refresh_cookie(false);
        assert!(cookie.starts_with("refreshToken=;"));
        assert!(cookie.contains("Max-Age=0"));
    }
}

use axum::http::HeaderMap;

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::models::{Capability, Role};

pub fn role_for_token(token: &str, config: &AppConfig) -> Option<Role> {
    if token.is_empty() {
        None
    } else if token == config.admin_token {
        Some(Role::Admin)
    } else if token == config.staff_token {
        Some(Role::Staff)
    } else {
        None
    }
}

/// Resolves the caller's role from the bearer token and checks it grants `capability`.
pub fn authorize(
    headers: &HeaderMap,
    config: &AppConfig,
    capability: Capability,
) -> Result<Role, AppError> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    let token = auth.strip_prefix("Bearer ").unwrap_or("");

    let role = role_for_token(token, config).ok_or(AppError::Unauthorized)?;
    if !role.can(capability) {
        tracing::warn!(role = role.as_str(), ?capability, "capability denied");
        return Err(AppError::Forbidden);
    }
    Ok(role)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AppConfig {
        AppConfig {
            port: 3000,
            database_url: ":memory:".to_string(),
            admin_token: "admin-secret".to_string(),
            staff_token: "staff-secret".to_string(),
            cache_ttl_secs: 0,
            poll_interval_secs: 15,
            default_commission_rate: 0.4,
        }
    }

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", value.parse().unwrap());
        headers
    }

    #[test]
    fn test_tokens_map_to_roles() {
        let config = config();
        assert_eq!(role_for_token("admin-secret", &config), Some(Role::Admin));
        assert_eq!(role_for_token("staff-secret", &config), Some(Role::Staff));
        assert_eq!(role_for_token("", &config), None);
        assert_eq!(role_for_token("guess", &config), None);
    }

    #[test]
    fn test_staff_cannot_edit_config() {
        let config = config();
        let err = authorize(&headers("Bearer staff-secret"), &config, Capability::EditConfig);
        assert!(matches!(err, Err(AppError::Forbidden)));
        assert!(authorize(&headers("Bearer staff-secret"), &config, Capability::UpdateStatus).is_ok());
    }

    #[test]
    fn test_missing_bearer_prefix_is_unauthorized() {
        let config = config();
        let err = authorize(&headers("admin-secret"), &config, Capability::ViewQueue);
        assert!(matches!(err, Err(AppError::Unauthorized)));
        assert!(matches!(
            authorize(&HeaderMap::new(), &config, Capability::ViewQueue),
            Err(AppError::Unauthorized)
        ));
    }
}

use std::env;

#[derive(Clone, Debug)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn from_env() -> Self {
        Self {
            allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:5173".to_string())
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_multiple_origins() {
        // Safety: tests in this module are the only writers of this variable.
        unsafe {
            env::set_var(
                "CORS_ALLOWED_ORIGINS",
                "http://localhost:5173, https://volunhub.org",
            );
        }
        let config = CorsConfig::from_env();
        assert_eq!(
            config.allowed_origins,
            vec![
                "http://localhost:5173".to_string(),
                "https://volunhub.org".to_string()
            ]
        );
        unsafe {
            env::remove_var("CORS_ALLOWED_ORIGINS");
        }
    }
}

/// ログフィルタを上書きする環境変数（例: `NLX_LOG=nlx=debug`）
pub const LOG_ENV: &str = "NLX_LOG";

/// 環境変数ユーティリティ
pub struct EnvVar;

impl EnvVar {
    /// 環境変数を取得（空文字列・空白のみはNoneとして扱う）
    pub fn get(key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|s| !s.trim().is_empty())
    }

    /// `NLX_LOG` に指定されたトレースフィルタ
    pub fn log_filter() -> Option<String> {
        Self::get(LOG_ENV)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_existing_var() {
        std::env::set_var("NLX_TEST_ENV_VAR", "debug");
        assert_eq!(EnvVar::get("NLX_TEST_ENV_VAR"), Some("debug".to_string()));
        std::env::remove_var("NLX_TEST_ENV_VAR");
    }

    #[test]
    fn test_get_blank_var() {
        std::env::set_var("NLX_TEST_BLANK_VAR", "  ");
        assert_eq!(EnvVar::get("NLX_TEST_BLANK_VAR"), None);
        std::env::remove_var("NLX_TEST_BLANK_VAR");
    }

    #[test]
    fn test_get_nonexistent_var() {
        assert_eq!(EnvVar::get("NLX_NONEXISTENT_VAR_12345"), None);
    }
}

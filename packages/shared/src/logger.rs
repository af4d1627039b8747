//! Logging setup utilities for the Minichat binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Library crates whose log output follows the binary's default level.
const LIBRARY_TARGETS: [&str; 2] = ["minichat_client", "minichat_shared"];

/// Build the default filter directive for a binary and the library crates.
///
/// Crate names use underscores in tracing targets, so `minichat-client`
/// becomes `minichat_client`.
pub fn default_directive(binary_name: &str, default_log_level: &str) -> String {
    let binary_target = binary_name.replace('-', "_");
    let mut targets: Vec<String> = LIBRARY_TARGETS.iter().map(|t| t.to_string()).collect();
    if !targets.contains(&binary_target) {
        targets.push(binary_target);
    }

    targets
        .iter()
        .map(|target| format!("{}={}", target, default_log_level))
        .collect::<Vec<_>>()
        .join(",")
}

/// Initialize the tracing subscriber with the specified default log level.
///
/// The log level can be overridden using the `RUST_LOG` environment variable.
/// Output goes to stderr so it does not interleave with the interactive prompt
/// on stdout.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "minichat-client")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use minichat_shared::logger::setup_logger;
///
/// setup_logger("minichat-client", "info");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directive(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_covers_libraries_and_binary() {
        // テスト項目: ライブラリとバイナリにデフォルトのログレベルが重複なく設定される
        // given (前提条件):
        let binary_name = "minichat-client";

        // when (操作):
        let directive = default_directive(binary_name, "debug");

        // then (期待する結果):
        assert_eq!(directive, "minichat_client=debug,minichat_shared=debug");
    }

    #[test]
    fn test_default_directive_is_parsable() {
        // テスト項目: 生成したディレクティブが EnvFilter として解釈できる
        // given (前提条件):
        let directive = default_directive("chat-shell", "warn");

        // when (操作):
        let result = tracing_subscriber::EnvFilter::try_new(&directive);

        // then (期待する結果):
        assert!(result.is_ok());
        assert!(directive.ends_with("chat_shell=warn"));
    }
}

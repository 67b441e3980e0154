//! Система логирования с настройкой уровней через переменные окружения
//! Использует env_logger; вывод идет в stderr, stdout остается для JSON-результата

use std::env;

/// Инициализация системы логирования
///
/// Уровни логирования настраиваются через переменную окружения RUST_LOG:
/// - RUST_LOG=error - только ошибки
/// - RUST_LOG=warn - предупреждения и ошибки
/// - RUST_LOG=info - информационные сообщения (по умолчанию)
/// - RUST_LOG=debug - подписанные запросы к бирже
///
/// Примеры:
/// ```bash
/// RUST_LOG=debug bingx_order_service cancel_order 123 BTC-USDT
/// RUST_LOG=bingx_order_service::exchange=debug bingx_order_service place_order '{...}'
/// ```
pub fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("info");

    // Повторная инициализация (например, из тестов) не считается ошибкой
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp_secs()
        .format_module_path(true)
        .format_target(false)
        .target(env_logger::Target::Stderr)
        .try_init();

    log::debug!("📝 Уровень логирования: {}", get_log_level());
}

/// Получить текущий уровень логирования
pub fn get_log_level() -> String {
    env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string())
}

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

use chanwatch::config::Config;
use chanwatch::events::ViewSnapshot;
use chanwatch::services::{create_visibility_watcher, SharedView, SubscriptionRegistry};
use parking_lot::RwLock;

#[derive(Parser, Debug)]
#[command(name = "chanwatch")]
#[command(about = "Отслеживание видимости каналов в основном и боковом слотах")]
struct Args {
    /// Путь к файлу конфигурации
    #[arg(short, long, default_value = "chanwatch.toml")]
    config: String,

    /// Режим сухого запуска (эмуляция смены каналов, без реальных подписок)
    #[arg(long)]
    dry_run: bool,

    /// Уровень логирования (переопределяет конфигурацию)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Конфигурация загружается до логирования: из неё берутся уровень и формат
    let config = Arc::new(Config::load(&args.config)?);

    // Инициализация системы логирования
    init_tracing(
        &config.log_directive(args.log_level.as_deref()),
        config.is_json_logging(),
    )?;

    info!("Запуск chanwatch v{}", env!("CARGO_PKG_VERSION"));
    info!("Конфигурация загружена из: {}", args.config);

    let dry_run = args.dry_run || config.is_dry_run_mode();
    if dry_run {
        warn!("Режим сухого запуска - реальные подписки отключены");
    }

    let registry = Arc::new(SubscriptionRegistry::new(dry_run));
    let current_view: SharedView = Arc::new(RwLock::new(ViewSnapshot::default()));
    let watcher = create_visibility_watcher(
        config.clone(),
        registry.clone(),
        current_view.clone(),
        dry_run,
    )?;

    let watcher_handle = tokio::spawn(async move {
        if let Err(e) = watcher.run().await {
            error!("Ошибка в VisibilityWatcher: {}", e);
        }
    });

    info!("Наблюдатель запущен");

    // Ожидание сигнала завершения
    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Получен сигнал завершения (Ctrl+C)");
        }
        Err(err) => {
            error!("Ошибка при ожидании сигнала завершения: {}", err);
        }
    }

    info!("Завершение работы...");

    watcher_handle.abort();

    let shutdown_timeout = tokio::time::Duration::from_secs(5);
    match tokio::time::timeout(shutdown_timeout, watcher_handle).await {
        Ok(_) => info!("Наблюдатель завершил работу корректно"),
        Err(_) => warn!("Таймаут при завершении наблюдателя"),
    }

    info!("Последний вид: {}", *current_view.read());

    let stats = registry.stats();
    info!(
        "Активных подписок: {} (всего добавлено {}, удалено {}): {:?}",
        stats.active,
        stats.added_total,
        stats.removed_total,
        registry.subscribed_channels()
    );
    registry.clear();

    info!("chanwatch завершил работу");
    Ok(())
}

fn init_tracing(directive: &str, json: bool) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(directive))?;
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer().compact()).init();
    }

    Ok(())
}

use clap::Parser;
use slot_notifier::adapters::http::{ReqwestTransport, TransportOptions};
use slot_notifier::adapters::notify::ConsoleNotifier;
use slot_notifier::adapters::timer::TokioTimer;
use slot_notifier::config::{CliConfig, Command};
use slot_notifier::core::shutdown::{block_on_with_grace, shutdown_channel, SHUTDOWN_GRACE};
use slot_notifier::core::{ConfigProvider, Notifier};
use slot_notifier::utils::error::ErrorSeverity;
use slot_notifier::utils::{logger, validation::Validate};
use slot_notifier::{SlotPipeline, WatchConfig, WatchEngine, WatchError};

fn exit_with(e: &WatchError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

#[cfg(feature = "desktop")]
fn build_notifier(config: &WatchConfig) -> Box<dyn Notifier> {
    use slot_notifier::adapters::notify::DesktopNotifier;

    if config.notification.desktop {
        Box::new(DesktopNotifier::new(config.display_timeout()))
    } else {
        Box::new(ConsoleNotifier)
    }
}

#[cfg(not(feature = "desktop"))]
fn build_notifier(config: &WatchConfig) -> Box<dyn Notifier> {
    if config.notification.desktop {
        tracing::warn!("⚠️ Built without the `desktop` feature; alerts go to the console");
    }
    Box::new(ConsoleNotifier)
}

fn display_config_summary(settings: &impl ConfigProvider, plan: &slot_notifier::core::QueryPlan) {
    println!("📋 Configuration Summary:");
    println!("  Endpoint: {}", plan.endpoint);
    println!("  Units: {}", plan.units.len());
    for unit in &plan.units {
        println!("    - {} {:?}", unit.label, unit.query);
    }
    println!("  Criteria: {}", plan.criteria);
    println!("  Interval: {:?}", settings.interval());
    println!("  Top N: {}", settings.top_n());
    println!();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();
    // 結束時不等待仍開著的桌面通知
    block_on_with_grace(run(cli), SHUTDOWN_GRACE)?
}

async fn run(cli: CliConfig) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(Command::Init { path, force }) = &cli.command {
        let target = path.as_deref().unwrap_or(&cli.config);
        match WatchConfig::write_default(target, *force) {
            Ok(written) => {
                println!("✅ Default configuration written to {}", written.display());
                return Ok(());
            }
            Err(e) => exit_with(&e),
        }
    }

    // 載入 TOML 配置
    let config = match WatchConfig::from_file(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", cli.config, e);
            eprintln!("💡 Run `slot-notifier init` to create one");
            std::process::exit(1);
        }
    };

    // 驗證配置
    if let Err(e) = config.validate() {
        exit_with(&e);
    }

    let log_format = config.log_format().unwrap_or_default();
    if let Err(e) = logger::init_cli_logger(cli.verbose, log_format, config.log_directory()) {
        exit_with(&e);
    }

    tracing::info!("🚀 Starting slot-notifier");
    tracing::info!("📁 Configuration loaded from: {}", cli.config);

    let settings = match config.resolve() {
        Ok(settings) => settings,
        Err(e) => exit_with(&e),
    };

    let transport = match ReqwestTransport::new(&TransportOptions {
        timeout: config.request_timeout(),
        user_agent: config.source.user_agent.clone(),
        headers: config.source.headers.clone().unwrap_or_default(),
    }) {
        Ok(transport) => transport,
        Err(e) => exit_with(&e),
    };

    let interval = settings.interval();
    let pipeline = SlotPipeline::new(transport, build_notifier(&config), settings.clone());
    display_config_summary(&settings, &pipeline.query_plan());

    if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No requests will be sent");
        return Ok(());
    }

    let (handle, signal) = shutdown_channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("🛑 Ctrl-C received, shutting down");
            handle.trigger();
        }
    });

    let mut engine = WatchEngine::new(pipeline, TokioTimer, interval, signal);

    if cli.once {
        let report = engine.run_cycle().await;
        println!(
            "✅ {} matching sessions, {} shown in notification",
            report.records, report.notified
        );
        return Ok(());
    }

    engine.run().await;
    Ok(())
}

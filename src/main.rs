use anyhow::Context;
use clap::Parser;
use scriptime::utils::error::ErrorCategory;
use scriptime::utils::{logger, validation::Validate};
use scriptime::{CliConfig, DefaultClipPlayer, HostStats, NotifyError, NotifyTimer, SmtpRelay, SystemClock};
use std::process::Command;

fn exit_code_for(error: &NotifyError) -> i32 {
    match error.category() {
        ErrorCategory::Configuration | ErrorCategory::Usage => 1,
        ErrorCategory::Delivery => 2,
        ErrorCategory::Playback => 3,
        ErrorCategory::Io => 4,
    }
}

fn report_failure(error: &NotifyError) {
    tracing::error!("❌ {} (category: {:?})", error, error.category());
    tracing::error!("💡 Suggestion: {}", error.recovery_suggestion());
    eprintln!("❌ {}", error.user_friendly_message());
    eprintln!("💡 {}", error.recovery_suggestion());
}

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting scriptime");
    if config.verbose {
        tracing::debug!(
            "Method: {}, targets: {:?}, command: {:?}",
            config.method,
            config.targets,
            config.command
        );
    }

    if let Err(e) = config.validate() {
        report_failure(&e);
        std::process::exit(exit_code_for(&e));
    }

    let mut stats = HostStats::new();
    if let Some(path) = &config.lockfile {
        stats = stats.with_lockfile(path);
    }
    stats = match config.version_command() {
        Some((program, args)) => stats.with_version_command(program, args),
        None => stats.without_version_command(),
    };

    let timer_config = config.timer_config();
    let relay = SmtpRelay::new(timer_config.relay_timeout);
    let mut timer = match NotifyTimer::with_parts(
        timer_config,
        relay,
        stats,
        DefaultClipPlayer::default(),
        SystemClock,
    ) {
        Ok(timer) => timer,
        Err(e) => {
            report_failure(&e);
            std::process::exit(exit_code_for(&e));
        }
    };

    timer.start();
    tracing::info!("▶️ Running {:?}", config.command);

    let run = Command::new(&config.command[0])
        .args(&config.command[1..])
        .status();

    let mut exit_code = match &run {
        Ok(status) => {
            tracing::info!("🏁 {} exited with {}", timer.subject(), status);
            status.code().unwrap_or(1)
        }
        Err(e) => {
            tracing::error!("❌ Could not run {}: {}", config.command[0], e);
            1
        }
    };

    if let Err(e) = timer.notify(config.targets.as_slice(), config.print_body) {
        report_failure(&e);
        exit_code = exit_code_for(&e);
    }

    if config.sound {
        if let Err(e) = timer.alert() {
            report_failure(&e);
            if exit_code == 0 {
                exit_code = exit_code_for(&e);
            }
        }
    }

    // The report still goes out when the command never started.
    run.with_context(|| format!("failed to run {}", config.command[0]))?;

    if exit_code != 0 {
        std::process::exit(exit_code);
    }

    Ok(())
}

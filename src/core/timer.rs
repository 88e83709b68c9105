use crate::adapters::audio::DefaultClipPlayer;
use crate::adapters::clock::SystemClock;
use crate::adapters::smtp::SmtpRelay;
use crate::adapters::stats::HostStats;
use crate::config::TimerConfig;
use crate::domain::model::{ClipResource, Credentials, Recipients, RenderedReport, Report};
use crate::domain::ports::{ClipPlayer, Clock, CredentialSource, MailRelay, RelaySession, SystemStatsProvider};
use crate::utils::error::{NotifyError, Result};
use crate::utils::validation::{validate_recipients, Validate};
use chrono::{DateTime, Local, Utc};
use std::io::Write;

/// Times a script and reports its completion by email or sound.
///
/// Construction resolves credentials, `start()` records the baseline and
/// `notify()` mails a report with the elapsed time and a host snapshot.
pub struct NotifyTimer<R, S, P, C = SystemClock> {
    credentials: Credentials,
    descriptor: String,
    alert_clip: ClipResource,
    baseline: Option<DateTime<Utc>>,
    relay: R,
    stats: S,
    player: P,
    clock: C,
}

impl NotifyTimer<SmtpRelay, HostStats, DefaultClipPlayer, SystemClock> {
    /// A timer wired to the SMTP relay, host stats and the default clip player.
    pub fn from_config(config: TimerConfig) -> Result<Self> {
        let relay = SmtpRelay::new(config.relay_timeout);
        Self::with_parts(
            config,
            relay,
            HostStats::default(),
            DefaultClipPlayer::default(),
            SystemClock,
        )
    }
}

impl<R, S, P, C> NotifyTimer<R, S, P, C>
where
    R: MailRelay,
    S: SystemStatsProvider,
    P: ClipPlayer,
    C: Clock,
{
    pub fn with_parts(config: TimerConfig, relay: R, stats: S, player: P, clock: C) -> Result<Self> {
        config.validate()?;
        let credentials = config.credentials.resolve()?;

        let created = clock.now().with_timezone(&Local);
        let descriptor = format!(
            "[{}] {} Finished",
            created.format("%m-%d-%Y %H:%M:%S"),
            config.resolved_label()
        );

        tracing::info!(
            "⏱️ Timer ready for {} (credentials via {})",
            config.resolved_label(),
            config.credentials.method()
        );

        Ok(Self {
            credentials,
            descriptor,
            alert_clip: config.alert_clip,
            baseline: None,
            relay,
            stats,
            player,
            clock,
        })
    }

    /// Records the baseline. Calling it again restarts the measurement.
    pub fn start(&mut self) {
        let now = self.clock.now();
        if self.baseline.is_some() {
            tracing::debug!("Timer restarted, previous baseline discarded");
        }
        self.baseline = Some(now);
    }

    pub fn is_started(&self) -> bool {
        self.baseline.is_some()
    }

    pub fn subject(&self) -> &str {
        &self.descriptor
    }

    /// Builds the report for the time elapsed since `start()`.
    pub fn report(&self) -> Result<RenderedReport> {
        let baseline = self.baseline.ok_or(NotifyError::NotStartedError)?;
        let elapsed = (self.clock.now() - baseline)
            .to_std()
            .unwrap_or_default();

        let report = Report {
            subject: self.descriptor.clone(),
            elapsed,
            stats: self.stats.snapshot(),
        };
        Ok(report.render())
    }

    /// Mails the report to every target over one relay session.
    ///
    /// Sends stop at the first failure; messages already accepted by the relay
    /// stay delivered. With `echo_body` the report is printed to stdout after
    /// delivery was attempted, whether or not it succeeded.
    pub fn notify<T: Into<Recipients>>(&self, targets: T, echo_body: bool) -> Result<()> {
        if echo_body {
            return self.notify_echoing(targets, &mut std::io::stdout().lock());
        }

        let (targets, report) = self.prepare(targets)?;
        self.deliver(targets.as_slice(), &report)
    }

    /// `notify` that writes the rendered report to `out` once delivery was attempted.
    pub fn notify_echoing<T, W>(&self, targets: T, out: &mut W) -> Result<()>
    where
        T: Into<Recipients>,
        W: Write,
    {
        let (targets, report) = self.prepare(targets)?;
        let outcome = self.deliver(targets.as_slice(), &report);
        let echoed = writeln!(out, "{}", report);

        outcome?;
        echoed?;
        Ok(())
    }

    fn prepare<T: Into<Recipients>>(&self, targets: T) -> Result<(Recipients, RenderedReport)> {
        let targets = targets.into();
        if !self.is_started() {
            return Err(NotifyError::NotStartedError);
        }
        validate_recipients(targets.as_slice())?;

        Ok((targets, self.report()?))
    }

    fn deliver(&self, targets: &[String], report: &RenderedReport) -> Result<()> {
        tracing::info!(
            "📧 Sending completion report to {} recipient(s) via {}:{}",
            targets.len(),
            self.credentials.relay_host,
            self.credentials.relay_port
        );

        let mut session = self.relay.open(&self.credentials).map_err(|e| {
            tracing::error!("❌ Could not open relay session: {}", e);
            e
        })?;

        for (sent, target) in targets.iter().enumerate() {
            if let Err(e) = session.send(target, report) {
                tracing::error!(
                    "❌ Delivery to {} failed after {} successful send(s): {}",
                    target,
                    sent,
                    e
                );
                return Err(e);
            }
            tracing::debug!("Delivered report to {}", target);
        }

        tracing::info!("✅ Completion report delivered");
        Ok(())
    }

    /// Plays the alert clip, returning once playback has finished.
    pub fn alert(&self) -> Result<()> {
        tracing::info!("🔔 Playing alert {}", self.alert_clip);
        self.player.play(&self.alert_clip).map_err(|e| {
            tracing::error!("❌ Alert playback failed: {}", e);
            e
        })
    }
}

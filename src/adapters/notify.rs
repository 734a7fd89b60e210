use crate::core::{Alert, Notifier};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Logs the alert and prints it to stdout.
#[derive(Debug, Clone, Default)]
pub struct ConsoleNotifier;

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn notify(&self, alert: &Alert) -> Result<()> {
        tracing::info!("🔔 {}", alert.title);
        println!("🔔 {}", alert.title);
        for line in alert.body.lines() {
            tracing::info!("   {}", line);
            println!("   {}", line);
        }
        if let Some(url) = &alert.click_url {
            println!("   👉 {}", url);
        }
        Ok(())
    }
}

/// 讓執行期選擇的 notifier 可以放進泛型 pipeline
#[async_trait]
impl<N: Notifier + ?Sized> Notifier for Box<N> {
    async fn notify(&self, alert: &Alert) -> Result<()> {
        (**self).notify(alert).await
    }
}

#[cfg(feature = "desktop")]
pub use desktop::DesktopNotifier;

#[cfg(feature = "desktop")]
mod desktop {
    use super::*;
    use crate::utils::error::WatchError;
    use std::time::Duration;

    /// 桌面通知；在 Linux/BSD 上會等待使用者點擊後開啟網址
    #[derive(Debug, Clone)]
    pub struct DesktopNotifier {
        display_timeout: Duration,
    }

    impl DesktopNotifier {
        pub fn new(display_timeout: Duration) -> Self {
            Self { display_timeout }
        }
    }

    /// Alert features the notification server on this platform cannot honour.
    pub(super) fn unsupported_features(alert: &Alert) -> Vec<&'static str> {
        if cfg!(all(unix, not(target_os = "macos"))) {
            return Vec::new();
        }
        let mut dropped = vec!["display timeout"];
        if alert.click_url.is_some() {
            dropped.push("click-to-open");
        }
        dropped
    }

    fn show(alert: Alert, display_timeout: Duration) -> std::result::Result<(), notify_rust::error::Error> {
        for feature in unsupported_features(&alert) {
            tracing::debug!("Desktop alert: {} is not supported on this platform", feature);
        }

        let mut notification = notify_rust::Notification::new();
        notification.summary(&alert.title).body(&alert.body);

        #[cfg(all(unix, not(target_os = "macos")))]
        {
            let millis = u32::try_from(display_timeout.as_millis()).unwrap_or(u32::MAX);
            notification.timeout(notify_rust::Timeout::Milliseconds(millis));
            if alert.click_url.is_some() {
                notification.action("default", "Open");
            }

            let handle = notification.show()?;
            // 阻塞直到通知被點擊、關閉或逾時
            handle.wait_for_action(|action| {
                if action == "default" {
                    if let Some(url) = &alert.click_url {
                        if let Err(e) = open::that(url) {
                            tracing::warn!("⚠️ Could not open {}: {}", url, e);
                        }
                    }
                }
            });
        }

        #[cfg(not(all(unix, not(target_os = "macos"))))]
        {
            let _ = display_timeout;
            notification.show()?;
        }

        Ok(())
    }

    #[async_trait]
    impl Notifier for DesktopNotifier {
        async fn notify(&self, alert: &Alert) -> Result<()> {
            let alert = alert.clone();
            let display_timeout = self.display_timeout;

            tokio::task::spawn_blocking(move || show(alert, display_timeout))
                .await
                .map_err(|e| WatchError::NotificationError {
                    message: e.to_string(),
                })?
                .map_err(|e| WatchError::NotificationError {
                    message: e.to_string(),
                })
        }
    }
}

use crate::core::query::{self, DEFAULT_SERVER};
use crate::core::{ConfigProvider, EligibilityFilter, SearchTarget};
use crate::utils::error::{Result, WatchError};
use crate::utils::logger::LogFormat;
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "slot-notifier.toml";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WatchConfig {
    pub search: SearchConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub notification: NotificationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 郵遞區號可寫成陣列或逗號分隔字串
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CodeList {
    Csv(String),
    List(Vec<CodeValue>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CodeValue {
    Text(String),
    Number(u64),
}

impl CodeList {
    pub fn codes(&self) -> Vec<String> {
        let raw: Vec<String> = match self {
            CodeList::Csv(s) => s.split(',').map(str::to_string).collect(),
            CodeList::List(values) => values
                .iter()
                .map(|v| match v {
                    CodeValue::Text(s) => s.clone(),
                    CodeValue::Number(n) => n.to_string(),
                })
                .collect(),
        };
        raw.into_iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pin_codes: Option<CodeList>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<CodeValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_filter: Option<CodeValue>,
    #[serde(default = "default_true")]
    pub calendar_view: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_server")]
    pub server: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_interval_seconds")]
    pub interval_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default = "default_display_seconds")]
    pub timeout_seconds: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub click_url: Option<String>,
    #[serde(default = "default_true")]
    pub desktop: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_true() -> bool {
    true
}

fn default_server() -> String {
    DEFAULT_SERVER.to_string()
}

fn default_timeout_seconds() -> u64 {
    10
}

fn default_concurrent_requests() -> usize {
    3
}

fn default_interval_seconds() -> u64 {
    30
}

fn default_title() -> String {
    "Vaccine Appointment Available".to_string()
}

fn default_top_n() -> usize {
    3
}

fn default_display_seconds() -> u64 {
    15
}

fn default_log_format() -> String {
    "compact".to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            pin_codes: Some(CodeList::List(vec![
                CodeValue::Text("400614".to_string()),
                CodeValue::Text("400706".to_string()),
                CodeValue::Text("400703".to_string()),
            ])),
            district: None,
            age_filter: None,
            calendar_view: true,
            date: None,
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            timeout_seconds: default_timeout_seconds(),
            concurrent_requests: default_concurrent_requests(),
            user_agent: None,
            headers: None,
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_seconds: default_interval_seconds(),
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            top_n: default_top_n(),
            timeout_seconds: default_display_seconds(),
            click_url: Some("https://selfregistration.cowin.gov.in/".to_string()),
            desktop: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: Some("logs".to_string()),
            format: default_log_format(),
        }
    }
}

fn code_text(value: &CodeValue) -> String {
    match value {
        CodeValue::Text(s) => s.trim().to_string(),
        CodeValue::Number(n) => n.to_string(),
    }
}

impl WatchConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                WatchError::config(format!("config file '{}' not found", path.display()))
            } else {
                WatchError::IoError(e)
            }
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| WatchError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${PIN_CODES})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        use regex::{Captures, Regex};
        use std::sync::OnceLock;

        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR.get_or_init(|| {
            Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("static regex is valid")
        });

        re.replace_all(content, |caps: &Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    /// 寫出預設設定檔；已存在時需要 force 才覆蓋
    pub fn write_default<P: AsRef<Path>>(path: P, force: bool) -> Result<PathBuf> {
        let path = path.as_ref();
        if path.exists() && !force {
            return Err(WatchError::config(format!(
                "'{}' already exists (use --force to overwrite)",
                path.display()
            )));
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(&WatchConfig::default())?;
        std::fs::write(path, content)?;
        Ok(path.to_path_buf())
    }

    /// Pin codes take precedence over the district when both are present.
    pub fn search_target(&self) -> Result<SearchTarget> {
        if let Some(list) = &self.search.pin_codes {
            let codes = list.codes();
            if !codes.is_empty() {
                return Ok(SearchTarget::Locations(codes));
            }
        }
        match &self.search.district {
            Some(district) => {
                let id = code_text(district);
                validation::validate_non_empty_string("search.district", &id)?;
                Ok(SearchTarget::Region(id))
            }
            None => Err(WatchError::MissingConfigError {
                field: "search.pin_codes or search.district".to_string(),
            }),
        }
    }

    pub fn eligibility_filter(&self) -> Option<EligibilityFilter> {
        self.search
            .age_filter
            .as_ref()
            .map(code_text)
            .filter(|v| !v.is_empty())
            .map(EligibilityFilter::new)
    }

    pub fn log_format(&self) -> Result<LogFormat> {
        LogFormat::parse(&self.logging.format).ok_or_else(|| WatchError::InvalidConfigValueError {
            field: "logging.format".to_string(),
            value: self.logging.format.clone(),
            reason: "Valid formats: compact, json".to_string(),
        })
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        self.search_target()?;
        validation::validate_url("source.server", &self.source.server)?;
        validation::validate_positive_number("source.timeout_seconds", self.source.timeout_seconds, 1)?;
        validation::validate_positive_number(
            "source.concurrent_requests",
            self.source.concurrent_requests as u64,
            1,
        )?;
        validation::validate_positive_number(
            "schedule.interval_seconds",
            self.schedule.interval_seconds,
            1,
        )?;
        validation::validate_positive_number("notification.top_n", self.notification.top_n as u64, 1)?;
        if let Some(url) = &self.notification.click_url {
            validation::validate_url("notification.click_url", url)?;
        }
        if let Some(date) = &self.search.date {
            validation::validate_search_date("search.date", date)?;
        }
        self.log_format()?;
        Ok(())
    }

    /// 解析成執行期不可變的設定；日期在此時固定
    pub fn resolve(&self) -> Result<WatchSettings> {
        self.validate_config()?;
        Ok(WatchSettings {
            server: self.source.server.clone(),
            target: self.search_target()?,
            filter: self.eligibility_filter(),
            calendar_view: self.search.calendar_view,
            date: self.search.date.clone().unwrap_or_else(query::today),
            concurrent_requests: self.source.concurrent_requests,
            interval: Duration::from_secs(self.schedule.interval_seconds),
            top_n: self.notification.top_n,
            title: self.notification.title.clone(),
            click_url: self.notification.click_url.clone(),
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.source.timeout_seconds)
    }

    pub fn display_timeout(&self) -> Duration {
        Duration::from_secs(self.notification.timeout_seconds)
    }

    pub fn log_directory(&self) -> Option<&Path> {
        self.logging.directory.as_deref().map(Path::new)
    }
}

impl Validate for WatchConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

/// Settings fixed for the process lifetime.
#[derive(Debug, Clone)]
pub struct WatchSettings {
    pub server: String,
    pub target: SearchTarget,
    pub filter: Option<EligibilityFilter>,
    pub calendar_view: bool,
    pub date: String,
    pub concurrent_requests: usize,
    pub interval: Duration,
    pub top_n: usize,
    pub title: String,
    pub click_url: Option<String>,
}

impl ConfigProvider for WatchSettings {
    fn server(&self) -> &str {
        &self.server
    }

    fn search_target(&self) -> &SearchTarget {
        &self.target
    }

    fn eligibility_filter(&self) -> Option<&EligibilityFilter> {
        self.filter.as_ref()
    }

    fn calendar_view(&self) -> bool {
        self.calendar_view
    }

    fn search_date(&self) -> &str {
        &self.date
    }

    fn concurrent_requests(&self) -> usize {
        self.concurrent_requests
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    fn top_n(&self) -> usize {
        self.top_n
    }

    fn notification_title(&self) -> &str {
        &self.title
    }

    fn click_url(&self) -> Option<&str> {
        self.click_url.as_deref()
    }
}

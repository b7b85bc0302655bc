use serde::Deserialize;

/// Public demo key of the OCR.space free tier
///
/// Calls made with this key are paced to stay under the shared rate limit.
pub const SHARED_OCR_API_KEY: &str = "helloworld";

/// Main configuration structure for the crawler
///
/// Every section is optional; missing keys fall back to the values used
/// against the live site.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub ocr: OcrConfig,
    pub output: OutputConfig,
}

/// Origin site configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Base URL used to resolve listing and article links
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path of the first listing page, relative to the base URL
    #[serde(rename = "listing-path")]
    pub listing_path: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.tatce.cz/".to_string(),
            listing_path: "/prakticke-info/aktuality/".to_string(),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of article records collected in one run
    #[serde(rename = "max-articles")]
    pub max_articles: usize,

    /// Pause after each processed article (milliseconds)
    #[serde(rename = "article-delay-ms")]
    pub article_delay_ms: u64,

    /// Pause between listing page fetches (milliseconds)
    #[serde(rename = "listing-delay-ms")]
    pub listing_delay_ms: u64,

    /// Timeout for a single listing, article or file request (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_articles: 30,
            article_delay_ms: 1000,
            listing_delay_ms: 1500,
            request_timeout_secs: 20,
        }
    }
}

/// User agent sent with every request to the origin site
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    pub header: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            header: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                     (KHTML, like Gecko) Chrome/90.0.4430.212 Safari/537.36"
                .to_string(),
        }
    }
}

/// Remote OCR service configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// OCR API endpoint accepting form-encoded POST requests
    pub endpoint: String,

    /// API key; the shared demo key enables pacing
    #[serde(rename = "api-key")]
    pub api_key: String,

    /// OCR language hint (three-letter code)
    pub language: String,

    /// OCR engine number understood by the API
    pub engine: u8,

    #[serde(rename = "detect-orientation")]
    pub detect_orientation: bool,

    pub scale: bool,

    /// Timeout for a single OCR request (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Pause after every call made with the shared key (milliseconds)
    #[serde(rename = "pacing-ms")]
    pub pacing_ms: u64,
}

impl OcrConfig {
    /// Returns true if calls go through the shared, rate-limited credential
    pub fn uses_shared_key(&self) -> bool {
        self.api_key.is_empty() || self.api_key == SHARED_OCR_API_KEY
    }
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.ocr.space/parse/image".to_string(),
            api_key: SHARED_OCR_API_KEY.to_string(),
            language: "cze".to_string(),
            engine: 1,
            detect_orientation: true,
            scale: true,
            timeout_secs: 45,
            pacing_ms: 1000,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory the result document is written to
    pub directory: String,

    /// File name stem; a numeric suffix is appended when the name is taken
    #[serde(rename = "base-name")]
    pub base_name: String,

    /// File extension without the leading dot
    pub extension: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: ".".to_string(),
            base_name: "tatce_articles_with_extracted_text_retry".to_string(),
            extension: "json".to_string(),
        }
    }
}

pub const VISION_ANNOTATE_ENDPOINT: &str = "https://vision.googleapis.com/v1/images:annotate";

/// Upper bound on the annotations the service may return per request.
pub const TEXT_DETECTION_MAX_RESULTS: i32 = 100;

pub const DEFAULT_USER_AGENT: &str = concat!("cloud-vision-ocr/", env!("CARGO_PKG_VERSION"));

pub const PROTOBUF_CONTENT_TYPE: &str = "application/x-protobuf";

/// OAuth scopes requested for Application Default Credentials.
pub const CLOUD_PLATFORM_SCOPES: &[&str] = &["https://www.googleapis.com/auth/cloud-platform"];

pub const API_KEY_HEADER: &str = "x-goog-api-key";
pub const USER_PROJECT_HEADER: &str = "x-goog-user-project";

pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";
pub const ACCESS_TOKEN_ENV: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";
pub const QUOTA_PROJECT_ENV: &str = "GOOGLE_CLOUD_QUOTA_PROJECT";
pub const ENDPOINT_ENV: &str = "VISION_ENDPOINT";

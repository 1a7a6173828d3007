use std::net::IpAddr;
use std::path::PathBuf;

use chrono::FixedOffset;
use lettre::message::Mailbox;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub max_upload_size: usize,
    pub static_dir: PathBuf,
    pub upload_folder: String,
    pub timestamp_offset: FixedOffset,
    pub cloudinary: CloudinaryConfig,
    pub smtp: SmtpConfig,
    pub recipient: Mailbox,
}

#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub api_base: String,
    pub signature_algorithm: SignatureAlgorithm,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SignatureAlgorithm {
    Sha1,
    Sha256,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
    pub from: Mailbox,
    pub tls: TlsMode,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TlsMode {
    StartTls,
    Tls,
    None,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env { lookup };

        let cloudinary = CloudinaryConfig {
            cloud_name: env.required("CLOUDINARY_CLOUD_NAME")?,
            api_key: env.required("CLOUDINARY_API_KEY")?,
            api_secret: env.required("CLOUDINARY_API_SECRET")?,
            api_base: env
                .or("CLOUDINARY_API_BASE", "https://api.cloudinary.com")
                .trim_end_matches('/')
                .to_string(),
            signature_algorithm: match env.or("CLOUDINARY_SIGNATURE_ALGORITHM", "sha1").as_str() {
                "sha1" => SignatureAlgorithm::Sha1,
                "sha256" => SignatureAlgorithm::Sha256,
                other => {
                    return Err(format!(
                        "Invalid CLOUDINARY_SIGNATURE_ALGORITHM '{other}': expected sha1 or sha256"
                    ));
                }
            },
        };

        let user = env.required("EMAIL_USER")?;
        let pass = env.required("EMAIL_PASS")?;
        let recipient: Mailbox = env
            .required("RECEIVER_EMAIL")?
            .parse()
            .map_err(|e| format!("Invalid RECEIVER_EMAIL: {e}"))?;

        let from: Mailbox = env
            .or("EMAIL_FROM", &user)
            .parse()
            .map_err(|e| format!("Invalid EMAIL_FROM: {e}"))?;

        let smtp = SmtpConfig {
            host: env.or("SMTP_HOST", "smtp.gmail.com"),
            port: env
                .or("SMTP_PORT", "587")
                .parse()
                .map_err(|e| format!("Invalid SMTP_PORT: {e}"))?,
            user,
            pass,
            from,
            tls: match env.or("SMTP_TLS", "starttls").as_str() {
                "starttls" => TlsMode::StartTls,
                "tls" => TlsMode::Tls,
                "none" => TlsMode::None,
                other => {
                    return Err(format!(
                        "Invalid SMTP_TLS '{other}': expected starttls, tls or none"
                    ));
                }
            },
        };

        let host: IpAddr = env
            .or("FORMRELAY_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid FORMRELAY_HOST: {e}"))?;

        let port: u16 = env
            .or("FORMRELAY_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid FORMRELAY_PORT: {e}"))?;

        let max_upload_size: usize = env
            .or("FORMRELAY_MAX_UPLOAD_SIZE", "10485760")
            .parse()
            .map_err(|e| format!("Invalid FORMRELAY_MAX_UPLOAD_SIZE: {e}"))?;

        let timestamp_offset = parse_offset(&env.or("FORMRELAY_TIMESTAMP_OFFSET", "+05:30"))
            .map_err(|e| format!("Invalid FORMRELAY_TIMESTAMP_OFFSET: {e}"))?;

        Ok(Config {
            host,
            port,
            log_level: env.or("FORMRELAY_LOG_LEVEL", "info"),
            max_upload_size,
            static_dir: PathBuf::from(env.or("FORMRELAY_STATIC_DIR", "public")),
            upload_folder: env.or("FORMRELAY_UPLOAD_FOLDER", "form-uploads"),
            timestamp_offset,
            cloudinary,
            smtp,
            recipient,
        })
    }
}

struct Env<F> {
    lookup: F,
}

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn required(&self, key: &str) -> Result<String, String> {
        (self.lookup)(key)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| format!("Missing required environment variable: {key}"))
    }

    fn or(&self, key: &str, default: &str) -> String {
        (self.lookup)(key).unwrap_or_else(|| default.to_string())
    }
}

/// Parse a `+HH:MM` / `-HH:MM` UTC offset.
pub fn parse_offset(s: &str) -> Result<FixedOffset, String> {
    let (sign, rest) = match s.as_bytes().first() {
        Some(b'+') => (1, &s[1..]),
        Some(b'-') => (-1, &s[1..]),
        _ => return Err(format!("'{s}' must start with + or -")),
    };

    let (hours, minutes) = rest
        .split_once(':')
        .ok_or_else(|| format!("'{s}' must look like +HH:MM"))?;
    let hours: u32 = hours.parse().map_err(|_| format!("'{s}' has invalid hours"))?;
    let minutes: u32 = minutes
        .parse()
        .map_err(|_| format!("'{s}' has invalid minutes"))?;

    if hours > 23 || minutes > 59 {
        return Err(format!("'{s}' is out of range"));
    }

    let seconds = (hours * 3600 + minutes * 60) as i32;
    FixedOffset::east_opt(sign * seconds)
        .ok_or_else(|| format!("'{s}' is out of range"))
}

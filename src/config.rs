use anyhow::Context;
use time::{macros::format_description, Date, OffsetDateTime, UtcOffset};
use uuid::Uuid;

/// Owner used when `OWNER_ID` is not set.
pub const DEFAULT_OWNER_ID: Uuid = Uuid::from_u128(1);

const DEFAULT_FRAME_ANCESTORS: &str = "'self' https://*.clickup.com https://app.clickup.com";

/// Profile values given to an auto-provisioned owner.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefaultProfile {
    pub birth_date: Option<OffsetDateTime>,
    pub height_in: Option<f64>,
}

/// What to do when a weight is recorded for an owner with no user row.
#[derive(Debug, Clone, PartialEq)]
pub enum ProvisionPolicy {
    AutoCreate(DefaultProfile),
    Disabled,
}

#[derive(Debug, Clone)]
pub struct OwnerConfig {
    pub id: Uuid,
    pub provision: ProvisionPolicy,
}

#[derive(Debug, Clone)]
pub struct EmbedConfig {
    /// Sources allowed in `frame-ancestors`.
    pub frame_ancestors: Vec<String>,
}

impl EmbedConfig {
    pub fn content_security_policy(&self) -> String {
        format!("frame-ancestors {}", self.frame_ancestors.join(" "))
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
    pub owner: OwnerConfig,
    pub embed: EmbedConfig,
    /// Offset used to decide which calendar day an entry belongs to.
    pub display_offset: UtcOffset,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;

        let owner_id = match std::env::var("OWNER_ID") {
            Ok(v) => Uuid::parse_str(v.trim()).context("OWNER_ID is not a valid UUID")?,
            Err(_) => DEFAULT_OWNER_ID,
        };
        let auto_provision = std::env::var("OWNER_AUTO_PROVISION")
            .ok()
            .map(|v| parse_flag(&v))
            .unwrap_or(true);
        let provision = if auto_provision {
            let birth_date = match std::env::var("OWNER_DEFAULT_BIRTH_DATE") {
                Ok(v) => Some(parse_birth_date(&v)?),
                Err(_) => None,
            };
            let height_in = match std::env::var("OWNER_DEFAULT_HEIGHT_IN") {
                Ok(v) => Some(
                    v.trim()
                        .parse::<f64>()
                        .context("OWNER_DEFAULT_HEIGHT_IN is not a number")?,
                ),
                Err(_) => None,
            };
            ProvisionPolicy::AutoCreate(DefaultProfile {
                birth_date,
                height_in,
            })
        } else {
            ProvisionPolicy::Disabled
        };

        let frame_ancestors = std::env::var("EMBED_FRAME_ANCESTORS")
            .unwrap_or_else(|_| DEFAULT_FRAME_ANCESTORS.into())
            .split_whitespace()
            .map(str::to_string)
            .collect();

        let display_offset =
            parse_offset_minutes(std::env::var("DISPLAY_UTC_OFFSET_MINUTES").ok().as_deref())?;

        Ok(Self {
            database_url,
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: std::env::var("APP_PORT")
                .ok()
                .and_then(|v| v.parse::<u16>().ok())
                .unwrap_or(8080),
            max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(10),
            owner: OwnerConfig {
                id: owner_id,
                provision,
            },
            embed: EmbedConfig { frame_ancestors },
            display_offset,
        })
    }
}

fn parse_flag(v: &str) -> bool {
    !matches!(
        v.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}

/// Whole minutes east of UTC; unset means UTC.
pub fn parse_offset_minutes(v: Option<&str>) -> anyhow::Result<UtcOffset> {
    let Some(v) = v else {
        return Ok(UtcOffset::UTC);
    };
    let minutes = v
        .trim()
        .parse::<i32>()
        .with_context(|| format!("DISPLAY_UTC_OFFSET_MINUTES `{}` is not a whole number", v))?;
    let seconds = minutes
        .checked_mul(60)
        .with_context(|| format!("DISPLAY_UTC_OFFSET_MINUTES `{}` is out of range", v))?;
    UtcOffset::from_whole_seconds(seconds)
        .with_context(|| format!("DISPLAY_UTC_OFFSET_MINUTES `{}` is out of range", v))
}

/// Parses `YYYY-MM-DD` into midnight UTC.
pub fn parse_birth_date(v: &str) -> anyhow::Result<OffsetDateTime> {
    let date = Date::parse(v.trim(), format_description!("[year]-[month]-[day]"))
        .with_context(|| format!("invalid birth date `{}`, expected YYYY-MM-DD", v))?;
    Ok(date.midnight().assume_utc())
}

use std::{env, fs, path::Path, time::Duration};

use crate::{
    domain::{Destination, Language},
    errors::Error,
    Result,
};

/// Typed configuration for the bot process.
#[derive(Clone, Debug)]
pub struct Config {
    // Telegram
    pub bot_token: String,
    pub channel: Destination,
    pub admin_channel: Option<Destination>,
    pub moderator_ids: Vec<i64>,

    // Database
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_run_migrations: bool,

    // Conversation
    pub media_group_timeout: Duration,
    pub draft_idle_timeout: Duration,
    pub default_language: Language,
    pub postings_per_page: u32,
    pub search_results_per_page: u32,
    pub max_photos: usize,

    // Rate limiting
    pub rate_limit_enabled: bool,
    pub rate_limit_requests: u32,
    pub rate_limit_window: Duration,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (the process env in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).and_then(non_empty);

        let bot_token = get("BOT_TOKEN")
            .ok_or_else(|| Error::Config("BOT_TOKEN environment variable is required".into()))?;
        let channel = get("CHANNEL_ID")
            .map(|s| Destination::parse(&s))
            .ok_or_else(|| Error::Config("CHANNEL_ID environment variable is required".into()))?;
        let admin_channel = get("ADMIN_CHANNEL_ID").map(|s| Destination::parse(&s));

        let moderator_ids = parse_csv_i64(get("ADMIN_IDS"));
        if moderator_ids.is_empty() {
            tracing::warn!("ADMIN_IDS is empty: nobody can moderate listings");
        }

        let database_url = match get("DATABASE_URL") {
            Some(url) => url,
            None => {
                let mut missing = Vec::new();
                for key in ["DB_NAME", "DB_USER", "DB_PASSWORD"] {
                    if get(key).is_none() {
                        missing.push(key);
                    }
                }
                if !missing.is_empty() {
                    return Err(Error::Config(format!(
                        "missing environment variables: {} (or set DATABASE_URL)",
                        missing.join(", ")
                    )));
                }
                format!(
                    "postgres://{}:{}@{}:{}/{}",
                    get("DB_USER").unwrap_or_default(),
                    get("DB_PASSWORD").unwrap_or_default(),
                    get("DB_HOST").unwrap_or_else(|| "localhost".to_string()),
                    parse_u64(get("DB_PORT")).unwrap_or(5432),
                    get("DB_NAME").unwrap_or_default(),
                )
            }
        };
        let db_max_connections = parse_u32(get("DB_MAX_CONNECTIONS")).unwrap_or(20).max(1);
        let db_min_connections = parse_u32(get("DB_MIN_CONNECTIONS"))
            .unwrap_or(2)
            .min(db_max_connections);
        let db_run_migrations = parse_bool(get("DB_RUN_MIGRATIONS")).unwrap_or(false);

        let media_group_timeout =
            Duration::from_millis(parse_u64(get("MEDIA_GROUP_TIMEOUT")).unwrap_or(1000));
        let draft_idle_timeout =
            Duration::from_secs(parse_u64(get("DRAFT_IDLE_TIMEOUT")).unwrap_or(30 * 60));
        let default_language = get("DEFAULT_LANGUAGE")
            .and_then(|s| Language::from_code(&s))
            .unwrap_or_default();

        let rate_limit_enabled = parse_bool(get("RATE_LIMIT_ENABLED")).unwrap_or(true);
        let rate_limit_requests = parse_u32(get("RATE_LIMIT_REQUESTS")).unwrap_or(30);
        let rate_limit_window =
            Duration::from_secs(parse_u64(get("RATE_LIMIT_WINDOW")).unwrap_or(60));

        Ok(Self {
            bot_token,
            channel,
            admin_channel,
            moderator_ids,
            database_url,
            db_max_connections,
            db_min_connections,
            db_run_migrations,
            media_group_timeout,
            draft_idle_timeout,
            default_language,
            postings_per_page: 3,
            search_results_per_page: 5,
            max_photos: 10,
            rate_limit_enabled,
            rate_limit_requests,
            rate_limit_window,
        })
    }

    pub fn is_moderator(&self, user_id: i64) -> bool {
        self.moderator_ids.contains(&user_id)
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}

fn parse_bool(v: Option<String>) -> Option<bool> {
    v.map(|s| {
        matches!(
            s.trim().to_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

fn parse_u64(v: Option<String>) -> Option<u64> {
    v.and_then(|s| s.trim().parse::<u64>().ok())
}

fn parse_u32(v: Option<String>) -> Option<u32> {
    v.and_then(|s| s.trim().parse::<u32>().ok())
}

/// Comma separated ids; non-numeric or non-positive entries are skipped with a warning.
fn parse_csv_i64(v: Option<String>) -> Vec<i64> {
    v.unwrap_or_default()
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .filter_map(|s| match s.parse::<i64>() {
            Ok(id) if id > 0 => Some(id),
            _ => {
                tracing::warn!(entry = s, "ignoring invalid ADMIN_IDS entry");
                None
            }
        })
        .collect()
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

/// `created` value written for rows that came from the preload list.
pub const PRELOAD_CREATED: i32 = i32::MAX;

/// `max_age` value written for rows that came from the preload list.
pub const PRELOAD_MAX_AGE: i32 = 0;

/// Only preload mode that produces a database row (compared case-insensitively).
pub const FORCE_HTTPS_MODE: &str = "force-https";

pub const DATABASE_HEADER: [&str; 3] = [
    "# HSTS 1.0 Known Hosts database for GNU Wget.",
    "# Edit at your own risk.",
    "# <hostname>\t<port>\t<incl. subdomains>\t<created>\t<max-age>",
];

pub const TEMP_FILE_PREFIX: &str = "wget-hsts-";

pub const DEFAULT_ACCEPT: &str = "application/json,*/*;q=0.9";

pub const CHROMIUM_PRELOAD_URL: &str =
    "https://github.com/chromium/chromium/raw/main/net/http/transport_security_state_static.json";

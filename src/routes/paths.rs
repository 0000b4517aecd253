//! Path constants for every view the client knows about.

pub const ROOT: &str = "/";
pub const LOGIN: &str = "/login";
pub const REGISTER: &str = "/register";
pub const RESET_PASSWORD: &str = "/reset-password";

pub const DASHBOARD: &str = "/dashboard";
pub const TABLES: &str = "/mesas";
pub const TABLE_LAYOUT: &str = "/configuracion-mesas";
pub const EVENTS: &str = "/eventos";
pub const STAFF: &str = "/personal";
pub const RESERVATIONS: &str = "/reservas";
pub const TICKETS: &str = "/entradas";
pub const PROMOTIONS: &str = "/promociones";
pub const SETTINGS: &str = "/configuracion";
pub const MY_VENUE: &str = "/mi-discoteca";
pub const VENUE_REGISTRATION: &str = "/registro-discoteca";
pub const FINANCES: &str = "/finanzas";
pub const REPORTS: &str = "/reportes";

/// Where authenticated users land when they open a guest-only view.
pub const DEFAULT_LANDING: &str = DASHBOARD;

/// Views reachable without a session; a `401` never redirects away from these.
pub const AUTH_ENTRY: [&str; 3] = [LOGIN, REGISTER, RESET_PASSWORD];

/// Strips query, fragment and trailing slashes so lookups compare bare paths.
#[must_use]
pub fn normalize(path: &str) -> &str {
    let path = path.trim();
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let trimmed = path[..end].trim_end_matches('/');
    if trimmed.is_empty() {
        ROOT
    } else {
        trimmed
    }
}

/// True when `path` is one of the auth entry views or nested below one.
#[must_use]
pub fn is_auth_entry(path: &str) -> bool {
    let path = normalize(path);
    AUTH_ENTRY.iter().any(|entry| {
        path == *entry
            || path
                .strip_prefix(entry)
                .is_some_and(|rest| rest.starts_with('/'))
    })
}

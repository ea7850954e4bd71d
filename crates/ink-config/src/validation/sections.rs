//! Validation for the `[server]` and `[sessions]` sections.

use crate::schema::InkConfig;

use super::helpers::{validate_one_of, validate_range};

pub(crate) fn validate_server(errors: &mut Vec<String>, config: &InkConfig) {
    if config.server.host.trim().is_empty() {
        errors.push("server.host must not be empty".into());
    }
    validate_range(errors, "server.port", config.server.port.into(), 1, 65535);
    validate_one_of(
        errors,
        "server.public_scheme",
        &config.server.public_scheme,
        &["http", "https"],
    );
    validate_range(
        errors,
        "server.max_payload_bytes",
        config.server.max_payload_bytes.into(),
        1024,
        64 * 1024 * 1024,
    );
}

pub(crate) fn validate_sessions(errors: &mut Vec<String>, config: &InkConfig) {
    validate_range(
        errors,
        "sessions.unattached_ttl_secs",
        config.sessions.unattached_ttl_secs,
        0,
        86400,
    );
    validate_range(
        errors,
        "sessions.reap_interval_secs",
        config.sessions.reap_interval_secs,
        1,
        3600,
    );
    validate_range(
        errors,
        "sessions.outbound_capacity",
        config.sessions.outbound_capacity.into(),
        1,
        4096,
    );
}

//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# ink-relay configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[server]
# host = "0.0.0.0"
port = 20230
# public_scheme = "http"          # http, https
# max_payload_bytes = 8388608     # 1024-67108864

[sessions]
# unattached_ttl_secs = 300       # 0 disables reaping, max 86400
# reap_interval_secs = 60         # 1-3600
# outbound_capacity = 256         # 1-4096

[logging]
# level = "INFO"                  # DEBUG, INFO, WARNING, ERROR
"##
    .to_string()
}

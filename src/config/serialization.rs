//! Config serialization to TOML
//!
//! Single source of truth for config file format.

use super::Config;
use crate::controls::Action;

/// Quote a string as a TOML basic string
fn quoted(s: &str) -> String {
    toml::Value::String(s.to_string()).to_string()
}

impl Config {
    /// Serialize `[controls]` (defaults shown commented out)
    pub(super) fn controls_to_toml(&self) -> String {
        let mut output = String::new();
        for action in Action::ALL {
            let bound = self
                .controls
                .symbols
                .iter()
                .find(|(a, _)| *a == action)
                .map(|(_, symbol)| symbol);
            match bound {
                Some(symbol) => {
                    output.push_str(&format!(
                        "{} = {}\n",
                        action,
                        quoted(&symbol.to_string())
                    ));
                }
                None => {
                    output.push_str(&format!(
                        "# {} = {}\n",
                        action,
                        quoted(&action.default_symbol().to_string())
                    ));
                }
            }
        }

        let names = |actions: &[Action]| -> String {
            let items: Vec<String> = actions.iter().map(|a| quoted(a.as_str())).collect();
            format!("[{}]", items.join(", "))
        };
        output.push_str(&format!("enable = {}\n", names(&self.controls.enable)));
        output.push_str(&format!("disable = {}\n", names(&self.controls.disable)));
        output
    }

    /// Serialize config to TOML string (single source of truth for format)
    pub fn to_toml(&self) -> String {
        let info_message = match &self.info.message {
            Some(message) => format!("message = {}\n", quoted(message)),
            None => "# message = \"...\"  # default lists the enabled controls\n".to_string(),
        };
        let jump_prompt = quoted(self.jump.prompt.as_deref().unwrap_or(""));

        format!(
            r#"# reaction-pager configuration

# Idle timeout: the session ends when no control is used for this long
timeout_secs = {timeout}

# Wrap around from the last page to the first (and back)
circular = {circular}

# Delete the paginated message when the session times out
delete_on_timeout = {delete_on_timeout}

# Clear all controls when the session stops or times out
clear_controls_on_end = {clear_controls}

# Remove the viewer's reaction after handling it (needs permission)
remove_reactions = {remove_reactions}

# Delay between attaching controls (reaction rate limits)
pacing_ms = {pacing}

# Logging configuration (RUST_LOG env var overrides)
[logging]
level = {log_level}
# JSON file logging (in addition to stderr)
file_enabled = {log_file_enabled}
file_dir = {log_file_dir}
file_rotation = "{log_file_rotation}"  # hourly, daily, never
file_prefix = {log_file_prefix}

# ─────────────────────────────────────────────────────────────────────────────
# CONTROLS
# ─────────────────────────────────────────────────────────────────────────────
# Symbols are unicode emoji or numeric custom-emoji ids.
# back and next are mandatory. front, rear, info and stop are off unless
# listed in `enable`; any control can be switched off with `disable`.
[controls]
{controls}
# Help notice shown by the info control
[info]
{info_message}expire_secs = {info_expire}

# Jump control: prompt for a page number and wait for a reply
# An empty prompt waits silently
[jump]
prompt = {jump_prompt}
timeout_secs = {jump_timeout}
delete_prompt = {jump_delete_prompt}
delete_reply = {jump_delete_reply}
"#,
            timeout = self.timeout_secs,
            circular = self.circular,
            delete_on_timeout = self.delete_on_timeout,
            clear_controls = self.clear_controls_on_end,
            remove_reactions = self.remove_reactions,
            pacing = self.pacing_ms,
            log_level = quoted(&self.logging.level),
            log_file_enabled = self.logging.file_enabled,
            log_file_dir = quoted(&self.logging.file_dir.display().to_string()),
            log_file_rotation = self.logging.file_rotation.as_str(),
            log_file_prefix = quoted(&self.logging.file_prefix),
            controls = self.controls_to_toml(),
            info_message = info_message,
            info_expire = self.info.expire_after.as_secs(),
            jump_prompt = jump_prompt,
            jump_timeout = self.jump.timeout.as_secs(),
            jump_delete_prompt = self.jump.delete_prompt,
            jump_delete_reply = self.jump.delete_reply,
        )
    }
}

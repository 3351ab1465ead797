//! Session option value objects
//!
//! Built once (defaults overlaid by config file and caller overrides) and
//! treated as immutable while a session runs.

use crate::error::ConfigurationError;
use crate::transport::{ChannelId, UserId};
use std::time::Duration;

/// Default idle timeout for a session
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Pause between successive control attachments (reaction rate limits)
pub const DEFAULT_PACING: Duration = Duration::from_millis(250);

/// Help notice shown by the info control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoOptions {
    /// Custom help text; `None` lists the enabled controls
    pub message: Option<String>,
    /// How long the notice stays before it is deleted
    pub expire_after: Duration,
}

impl Default for InfoOptions {
    fn default() -> Self {
        Self {
            message: None,
            expire_after: Duration::from_secs(30),
        }
    }
}

impl InfoOptions {
    fn validate(&self) -> Result<(), ConfigurationError> {
        if matches!(&self.message, Some(m) if m.trim().is_empty()) {
            return Err(ConfigurationError::InvalidInfo(
                "message must not be empty".to_string(),
            ));
        }
        if self.expire_after.is_zero() {
            return Err(ConfigurationError::InvalidInfo(
                "expire_after must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Prompt and wait behaviour of the jump control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JumpOptions {
    /// Prompt sent before waiting; `{current}`/`{total}` are substituted.
    /// `None` waits silently.
    pub prompt: Option<String>,
    /// How long to wait for the viewer's reply
    pub timeout: Duration,
    /// Delete the prompt once the wait is over
    pub delete_prompt: bool,
    /// Delete the viewer's reply when the transport allows it
    pub delete_reply: bool,
}

impl Default for JumpOptions {
    fn default() -> Self {
        Self {
            prompt: Some("Which page would you like to see? (1-{total})".to_string()),
            timeout: Duration::from_secs(30),
            delete_prompt: true,
            delete_reply: true,
        }
    }
}

impl JumpOptions {
    fn validate(&self) -> Result<(), ConfigurationError> {
        if matches!(&self.prompt, Some(p) if p.trim().is_empty()) {
            return Err(ConfigurationError::InvalidJump(
                "prompt must not be empty".to_string(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(ConfigurationError::InvalidJump(
                "timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Everything a session needs besides pages, template and controls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// The only user allowed to navigate
    pub viewer: Option<UserId>,
    /// Where the paginated message is sent
    pub channel: Option<ChannelId>,
    /// back/next wrap around at the ends
    pub circular: bool,
    /// 1-based page shown first
    pub starting_page: usize,
    /// Idle timeout, reset by every accepted control event
    pub timeout: Duration,
    /// Delete the message when the session times out
    pub delete_on_timeout: bool,
    /// Clear all reactions on stop or timeout (when the message is kept)
    pub clear_controls_on_end: bool,
    /// Remove handled reactions so a control can be used again
    pub remove_reactions: bool,
    /// Delay between attaching successive controls
    pub pacing: Duration,
    pub info: InfoOptions,
    pub jump: JumpOptions,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            viewer: None,
            channel: None,
            circular: false,
            starting_page: 1,
            timeout: DEFAULT_TIMEOUT,
            delete_on_timeout: false,
            clear_controls_on_end: true,
            remove_reactions: true,
            pacing: DEFAULT_PACING,
            info: InfoOptions::default(),
            jump: JumpOptions::default(),
        }
    }
}

impl SessionOptions {
    pub fn new(viewer: UserId, channel: ChannelId) -> Self {
        Self {
            viewer: Some(viewer),
            channel: Some(channel),
            ..Self::default()
        }
    }

    pub fn circular(mut self, circular: bool) -> Self {
        self.circular = circular;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn delete_on_timeout(mut self, delete: bool) -> Self {
        self.delete_on_timeout = delete;
        self
    }

    pub fn starting_page(mut self, page: usize) -> Self {
        self.starting_page = page;
        self
    }

    /// Check required identities and option sanity.
    ///
    /// `info`/`jump` options are only checked when those controls are on.
    pub(crate) fn validate(
        &self,
        info_enabled: bool,
        jump_enabled: bool,
    ) -> Result<(UserId, ChannelId), ConfigurationError> {
        let viewer = self
            .viewer
            .clone()
            .filter(|v| !v.as_str().is_empty())
            .ok_or(ConfigurationError::MissingViewer)?;
        let channel = self
            .channel
            .clone()
            .filter(|c| !c.as_str().is_empty())
            .ok_or(ConfigurationError::MissingChannel)?;
        if self.timeout.is_zero() {
            return Err(ConfigurationError::InvalidTimeout);
        }
        if info_enabled {
            self.info.validate()?;
        }
        if jump_enabled {
            self.jump.validate()?;
        }
        Ok((viewer, channel))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> SessionOptions {
        SessionOptions::new(UserId::new("v"), ChannelId::new("c"))
    }

    #[test]
    fn test_requires_viewer_and_channel() {
        let mut opts = options();
        opts.viewer = None;
        assert_eq!(
            opts.validate(false, false),
            Err(ConfigurationError::MissingViewer)
        );

        let mut opts = options();
        opts.channel = Some(ChannelId::new(""));
        assert_eq!(
            opts.validate(false, false),
            Err(ConfigurationError::MissingChannel)
        );
    }

    #[test]
    fn test_info_checked_only_when_enabled() {
        let mut opts = options();
        opts.info.expire_after = Duration::ZERO;
        assert!(opts.validate(false, true).is_ok());
        assert_eq!(opts.validate(true, true).unwrap_err().kind(), "invalid_info");
    }

    #[test]
    fn test_jump_prompt_must_not_be_blank() {
        let mut opts = options();
        opts.jump.prompt = Some("   ".to_string());
        assert_eq!(opts.validate(false, true).unwrap_err().kind(), "invalid_jump");

        opts.jump.prompt = None;
        assert!(opts.validate(false, true).is_ok());
    }
}

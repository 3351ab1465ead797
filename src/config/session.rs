//! Info and jump control settings
//!
//! These load straight into the session option value objects; the file
//! layer only exists to make every key optional.

use crate::session::{InfoOptions, JumpOptions};
use serde::Deserialize;
use std::time::Duration;

/// `[info]` as loaded from the config file
#[derive(Debug, Deserialize, Default)]
pub struct FileInfo {
    pub message: Option<String>,
    pub expire_secs: Option<u64>,
}

/// `[jump]` as loaded from the config file
#[derive(Debug, Deserialize, Default)]
pub struct FileJump {
    /// Empty string disables the prompt message
    pub prompt: Option<String>,
    pub timeout_secs: Option<u64>,
    pub delete_prompt: Option<bool>,
    pub delete_reply: Option<bool>,
}

pub fn info_from_file(file: Option<FileInfo>) -> InfoOptions {
    let file = file.unwrap_or_default();
    let defaults = InfoOptions::default();

    InfoOptions {
        message: file.message.or(defaults.message),
        expire_after: file
            .expire_secs
            .map(Duration::from_secs)
            .unwrap_or(defaults.expire_after),
    }
}

pub fn jump_from_file(file: Option<FileJump>) -> JumpOptions {
    let file = file.unwrap_or_default();
    let defaults = JumpOptions::default();

    let prompt = match file.prompt {
        Some(prompt) if prompt.is_empty() => None,
        Some(prompt) => Some(prompt),
        None => defaults.prompt,
    };

    JumpOptions {
        prompt,
        timeout: file
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout),
        delete_prompt: file.delete_prompt.unwrap_or(defaults.delete_prompt),
        delete_reply: file.delete_reply.unwrap_or(defaults.delete_reply),
    }
}

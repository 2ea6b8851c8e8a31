use std::{env, process::Command};

use log::debug;

use crate::config::ConfigError;

pub const PASSWORD_ENV: &str = "IMAPDUMP_PASSWORD";

/// Finds the account password: `password_cmd` first, then the
/// `IMAPDUMP_PASSWORD` environment variable, then an interactive prompt.
pub fn password(password_cmd: Option<&str>, user: &str) -> Result<String, ConfigError> {
    if let Some(password_cmd) = password_cmd {
        return run_password_cmd(password_cmd);
    }
    if let Ok(password) = env::var(PASSWORD_ENV) {
        debug!("using password from {PASSWORD_ENV}");
        return Ok(password);
    }
    rpassword::prompt_password(format!("Password for {user}: ")).map_err(ConfigError::Prompt)
}

fn run_password_cmd(password_cmd: &str) -> Result<String, ConfigError> {
    let failed = |reason: String| ConfigError::PasswordCommand {
        command: password_cmd.to_string(),
        reason,
    };
    let mut cmd_parts = password_cmd.split(' ').filter(|part| !part.is_empty());
    let program = cmd_parts
        .next()
        .ok_or_else(|| failed("no program given".to_string()))?;
    let mut cmd = Command::new(program);
    cmd.args(cmd_parts);
    debug!("running password_cmd {program}");
    let output = cmd.output().map_err(|e| failed(e.to_string()))?;

    if !output.status.success() {
        return Err(failed(format!("exited with {}", output.status)));
    }
    let password = String::from_utf8(output.stdout)
        .map_err(|_| failed("output is not utf-8".to_string()))?
        .trim_end()
        .to_string();
    if password.is_empty() {
        return Err(failed("printed no password".to_string()));
    }

    Ok(password)
}

use super::{Decision, DecisionProvider, DecisionRequest, ProviderError};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::Command;

/// Runs an external program once per decision. The request goes to its stdin
/// as a single JSON line; the first line it prints (`Fold`, `Call` or
/// `Raise N`) is the answer. The child is killed if the caller gives up.
#[derive(Debug, Clone)]
pub struct CommandProvider {
    name: String,
    program: String,
    args: Vec<String>,
}

impl CommandProvider {
    /// `argv[0]` is the program, the rest are its arguments.
    pub fn new(name: impl Into<String>, argv: &[String]) -> Result<Self, ProviderError> {
        let (program, args) =
            argv.split_first().ok_or_else(|| ProviderError::Spawn("empty command".into()))?;
        Ok(Self { name: name.into(), program: program.clone(), args: args.to_vec() })
    }
}

#[async_trait]
impl DecisionProvider for CommandProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn decide(&self, request: &DecisionRequest) -> Result<Decision, ProviderError> {
        let mut payload =
            serde_json::to_string(request).map_err(|e| ProviderError::Transport(e.to_string()))?;
        payload.push('\n');

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ProviderError::Spawn(format!("{}: {e}", self.program)))?;

        let transport = |e: std::io::Error| ProviderError::Transport(e.to_string());
        let mut stdin =
            child.stdin.take().ok_or_else(|| ProviderError::Transport("no stdin".into()))?;
        stdin.write_all(payload.as_bytes()).await.map_err(transport)?;
        drop(stdin);

        let stdout =
            child.stdout.take().ok_or_else(|| ProviderError::Transport("no stdout".into()))?;
        let mut lines = BufReader::new(stdout).lines();
        let line = lines
            .next_line()
            .await
            .map_err(transport)?
            .ok_or_else(|| ProviderError::Malformed(String::new()))?;
        tracing::debug!(provider = %self.name, reply = %line.trim(), "command provider replied");
        line.parse()
    }
}

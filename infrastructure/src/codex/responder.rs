//! External codex responder.
//!
//! Runs the codex CLI as a one-shot subprocess per persona generation
//! unit: builds an in-character instruction prompt, stages any image
//! attachment into a temp directory, invokes `codex exec`, and parses
//! the opinion out of the configured output protocol.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use panel_application::ports::responder::{
    ImageAttachment, OpinionRequest, OpinionResponder, ResponderError,
};
use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tracing::debug;

use super::protocol::{extract_summary, normalize_reply, scan_agent_message};

/// How the codex process hands back its final message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodexProtocol {
    /// NDJSON events on stdout; the opinion is the last agent message.
    #[default]
    Stream,
    /// Final message written to a designated file; the opinion is the
    /// `summary` field of the JSON object inside it.
    File,
}

/// Invocation settings for the codex subprocess.
#[derive(Debug, Clone)]
pub struct CodexConfig {
    /// Executable name or path.
    pub command: String,
    /// Model selector passed as `--model`.
    pub model: String,
    /// Sandbox mode passed as `--sandbox`.
    pub sandbox: String,
    /// Hard deadline for one invocation.
    pub timeout: Duration,
    pub protocol: CodexProtocol,
}

impl Default for CodexConfig {
    fn default() -> Self {
        Self {
            command: "codex".to_string(),
            model: "gpt-5.1".to_string(),
            sandbox: "danger-full-access".to_string(),
            timeout: Duration::from_secs(120),
            protocol: CodexProtocol::Stream,
        }
    }
}

/// [`OpinionResponder`] backed by one `codex exec` subprocess per request.
pub struct CodexResponder {
    config: CodexConfig,
}

impl CodexResponder {
    pub fn new(config: CodexConfig) -> Self {
        Self { config }
    }

    /// Runs one invocation and returns the normalized reply text.
    async fn run(
        &self,
        prompt: &str,
        image: Option<&ImageAttachment>,
    ) -> Result<String, ResponderError> {
        // Holds the staged image and, in file protocol, the last-message
        // file for the lifetime of the invocation.
        let workdir =
            tempfile::tempdir().map_err(|e| ResponderError::Spawn(format!("temp dir: {e}")))?;

        let mut cmd = Command::new(&self.config.command);
        cmd.arg("exec")
            .arg("--model")
            .arg(&self.config.model)
            .arg("--sandbox")
            .arg(&self.config.sandbox)
            .arg("--color")
            .arg("never")
            .arg("--skip-git-repo-check");

        let last_message = match self.config.protocol {
            CodexProtocol::Stream => {
                cmd.arg("--json");
                None
            }
            CodexProtocol::File => {
                let path = workdir.path().join("last-message.json");
                cmd.arg("--output-last-message").arg(&path);
                Some(path)
            }
        };

        if let Some(image) = image {
            let path = stage_image(workdir.path(), image)?;
            cmd.arg("--image").arg(path);
        }

        cmd.arg("--").arg(prompt);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!(
            "Invoking {} exec ({} prompt bytes)",
            self.config.command,
            prompt.len()
        );

        let child = cmd
            .spawn()
            .map_err(|e| ResponderError::Spawn(format!("{}: {e}", self.config.command)))?;

        let output = tokio::time::timeout(self.config.timeout, child.wait_with_output())
            .await
            .map_err(|_| ResponderError::TimedOut)?
            .map_err(|e| ResponderError::Failed(format!("wait: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = stderr.trim();
            let detail = if detail.is_empty() {
                format!("exit status {}", output.status)
            } else {
                detail.to_string()
            };
            return Err(ResponderError::Failed(detail));
        }

        let reply = match &last_message {
            None => {
                let stdout = String::from_utf8_lossy(&output.stdout);
                scan_agent_message(&stdout).ok_or_else(|| {
                    ResponderError::MalformedOutput("no agent message in stream".to_string())
                })?
            }
            Some(path) => {
                let content = tokio::fs::read_to_string(path).await.map_err(|e| {
                    ResponderError::MalformedOutput(format!("last-message file: {e}"))
                })?;
                extract_summary(&content).ok_or_else(|| {
                    ResponderError::MalformedOutput(
                        "no summary object in last-message file".to_string(),
                    )
                })?
            }
        };

        let reply = normalize_reply(&reply);
        if reply.is_empty() {
            return Err(ResponderError::MalformedOutput("empty reply".to_string()));
        }
        Ok(reply)
    }
}

#[async_trait]
impl OpinionResponder for CodexResponder {
    async fn respond(&self, request: &OpinionRequest) -> Result<String, ResponderError> {
        debug!(
            "Requesting codex opinion for persona {}",
            request.persona.name
        );
        let prompt = build_prompt(request);
        self.run(&prompt, request.image.as_ref()).await
    }

    fn name(&self) -> &str {
        &self.config.command
    }
}

/// Builds the in-character instruction prompt for one persona.
///
/// The combined stimulus already carries guidance, ops context, and
/// template lines, so the prompt only adds the persona framing and the
/// reply constraints. Replies are scored lexically against the anchors,
/// hence the push toward one or two flat sentences without ratings or
/// markup.
fn build_prompt(request: &OpinionRequest) -> String {
    let persona = &request.persona;
    let profile = persona
        .notes
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or("(no details)");
    [
        "You are answering a game operations survey in character as the persona below.",
        &format!("Persona: {} ({})", persona.name, persona.demographic()),
        &format!("Profile: {profile}"),
        "",
        "Proposal under evaluation:",
        &request.stimulus,
        "",
        "Reply with your honest reaction in one or two short sentences, staying in character.",
        "Plain text only: no numbers, no ratings, no lists, no markdown.",
    ]
    .join("\n")
}

/// Decodes the base64 payload into the invocation work dir.
///
/// The staged file keeps the attachment's extension so codex sniffs the
/// right format; unnamed or extension-less attachments fall back to
/// `.png`.
fn stage_image(dir: &Path, image: &ImageAttachment) -> Result<PathBuf, ResponderError> {
    let bytes = BASE64
        .decode(image.data_b64.trim())
        .map_err(|e| ResponderError::Failed(format!("image payload: {e}")))?;
    let suffix = Path::new(&image.name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_else(|| ".png".to_string());
    let path = dir.join(format!("input{suffix}"));
    std::fs::write(&path, bytes)
        .map_err(|e| ResponderError::Failed(format!("image file: {e}")))?;
    Ok(path)
}


#[cfg(all(test, unix))]
mod subprocess_tests {
    use super::*;
    use panel_domain::{OpsContext, Persona, PersonaId};
    use std::os::unix::fs::PermissionsExt;

    /// Writes an executable shell script standing in for the codex CLI.
    fn fake_codex(dir: &Path, body: &str) -> String {
        let path = dir.join("fake-codex");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write script");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("chmod script");
        path.to_string_lossy().into_owned()
    }

    fn config(command: String) -> CodexConfig {
        CodexConfig {
            command,
            ..CodexConfig::default()
        }
    }

    fn request() -> OpinionRequest {
        OpinionRequest {
            persona: Persona::new(PersonaId::new(1), "Casual A", 19, "Female"),
            lens: "Retention intent".to_string(),
            stimulus: "Double drop weekend".to_string(),
            guidance: None,
            template_text: None,
            ops_context: OpsContext::default(),
            run_seed: None,
            image: None,
        }
    }

    #[tokio::test]
    async fn stream_protocol_returns_the_agent_message() {
        let dir = tempfile::tempdir().expect("tempdir");
        let command = fake_codex(
            dir.path(),
            concat!(
                "echo '{\"type\":\"session.created\"}'\n",
                "echo '{\"type\":\"item.completed\",\"item\":",
                "{\"type\":\"agent_message\",\"text\":\"Worth a login streak.\"}}'",
            ),
        );
        let responder = CodexResponder::new(config(command));
        let reply = responder.respond(&request()).await.expect("reply");
        assert_eq!(reply, "Worth a login streak.");
    }

    #[tokio::test]
    async fn file_protocol_reads_the_summary_field() {
        let dir = tempfile::tempdir().expect("tempdir");
        let command = fake_codex(
            dir.path(),
            concat!(
                "out=\"\"\n",
                "prev=\"\"\n",
                "for a in \"$@\"; do\n",
                "  if [ \"$prev\" = \"--output-last-message\" ]; then out=\"$a\"; fi\n",
                "  prev=\"$a\"\n",
                "done\n",
                "printf '%s' '{\"summary\": \"Fine by me.\"}' > \"$out\"",
            ),
        );
        let mut config = config(command);
        config.protocol = CodexProtocol::File;
        let responder = CodexResponder::new(config);
        let reply = responder.respond(&request()).await.expect("reply");
        assert_eq!(reply, "Fine by me.");
    }

    #[tokio::test]
    async fn flags_and_prompt_reach_the_command_line() {
        let dir = tempfile::tempdir().expect("tempdir");
        let args_file = dir.path().join("args.txt");
        let command = fake_codex(
            dir.path(),
            &format!(
                concat!(
                    "printf '%s\\n' \"$@\" > {}\n",
                    "echo '{{\"type\":\"item.completed\",\"item\":",
                    "{{\"type\":\"agent_message\",\"text\":\"ok\"}}}}'",
                ),
                args_file.display()
            ),
        );
        let responder = CodexResponder::new(config(command));
        responder.respond(&request()).await.expect("reply");

        let args = std::fs::read_to_string(&args_file).expect("args file");
        assert!(args.starts_with("exec\n"));
        assert!(args.contains("--model\ngpt-5.1"));
        assert!(args.contains("--sandbox\ndanger-full-access"));
        assert!(args.contains("--color\nnever"));
        assert!(args.contains("--skip-git-repo-check"));
        assert!(args.contains("--json"));
        assert!(args.contains("\n--\n"));
        assert!(args.contains("Persona: Casual A (19/Female)"));
        assert!(args.contains("Double drop weekend"));
    }

    #[tokio::test]
    async fn image_attachment_is_staged_for_the_process() {
        let dir = tempfile::tempdir().expect("tempdir");
        let copied = dir.path().join("staged.bin");
        let command = fake_codex(
            dir.path(),
            &format!(
                concat!(
                    "prev=\"\"\n",
                    "for a in \"$@\"; do\n",
                    "  if [ \"$prev\" = \"--image\" ]; then cp \"$a\" {}; fi\n",
                    "  prev=\"$a\"\n",
                    "done\n",
                    "echo '{{\"type\":\"item.completed\",\"item\":",
                    "{{\"type\":\"agent_message\",\"text\":\"ok\"}}}}'",
                ),
                copied.display()
            ),
        );
        let responder = CodexResponder::new(config(command));
        let mut req = request();
        req.image = Some(ImageAttachment {
            name: "banner.jpg".to_string(),
            data_b64: BASE64.encode(b"jpeg-bytes"),
        });
        responder.respond(&req).await.expect("reply");

        let staged = std::fs::read(&copied).expect("copied image");
        assert_eq!(staged, b"jpeg-bytes");
    }

    #[tokio::test]
    async fn nonzero_exit_surfaces_stderr() {
        let dir = tempfile::tempdir().expect("tempdir");
        let command = fake_codex(dir.path(), "echo 'quota exhausted' >&2\nexit 3");
        let responder = CodexResponder::new(config(command));
        let err = responder.respond(&request()).await.expect_err("failure");
        match err {
            ResponderError::Failed(detail) => assert!(detail.contains("quota exhausted")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_agent_message_is_malformed_output() {
        let dir = tempfile::tempdir().expect("tempdir");
        let command = fake_codex(
            dir.path(),
            "echo '{\"type\":\"item.completed\",\"item\":{\"type\":\"reasoning\",\"text\":\"hmm\"}}'",
        );
        let responder = CodexResponder::new(config(command));
        let err = responder.respond(&request()).await.expect_err("failure");
        assert!(matches!(err, ResponderError::MalformedOutput(_)));
    }

    #[tokio::test]
    async fn slow_process_times_out() {
        let dir = tempfile::tempdir().expect("tempdir");
        let command = fake_codex(dir.path(), "sleep 5");
        let mut config = config(command);
        config.timeout = Duration::from_millis(100);
        let responder = CodexResponder::new(config);
        let err = responder.respond(&request()).await.expect_err("failure");
        assert!(matches!(err, ResponderError::TimedOut));
    }

    #[tokio::test]
    async fn missing_binary_is_a_spawn_error() {
        let responder =
            CodexResponder::new(config("/nonexistent/codex-missing-binary".to_string()));
        let err = responder.respond(&request()).await.expect_err("failure");
        assert!(matches!(err, ResponderError::Spawn(_)));
    }
}

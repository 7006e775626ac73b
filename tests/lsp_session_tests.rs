//! Language server over stdio: diagnostics, quick fix and close
use std::io::{BufRead, BufReader, Read, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::{Duration, Instant};

use serde_json::{Value, json};

const SERVER_TIMEOUT: Duration = Duration::from_secs(10);
const URI: &str = "file:///tmp/snippet.py";

/// Minimal LSP client around a spawned `snippet-checker lsp`
struct Session {
    child: Child,
    stdin: ChildStdin,
    messages: Receiver<Value>,
}

impl Session {
    fn start() -> Self {
        let mut child = Command::new(env!("CARGO_BIN_EXE_snippet-checker"))
            .arg("lsp")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .env_remove("OPENAI_API_KEY")
            .spawn()
            .expect("Failed to spawn language server");

        let stdin = child.stdin.take().expect("Child stdin should be available");
        let stdout = child.stdout.take().expect("Child stdout should be available");

        let (tx, messages) = mpsc::channel();
        thread::spawn(move || {
            let mut reader = BufReader::new(stdout);
            while let Some(message) = read_message(&mut reader) {
                if tx.send(message).is_err() {
                    break;
                }
            }
        });

        Self {
            child,
            stdin,
            messages,
        }
    }

    fn send(&mut self, mut message: Value) {
        // JSON-RPC 2.0: `params` must be structured or omitted, never null
        if message.get("params") == Some(&Value::Null) {
            message.as_object_mut().unwrap().remove("params");
        }
        let body = message.to_string();
        write!(self.stdin, "Content-Length: {}\r\n\r\n{}", body.len(), body)
            .expect("Failed to write message");
        self.stdin.flush().expect("Failed to flush stdin");
    }

    fn notify(&mut self, method: &str, params: Value) {
        self.send(json!({"jsonrpc": "2.0", "method": method, "params": params}));
    }

    fn request(&mut self, id: i64, method: &str, params: Value) -> Value {
        self.send(json!({"jsonrpc": "2.0", "id": id, "method": method, "params": params}));
        let response = self.wait_for(|m| m.get("id") == Some(&json!(id)) && m.get("method").is_none());
        assert!(response.get("error").is_none(), "{method} failed: {response}");
        response["result"].clone()
    }

    /// Next `publishDiagnostics` payload for `uri`
    fn diagnostics(&mut self, uri: &str) -> Vec<Value> {
        let message = self.wait_for(|m| {
            m["method"] == "textDocument/publishDiagnostics" && m["params"]["uri"] == uri
        });
        message["params"]["diagnostics"]
            .as_array()
            .expect("diagnostics array")
            .clone()
    }

    fn wait_for(&mut self, matches: impl Fn(&Value) -> bool) -> Value {
        let deadline = Instant::now() + SERVER_TIMEOUT;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let message = self
                .messages
                .recv_timeout(remaining)
                .expect("Timeout waiting for server message");
            if matches(&message) {
                return message;
            }
        }
    }

    fn shutdown(mut self) {
        self.request(99, "shutdown", Value::Null);
        self.notify("exit", Value::Null);
        drop(self.stdin);

        let deadline = Instant::now() + SERVER_TIMEOUT;
        while Instant::now() < deadline {
            if let Ok(Some(_)) = self.child.try_wait() {
                return;
            }
            thread::sleep(Duration::from_millis(20));
        }
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

fn read_message(reader: &mut BufReader<std::process::ChildStdout>) -> Option<Value> {
    let mut content_length = None;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).ok()? == 0 {
            return None;
        }
        if line.trim().is_empty() {
            break;
        }
        if let Some(length) = line.strip_prefix("Content-Length:") {
            content_length = length.trim().parse::<usize>().ok();
        }
    }

    let mut body = vec![0u8; content_length?];
    reader.read_exact(&mut body).ok()?;
    serde_json::from_slice(&body).ok()
}

fn initialize(session: &mut Session) -> Value {
    let result = session.request(
        1,
        "initialize",
        json!({
            "processId": null,
            "rootUri": null,
            "capabilities": {
                "textDocument": {
                    "codeAction": { "dynamicRegistration": false },
                    "publishDiagnostics": { "relatedInformation": false }
                }
            },
            "clientInfo": { "name": "test-client", "version": "1.0" }
        }),
    );
    session.notify("initialized", json!({}));
    result
}

fn code_action(session: &mut Session, id: i64) -> Value {
    session.request(
        id,
        "textDocument/codeAction",
        json!({
            "textDocument": {"uri": URI},
            "range": {"start": {"line": 0, "character": 0}, "end": {"line": 0, "character": 0}},
            "context": {"diagnostics": []}
        }),
    )
}

#[test]
fn test_initialize_advertises_quickfix() {
    let mut session = Session::start();
    let result = initialize(&mut session);

    let kinds = result
        .pointer("/capabilities/codeActionProvider/codeActionKinds")
        .and_then(|v| v.as_array())
        .expect("Should advertise code action kinds");
    assert!(kinds.iter().any(|k| k == "quickfix"));
    // Full document sync
    assert_eq!(result.pointer("/capabilities/textDocumentSync"), Some(&json!(1)));
    assert_eq!(
        result.pointer("/serverInfo/name").and_then(|v| v.as_str()),
        Some("snippet-checker")
    );

    session.shutdown();
}

#[test]
fn test_document_lifecycle() {
    let mut session = Session::start();
    initialize(&mut session);

    session.notify(
        "textDocument/didOpen",
        json!({
            "textDocument": {
                "uri": URI,
                "languageId": "python",
                "version": 1,
                "text": "if x:\n    pritn(x);"
            }
        }),
    );

    let diagnostics = session.diagnostics(URI);
    assert_eq!(diagnostics.len(), 2);
    for diagnostic in &diagnostics {
        assert_eq!(diagnostic["range"]["start"]["line"], 1);
        assert_eq!(diagnostic["range"]["end"]["character"], 13);
        assert_eq!(diagnostic["source"], "snippet-checker");
    }
    // Error, then warning
    assert_eq!(diagnostics[0]["severity"], 1);
    assert_eq!(diagnostics[1]["severity"], 2);

    let actions = code_action(&mut session, 2);
    let action = &actions[0];
    assert_eq!(action["title"], "Apply suggested corrections");
    assert_eq!(action["kind"], "quickfix");
    let edit = &action["edit"]["changes"][URI][0];
    assert_eq!(edit["newText"], "if x:\n    print(x);");
    assert_eq!(edit["range"]["end"], json!({"line": 1, "character": 13}));

    session.notify(
        "textDocument/didChange",
        json!({
            "textDocument": {"uri": URI, "version": 2},
            "contentChanges": [{"text": "def f(x)\n    return x"}]
        }),
    );

    let diagnostics = session.diagnostics(URI);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0]["range"]["start"]["line"], 0);
    assert_eq!(diagnostics[0]["message"], "Function definition missing colon ':'");

    // Nothing to rewrite in the new text
    assert_eq!(code_action(&mut session, 3), Value::Null);

    session.notify("textDocument/didClose", json!({"textDocument": {"uri": URI}}));
    assert!(session.diagnostics(URI).is_empty());

    session.shutdown();
}

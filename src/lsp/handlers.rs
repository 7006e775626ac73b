use std::collections::HashMap;

use tower_lsp::jsonrpc::Result as LspResult;
use tower_lsp::lsp_types::*;

use crate::lsp::backend::Backend;
use crate::validation::{self, Severity};

/// Trait for handling diagnostics
#[tower_lsp::async_trait]
pub trait HandleDiagnostics {
    async fn publish_diagnostics(&self, uri: Url);
}

/// Trait for handling code actions
#[tower_lsp::async_trait]
pub trait HandleCodeAction {
    async fn handle_code_action(
        &self,
        params: CodeActionParams,
    ) -> LspResult<Option<CodeActionResponse>>;
}

#[tower_lsp::async_trait]
impl HandleDiagnostics for Backend {
    /// Validate a document and publish its diagnostics
    async fn publish_diagnostics(&self, uri: Url) {
        let (content, language_id) = {
            let docs = self.documents.lock().await;
            match docs.get(&uri) {
                Some(state) => (state.content.clone(), state.language_id.clone()),
                None => return,
            }
        };

        // Validation may reach the enrichment backend; never hold the lock across it
        let result = self.validator.validate(&content, &language_id).await;
        let diagnostics = result
            .errors
            .iter()
            .map(|diagnostic| create_lsp_diagnostic(diagnostic, &content))
            .collect();

        {
            let mut docs = self.documents.lock().await;
            let stored = docs
                .get_mut(&uri)
                .is_some_and(|state| state.store_result(&content, result));
            if !stored {
                log::debug!("Discarding stale diagnostics for {}", uri);
                return;
            }
        }

        self.client
            .publish_diagnostics(uri, diagnostics, None)
            .await;
    }
}

#[tower_lsp::async_trait]
impl HandleCodeAction for Backend {
    async fn handle_code_action(
        &self,
        params: CodeActionParams,
    ) -> LspResult<Option<CodeActionResponse>> {
        let uri = params.text_document.uri;

        let docs = self.documents.lock().await;
        let Some(doc_state) = docs.get(&uri) else {
            return Ok(None);
        };
        let Some(corrected) = doc_state.pending_correction() else {
            return Ok(None);
        };

        let edit = TextEdit::new(full_range(&doc_state.content), corrected.to_string());
        let action = CodeAction {
            title: "Apply suggested corrections".to_string(),
            kind: Some(CodeActionKind::QUICKFIX),
            diagnostics: Some(params.context.diagnostics),
            edit: Some(WorkspaceEdit::new(HashMap::from([(uri.clone(), vec![edit])]))),
            ..Default::default()
        };

        Ok(Some(vec![CodeActionOrCommand::CodeAction(action)]))
    }
}

/// Convert a validation diagnostic to an LSP diagnostic spanning its whole line
pub fn create_lsp_diagnostic(
    diagnostic: &validation::Diagnostic,
    content: &str,
) -> tower_lsp::lsp_types::Diagnostic {
    let severity = match diagnostic.severity {
        Severity::Error => DiagnosticSeverity::ERROR,
        Severity::Warning => DiagnosticSeverity::WARNING,
    };

    let line = diagnostic.line.saturating_sub(1);
    let line_len = content
        .lines()
        .nth(line)
        .map(|text| text.encode_utf16().count())
        .unwrap_or(0);

    tower_lsp::lsp_types::Diagnostic::new(
        Range::new(
            Position::new(line as u32, 0),
            Position::new(line as u32, line_len as u32),
        ),
        Some(severity),
        None,
        Some("snippet-checker".to_string()),
        diagnostic.message.clone(),
        None,
        None,
    )
}

/// Range covering the whole document
pub fn full_range(content: &str) -> Range {
    let mut line = 0u32;
    let mut character = 0u32;
    for c in content.chars() {
        if c == '\n' {
            line += 1;
            character = 0;
        } else {
            character += c.len_utf16() as u32;
        }
    }
    Range::new(Position::new(0, 0), Position::new(line, character))
}

//! # Table augmenter
//!
//! When the final answer defers to a table it does not include ("veja a
//! tabela", "see the table", ...), fetch the rows behind the referenced
//! query and append them as a rendered block. Never fetches without a
//! marker. Any failure leaves the answer unchanged.

use std::sync::Arc;

use cortex_core::{CombinedResponse, QueryId};
use cortex_settings::AugmenterSettings;
use cortex_sql::QueryEngine;
use tracing::{debug, instrument};

use crate::context::ConversationContext;
use crate::render::render_block;

/// Appends deferred tables to final answers.
pub struct TableAugmenter {
    executor: Arc<dyn QueryEngine>,
    settings: AugmenterSettings,
    markers: Vec<String>,
}

impl std::fmt::Debug for TableAugmenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableAugmenter")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl TableAugmenter {
    /// Augmenter fetching through `executor`.
    pub fn new(executor: Arc<dyn QueryEngine>, settings: AugmenterSettings) -> Self {
        let markers = settings.markers.iter().map(|m| m.to_lowercase()).collect();
        Self {
            executor,
            settings,
            markers,
        }
    }

    /// The marker that `text` contains, if any.
    pub fn matching_marker(&self, text: &str) -> Option<&str> {
        let lowered = text.to_lowercase();
        self.markers
            .iter()
            .find(|marker| !marker.is_empty() && lowered.contains(marker.as_str()))
            .map(String::as_str)
    }

    /// Append the referenced table to `response.text` when it defers to one.
    ///
    /// The query id is the first collected in `response`, falling back to
    /// `context.last_query_id`.
    #[instrument(skip_all, fields(iterations = response.iterations_performed))]
    pub async fn augment(
        &self,
        mut response: CombinedResponse,
        context: &ConversationContext,
    ) -> CombinedResponse {
        if !self.settings.enabled {
            return response;
        }
        let Some(marker) = self.matching_marker(&response.text) else {
            return response;
        };
        let Some(query_id) = resolve_query_id(&response, context) else {
            debug!(marker, "table marker found but no query id available");
            return response;
        };

        let Some(result) = self.executor.fetch(&query_id, self.settings.max_rows).await else {
            debug!(marker, query_id = %query_id, "table fetch failed, answer left unaugmented");
            return response;
        };
        let Some(block) = render_block(&result, &self.settings) else {
            debug!(query_id = %query_id, "fetched result is empty, nothing to append");
            return response;
        };

        debug!(
            marker,
            query_id = %query_id,
            rows = result.rows.len(),
            total_rows = result.total_rows,
            "appending table to answer"
        );
        response.text.push_str(&block);
        response
    }
}

fn resolve_query_id(response: &CombinedResponse, context: &ConversationContext) -> Option<QueryId> {
    response
        .query_ids
        .first()
        .or(context.last_query_id.as_ref())
        .cloned()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

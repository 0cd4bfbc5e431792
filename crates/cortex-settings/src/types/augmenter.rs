//! Table augmentation settings.

use serde::{Deserialize, Serialize};

/// Phrases that signal the agent deferred to a table it did not include.
pub const DEFAULT_TABLE_MARKERS: [&str; 6] = [
    "see the table",
    "tabela relacionada",
    "dados da tabela",
    "consulte a tabela",
    "veja a tabela",
    "table with the related data",
];

/// Table augmentation of final answers.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AugmenterSettings {
    /// Whether augmentation runs at all.
    pub enabled: bool,
    /// Marker phrases, matched case-insensitively.
    pub markers: Vec<String>,
    /// Maximum rows rendered.
    pub max_rows: usize,
    /// Maximum characters per column.
    pub max_column_width: usize,
    /// Label of the appended block.
    pub block_label: String,
    /// Footnote shown when rows were cut; `{shown}` and `{total}` are substituted.
    pub footnote: String,
}

impl Default for AugmenterSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            markers: DEFAULT_TABLE_MARKERS.iter().map(ToString::to_string).collect(),
            max_rows: 50,
            max_column_width: 30,
            block_label: "Dados da Consulta".to_string(),
            footnote: "(Mostrando {shown} de {total} linhas)".to_string(),
        }
    }
}

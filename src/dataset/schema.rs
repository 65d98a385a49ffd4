use serde::Serialize;

pub const DEFAULT_SHEET_NAME: &str = "Bet";

/// Known column layouts for the engagement spreadsheet export.
#[derive(PartialEq, Eq, Clone, Copy, Debug, clap::ValueEnum)]
pub enum SchemaPreset {
    /// English headers: date, id, action, network, topic, link, vote_count.
    En,
    /// The original pt-BR export: Semana, ID, Ação, Rede, Assunto, Postagem, Votos.
    PtBr,
}

impl Default for SchemaPreset {
    fn default() -> Self {
        Self::PtBr
    }
}

impl std::fmt::Display for SchemaPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaPreset::En => write!(f, "en"),
            SchemaPreset::PtBr => write!(f, "pt-br"),
        }
    }
}

/// Column names of the source table, plus the action label that marks a comment.
///
/// Every stage that touches the source layout takes this explicitly, so no
/// column name is hardcoded outside of the presets below.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ColumnSchema {
    /// Worksheet holding the table when the source is a workbook.
    pub sheet_name: String,
    pub date: String,
    pub id: String,
    pub action: String,
    pub network: String,
    pub topic: String,
    pub link: String,
    pub vote_count: String,
    pub comment_action: String,
}

impl ColumnSchema {
    pub fn from_preset(preset: SchemaPreset) -> Self {
        match preset {
            SchemaPreset::En => ColumnSchema {
                sheet_name: DEFAULT_SHEET_NAME.to_owned(),
                date: "date".to_owned(),
                id: "id".to_owned(),
                action: "action".to_owned(),
                network: "network".to_owned(),
                topic: "topic".to_owned(),
                link: "link".to_owned(),
                vote_count: "vote_count".to_owned(),
                comment_action: "Comment".to_owned(),
            },
            SchemaPreset::PtBr => ColumnSchema {
                sheet_name: DEFAULT_SHEET_NAME.to_owned(),
                date: "Semana".to_owned(),
                id: "ID".to_owned(),
                action: "Ação".to_owned(),
                network: "Rede".to_owned(),
                topic: "Assunto".to_owned(),
                link: "Postagem".to_owned(),
                vote_count: "Votos".to_owned(),
                comment_action: "Comentário".to_owned(),
            },
        }
    }
}

impl Default for ColumnSchema {
    fn default() -> Self {
        Self::from_preset(SchemaPreset::default())
    }
}

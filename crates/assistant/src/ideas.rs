//! The module contains the furniture ideas the assistant suggests, and the
//! prompts that produce them. Prompts are in Portuguese on purpose: the
//! workshop's catalog and reports are Portuguese too.

use engine::{Part, Project, ProjectItem, Quantity};
use serde::Deserialize;

use crate::error::AssistantError;

/// A suggested material line, plus where the model intends to use it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SuggestedItem {
    pub item: ProjectItem,
    pub usage: String,
}

/// A furniture project suggested by the model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Idea {
    pub title: String,
    pub summary: String,
    pub description: String,
    pub items: Vec<SuggestedItem>,
}

impl Idea {
    /// The suggested lines as plain project items, ready for pricing.
    pub fn lines(&self) -> impl Iterator<Item = &ProjectItem> {
        self.items.iter().map(|suggested| &suggested.item)
    }

    /// Turns the idea into a saveable project. Quantities go through the
    /// same clamping as hand-written ones.
    pub fn into_project(self) -> Project {
        let items = self
            .items
            .into_iter()
            .map(|suggested| suggested.item)
            .collect();
        Project::new(self.title, self.description, items)
    }
}

/// Builds the idea-generation prompt from the selected parts.
pub fn ideas_prompt(parts: &[&Part]) -> String {
    let parts_list = parts
        .iter()
        .map(|part| format!("ID: {} - {} ({})", part.id, part.name, part.category))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Aja como um mestre marceneiro e designer de interiores de luxo. \
         Com base nestas peças disponíveis: {parts_list}, sugira 3 projetos de móveis sofisticados.\n\
         \n\
         Para cada projeto, você deve:\n\
         1. Criar um título atraente.\n\
         2. Fazer um resumo curto para o card.\n\
         3. Escrever uma DESCRIÇÃO DETALHADA do produto final para o cliente.\n\
         4. Estimar a QUANTIDADE e explicar exatamente ONDE cada material será usado (campo 'usage').\n\
         \n\
         Responda APENAS em JSON puro com este formato:\n\
         [\n\
           {{\n\
             \"title\": \"Nome do Projeto\",\n\
             \"summary\": \"Resumo comercial curto\",\n\
             \"description\": \"Descrição detalhada do móvel, estilo e proposta de valor.\",\n\
             \"suggestedItems\": [\n\
               {{\"partId\": \"ID_DA_PECA\", \"quantity\": 2.5, \"usage\": \"Explicação de onde este material é usado no móvel\"}}\n\
             ]\n\
           }}\n\
         ]"
    )
}

/// Builds the photo prompt for one idea, with the selected parts as the
/// materials palette.
pub fn image_prompt(idea: &Idea, palette: &[&Part]) -> String {
    let materials = palette
        .iter()
        .map(|part| part.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Professional high-end architectural photo of: {title}. \
         Detailed Product Description: {description}. \
         Materials palette: {materials}. \
         Style: Modern luxury, clean lines, impeccable finish, studio lighting, \
         8k, realistic wood and metal textures.",
        title = idea.title,
        description = idea.description,
    )
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawIdea {
    #[serde(default)]
    title: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    suggested_items: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawItem {
    #[serde(default)]
    part_id: String,
    #[serde(default)]
    quantity: Option<f64>,
    #[serde(default)]
    usage: String,
}

/// Parses the model's JSON reply into ideas.
///
/// The reply as a whole must be a JSON array; inside it, entries are taken
/// on a best-effort basis, each parsed on its own. Ideas without a title
/// and lines without a part reference or without a usable quantity
/// (missing, null, wrong-typed, non-finite) are dropped rather than
/// failing the batch.
pub fn parse_ideas(raw: &str) -> Result<Vec<Idea>, AssistantError> {
    let entries: Vec<serde_json::Value> =
        serde_json::from_str(raw).map_err(|err| AssistantError::MalformedReply(err.to_string()))?;

    let ideas = entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value::<RawIdea>(entry).ok())
        .filter(|idea| !idea.title.is_empty())
        .map(|idea| Idea {
            title: idea.title,
            summary: idea.summary,
            description: idea.description,
            items: idea
                .suggested_items
                .into_iter()
                .filter_map(|value| {
                    let item = serde_json::from_value::<RawItem>(value).ok()?;
                    if item.part_id.is_empty() {
                        return None;
                    }
                    let quantity = Quantity::try_from_f64(item.quantity?).ok()?;
                    Some(SuggestedItem {
                        item: ProjectItem::new(item.part_id, quantity),
                        usage: item.usage,
                    })
                })
                .collect(),
        })
        .collect();

    Ok(ideas)
}

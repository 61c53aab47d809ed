//! Pure projection of [`ViewState`] into what the page shows.

use crate::cypher::{highlight, CypherToken};
use crate::examples::EXAMPLE_QUERIES;
use crate::model::{NodeTypeSummary, ResultRow, SchemaInfo};
use crate::state::ViewState;

pub const TITLE: &str = "Movie Database Query";
pub const SUBTITLE: &str = "Ask questions about movies, actors, and directors in natural language";
pub const INPUT_PLACEHOLDER: &str = "Ask a question about movies, actors, or directors...";
pub const SUBMIT_LABEL: &str = "Search";
pub const NO_RESULTS_TEXT: &str = "No results found";
pub const LOAD_SCHEMA_LABEL: &str = "Load Schema Info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputView<'a> {
    pub text: &'a str,
    pub placeholder: &'static str,
    pub disabled: bool,
}

impl InputView<'_> {
    #[must_use]
    pub fn shows_placeholder(&self) -> bool {
        self.text.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitContent {
    Label(&'static str),
    LoadingIndicator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitView {
    pub content: SubmitContent,
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowsView {
    Json(String),
    Empty(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultPanels<'a> {
    pub cypher: Vec<CypherToken<'a>>,
    pub rows: RowsView,
    pub explanation: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeTypeLine<'a> {
    pub name: &'a str,
    pub count: u64,
    pub properties: String,
}

impl NodeTypeLine<'_> {
    #[must_use]
    pub fn heading(&self) -> String {
        format!("{} ({} nodes)", self.name, self.count)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipLine<'a> {
    pub name: &'a str,
    pub description: &'a str,
}

impl RelationshipLine<'_> {
    #[must_use]
    pub fn text(&self) -> String {
        format!("{}: {}", self.name, self.description)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaListing<'a> {
    pub nodes: Vec<NodeTypeLine<'a>>,
    pub relationships: Vec<RelationshipLine<'a>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaCard<'a> {
    pub trigger_label: &'static str,
    pub listing: Option<SchemaListing<'a>>,
    pub error: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView<'a> {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub input: InputView<'a>,
    pub submit: SubmitView,
    pub error: Option<&'a str>,
    pub results: Option<ResultPanels<'a>>,
    pub examples: &'static [&'static str],
    pub schema: SchemaCard<'a>,
}

#[must_use]
pub fn project(state: &ViewState) -> PageView<'_> {
    let loading = state.is_loading();

    PageView {
        title: TITLE,
        subtitle: SUBTITLE,
        input: InputView {
            text: state.query_text(),
            placeholder: INPUT_PLACEHOLDER,
            disabled: loading,
        },
        submit: SubmitView {
            content: if loading {
                SubmitContent::LoadingIndicator
            } else {
                SubmitContent::Label(SUBMIT_LABEL)
            },
            disabled: !state.can_submit(),
        },
        error: state.error(),
        results: state.result().map(|result| ResultPanels {
            cypher: highlight(&result.cypher_query),
            rows: rows_view(&result.results),
            explanation: result
                .explanation
                .as_deref()
                .filter(|explanation| !explanation.is_empty()),
        }),
        examples: &EXAMPLE_QUERIES,
        schema: SchemaCard {
            trigger_label: LOAD_SCHEMA_LABEL,
            listing: state.schema().map(schema_listing),
            error: state.schema_error(),
        },
    }
}

#[must_use]
pub fn rows_view(rows: &[ResultRow]) -> RowsView {
    if rows.is_empty() {
        return RowsView::Empty(NO_RESULTS_TEXT);
    }
    RowsView::Json(serde_json::to_string_pretty(rows).unwrap_or_default())
}

#[must_use]
pub fn schema_listing(schema: &SchemaInfo) -> SchemaListing<'_> {
    SchemaListing {
        nodes: schema
            .nodes
            .iter()
            .map(|(name, summary)| node_line(name, summary))
            .collect(),
        relationships: schema
            .relationships
            .iter()
            .map(|(name, description)| RelationshipLine {
                name,
                description: description.as_str(),
            })
            .collect(),
    }
}

fn node_line<'a>(name: &'a str, summary: &NodeTypeSummary) -> NodeTypeLine<'a> {
    NodeTypeLine {
        name,
        count: summary.count,
        properties: format!("Properties: {}", summary.properties.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{project, RowsView, SubmitContent, INPUT_PLACEHOLDER, NO_RESULTS_TEXT};
    use crate::api::ApiError;
    use crate::cypher::TokenKind;
    use crate::examples::EXAMPLE_QUERIES;
    use crate::model::{QueryResult, SchemaInfo};
    use crate::state::{update, Msg, QueryEdit, SchemaFailurePolicy, ViewState};

    fn state_with_text(text: &str) -> ViewState {
        let mut state = ViewState::default();
        update(&mut state, Msg::Edit(QueryEdit::Replace(text.to_string())));
        state
    }

    fn completed(text: &str, outcome: Result<QueryResult, ApiError>) -> ViewState {
        let mut state = state_with_text(text);
        update(&mut state, Msg::Submit);
        update(&mut state, Msg::SubmitCompleted(outcome));
        state
    }

    #[test]
    fn idle_page_has_form_examples_and_schema_trigger_only() {
        let state = ViewState::default();
        let page = project(&state);

        assert_eq!(page.title, "Movie Database Query");
        assert!(page.input.shows_placeholder());
        assert_eq!(page.input.placeholder, INPUT_PLACEHOLDER);
        assert!(!page.input.disabled);
        assert_eq!(page.submit.content, SubmitContent::Label("Search"));
        assert!(page.submit.disabled);
        assert!(page.error.is_none());
        assert!(page.results.is_none());
        assert_eq!(page.examples, &EXAMPLE_QUERIES);
        assert_eq!(page.schema.trigger_label, "Load Schema Info");
        assert!(page.schema.listing.is_none());
    }

    #[test]
    fn loading_disables_input_and_swaps_label_for_indicator() {
        let mut state = state_with_text("Who directed Gladiator?");
        assert!(!project(&state).submit.disabled);

        update(&mut state, Msg::Submit);
        let page = project(&state);

        assert!(page.input.disabled);
        assert!(page.submit.disabled);
        assert_eq!(page.submit.content, SubmitContent::LoadingIndicator);
        assert!(page.results.is_none());
        assert!(page.error.is_none());
    }

    #[test]
    fn gladiator_scenario_renders_all_three_panels() {
        let result: QueryResult = serde_json::from_value(json!({
            "cypher_query": "MATCH (m:Movie {title:'Gladiator'})-[:DIRECTED_BY]->(d:Director) RETURN d",
            "results": [{"d.name": "Ridley Scott"}],
            "explanation": "Finds the director of Gladiator"
        }))
        .expect("fixture should decode");
        let state = completed("Who directed Gladiator?", Ok(result));
        let page = project(&state);

        let panels = page.results.expect("result panels should render");
        let cypher: String = panels.cypher.iter().map(|token| token.text).collect();
        assert_eq!(
            cypher,
            "MATCH (m:Movie {title:'Gladiator'})-[:DIRECTED_BY]->(d:Director) RETURN d"
        );
        assert!(panels
            .cypher
            .iter()
            .any(|token| token.kind == TokenKind::Keyword && token.text == "MATCH"));
        assert_eq!(
            panels.rows,
            RowsView::Json("[\n  {\n    \"d.name\": \"Ridley Scott\"\n  }\n]".to_string())
        );
        assert_eq!(panels.explanation, Some("Finds the director of Gladiator"));
        assert!(page.error.is_none());
        assert!(!page.input.disabled);
    }

    #[test]
    fn empty_rows_show_placeholder_and_blank_explanation_is_hidden() {
        let result = QueryResult::new("MATCH (m:Movie) RETURN m LIMIT 0", Vec::new())
            .with_explanation("");
        let state = completed("nothing", Ok(result));
        let panels = project(&state).results.expect("result panels should render");

        assert_eq!(panels.rows, RowsView::Empty(NO_RESULTS_TEXT));
        assert!(panels.explanation.is_none());
    }

    #[test]
    fn failure_scenario_renders_error_without_panels() {
        let state = completed(
            "Who directed Gladiator?",
            Err(ApiError::Status {
                status: 500,
                server_message: Some("Graph database unavailable".to_string()),
            }),
        );
        let page = project(&state);

        assert_eq!(page.error, Some("Graph database unavailable"));
        assert!(page.results.is_none());
    }

    #[test]
    fn schema_scenario_renders_node_and_relationship_lines() {
        let schema: SchemaInfo = serde_json::from_value(json!({
            "nodes": {"Movie": {"count": 500, "properties": ["title", "year"]}},
            "relationships": {"ACTED_IN": "Actor played a role in a Movie"}
        }))
        .expect("schema fixture should decode");
        let mut state = ViewState::default();
        update(&mut state, Msg::SchemaLoaded(Ok(schema)));

        let listing = project(&state)
            .schema
            .listing
            .expect("schema listing should render");
        assert_eq!(listing.nodes.len(), 1);
        assert_eq!(listing.nodes[0].heading(), "Movie (500 nodes)");
        assert_eq!(listing.nodes[0].properties, "Properties: title, year");
        assert_eq!(
            listing.relationships[0].text(),
            "ACTED_IN: Actor played a role in a Movie"
        );
    }

    #[test]
    fn surfaced_schema_error_appears_in_schema_card() {
        let mut state = ViewState::new(SchemaFailurePolicy::Surface);
        update(
            &mut state,
            Msg::SchemaLoaded(Err(ApiError::transport("connection refused"))),
        );

        let page = project(&state);
        assert_eq!(
            page.schema.error,
            Some("Failed to load schema: request failed: connection refused")
        );
        assert!(page.error.is_none());
    }
}

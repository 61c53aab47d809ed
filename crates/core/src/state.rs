//! Session view state and the reducer that drives it.
//!
//! All state changes go through [`update`]. A message either changes the state
//! synchronously or, for the two backend calls, also returns an [`Effect`]
//! that the caller must execute with [`Effect::run`] and feed back as the
//! matching completion message.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::api::{ApiError, GraphQueryApi};
use crate::examples::example_query;
use crate::model::{QueryResult, SchemaInfo};

/// What a failed schema fetch does to visible state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SchemaFailurePolicy {
    /// Log only; nothing on screen changes.
    #[default]
    Silent,
    /// Log and show the failure inside the schema card.
    Surface,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryEdit {
    Insert(char),
    Backspace,
    Clear,
    Replace(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    Edit(QueryEdit),
    SelectExample(usize),
    Submit,
    SubmitCompleted(Result<QueryResult, ApiError>),
    LoadSchema,
    SchemaLoaded(Result<SchemaInfo, ApiError>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SubmitQuery(String),
    FetchSchema,
}

impl Effect {
    pub async fn run(self, api: &dyn GraphQueryApi) -> Msg {
        match self {
            Self::SubmitQuery(query) => Msg::SubmitCompleted(api.submit_query(&query).await),
            Self::FetchSchema => Msg::SchemaLoaded(api.fetch_schema().await),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewState {
    query_text: String,
    result: Option<QueryResult>,
    error: Option<String>,
    loading: bool,
    schema: Option<SchemaInfo>,
    schema_error: Option<String>,
    schema_policy: SchemaFailurePolicy,
}

impl ViewState {
    #[must_use]
    pub fn new(schema_policy: SchemaFailurePolicy) -> Self {
        Self {
            schema_policy,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn query_text(&self) -> &str {
        &self.query_text
    }

    #[must_use]
    pub fn trimmed_query(&self) -> &str {
        self.query_text.trim()
    }

    #[must_use]
    pub fn result(&self) -> Option<&QueryResult> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn schema(&self) -> Option<&SchemaInfo> {
        self.schema.as_ref()
    }

    #[must_use]
    pub fn schema_error(&self) -> Option<&str> {
        self.schema_error.as_deref()
    }

    #[must_use]
    pub fn schema_policy(&self) -> SchemaFailurePolicy {
        self.schema_policy
    }

    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.loading && !self.trimmed_query().is_empty()
    }
}

pub fn update(state: &mut ViewState, msg: Msg) -> Option<Effect> {
    match msg {
        Msg::Edit(edit) => {
            if !state.loading {
                apply_edit(&mut state.query_text, edit);
            }
            None
        }
        Msg::SelectExample(index) => {
            if let Some(example) = example_query(index) {
                state.query_text = example.to_string();
            }
            None
        }
        Msg::Submit => begin_submit(state),
        Msg::SubmitCompleted(outcome) => {
            finish_submit(state, outcome);
            None
        }
        Msg::LoadSchema => Some(Effect::FetchSchema),
        Msg::SchemaLoaded(Ok(schema)) => {
            state.schema = Some(schema);
            state.schema_error = None;
            None
        }
        Msg::SchemaLoaded(Err(error)) => {
            warn!(%error, "failed to load schema");
            if state.schema_policy == SchemaFailurePolicy::Surface {
                state.schema_error = Some(format!("Failed to load schema: {error}"));
            }
            None
        }
    }
}

fn apply_edit(text: &mut String, edit: QueryEdit) {
    match edit {
        QueryEdit::Insert(ch) => text.push(ch),
        QueryEdit::Backspace => {
            text.pop();
        }
        QueryEdit::Clear => text.clear(),
        QueryEdit::Replace(replacement) => *text = replacement,
    }
}

fn begin_submit(state: &mut ViewState) -> Option<Effect> {
    if !state.can_submit() {
        return None;
    }

    let query = state.trimmed_query().to_string();
    let previous = std::mem::take(state);
    *state = ViewState {
        loading: true,
        result: None,
        error: None,
        ..previous
    };
    debug!(query = %query, "submitting query");
    Some(Effect::SubmitQuery(query))
}

fn finish_submit(state: &mut ViewState, outcome: Result<QueryResult, ApiError>) {
    if !state.loading {
        debug!("ignoring query completion with no submit in flight");
        return;
    }

    let previous = std::mem::take(state);
    *state = match outcome {
        Ok(result) => {
            debug!(rows = result.results.len(), "query succeeded");
            ViewState {
                loading: false,
                result: Some(result),
                error: None,
                ..previous
            }
        }
        Err(error) => {
            debug!(%error, "query failed");
            ViewState {
                loading: false,
                result: None,
                error: Some(error.user_message()),
                ..previous
            }
        }
    };
}

//! Query Rendering
//!
//! Turns a [`QueryDescriptor`] into the GraphQL request sent to an Arweave
//! gateway, and into the pretty-printed text shown to users for copying.
//!
//! Filter values are always bound as variables, never spliced into the
//! document text. Output is deterministic: the same descriptor renders to
//! byte-identical text.

use serde::{Deserialize, Serialize};
use std::fmt::Write;

use super::ast::{Predicate, QueryDescriptor, Tag};
use super::error::{QueryError, QueryResult};

/// Tag filter in the gateway schema (`TagFilter`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagFilter {
    pub name: String,
    pub values: Vec<String>,
}

impl From<&Tag> for TagFilter {
    fn from(tag: &Tag) -> Self {
        Self {
            name: tag.name.clone(),
            values: vec![tag.value.clone()],
        }
    }
}

/// Variables bound by the rendered document
///
/// Field order here is the serialized key order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryVariables {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owners: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipients: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<TagFilter>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<u32>,
}

impl QueryVariables {
    pub fn is_empty(&self) -> bool {
        self.ids.is_none()
            && self.owners.is_none()
            && self.recipients.is_none()
            && self.tags.is_none()
            && self.first.is_none()
    }

    /// `(variable name, GraphQL type)` pairs for the bound variables
    fn declarations(&self) -> Vec<(&'static str, &'static str)> {
        let mut decls = Vec::new();
        if self.ids.is_some() {
            decls.push(("ids", "[ID!]"));
        }
        if self.owners.is_some() {
            decls.push(("owners", "[String!]"));
        }
        if self.recipients.is_some() {
            decls.push(("recipients", "[String!]"));
        }
        if self.tags.is_some() {
            decls.push(("tags", "[TagFilter!]"));
        }
        if self.first.is_some() {
            decls.push(("first", "Int"));
        }
        decls
    }
}

/// A GraphQL request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphqlRequest {
    pub query: String,
    #[serde(default, skip_serializing_if = "QueryVariables::is_empty")]
    pub variables: QueryVariables,
}

impl QueryDescriptor {
    /// Variables carrying the descriptor's predicates
    pub fn variables(&self) -> QueryVariables {
        let mut vars = QueryVariables::default();

        for predicate in &self.predicates {
            match predicate {
                Predicate::Id(id) => vars.ids = Some(vec![id.clone()]),
                Predicate::Owner(owner) => vars.owners = Some(vec![owner.clone()]),
                Predicate::Recipient(r) => vars.recipients = Some(vec![r.clone()]),
                Predicate::Tags(tags) => {
                    vars.tags = Some(tags.iter().map(TagFilter::from).collect())
                }
                Predicate::Limit(n) => vars.first = Some(*n),
            }
        }

        vars
    }

    /// Render the GraphQL document
    pub fn to_graphql(&self) -> String {
        let vars = self.variables();
        let decls = vars.declarations();
        let mut out = String::new();

        if decls.is_empty() {
            out.push_str("query Transactions {\n");
        } else {
            let params: Vec<String> = decls
                .iter()
                .map(|(name, ty)| format!("${}: {}", name, ty))
                .collect();
            let _ = writeln!(out, "query Transactions({}) {{", params.join(", "));
        }

        let mut args: Vec<String> = decls
            .iter()
            .map(|(name, _)| format!("{}: ${}", name, name))
            .collect();
        args.push(format!("sort: {}", self.sort.as_str()));
        let _ = writeln!(out, "  transactions({}) {{", args.join(", "));

        out.push_str("    pageInfo {\n      hasNextPage\n    }\n");
        out.push_str("    edges {\n      cursor\n      node {\n        id\n");

        for field in &self.fields {
            let subs = field.sub_fields();
            if subs.is_empty() {
                let _ = writeln!(out, "        {}", field.as_str());
            } else {
                let _ = writeln!(out, "        {} {{", field.as_str());
                for sub in subs {
                    let _ = writeln!(out, "          {}", sub);
                }
                out.push_str("        }\n");
            }
        }

        out.push_str("      }\n    }\n  }\n}\n");
        out
    }

    /// Request body for the gateway
    pub fn to_request(&self) -> GraphqlRequest {
        GraphqlRequest {
            query: self.to_graphql(),
            variables: self.variables(),
        }
    }

    /// Two-space indented JSON of the request, for display and copying
    pub fn to_pretty_json(&self) -> QueryResult<String> {
        serde_json::to_string_pretty(&self.to_request())
            .map_err(|e| QueryError::Serialization(e.to_string()))
    }
}

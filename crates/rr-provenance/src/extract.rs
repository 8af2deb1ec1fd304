// extract.rs — Total extraction of wrroc_* fields from a manifest document.
//
// Extraction is enrichment, never a correctness gate: a malformed manifest
// yields an empty map and a warning, and every individual field is optional.
// Absent fields are omitted outright so the wire payload never carries null
// placeholders.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::model::Manifest;

/// Flat field-name → scalar mapping destined for the notification payload.
///
/// A sorted map, so payload serialization is deterministic.
pub type ExtractedMetadata = BTreeMap<String, Value>;

/// Canonical self-reference id of the root dataset entity.
const ROOT_DATASET_ID: &str = "./";

/// `@type` tag marking the execution event entity.
const RUN_ACTION_TYPE: &str = "CreateAction";

/// Name prefix distinguishing the workflow-run action from other
/// CreateAction entities in the graph.
const RUN_ACTION_NAME_PREFIX: &str = "Nextflow workflow run";

/// Extract provenance metadata from a raw manifest document.
///
/// Total: never fails. `main_script` names the workflow-file entity to look
/// for (the pipeline's main script filename).
pub fn extract(raw: &str, main_script: &str) -> ExtractedMetadata {
    let manifest = match Manifest::parse(raw) {
        Ok(manifest) => manifest,
        Err(e) => {
            tracing::warn!("failed to parse provenance manifest: {e}");
            return ExtractedMetadata::new();
        }
    };

    let mut fields = ExtractedMetadata::new();

    if let Some(root) = manifest.get(ROOT_DATASET_ID) {
        copy_attr(&mut fields, "wrroc_name", root.attr("name"));
        copy_attr(&mut fields, "wrroc_date_published", root.attr("datePublished"));
        copy_attr(&mut fields, "wrroc_license", root.attr("license"));

        if let Some(author_id) = root.reference("author") {
            if let Some(author) = manifest.get(author_id) {
                copy_attr(&mut fields, "wrroc_author_name", author.attr("name"));
                fields.insert(
                    "wrroc_author_orcid".to_string(),
                    Value::String(author_id.to_string()),
                );
            }
        }
    }

    let run_action = manifest.entities().find(|e| {
        e.has_type(RUN_ACTION_TYPE)
            && e.attr_str("name")
                .is_some_and(|n| n.starts_with(RUN_ACTION_NAME_PREFIX))
    });
    if let Some(run) = run_action {
        fields.insert(
            "wrroc_run_id".to_string(),
            Value::String(run.id.trim_start_matches('#').to_string()),
        );
        copy_attr(&mut fields, "wrroc_start_time", run.attr("startTime"));
        copy_attr(&mut fields, "wrroc_end_time", run.attr("endTime"));
    }

    if let Some(workflow) = manifest.get(main_script) {
        copy_attr(
            &mut fields,
            "wrroc_runtime_platform",
            workflow.attr("runtimePlatform"),
        );
        if let Some(lang) = workflow.reference("programmingLanguage") {
            fields.insert(
                "wrroc_programming_language".to_string(),
                Value::String(lang.to_string()),
            );
        }
    }

    tracing::info!(
        "extracted {} metadata fields from provenance manifest",
        fields.len()
    );
    fields
}

fn copy_attr(fields: &mut ExtractedMetadata, key: &str, value: Option<&Value>) {
    if let Some(value) = value {
        if !value.is_null() {
            fields.insert(key.to_string(), value.clone());
        }
    }
}

// Plan normalization: typed resources, address parsing, reference extraction

use regex::Regex;
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};

use crate::engines::ingest::plan_loader::resource_changes;
use crate::engines::shared::error_model::{PreApplyError, Result};
use crate::engines::shared::models::{NormalizedPlan, NormalizedResource, ResourceAction};

/// Turns a validated raw plan into a NormalizedPlan.
///
/// Dependencies are merged from three sources: the entry's declared
/// `change.depends_on`, expression references in the configuration subtree,
/// and a fallback scan for interpolation strings in before/after values.
/// References that do not resolve to an address in the plan are discarded.
pub struct Normalizer {
    address_pattern: Regex,
    interpolation_pattern: Regex,
}

impl Normalizer {
    pub fn new() -> Self {
        Self {
            address_pattern: Regex::new(
                r"^(?:module\.[A-Za-z0-9_-]+\.)*[a-z][a-z0-9_]*\.[A-Za-z0-9_-]+",
            )
            .expect("address pattern is valid"),
            interpolation_pattern: Regex::new(r"\$\{([^}]+)\}")
                .expect("interpolation pattern is valid"),
        }
    }

    pub fn normalize(&self, plan: &Value) -> Result<NormalizedPlan> {
        let entries = resource_changes(plan);

        let mut parsed = Vec::with_capacity(entries.len());
        let mut addresses = BTreeSet::new();
        for entry in entries {
            let record = parse_entry(entry)?;
            addresses.insert(record.address.clone());
            parsed.push(record);
        }

        let config_refs = walk_configuration(plan);

        let mut normalized = NormalizedPlan::new();
        for record in parsed {
            let mut depends_on = BTreeSet::new();

            // Source 1: declared depends_on, already full addresses
            for declared in &record.declared_deps {
                if addresses.contains(declared) && declared != &record.address {
                    depends_on.insert(declared.clone());
                }
            }

            // Source 2: configuration expression references
            if let Some(refs) = config_refs.get(&record.address) {
                for raw in refs {
                    if let Some(target) =
                        self.resolve_reference(raw, &record.module, &addresses, &record.address)
                    {
                        depends_on.insert(target);
                    }
                }
            }

            // Source 3: fallback scan of before/after strings
            for value in [&record.before, &record.after].into_iter().flatten() {
                self.scan_for_references(
                    value,
                    &record.module,
                    &addresses,
                    &record.address,
                    &mut depends_on,
                );
            }

            normalized.push(NormalizedResource {
                id: record.id,
                module: record.module,
                resource_type: record.resource_type,
                address: record.address,
                action: record.action,
                depends_on,
                before: record.before,
                after: record.after,
            })?;
        }

        tracing::debug!(resources = normalized.len(), "normalized plan");
        Ok(normalized)
    }

    /// Resolve a raw reference string against the plan's address set.
    ///
    /// Leading `var.`/`local.`/`each.`/`count.` tokens are stripped (after
    /// which non-resource references no longer match the address pattern);
    /// a leading `data.` token is stripped for pattern matching but retried
    /// with the prefix intact, since data resources keep it in their plan
    /// address. Module-local references are retried with the declaring
    /// resource's module prefix.
    fn resolve_reference(
        &self,
        raw: &str,
        module: &str,
        addresses: &BTreeSet<String>,
        own_address: &str,
    ) -> Option<String> {
        let mut stripped = raw;
        for prefix in ["var.", "local.", "each.", "count."] {
            if let Some(rest) = stripped.strip_prefix(prefix) {
                stripped = rest;
                break;
            }
        }
        let had_data_prefix = stripped.starts_with("data.");
        let bare = stripped.strip_prefix("data.").unwrap_or(stripped);

        let matched = self.address_pattern.find(bare)?.as_str();

        let mut candidates = vec![matched.to_string()];
        if had_data_prefix {
            candidates.push(format!("data.{}", matched));
        }
        if !module.is_empty() {
            candidates.push(format!("{}.{}", module, matched));
            if had_data_prefix {
                candidates.push(format!("{}.data.{}", module, matched));
            }
        }

        candidates
            .into_iter()
            .find(|c| c != own_address && addresses.contains(c))
    }

    /// Scan a JSON value for `${...}` interpolations and bare addresses
    fn scan_for_references(
        &self,
        value: &Value,
        module: &str,
        addresses: &BTreeSet<String>,
        own_address: &str,
        out: &mut BTreeSet<String>,
    ) {
        match value {
            Value::String(s) => {
                for capture in self.interpolation_pattern.captures_iter(s) {
                    if let Some(target) =
                        self.resolve_reference(&capture[1], module, addresses, own_address)
                    {
                        out.insert(target);
                    }
                }
                // Bare `<type>.<id>` strings only count when they appear in
                // the plan's address set verbatim
                if s != own_address
                    && addresses.contains(s.as_str())
                    && self.address_pattern.is_match(s)
                {
                    out.insert(s.clone());
                }
            }
            Value::Array(items) => {
                for item in items {
                    self.scan_for_references(item, module, addresses, own_address, out);
                }
            }
            Value::Object(map) => {
                for item in map.values() {
                    self.scan_for_references(item, module, addresses, own_address, out);
                }
            }
            _ => {}
        }
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

struct ParsedEntry {
    address: String,
    module: String,
    resource_type: String,
    id: String,
    action: ResourceAction,
    declared_deps: Vec<String>,
    before: Option<Value>,
    after: Option<Value>,
}

fn parse_entry(entry: &Value) -> Result<ParsedEntry> {
    let address = entry
        .get("address")
        .and_then(Value::as_str)
        .ok_or_else(|| PreApplyError::plan_structure("resource change entry has no 'address'"))?;

    let declared_type = entry
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            PreApplyError::plan_structure(format!("resource '{}' has no 'type'", address))
        })?;

    let change = entry.get("change");
    let verbs: Vec<String> = change
        .and_then(|c| c.get("actions"))
        .and_then(Value::as_array)
        .map(|actions| {
            actions
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let declared_deps: Vec<String> = change
        .and_then(|c| c.get("depends_on"))
        .and_then(Value::as_array)
        .map(|deps| {
            deps.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let before = change.and_then(|c| c.get("before")).filter(|v| !v.is_null()).cloned();
    let after = change.and_then(|c| c.get("after")).filter(|v| !v.is_null()).cloned();

    let (module, id) = parse_address(address, declared_type)?;

    Ok(ParsedEntry {
        address: address.to_string(),
        module,
        resource_type: declared_type.to_string(),
        id,
        action: ResourceAction::from_verbs(&verbs),
        declared_deps,
        before,
        after,
    })
}

/// Split a Terraform address into its module path and local id.
///
/// The address is split on unquoted dots; a leading run of `module.<name>`
/// pairs composes the module path, an optional `data` token is skipped, and
/// the remainder past the type token is the id (bracketed index suffixes
/// survive verbatim because brackets guard their dots).
fn parse_address(address: &str, resource_type: &str) -> Result<(String, String)> {
    let tokens = split_unquoted_dots(address);
    let mut i = 0;
    let mut module_parts: Vec<&str> = Vec::new();

    while i + 1 < tokens.len() && tokens[i] == "module" {
        module_parts.push("module");
        module_parts.push(&tokens[i + 1]);
        i += 2;
    }

    if i < tokens.len() && tokens[i] == "data" && tokens.len() - i >= 3 {
        i += 1;
    }

    if tokens.len() - i < 2 {
        return Err(PreApplyError::plan_structure(format!(
            "malformed resource address '{}'",
            address
        )));
    }

    // The type token should agree with the declared type; the declared type
    // is authoritative either way
    let _ = resource_type;
    let id = tokens[i + 1..].join(".");

    Ok((module_parts.join("."), id))
}

/// Split on dots outside brackets and quotes
fn split_unquoted_dots(address: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut bracket_depth = 0usize;
    let mut in_quote = false;

    for c in address.chars() {
        match c {
            '"' => {
                in_quote = !in_quote;
                current.push(c);
            }
            '[' if !in_quote => {
                bracket_depth += 1;
                current.push(c);
            }
            ']' if !in_quote => {
                bracket_depth = bracket_depth.saturating_sub(1);
                current.push(c);
            }
            '.' if bracket_depth == 0 && !in_quote => {
                tokens.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    tokens.push(current);
    tokens
}

/// Collect expression references per fully-qualified resource address from
/// the configuration subtree, descending into nested module calls
fn walk_configuration(plan: &Value) -> HashMap<String, Vec<String>> {
    let mut map = HashMap::new();
    if let Some(root) = plan
        .get("configuration")
        .and_then(|c| c.get("root_module"))
    {
        walk_config_module(root, "", &mut map);
    }
    map
}

fn walk_config_module(module: &Value, prefix: &str, map: &mut HashMap<String, Vec<String>>) {
    if let Some(resources) = module.get("resources").and_then(Value::as_array) {
        for entry in resources {
            let Some(address) = entry.get("address").and_then(Value::as_str) else {
                continue;
            };
            let full = if prefix.is_empty() {
                address.to_string()
            } else {
                format!("{}.{}", prefix, address)
            };
            let mut refs = Vec::new();
            if let Some(expressions) = entry.get("expressions") {
                collect_references(expressions, &mut refs);
            }
            if !refs.is_empty() {
                map.entry(full).or_insert_with(Vec::new).extend(refs);
            }
        }
    }

    if let Some(calls) = module.get("module_calls").and_then(Value::as_object) {
        for (name, call) in calls {
            let child_prefix = if prefix.is_empty() {
                format!("module.{}", name)
            } else {
                format!("{}.module.{}", prefix, name)
            };
            if let Some(child) = call.get("module") {
                walk_config_module(child, &child_prefix, map);
            }
        }
    }
}

/// Recursively gather every `references` array under an expressions value
fn collect_references(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, v) in map {
                if key == "references" {
                    if let Value::Array(items) = v {
                        for item in items {
                            if let Some(s) = item.as_str() {
                                out.push(s.to_string());
                            }
                        }
                        continue;
                    }
                }
                collect_references(v, out);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_references(item, out);
            }
        }
        _ => {}
    }
}

use super::PageInput;
use super::keys::*;
use super::patterns::{self, count, ratio};
use super::record::{MetricValue, MetricsRecord};
use serde_json::Value;
use std::collections::BTreeSet;

pub fn html_js(page: &PageInput<'_>) -> MetricsRecord {
    let html = page.html;
    let html_chars = page.char_len();
    let js_chars: usize = patterns::captures(&patterns::SCRIPT_BLOCK, html)
        .iter()
        .map(|body| body.chars().count())
        .sum();
    let script_tags = count(&patterns::SCRIPT_OPEN, html);
    let all_tags = count(&patterns::ANY_TAG, html);

    let mut record = MetricsRecord::new();
    record.set(
        HTML_JS_BYTE_RATIO,
        ratio(html_chars as f64, (html_chars + js_chars) as f64, 1.0),
    );
    record.set(
        SCRIPT_TAG_DENSITY,
        ratio(script_tags as f64, all_tags as f64, 0.0),
    );
    record.set(
        EXTERNAL_JS_COUNT,
        MetricValue::count(count(&patterns::EXTERNAL_SCRIPT, html)),
    );
    record.set(INLINE_JS_SIZE, MetricValue::count(js_chars));
    record
}

fn collect_type(item: &Value, types: &mut BTreeSet<String>) {
    match item.get("@type") {
        Some(Value::String(t)) => {
            types.insert(t.clone());
        }
        Some(Value::Array(list)) => {
            types.extend(list.iter().filter_map(Value::as_str).map(String::from));
        }
        _ => {}
    }
}

/// `@type` values declared across JSON-LD blocks. Blocks that fail to parse are skipped.
pub fn schema_types<'a>(blocks: impl IntoIterator<Item = &'a str>) -> BTreeSet<String> {
    let mut types = BTreeSet::new();
    for block in blocks {
        let data: Value = match serde_json::from_str(block.trim()) {
            Ok(data) => data,
            Err(e) => {
                log::debug!("Skipping malformed JSON-LD block: {}", e);
                continue;
            }
        };
        match &data {
            Value::Array(items) => {
                for item in items.iter().filter(|i| i.is_object()) {
                    collect_type(item, &mut types);
                }
            }
            Value::Object(_) => collect_type(&data, &mut types),
            _ => {}
        }
    }
    types
}

pub fn schema(page: &PageInput<'_>) -> MetricsRecord {
    let blocks = patterns::captures(&patterns::JSON_LD_BLOCK, page.html);
    let types = schema_types(blocks.iter().copied());

    let mut record = MetricsRecord::new();
    record.set(SCHEMA_BLOCKS_COUNT, MetricValue::count(blocks.len()));
    record.set(JSONLD_BLOCKS_COUNT, MetricValue::count(blocks.len()));
    record.set(SCHEMA_TYPE_COUNT, MetricValue::count(types.len()));
    record.set(SCHEMA_TYPES, types.into_iter().collect::<Vec<_>>());
    record
}

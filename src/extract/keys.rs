//! Metric vocabulary.

pub const TOTAL_LENGTH: &str = "total_length";
pub const TOTAL_LINES: &str = "total_lines";
pub const META_TAGS_COUNT: &str = "meta_tags_count";

pub const TOTAL_TAGS: &str = "total_tags";
pub const UNIQUE_TAGS: &str = "unique_tags";
pub const MOST_COMMON_TAGS: &str = "most_common_tags";
pub const SEMANTIC_TAGS_USED: &str = "semantic_tags_used";

pub const EXTERNAL_CSS: &str = "external_css";
pub const EXTERNAL_JS: &str = "external_js";
pub const INLINE_CSS: &str = "inline_css";
pub const INLINE_JS: &str = "inline_js";
pub const IMAGES_COUNT: &str = "images_count";
pub const FORMS_COUNT: &str = "forms_count";

pub const FRAMEWORKS_DETECTED: &str = "frameworks_detected";
pub const PERFORMANCE_INSIGHTS: &str = "performance_insights";

pub const TABLES_COUNT: &str = "tables_count";
pub const AVG_ROWS_PER_TABLE: &str = "avg_rows_per_table";
pub const TABLE_DATA_DENSITY: &str = "table_data_density";

pub const PARAGRAPHS_COUNT: &str = "paragraphs_count";
pub const AVG_PARAGRAPH_LENGTH: &str = "avg_paragraph_length";
pub const ATOMIC_PARAGRAPH_RATIO: &str = "atomic_paragraph_ratio";

pub const URL_YEAR_INCLUSION: &str = "url_year_inclusion";
pub const TITLE_YEAR_INCLUSION: &str = "title_year_inclusion";
pub const META_YEAR_INCLUSION: &str = "meta_year_inclusion";
pub const EARLY_CONTENT_YEAR_INCLUSION: &str = "early_content_year_inclusion";

pub const LISTS_COUNT: &str = "lists_count";
pub const AVG_ITEMS_PER_LIST: &str = "avg_items_per_list";
pub const LIST_COVERAGE_RATIO: &str = "list_coverage_ratio";

pub const URL_TOKEN_COUNT: &str = "url_token_count";
pub const KEYWORD_PRESENCE_RATIO: &str = "keyword_presence_ratio";
pub const STOPWORD_RATIO: &str = "stopword_ratio";

pub const URL_DEPTH: &str = "url_depth";
pub const SUBFOLDER_PAGE_RATIO: &str = "subfolder_page_ratio";
pub const MOST_COMMON_SUBFOLDER: &str = "most_common_subfolder";
pub const DEEP_LINK_DENSITY: &str = "deep_link_density";

pub const HTML_JS_BYTE_RATIO: &str = "html_js_byte_ratio";
pub const SCRIPT_TAG_DENSITY: &str = "script_tag_density";
pub const EXTERNAL_JS_COUNT: &str = "external_js_count";
pub const INLINE_JS_SIZE: &str = "inline_js_size";

pub const SCHEMA_BLOCKS_COUNT: &str = "schema_blocks_count";
pub const JSONLD_BLOCKS_COUNT: &str = "jsonld_blocks_count";
pub const SCHEMA_TYPES: &str = "schema_types";
pub const SCHEMA_TYPE_COUNT: &str = "schema_type_count";

pub const H2_COUNT: &str = "h2_count";
pub const H3_COUNT: &str = "h3_count";
pub const HEADING_COVERAGE_RATIO: &str = "heading_coverage_ratio";

/// Every numeric metric, in report order. These are the keys groups are averaged over.
pub const NUMERIC: &[&str] = &[
    TOTAL_LENGTH,
    TOTAL_LINES,
    META_TAGS_COUNT,
    TOTAL_TAGS,
    UNIQUE_TAGS,
    EXTERNAL_CSS,
    EXTERNAL_JS,
    INLINE_CSS,
    INLINE_JS,
    IMAGES_COUNT,
    FORMS_COUNT,
    TABLES_COUNT,
    AVG_ROWS_PER_TABLE,
    TABLE_DATA_DENSITY,
    PARAGRAPHS_COUNT,
    AVG_PARAGRAPH_LENGTH,
    ATOMIC_PARAGRAPH_RATIO,
    URL_YEAR_INCLUSION,
    TITLE_YEAR_INCLUSION,
    META_YEAR_INCLUSION,
    EARLY_CONTENT_YEAR_INCLUSION,
    LISTS_COUNT,
    AVG_ITEMS_PER_LIST,
    LIST_COVERAGE_RATIO,
    URL_TOKEN_COUNT,
    KEYWORD_PRESENCE_RATIO,
    STOPWORD_RATIO,
    URL_DEPTH,
    SUBFOLDER_PAGE_RATIO,
    DEEP_LINK_DENSITY,
    HTML_JS_BYTE_RATIO,
    SCRIPT_TAG_DENSITY,
    EXTERNAL_JS_COUNT,
    INLINE_JS_SIZE,
    SCHEMA_BLOCKS_COUNT,
    JSONLD_BLOCKS_COUNT,
    SCHEMA_TYPE_COUNT,
    H2_COUNT,
    H3_COUNT,
    HEADING_COVERAGE_RATIO,
];

/// List- or text-valued metrics; never averaged.
pub const NON_NUMERIC: &[&str] = &[
    MOST_COMMON_TAGS,
    SEMANTIC_TAGS_USED,
    FRAMEWORKS_DETECTED,
    PERFORMANCE_INSIGHTS,
    MOST_COMMON_SUBFOLDER,
    SCHEMA_TYPES,
];

/// Value a numeric metric takes when a record lacks it.
pub fn default_value(key: &str) -> f64 {
    if key == HTML_JS_BYTE_RATIO { 1.0 } else { 0.0 }
}

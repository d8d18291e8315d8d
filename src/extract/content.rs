use super::PageInput;
use super::keys::*;
use super::patterns::{self, count, ratio};
use super::record::{MetricValue, MetricsRecord};

/// Paragraphs at or under this many words count as atomic.
pub const ATOMIC_WORD_LIMIT: usize = 100;

pub fn tables(page: &PageInput<'_>) -> MetricsRecord {
    let blocks: Vec<&str> = patterns::TABLE_BLOCK
        .find_iter(page.html)
        .map(|m| m.as_str())
        .collect();

    let mut rows = 0usize;
    let mut cells = 0usize;
    let mut numeric_cells = 0usize;
    for table in &blocks {
        rows += count(&patterns::TR_OPEN, table);
        for cell in patterns::captures(&patterns::CELL, table) {
            cells += 1;
            if patterns::DIGIT.is_match(cell) {
                numeric_cells += 1;
            }
        }
    }

    let mut record = MetricsRecord::new();
    record.set(TABLES_COUNT, MetricValue::count(blocks.len()));
    record.set(AVG_ROWS_PER_TABLE, ratio(rows as f64, blocks.len() as f64, 0.0));
    record.set(TABLE_DATA_DENSITY, ratio(numeric_cells as f64, cells as f64, 0.0));
    record
}

fn word_count(fragment: &str) -> usize {
    patterns::strip_tags(fragment).split_whitespace().count()
}

pub fn paragraphs(page: &PageInput<'_>) -> MetricsRecord {
    let words: Vec<usize> = patterns::captures(&patterns::PARAGRAPH_BLOCK, page.html)
        .into_iter()
        .map(word_count)
        .collect();
    let n = words.len() as f64;
    let atomic = words.iter().filter(|&&w| w <= ATOMIC_WORD_LIMIT).count();

    let mut record = MetricsRecord::new();
    record.set(PARAGRAPHS_COUNT, MetricValue::count(words.len()));
    record.set(
        AVG_PARAGRAPH_LENGTH,
        ratio(words.iter().sum::<usize>() as f64, n, 0.0),
    );
    record.set(ATOMIC_PARAGRAPH_RATIO, ratio(atomic as f64, n, 0.0));
    record
}

pub fn lists(page: &PageInput<'_>) -> MetricsRecord {
    let html = page.html;
    let items: Vec<usize> = patterns::UL_BLOCK
        .find_iter(html)
        .chain(patterns::OL_BLOCK.find_iter(html))
        .map(|m| count(&patterns::LI_OPEN, m.as_str()))
        .collect();
    let total_items: usize = items.iter().sum();

    let mut record = MetricsRecord::new();
    record.set(LISTS_COUNT, MetricValue::count(items.len()));
    record.set(
        AVG_ITEMS_PER_LIST,
        ratio(total_items as f64, items.len() as f64, 0.0),
    );
    // without any list the coverage stays 0, even when paragraphs exist
    let coverage = if items.is_empty() {
        0.0
    } else {
        let paragraphs = count(&patterns::P_OPEN, html);
        ratio(total_items as f64, (paragraphs + total_items) as f64, 0.0)
    };
    record.set(LIST_COVERAGE_RATIO, coverage);
    record
}

pub fn headings(page: &PageInput<'_>) -> MetricsRecord {
    let html = page.html;
    let h2 = count(&patterns::H2_OPEN, html);
    let h3 = count(&patterns::H3_OPEN, html);
    let blocks = count(&patterns::P_OPEN, html) + count(&patterns::CONTENT_DIV, html);

    let mut record = MetricsRecord::new();
    record.set(H2_COUNT, MetricValue::count(h2));
    record.set(H3_COUNT, MetricValue::count(h3));
    record.set(
        HEADING_COVERAGE_RATIO,
        ratio((h2 + h3) as f64, blocks as f64, 0.0),
    );
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(f: fn(&PageInput<'_>) -> MetricsRecord, html: &str) -> MetricsRecord {
        f(&PageInput::new(html, None))
    }

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    #[test]
    fn table_density_counts_cells_with_digits() {
        let html = r#"
            <table>
              <tr><th>Plan</th><th>Price</th></tr>
              <tr><td>Basic</td><td>$9</td></tr>
            </table>
            <table><tr><td>2025</td></tr></table>
        "#;
        let record = run(tables, html);
        assert_eq!(record.number(TABLES_COUNT), Some(2.0));
        assert_eq!(record.number(AVG_ROWS_PER_TABLE), Some(1.5));
        assert_eq!(record.number(TABLE_DATA_DENSITY), Some(0.4));
    }

    #[test]
    fn table_without_cells_has_zero_density() {
        let record = run(tables, "<table><caption>empty</caption></table>");
        assert_eq!(record.number(TABLES_COUNT), Some(1.0));
        assert_eq!(record.number(TABLE_DATA_DENSITY), Some(0.0));
        let none = run(tables, "<p>no tables</p>");
        assert_eq!(none.number(TABLES_COUNT), Some(0.0));
        assert_eq!(none.number(AVG_ROWS_PER_TABLE), Some(0.0));
    }

    #[test]
    fn atomic_ratio_bounds() {
        let all_short = format!("<p>{}</p><p><b>{}</b></p>", words(10), words(100));
        assert_eq!(run(paragraphs, &all_short).number(ATOMIC_PARAGRAPH_RATIO), Some(1.0));

        let all_long = format!("<p>{}</p>", words(101));
        assert_eq!(run(paragraphs, &all_long).number(ATOMIC_PARAGRAPH_RATIO), Some(0.0));

        let empty = run(paragraphs, "<div>no paragraphs</div>");
        assert_eq!(empty.number(PARAGRAPHS_COUNT), Some(0.0));
        assert_eq!(empty.number(ATOMIC_PARAGRAPH_RATIO), Some(0.0));
        assert_eq!(empty.number(AVG_PARAGRAPH_LENGTH), Some(0.0));
    }

    #[test]
    fn paragraph_average_strips_inner_tags() {
        let html = "<p>one <a href='#'>two three</a></p><p>four</p>";
        let record = run(paragraphs, html);
        assert_eq!(record.number(PARAGRAPHS_COUNT), Some(2.0));
        assert_eq!(record.number(AVG_PARAGRAPH_LENGTH), Some(2.0));
    }

    #[test]
    fn list_coverage_against_paragraphs() {
        let html = "<ul><li>a</li><li>b</li><li>c</li></ul><ol><li>1</li></ol><p>x</p><p>y</p>";
        let record = run(lists, html);
        assert_eq!(record.number(LISTS_COUNT), Some(2.0));
        assert_eq!(record.number(AVG_ITEMS_PER_LIST), Some(2.0));
        assert_eq!(
            record.number(LIST_COVERAGE_RATIO),
            Some(4.0 / 6.0)
        );
    }

    #[test]
    fn no_lists_means_zero_coverage() {
        let record = run(lists, "<p>only text</p>");
        assert_eq!(record.number(LISTS_COUNT), Some(0.0));
        assert_eq!(record.number(LIST_COVERAGE_RATIO), Some(0.0));
    }

    #[test]
    fn heading_coverage_counts_content_divs() {
        let html = r#"<h2>A</h2><h3>B</h3><p>x</p><div class="post-content">y</div><div class="nav">z</div>"#;
        let record = run(headings, html);
        assert_eq!(record.number(H2_COUNT), Some(1.0));
        assert_eq!(record.number(H3_COUNT), Some(1.0));
        assert_eq!(record.number(HEADING_COVERAGE_RATIO), Some(1.0));

        let bare = run(headings, "<h2>only heading</h2>");
        assert_eq!(bare.number(HEADING_COVERAGE_RATIO), Some(0.0));
    }
}

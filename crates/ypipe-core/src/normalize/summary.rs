use scraper::{ElementRef, Html, Selector};

use crate::Summary;

/// Flattens every two-cell table row on a quote page into `label -> value`.
///
/// Later rows win on repeated labels. Rows with any other cell count are
/// skipped, and a page without tables yields an empty mapping.
pub fn parse_summary_html(html: &str) -> Summary {
    let document = Html::parse_document(html);
    let mut summary = Summary::new();

    let (Ok(rows), Ok(cells)) = (Selector::parse("tr"), Selector::parse("td")) else {
        return summary;
    };

    for row in document.select(&rows) {
        let cells: Vec<ElementRef<'_>> = row.select(&cells).collect();
        let [label, value] = cells.as_slice() else {
            continue;
        };
        let label = cell_text(label);
        if label.is_empty() {
            continue;
        }
        summary.insert(label, cell_text(value));
    }

    summary
}

fn cell_text(cell: &ElementRef<'_>) -> String {
    cell.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_two_cell_rows() {
        let html = r#"
            <html><body>
              <table>
                <tr><td>Previous Close</td><td>185.64</td></tr>
                <tr><td><span>Market   Cap</span></td><td>2.87T</td></tr>
                <tr><td>only one cell</td></tr>
                <tr><td>a</td><td>b</td><td>c</td></tr>
              </table>
            </body></html>
        "#;

        let summary = parse_summary_html(html);
        assert_eq!(summary.len(), 2);
        assert_eq!(summary["Previous Close"], "185.64");
        assert_eq!(summary["Market Cap"], "2.87T");
    }

    #[test]
    fn page_without_tables_is_empty() {
        assert!(parse_summary_html("<html><body><p>Consent</p></body></html>").is_empty());
        assert!(parse_summary_html("").is_empty());
    }
}
